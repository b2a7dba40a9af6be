//! Minimal CLI: sample → (schema | verify | list)
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use seed_schema::samples::{self, Sample};
use seed_schema::{BuildOptions, Schema, build_schema_for, build_schema_with_prototype, verify, verify_defaults};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive record schemas from the bundled sample types and check that their defaults survive a round trip
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build and print the Avro-style JSON schema of one sample
    Schema(SchemaOut),
    /// build schemas and round-trip prototype, zero value and defaults
    Verify(VerifyRun),
    /// list the bundled samples
    List,
}

#[derive(Args, Debug, Clone)]
struct BuildSettings {
    /// treat every field without an explicit annotation as nullable
    #[arg(long, default_value_t = false)]
    allow_null: bool,

    /// do not use `Default` instances as record defaults
    #[arg(long, default_value_t = false)]
    no_initial_values: bool,

    /// take root defaults from the sample's prototype instance
    #[arg(long, default_value_t = false)]
    prototype: bool,

    /// bound on prototype nesting
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    /// sample name (see `list`)
    sample: String,

    #[command(flatten)]
    build_settings: BuildSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct VerifyRun {
    /// sample names; all samples if omitted
    samples: Vec<String>,

    #[command(flatten)]
    build_settings: BuildSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl BuildSettings {
    fn options(&self, sample: &Sample) -> BuildOptions {
        let mut options = sample.options();
        if self.allow_null {
            options = options.allow_null(true);
        }
        if self.no_initial_values {
            options = options.initial_values(false);
        }
        if let Some(depth) = self.max_depth {
            options = options.max_depth(depth);
        }
        options
    }

    fn build(&self, sample: &Sample) -> anyhow::Result<Schema> {
        let options = self.options(sample);
        let schema = if self.prototype {
            build_schema_with_prototype(&sample.type_info(), &sample.prototype(), &options)
        } else {
            build_schema_for(&sample.type_info(), &options)
        };
        schema.with_context(|| format!("failed to build schema for sample `{}`", sample.name))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let sample = lookup(&target.sample)?;
                let schema = target.build_settings.build(&sample)?;
                tracing::info!(sample = sample.name, records = schema.records().count(), "built schema");
                let schema_src = serde_json::to_string_pretty(&schema.to_json())?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &schema_src).with_context(|| format!("failed to write {}", out.display()))?;
                    tracing::info!(path = %out.display(), "schema written");
                } else {
                    println!("{schema_src}");
                }
                Ok(())
            }
            Command::Verify(target) => {
                let selected = if target.samples.is_empty() {
                    samples::catalog()
                } else {
                    target.samples.iter().map(|name| lookup(name)).collect::<anyhow::Result<Vec<_>>>()?
                };
                let results: Vec<(Sample, anyhow::Result<()>)> = selected
                    .into_par_iter()
                    .map(|sample| {
                        let result = check_sample(&target.build_settings, &sample);
                        (sample, result)
                    })
                    .collect();

                let mut failed = 0usize;
                for (sample, result) in &results {
                    match result {
                        Ok(()) => eprintln!("{} {}", "✅".green(), sample.name),
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {}: {error:#}", "❌".red(), sample.name);
                        }
                    }
                }
                tracing::info!(checked = results.len(), failed, "verification finished");
                if failed > 0 {
                    return Err(anyhow!("{failed} of {} samples failed verification", results.len()));
                }
                Ok(())
            }
            Command::List => {
                for sample in samples::catalog() {
                    println!("{:<12} {}", sample.name.bold(), sample.about);
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn lookup(name: &str) -> anyhow::Result<Sample> {
    samples::find(name).ok_or_else(|| anyhow!("unknown sample `{name}`; run `list` to see the available ones"))
}

/// Prototype, zero value and every stored default must survive the codec.
fn check_sample(settings: &BuildSettings, sample: &Sample) -> anyhow::Result<()> {
    let options = settings.options(sample);
    let schema = settings.build(sample)?;
    tracing::debug!(sample = sample.name, "round-tripping prototype");
    verify(&sample.prototype(), &schema, &options).context("prototype")?;
    tracing::debug!(sample = sample.name, "round-tripping zero value");
    verify(&sample.zero(), &schema, &options).context("zero value")?;
    verify_defaults(&schema).context("stored defaults")?;
    Ok(())
}
