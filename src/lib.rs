//! Record schemas derived from static type descriptions, with field defaults
//! taken from prototype instances.
//!
//! ```
//! use seed_schema::samples::Human;
//! use seed_schema::{BuildOptions, build_schema};
//!
//! let schema = build_schema::<Human>(&BuildOptions::new()).unwrap();
//! let human = schema.root_record().unwrap();
//! assert_eq!(human.field("name").unwrap().default(), Some(&seed_schema::Datum::string("Andy")));
//! ```
pub mod codec;
pub mod datum;
pub mod defaults;
pub mod error;
pub mod nullability;
pub mod options;
pub mod override_schema;
pub mod path;
pub mod reflect;
pub mod samples;
pub mod schema;
pub mod union;
pub mod verify;
pub mod walker;

pub use codec::{BinaryCodec, Codec};
pub use datum::Datum;
pub use error::{CodecError, Result, SchemaError};
pub use options::BuildOptions;
pub use override_schema::OverrideSchema;
pub use reflect::{FieldInfo, FieldMeta, MetadataLookup, Reflect, TypeInfo, TypeRef, Value};
pub use schema::{Node, Schema, Shape, WireKind};
pub use verify::{verify, verify_defaults, verify_defaults_with, verify_with};

use defaults::extract_defaults;
use walker::SchemaBuilder;

// ------------------------------ Entry points ------------------------------ //

/// Schema for `T`. Record defaults come from `options` prototypes and, when
/// enabled, from each type's registered initial value.
pub fn build_schema<T: Reflect>(options: &BuildOptions) -> Result<Schema> {
    build_schema_for(&T::type_info(), options)
}

/// Schema for `T` whose root record defaults are taken from `prototype`.
pub fn build_schema_with_defaults<T: Reflect>(prototype: &T, options: &BuildOptions) -> Result<Schema> {
    build_schema_with_prototype(&T::type_info(), &prototype.reflect(), options)
}

pub fn build_schema_for(ty: &TypeInfo, options: &BuildOptions) -> Result<Schema> {
    let schema = SchemaBuilder::new(options).build(ty)?;
    extract_defaults(schema, None, options)
}

pub fn build_schema_with_prototype(ty: &TypeInfo, prototype: &Value, options: &BuildOptions) -> Result<Schema> {
    let schema = SchemaBuilder::new(options).build(ty)?;
    extract_defaults(schema, Some(prototype), options)
}
