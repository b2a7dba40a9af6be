//! Prototype → field defaults.
//!
//! A prototype is a reflected instance whose attribute values become the
//! defaults of the matching record fields. Each value is converted against
//! the field's finished schema node, so union defaults carry the index of the
//! member they were matched to.
use std::borrow::Cow;

use indexmap::IndexMap;

use crate::datum::Datum;
use crate::error::{Result, SchemaError};
use crate::options::BuildOptions;
use crate::path::FieldPath;
use crate::reflect::{RecordValue, Value};
use crate::schema::{Node, RecordId, Schema, WireKind};
use crate::union::UnionMatcher;

/// Converts reflected values into schema literals.
pub struct DefaultExtractor<'s> {
    schema: &'s Schema,
    options: &'s BuildOptions,
    matcher: UnionMatcher<'s>,
    depth: usize,
}

impl<'s> DefaultExtractor<'s> {
    pub fn new(schema: &'s Schema, options: &'s BuildOptions) -> Self {
        Self { schema, options, matcher: UnionMatcher::new(options), depth: 0 }
    }

    /// Literal for `value` interpreted against `node`.
    pub fn datum(&mut self, value: &Value, node: &Node, path: &FieldPath) -> Result<Datum> {
        if self.depth >= self.options.depth_limit() {
            return Err(SchemaError::DefaultExtractionDepthExceeded {
                path: path.to_string(),
                limit: self.options.depth_limit(),
            });
        }
        self.depth += 1;
        let out = self.convert(value, node, path);
        self.depth -= 1;
        out
    }

    /// Defaults for every field of record `id`, in field order.
    pub fn record_defaults(&mut self, id: RecordId, prototype: &Value) -> Result<Vec<Option<Datum>>> {
        let schema = self.schema;
        let record = schema.record(id);
        let path = FieldPath::root(record.name());
        match prototype {
            Value::Record(value) => {
                let fields = self.record(id, value, &path)?;
                Ok(fields.into_values().map(Some).collect())
            }
            other => Err(SchemaError::mismatch(&path, record.name(), other.describe())),
        }
    }

    fn convert(&mut self, value: &Value, node: &Node, path: &FieldPath) -> Result<Datum> {
        match node {
            Node::Null => match value {
                Value::Null => Ok(Datum::Null),
                other => Err(SchemaError::mismatch(path, "null", other.describe())),
            },
            Node::Primitive(kind) => primitive(*kind, value, path),
            Node::Enum(e) => match value {
                Value::Enum(v) if e.index_of(v.symbol()).is_some() => Ok(Datum::Enum(v.symbol().to_string())),
                other => Err(SchemaError::mismatch(path, e.name(), other.describe())),
            },
            Node::Array(items) => match value {
                Value::Array(values) => {
                    let mut out = Vec::with_capacity(values.len());
                    for (i, v) in values.iter().enumerate() {
                        out.push(self.datum(v, items, &path.index(i))?);
                    }
                    Ok(Datum::Array(out))
                }
                other => Err(SchemaError::mismatch(path, self.schema.describe(node), other.describe())),
            },
            Node::Record(id) => match value {
                Value::Record(record) => self.record(*id, record, path).map(Datum::Record),
                Value::Null => Err(SchemaError::MissingPrototypeField { path: path.to_string() }),
                other => Err(SchemaError::mismatch(path, self.schema.describe(node), other.describe())),
            },
            Node::Union(union) => {
                let (index, member) = self.matcher.match_value(value, union, self.schema, path)?;
                let inner = self.datum(value, member, &path.member(index))?;
                Ok(Datum::union(index, inner))
            }
        }
    }

    fn record(&mut self, id: RecordId, value: &RecordValue, path: &FieldPath) -> Result<IndexMap<String, Datum>> {
        let schema = self.schema;
        let record = schema.record(id);
        let mut out = IndexMap::with_capacity(record.fields().len());
        for field in record.fields() {
            let field_path = path.field(field.name());
            let attr = value
                .get(field.name())
                .ok_or_else(|| SchemaError::MissingPrototypeField { path: field_path.to_string() })?;
            let datum = self.datum(attr, field.schema(), &field_path)?;
            out.insert(field.name().to_string(), datum);
        }
        Ok(out)
    }
}

fn primitive(kind: WireKind, value: &Value, path: &FieldPath) -> Result<Datum> {
    match (kind, value) {
        (WireKind::Boolean, Value::Bool(b)) => Ok(Datum::Boolean(*b)),
        (WireKind::String, Value::String(s)) => Ok(Datum::String(s.clone())),
        (kind, Value::Number(n)) => n
            .widen(kind)
            .ok_or_else(|| SchemaError::mismatch(path, kind.name(), n.kind().name())),
        (kind, other) => Err(SchemaError::mismatch(path, kind.name(), other.describe())),
    }
}

/// Attach defaults to every record that has a prototype.
///
/// Prototype lookup order per record: `root` (root record only), then
/// [`BuildOptions::with_default`], then the type's registered initial value
/// when [`BuildOptions::initial_values`] is on. Records without any prototype
/// keep no defaults.
pub fn extract_defaults(mut schema: Schema, root: Option<&Value>, options: &BuildOptions) -> Result<Schema> {
    let root_id = schema.root().as_record();
    let mut filled = Vec::new();
    {
        let mut extractor = DefaultExtractor::new(&schema, options);
        for (id, record) in schema.records() {
            let explicit = root.filter(|_| Some(id) == root_id);
            let source: Cow<'_, Value> = match explicit.or_else(|| options.default_for(record.type_id)) {
                Some(value) => Cow::Borrowed(value),
                None => match record.prototype {
                    Some(make) if options.uses_initial_values() => Cow::Owned(make()),
                    _ => continue,
                },
            };
            filled.push((id, extractor.record_defaults(id, &source)?));
        }
    }
    for (id, defaults) in filled {
        schema.set_defaults(id, defaults);
    }
    Ok(schema)
}

// ------------------------------- Tests ------------------------------------ //
