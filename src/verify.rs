//! Round-trip checks: a value (or a stored default) is converted to a literal,
//! written with a [`Codec`], read back and compared.
use crate::codec::{BinaryCodec, Codec};
use crate::datum::Datum;
use crate::defaults::DefaultExtractor;
use crate::error::{Result, SchemaError};
use crate::options::BuildOptions;
use crate::path::FieldPath;
use crate::reflect::Value;
use crate::schema::{Node, Schema};

/// Round-trip `value` through the binary codec against the schema root.
pub fn verify(value: &Value, schema: &Schema, options: &BuildOptions) -> Result<()> {
    verify_with(&BinaryCodec, value, schema, options)
}

pub fn verify_with<C: Codec + ?Sized>(codec: &C, value: &Value, schema: &Schema, options: &BuildOptions) -> Result<()> {
    let path = FieldPath::root(&schema.describe(schema.root()));
    let expected = DefaultExtractor::new(schema, options).datum(value, schema.root(), &path)?;
    round_trip(codec, &expected, schema.root(), schema, &path)
}

/// Round-trip every stored field default against its own field schema.
pub fn verify_defaults(schema: &Schema) -> Result<()> {
    verify_defaults_with(&BinaryCodec, schema)
}

pub fn verify_defaults_with<C: Codec + ?Sized>(codec: &C, schema: &Schema) -> Result<()> {
    for (_, record) in schema.records() {
        let base = FieldPath::root(record.name());
        for field in record.fields() {
            if let Some(default) = field.default() {
                round_trip(codec, default, field.schema(), schema, &base.field(field.name()))?;
            }
        }
    }
    Ok(())
}

fn round_trip<C: Codec + ?Sized>(codec: &C, datum: &Datum, node: &Node, schema: &Schema, path: &FieldPath) -> Result<()> {
    let bytes = codec.encode(datum, node, schema)?;
    let decoded = codec.decode(&bytes, node, schema)?;
    match first_difference(datum, &decoded, path) {
        None => Ok(()),
        Some((path, expected, found)) => Err(SchemaError::RoundTripMismatch {
            path: path.to_string(),
            expected: format!("{expected:?}"),
            found: format!("{found:?}"),
        }),
    }
}

/// Innermost location where `a` and `b` disagree.
fn first_difference<'d>(a: &'d Datum, b: &'d Datum, path: &FieldPath) -> Option<(FieldPath, &'d Datum, &'d Datum)> {
    if a == b {
        return None;
    }
    let inner = match (a, b) {
        (Datum::Array(xs), Datum::Array(ys)) if xs.len() == ys.len() => xs
            .iter()
            .zip(ys)
            .enumerate()
            .find_map(|(i, (x, y))| first_difference(x, y, &path.index(i))),
        (Datum::Record(xs), Datum::Record(ys)) if xs.len() == ys.len() => xs
            .iter()
            .find_map(|(name, x)| ys.get(name).and_then(|y| first_difference(x, y, &path.field(name)))),
        (Datum::Union { index: i, value: x }, Datum::Union { index: j, value: y }) if i == j => {
            first_difference(x, y, &path.member(*i))
        }
        _ => None,
    };
    inner.or_else(|| Some((path.clone(), a, b)))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::reflect::Reflect;
    use crate::schema::{RecordArena, WireKind};

    /// Reads every double back as zero.
    struct Lossy;

    impl Codec for Lossy {
        fn encode(&self, datum: &Datum, node: &Node, schema: &Schema) -> std::result::Result<Vec<u8>, CodecError> {
            BinaryCodec.encode(datum, node, schema)
        }
        fn decode(&self, bytes: &[u8], node: &Node, schema: &Schema) -> std::result::Result<Datum, CodecError> {
            Ok(match BinaryCodec.decode(bytes, node, schema)? {
                Datum::Array(items) => Datum::Array(items.into_iter().map(|_| Datum::double(0.0)).collect()),
                other => other,
            })
        }
    }

    #[test]
    fn mismatches_point_at_the_element() {
        let schema = RecordArena::new().finish(Node::array(Node::Primitive(WireKind::Double)));
        let value = Value::Array(vec![0.0f64.reflect(), 2.0f64.reflect()]);
        let err = verify_with(&Lossy, &value, &schema, &BuildOptions::new()).unwrap_err();
        match err {
            SchemaError::RoundTripMismatch { path, .. } => assert_eq!(path, "array<double>[1]"),
            other => panic!("unexpected error {other}"),
        }
        verify(&value, &schema, &BuildOptions::new()).unwrap();
    }
}
