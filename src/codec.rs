//! Binary serialization used to check that values survive the schema.
//!
//! The layout follows the Avro binary encoding:
//!
//! - `int`/`long`: zig-zag varint
//! - `float`/`double`: little-endian IEEE 754
//! - `string`: varint length + UTF-8 bytes
//! - `enum`: varint symbol index
//! - `array`: blocks of `count, items...`, terminated by a zero count
//! - `union`: varint member index, then the member's encoding
//! - `record`: fields in declaration order, no framing
use crate::datum::Datum;
use crate::error::CodecError;
use crate::schema::{Node, Schema, WireKind};

/// A serializer able to write a [`Datum`] against a schema node and read it back.
pub trait Codec {
    fn encode(&self, datum: &Datum, node: &Node, schema: &Schema) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8], node: &Node, schema: &Schema) -> Result<Datum, CodecError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode(&self, datum: &Datum, node: &Node, schema: &Schema) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        write_datum(&mut out, datum, node, schema)?;
        Ok(out)
    }

    fn decode(&self, bytes: &[u8], node: &Node, schema: &Schema) -> Result<Datum, CodecError> {
        let mut reader = Reader { bytes, pos: 0 };
        let datum = reader.datum(node, schema)?;
        if reader.pos != bytes.len() {
            return Err(CodecError::TrailingBytes { count: bytes.len() - reader.pos });
        }
        Ok(datum)
    }
}

// ------------------------------- Encoding --------------------------------- //

fn write_datum(out: &mut Vec<u8>, datum: &Datum, node: &Node, schema: &Schema) -> Result<(), CodecError> {
    match (node, datum) {
        (Node::Null, Datum::Null) => {}
        (Node::Primitive(WireKind::Boolean), Datum::Boolean(b)) => out.push(u8::from(*b)),
        (Node::Primitive(WireKind::Int), Datum::Int(v)) => write_long(out, i64::from(*v)),
        (Node::Primitive(WireKind::Long), Datum::Long(v)) => write_long(out, *v),
        (Node::Primitive(WireKind::Float), Datum::Float(v)) => out.extend_from_slice(&v.0.to_le_bytes()),
        (Node::Primitive(WireKind::Double), Datum::Double(v)) => out.extend_from_slice(&v.0.to_le_bytes()),
        (Node::Primitive(WireKind::String), Datum::String(s)) => {
            write_long(out, s.len() as i64);
            out.extend_from_slice(s.as_bytes());
        }
        (Node::Enum(e), Datum::Enum(symbol)) => {
            let index = e.index_of(symbol).ok_or_else(|| CodecError::Mismatch {
                expected: e.name().to_string(),
                found: format!("symbol `{symbol}`"),
            })?;
            write_long(out, index as i64);
        }
        (Node::Array(items), Datum::Array(values)) => {
            if !values.is_empty() {
                write_long(out, values.len() as i64);
                for value in values {
                    write_datum(out, value, items, schema)?;
                }
            }
            write_long(out, 0);
        }
        (Node::Record(id), Datum::Record(fields)) => {
            let record = schema.record(*id);
            for field in record.fields() {
                let value = fields.get(field.name()).ok_or_else(|| CodecError::MissingField {
                    record: record.name().to_string(),
                    field: field.name().to_string(),
                })?;
                write_datum(out, value, field.schema(), schema)?;
            }
        }
        (Node::Union(union), Datum::Union { index, value }) => {
            let member = union.members().get(*index).ok_or(CodecError::InvalidUnionIndex {
                index: *index as i64,
                members: union.len(),
            })?;
            write_long(out, *index as i64);
            write_datum(out, value, member, schema)?;
        }
        (node, datum) => {
            return Err(CodecError::Mismatch {
                expected: schema.describe(node),
                found: datum.kind_name().to_string(),
            });
        }
    }
    Ok(())
}

fn write_long(out: &mut Vec<u8>, v: i64) {
    let mut n = ((v << 1) ^ (v >> 63)) as u64;
    while n & !0x7f != 0 {
        out.push(((n & 0x7f) | 0x80) as u8);
        n >>= 7;
    }
    out.push(n as u8);
}

// ------------------------------- Decoding --------------------------------- //

struct Reader<'b> {
    bytes: &'b [u8],
    pos: usize,
}

impl Reader<'_> {
    fn datum(&mut self, node: &Node, schema: &Schema) -> Result<Datum, CodecError> {
        Ok(match node {
            Node::Null => Datum::Null,
            Node::Primitive(kind) => self.primitive(*kind)?,
            Node::Enum(e) => {
                let index = self.long()?;
                let symbol = usize::try_from(index)
                    .ok()
                    .and_then(|i| e.symbols().get(i))
                    .ok_or(CodecError::InvalidEnumIndex { index, symbols: e.symbols().len() })?;
                Datum::Enum(symbol.clone())
            }
            Node::Array(items) => {
                let mut values = Vec::new();
                loop {
                    let offset = self.pos;
                    let mut count = self.long()?;
                    if count == 0 {
                        break;
                    }
                    if count < 0 {
                        // negative count: block byte size follows
                        let _size = self.long()?;
                        count = count.checked_neg().ok_or(CodecError::NegativeLength { len: count, offset })?;
                    }
                    for _ in 0..count {
                        values.push(self.datum(items, schema)?);
                    }
                }
                Datum::Array(values)
            }
            Node::Record(id) => {
                let record = schema.record(*id);
                let mut fields = indexmap::IndexMap::with_capacity(record.fields().len());
                for field in record.fields() {
                    fields.insert(field.name().to_string(), self.datum(field.schema(), schema)?);
                }
                Datum::Record(fields)
            }
            Node::Union(union) => {
                let index = self.long()?;
                let position = usize::try_from(index).ok().filter(|i| *i < union.len());
                let Some(position) = position else {
                    return Err(CodecError::InvalidUnionIndex { index, members: union.len() });
                };
                let value = self.datum(&union.members()[position], schema)?;
                Datum::union(position, value)
            }
        })
    }

    fn primitive(&mut self, kind: WireKind) -> Result<Datum, CodecError> {
        Ok(match kind {
            WireKind::Boolean => {
                let offset = self.pos;
                match self.byte()? {
                    0 => Datum::Boolean(false),
                    1 => Datum::Boolean(true),
                    byte => return Err(CodecError::InvalidBool { byte, offset }),
                }
            }
            WireKind::Int => {
                let offset = self.pos;
                let v = self.long()?;
                let v = i32::try_from(v).map_err(|_| CodecError::VarintOverflow { offset })?;
                Datum::Int(v)
            }
            WireKind::Long => Datum::Long(self.long()?),
            WireKind::Float => Datum::float(f32::from_le_bytes(self.array::<4>()?)),
            WireKind::Double => Datum::double(f64::from_le_bytes(self.array::<8>()?)),
            WireKind::String => {
                let offset = self.pos;
                let len = self.long()?;
                let len = usize::try_from(len).map_err(|_| CodecError::NegativeLength { len, offset })?;
                let bytes = self.take(len)?;
                let s = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { offset })?;
                Datum::String(s.to_string())
            }
        })
    }

    fn long(&mut self) -> Result<i64, CodecError> {
        let offset = self.pos;
        let mut n: u64 = 0;
        let mut shift = 0u32;
        loop {
            if shift >= 64 {
                return Err(CodecError::VarintOverflow { offset });
            }
            let byte = self.byte()?;
            n |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    fn byte(&mut self) -> Result<u8, CodecError> {
        let byte = *self.bytes.get(self.pos).ok_or(CodecError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&[u8], CodecError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.bytes.len());
        let Some(end) = end else {
            return Err(CodecError::UnexpectedEof { offset: self.bytes.len() });
        };
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

// ------------------------------- Tests ------------------------------------ //
