//! Dynamic view of an instance, produced by [`Reflect::reflect`].
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use super::{PrimitiveKind, Reflect, TypeRef};
use crate::datum::Datum;
use crate::schema::WireKind;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Enum(EnumValue),
    Array(Vec<Value>),
    Record(RecordValue),
}

/// A number that still remembers its native width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    F64(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    ty: TypeRef,
    symbol: &'static str,
}

/// Record instance: its concrete type plus named attributes in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
    ty: TypeRef,
    fields: IndexMap<String, Value>,
}

impl Value {
    pub fn record<'a, T: Reflect>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Value::Record(RecordValue {
            ty: TypeRef::of::<T>(),
            fields: fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        })
    }

    pub fn symbol<T: Reflect>(symbol: &'static str) -> Self {
        Value::Enum(EnumValue { ty: TypeRef::of::<T>(), symbol })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Number(n) => n.kind().name().to_string(),
            Value::String(_) => "String".to_string(),
            Value::Enum(e) => e.ty.info().name().to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Record(r) => r.ty.info().name().to_string(),
        }
    }
}

impl Number {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Number::I8(_) => PrimitiveKind::I8,
            Number::I16(_) => PrimitiveKind::I16,
            Number::I32(_) => PrimitiveKind::I32,
            Number::I64(_) => PrimitiveKind::I64,
            Number::U8(_) => PrimitiveKind::U8,
            Number::U16(_) => PrimitiveKind::U16,
            Number::U32(_) => PrimitiveKind::U32,
            Number::F32(_) => PrimitiveKind::F32,
            Number::F64(_) => PrimitiveKind::F64,
        }
    }

    fn as_i64(self) -> Option<i64> {
        match self {
            Number::I8(v) => Some(v.into()),
            Number::I16(v) => Some(v.into()),
            Number::I32(v) => Some(v.into()),
            Number::I64(v) => Some(v),
            Number::U8(v) => Some(v.into()),
            Number::U16(v) => Some(v.into()),
            Number::U32(v) => Some(v.into()),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// Literal for `target`, or `None` when the conversion could lose precision.
    ///
    /// Accepts the native widening table plus the lossless promotions
    /// int → long, int → double and float → double.
    pub fn widen(self, target: WireKind) -> Option<Datum> {
        match target {
            WireKind::Int => match self.kind().wire() {
                WireKind::Int => self.as_i64().and_then(|v| i32::try_from(v).ok()).map(Datum::Int),
                _ => None,
            },
            WireKind::Long => self.as_i64().map(Datum::Long),
            WireKind::Float => match self {
                Number::F32(v) => Some(Datum::Float(OrderedFloat(v))),
                _ => None,
            },
            WireKind::Double => match self {
                Number::F32(v) => Some(Datum::Double(OrderedFloat(v.into()))),
                Number::F64(v) => Some(Datum::Double(OrderedFloat(v))),
                Number::I64(_) => None,
                other => other.as_i64().map(|v| Datum::Double(OrderedFloat(v as f64))),
            },
            WireKind::Boolean | WireKind::String => None,
        }
    }
}

impl EnumValue {
    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }
}

impl RecordValue {
    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ------------------------------- Tests ------------------------------------ //
