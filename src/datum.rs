//! Schema-shaped literals: field defaults and decoded values.
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    String(String),
    Enum(String),
    Array(Vec<Datum>),
    Record(IndexMap<String, Datum>),
    /// Which alternative, and that alternative's own literal.
    Union { index: usize, value: Box<Datum> },
}

impl Datum {
    /// `true` for `Null` and for a union whose selected member is null.
    pub fn is_null(&self) -> bool {
        match self {
            Datum::Null => true,
            Datum::Union { value, .. } => value.is_null(),
            _ => false,
        }
    }

    pub fn union(index: usize, value: Datum) -> Self {
        Datum::Union { index, value: Box::new(value) }
    }

    pub fn record<'a>(fields: impl IntoIterator<Item = (&'a str, Datum)>) -> Self {
        Datum::Record(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Datum::String(s.into())
    }

    pub fn float(v: f32) -> Self {
        Datum::Float(OrderedFloat(v))
    }

    pub fn double(v: f64) -> Self {
        Datum::Double(OrderedFloat(v))
    }

    /// Member index and inner literal of a union datum.
    pub fn as_union(&self) -> Option<(usize, &Datum)> {
        match self {
            Datum::Union { index, value } => Some((*index, value)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Datum> {
        match self {
            Datum::Record(fields) => fields.get(field),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::Int(_) => "int",
            Datum::Long(_) => "long",
            Datum::Float(_) => "float",
            Datum::Double(_) => "double",
            Datum::String(_) => "string",
            Datum::Enum(_) => "enum",
            Datum::Array(_) => "array",
            Datum::Record(_) => "record",
            Datum::Union { .. } => "union",
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_union_members_count_as_null() {
        assert!(Datum::Null.is_null());
        assert!(Datum::union(2, Datum::Null).is_null());
        assert!(!Datum::union(0, Datum::Int(1)).is_null());
    }

    #[test]
    fn nan_literals_compare_equal() {
        // needed so a NaN default survives the round-trip equality check
        assert_eq!(Datum::double(f64::NAN), Datum::double(f64::NAN));
    }
}
