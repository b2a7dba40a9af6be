//! Dotted locations used to point errors at the offending type/field.
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Type(String),
    Field(String),
    Items,
    Index(usize),
    Member(usize),
}

/// `Meta.kinds[1]@0.name`
///
/// - `Type` starts a path at a named type.
/// - `[]` is "any element" (schema building), `[n]` an element of a prototype.
/// - `@n` selects union member `n`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root(type_name: &str) -> Self {
        Self { segments: vec![Segment::Type(type_name.to_string())] }
    }

    pub fn field(&self, name: &str) -> Self {
        self.push(Segment::Field(name.to_string()))
    }

    pub fn items(&self) -> Self {
        self.push(Segment::Items)
    }

    pub fn index(&self, i: usize) -> Self {
        self.push(Segment::Index(i))
    }

    pub fn member(&self, i: usize) -> Self {
        self.push(Segment::Member(i))
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Type(name) if i == 0 => f.write_str(name)?,
                Segment::Type(name) => write!(f, "<{name}>")?,
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Items => f.write_str("[]")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
                Segment::Member(n) => write!(f, "@{n}")?,
            }
        }
        Ok(())
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_fields_elements_and_members() {
        let path = FieldPath::root("Meta").field("kinds").index(1).member(0).field("name");
        assert_eq!(path.to_string(), "Meta.kinds[1]@0.name");
        assert_eq!(FieldPath::root("Human").field("friends").items().to_string(), "Human.friends[]");
        assert_eq!(FieldPath::default().to_string(), "<root>");
    }
}
