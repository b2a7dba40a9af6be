//! Raw schema overrides attached to a field, e.g. `["double", "long"]`.
//!
//! Parsing happens where the metadata is declared; the walker only ever sees
//! the structured [`OverrideSchema`].
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, SchemaError};
use crate::path::FieldPath;
use crate::schema::{Node, UnionSchema, WireKind};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OverrideSchema {
    /// `"null"` or a primitive name.
    Named(String),
    /// Members in wire order.
    Union(Vec<OverrideSchema>),
    Array {
        #[serde(rename = "type")]
        tag: ArrayTag,
        items: Box<OverrideSchema>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum ArrayTag {
    #[serde(rename = "array")]
    Array,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("invalid schema override at {path}: {message}")]
pub struct OverrideError {
    pub path: String,
    pub message: String,
}

impl OverrideSchema {
    pub fn named(name: impl Into<String>) -> Self {
        OverrideSchema::Named(name.into())
    }

    pub fn union(members: Vec<OverrideSchema>) -> Self {
        OverrideSchema::Union(members)
    }

    pub fn array(items: OverrideSchema) -> Self {
        OverrideSchema::Array { tag: ArrayTag::Array, items: Box::new(items) }
    }

    /// Parse the JSON form, reporting the JSON path of the first problem.
    pub fn parse(text: &str) -> std::result::Result<Self, OverrideError> {
        let de = &mut serde_json::Deserializer::from_str(text);
        serde_path_to_error::deserialize(de).map_err(|err| OverrideError {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        })
    }

    pub(crate) fn to_node(&self, path: &FieldPath) -> Result<Node> {
        match self {
            OverrideSchema::Named(name) if name == "null" => Ok(Node::Null),
            OverrideSchema::Named(name) => WireKind::from_name(name)
                .map(Node::Primitive)
                .ok_or_else(|| SchemaError::inference(path, name, "override names an unknown type")),
            OverrideSchema::Array { items, .. } => Ok(Node::array(items.to_node(&path.items())?)),
            OverrideSchema::Union(members) => {
                let mut nodes = Vec::with_capacity(members.len());
                for (i, member) in members.iter().enumerate() {
                    let node = member.to_node(&path.member(i))?;
                    if matches!(node, Node::Union(_)) {
                        return Err(SchemaError::inference(path, "union", "unions may not directly contain unions"));
                    }
                    nodes.push(node);
                }
                Ok(Node::Union(UnionSchema::new(nodes)))
            }
        }
    }
}

impl FromStr for OverrideSchema {
    type Err = OverrideError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unions_arrays_and_names() {
        let parsed: OverrideSchema = r#"["double", "long", "null"]"#.parse().unwrap();
        assert_eq!(parsed, OverrideSchema::union(vec![
            OverrideSchema::named("double"),
            OverrideSchema::named("long"),
            OverrideSchema::named("null"),
        ]));

        let parsed = OverrideSchema::parse(r#"{"type": "array", "items": "int"}"#).unwrap();
        assert_eq!(parsed, OverrideSchema::array(OverrideSchema::named("int")));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = OverrideSchema::parse(r#"{"type": "map", "values": "int"}"#).unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn converts_to_nodes() {
        let path = FieldPath::root("T").field("f");
        let node = OverrideSchema::parse(r#"["double", "long"]"#).unwrap().to_node(&path).unwrap();
        assert_eq!(node, Node::Union(UnionSchema::new(vec![
            Node::Primitive(WireKind::Double),
            Node::Primitive(WireKind::Long),
        ])));
    }

    #[test]
    fn unknown_names_fail_inference() {
        let path = FieldPath::root("T").field("f");
        let err = OverrideSchema::named("decimal").to_node(&path).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaInference { .. }), "{err}");

        let nested = OverrideSchema::union(vec![OverrideSchema::union(vec![OverrideSchema::named("int")])]);
        assert!(nested.to_node(&path).is_err());
    }
}
