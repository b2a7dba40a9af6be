//! Union declaration checks and value → member matching.
//!
//! A value selects a member by exact shape equality: the value's concrete
//! type is built into a throwaway schema (same options) and compared with each
//! declared member. Shapes are cached per `TypeId`.
use std::any::TypeId;
use std::collections::HashMap;

use crate::error::{Result, SchemaError};
use crate::options::BuildOptions;
use crate::path::FieldPath;
use crate::reflect::{TypeRef, Value};
use crate::schema::{Node, Schema, Shape, UnionSchema, WireKind};
use crate::walker::SchemaBuilder;

/// Fails when two members of `union` have the same shape, or when it has more
/// than one array member (array values only match by kind).
pub(crate) fn ensure_distinct(union: &UnionSchema, schema: &Schema, path: &FieldPath) -> Result<()> {
    let arrays = positions(union, |m| matches!(m, Node::Array(_)));
    if let [first, second, ..] = arrays.as_slice() {
        let members = union.members();
        return Err(SchemaError::AmbiguousUnionDeclaration {
            path: path.to_string(),
            first: format!("{} (member {first})", schema.describe(&members[*first])),
            second: format!("{} (member {second})", schema.describe(&members[*second])),
        });
    }
    let shapes: Vec<Shape> = union.members().iter().map(|m| schema.shape(m)).collect();
    for (i, first) in shapes.iter().enumerate() {
        if let Some(j) = shapes[i + 1..].iter().position(|s| s == first) {
            return Err(SchemaError::AmbiguousUnionDeclaration {
                path: path.to_string(),
                first: format!("{} (member {i})", first.label()),
                second: format!("{} (member {})", first.label(), i + 1 + j),
            });
        }
    }
    Ok(())
}

pub struct UnionMatcher<'o> {
    options: &'o BuildOptions,
    shapes: HashMap<TypeId, Shape>,
}

impl<'o> UnionMatcher<'o> {
    pub fn new(options: &'o BuildOptions) -> Self {
        Self { options, shapes: HashMap::new() }
    }

    /// Index and node of the unique member of `union` that `value` belongs to.
    ///
    /// - `null` selects the null member.
    /// - a sequence selects the single array member.
    /// - anything else selects the member whose shape equals the shape of the
    ///   value's own type.
    pub fn match_value<'u>(
        &mut self,
        value: &Value,
        union: &'u UnionSchema,
        schema: &Schema,
        path: &FieldPath,
    ) -> Result<(usize, &'u Node)> {
        let candidates: Vec<usize> = match value {
            Value::Null => union.null_index().into_iter().collect(),
            Value::Array(_) => positions(union, |m| matches!(m, Node::Array(_))),
            _ => {
                let shape = self.value_shape(value, path)?;
                positions(union, |m| schema.shape(m) == shape)
            }
        };

        match candidates.as_slice() {
            [index] => Ok((*index, &union.members()[*index])),
            [] => Err(SchemaError::UnionMemberNotDeclared {
                path: path.to_string(),
                found: value.describe(),
            }),
            _ => Err(SchemaError::AmbiguousUnionMatch {
                path: path.to_string(),
                found: value.describe(),
                candidates,
            }),
        }
    }

    fn value_shape(&mut self, value: &Value, path: &FieldPath) -> Result<Shape> {
        match value {
            Value::Bool(_) => Ok(Shape::Primitive(WireKind::Boolean)),
            Value::Number(n) => Ok(Shape::Primitive(n.kind().wire())),
            Value::String(_) => Ok(Shape::Primitive(WireKind::String)),
            Value::Enum(e) => self.type_shape(e.type_ref(), path),
            Value::Record(r) => self.type_shape(r.type_ref(), path),
            Value::Null => Ok(Shape::Null),
            Value::Array(_) => Err(SchemaError::inference(path, "array", "sequences are matched by kind, not shape")),
        }
    }

    fn type_shape(&mut self, ty: TypeRef, path: &FieldPath) -> Result<Shape> {
        let id = ty.id();
        if let Some(shape) = self.shapes.get(&id) {
            return Ok(shape.clone());
        }
        let info = ty.info();
        let built = SchemaBuilder::new(self.options).build(&info).map_err(|err| match err {
            SchemaError::SchemaInference { type_name, reason, .. } => SchemaError::SchemaInference {
                path: path.to_string(),
                type_name,
                reason,
            },
            other => other,
        })?;
        let shape = built.shape(built.root());
        self.shapes.insert(id, shape.clone());
        Ok(shape)
    }
}

fn positions(union: &UnionSchema, pred: impl Fn(&Node) -> bool) -> Vec<usize> {
    union.members().iter().enumerate().filter(|(_, m)| pred(m)).map(|(i, _)| i).collect()
}

// ------------------------------- Tests ------------------------------------ //
