//! Structural equality classes of schema nodes.
//!
//! Two union members with the same `Shape` cannot be told apart when a value
//! is matched against the union. Named types keep their simple name (the
//! Rust module path never reaches the schema); recursion through a record
//! already on the current path collapses to `RecordRef(name)`.
use super::{Node, RecordId, Schema, WireKind};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Null,
    Primitive(WireKind),
    Enum { name: String, symbols: Vec<String> },
    Array(Box<Shape>),
    Record { name: String, fields: Vec<(String, Shape)> },
    RecordRef(String),
    Union(Vec<Shape>),
}

impl Shape {
    pub fn of(node: &Node, schema: &Schema) -> Shape {
        let mut stack = Vec::new();
        shape_of(node, schema, &mut stack)
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> String {
        match self {
            Shape::Null => "null".to_string(),
            Shape::Primitive(kind) => kind.name().to_string(),
            Shape::Enum { name, .. } | Shape::Record { name, .. } | Shape::RecordRef(name) => name.clone(),
            Shape::Array(items) => format!("array<{}>", items.label()),
            Shape::Union(members) => {
                let labels: Vec<String> = members.iter().map(Shape::label).collect();
                format!("[{}]", labels.join(", "))
            }
        }
    }
}

fn shape_of(node: &Node, schema: &Schema, stack: &mut Vec<RecordId>) -> Shape {
    match node {
        Node::Null => Shape::Null,
        Node::Primitive(kind) => Shape::Primitive(*kind),
        Node::Enum(e) => Shape::Enum { name: e.name().to_string(), symbols: e.symbols().to_vec() },
        Node::Array(items) => Shape::Array(Box::new(shape_of(items, schema, stack))),
        Node::Union(u) => Shape::Union(u.members().iter().map(|m| shape_of(m, schema, stack)).collect()),
        Node::Record(id) => {
            let record = schema.record(*id);
            if stack.contains(id) {
                return Shape::RecordRef(record.name().to_string());
            }
            stack.push(*id);
            let fields = record
                .fields()
                .iter()
                .map(|f| (f.name().to_string(), shape_of(f.schema(), schema, stack)))
                .collect();
            stack.pop();
            Shape::Record { name: record.name().to_string(), fields }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;
    use crate::schema::{Field, RecordArena, RecordSchema, UnionSchema};

    #[test]
    fn self_reference_collapses_to_ref() {
        let mut arena = RecordArena::new();
        let id = arena.alloc(RecordSchema::new("Human", TypeId::of::<()>(), None));
        arena.set_fields(id, vec![
            Field::new("name", Node::Primitive(WireKind::String)),
            Field::new("friends", Node::array(Node::Record(id))),
        ]);
        let schema = arena.finish(Node::Record(id));

        let shape = schema.shape(schema.root());
        assert_eq!(shape, Shape::Record {
            name: "Human".into(),
            fields: vec![
                ("name".into(), Shape::Primitive(WireKind::String)),
                ("friends".into(), Shape::Array(Box::new(Shape::RecordRef("Human".into())))),
            ],
        });
    }

    #[test]
    fn union_shapes_keep_member_order() {
        let mut arena = RecordArena::new();
        let id = arena.alloc(RecordSchema::new("Unit", TypeId::of::<()>(), None));
        let schema = arena.finish(Node::Record(id));
        let a = Node::Union(UnionSchema::new(vec![Node::Primitive(WireKind::Double), Node::Primitive(WireKind::Long)]));
        let b = Node::Union(UnionSchema::new(vec![Node::Primitive(WireKind::Long), Node::Primitive(WireKind::Double)]));
        assert_ne!(schema.shape(&a), schema.shape(&b));
        assert_eq!(schema.shape(&a).label(), "[double, long]");
    }
}
