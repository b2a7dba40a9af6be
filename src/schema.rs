//! Schema tree produced by the walker.
//!
//! Records live in an arena owned by [`Schema`] and are referenced by
//! [`RecordId`]; a type visited twice (or recursively) resolves to the same
//! id. Everything else is stored inline. A finished schema is immutable.
pub mod json;
pub mod shape;

use std::any::TypeId;

pub use shape::Shape;

use crate::datum::Datum;
use crate::reflect::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireKind {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl WireKind {
    pub fn name(self) -> &'static str {
        match self {
            WireKind::Boolean => "boolean",
            WireKind::Int => "int",
            WireKind::Long => "long",
            WireKind::Float => "float",
            WireKind::Double => "double",
            WireKind::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(WireKind::Boolean),
            "int" => Some(WireKind::Int),
            "long" => Some(WireKind::Long),
            "float" => Some(WireKind::Float),
            "double" => Some(WireKind::Double),
            "string" => Some(WireKind::String),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Null,
    Primitive(WireKind),
    Record(RecordId),
    Enum(EnumSchema),
    Array(Box<Node>),
    Union(UnionSchema),
}

impl Node {
    pub fn array(items: Node) -> Self {
        Node::Array(Box::new(items))
    }

    pub fn as_union(&self) -> Option<&UnionSchema> {
        match self {
            Node::Union(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<RecordId> {
        match self {
            Node::Record(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumSchema {
    name: String,
    symbols: Vec<String>,
}

impl EnumSchema {
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        Self { name: name.into(), symbols }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// Ordered alternatives; the position of a member is its wire tag.
#[derive(Clone, Debug, PartialEq)]
pub struct UnionSchema {
    members: Vec<Node>,
}

impl UnionSchema {
    pub fn new(members: Vec<Node>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Node] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn null_index(&self) -> Option<usize> {
        self.members.iter().position(|m| matches!(m, Node::Null))
    }

    pub(crate) fn push(&mut self, member: Node) {
        self.members.push(member);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    schema: Node,
    default: Option<Datum>,
}

impl Field {
    pub(crate) fn new(name: impl Into<String>, schema: Node) -> Self {
        Self { name: name.into(), schema, default: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Node {
        &self.schema
    }

    pub fn default(&self) -> Option<&Datum> {
        self.default.as_ref()
    }
}

#[derive(Clone, Debug)]
pub struct RecordSchema {
    name: String,
    fields: Vec<Field>,
    pub(crate) type_id: TypeId,
    pub(crate) prototype: Option<fn() -> Value>,
}

impl RecordSchema {
    pub(crate) fn new(name: impl Into<String>, type_id: TypeId, prototype: Option<fn() -> Value>) -> Self {
        Self { name: name.into(), fields: Vec::new(), type_id, prototype }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct Schema {
    root: Node,
    records: Vec<RecordSchema>,
}

impl Schema {
    pub(crate) fn new(root: Node, records: Vec<RecordSchema>) -> Self {
        Self { root, records }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The root record, when the schema was built for a record type.
    pub fn root_record(&self) -> Option<&RecordSchema> {
        self.root.as_record().map(|id| self.record(id))
    }

    pub fn record(&self, id: RecordId) -> &RecordSchema {
        &self.records[id.0]
    }

    pub fn records(&self) -> impl Iterator<Item = (RecordId, &RecordSchema)> {
        self.records.iter().enumerate().map(|(i, r)| (RecordId(i), r))
    }

    pub fn record_named(&self, name: &str) -> Option<&RecordSchema> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn shape(&self, node: &Node) -> Shape {
        Shape::of(node, self)
    }

    /// `int`, `Human`, `array<Human>`, `[null, double]`.
    pub fn describe(&self, node: &Node) -> String {
        match node {
            Node::Null => "null".to_string(),
            Node::Primitive(kind) => kind.name().to_string(),
            Node::Record(id) => self.record(*id).name.clone(),
            Node::Enum(e) => e.name.clone(),
            Node::Array(items) => format!("array<{}>", self.describe(items)),
            Node::Union(u) => {
                let members: Vec<String> = u.members.iter().map(|m| self.describe(m)).collect();
                format!("[{}]", members.join(", "))
            }
        }
    }

    pub(crate) fn set_defaults(&mut self, id: RecordId, defaults: Vec<Option<Datum>>) {
        for (field, default) in self.records[id.0].fields.iter_mut().zip(defaults) {
            field.default = default;
        }
    }
}

/// Mutable access for the walker while the arena is being filled.
pub(crate) struct RecordArena {
    records: Vec<RecordSchema>,
}

impl RecordArena {
    pub(crate) fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub(crate) fn alloc(&mut self, record: RecordSchema) -> RecordId {
        self.records.push(record);
        RecordId(self.records.len() - 1)
    }

    pub(crate) fn find_name(&self, name: &str) -> Option<&RecordSchema> {
        self.records.iter().find(|r| r.name == name)
    }

    pub(crate) fn set_fields(&mut self, id: RecordId, fields: Vec<Field>) {
        self.records[id.0].fields = fields;
    }

    pub(crate) fn finish(self, root: Node) -> Schema {
        Schema::new(root, self.records)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in [
            WireKind::Boolean,
            WireKind::Int,
            WireKind::Long,
            WireKind::Float,
            WireKind::Double,
            WireKind::String,
        ] {
            assert_eq!(WireKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(WireKind::from_name("bytes"), None);
    }

    #[test]
    fn describe_nested_nodes() {
        let mut arena = RecordArena::new();
        let id = arena.alloc(RecordSchema::new("Human", TypeId::of::<()>(), None));
        let schema = arena.finish(Node::Record(id));
        let node = Node::Union(UnionSchema::new(vec![Node::Null, Node::array(Node::Record(id))]));
        assert_eq!(schema.describe(&node), "[null, array<Human>]");
    }
}
