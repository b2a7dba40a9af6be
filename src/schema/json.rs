//! Avro-style JSON rendering of a finished schema, defaults included.
//!
//! Named types (records, enums) are written out in full the first time they
//! appear and referenced by name afterwards, which is what lets a recursive
//! record render as finite JSON. Union defaults are written as the bare value
//! of the selected member, as Avro expects in a field `default`.
use std::collections::HashSet;

use serde_json::{Map, Value, json};

use super::{Node, Schema};
use crate::datum::Datum;

impl Schema {
    pub fn to_json(&self) -> Value {
        let mut emitter = Emitter { schema: self, defined: HashSet::new() };
        emitter.node(self.root())
    }

    /// JSON literal for `datum`, interpreted against `node`.
    pub fn datum_to_json(&self, datum: &Datum, node: &Node) -> Value {
        datum_json(self, datum, node)
    }
}

struct Emitter<'s> {
    schema: &'s Schema,
    defined: HashSet<String>,
}

impl Emitter<'_> {
    fn node(&mut self, node: &Node) -> Value {
        match node {
            Node::Null => json!("null"),
            Node::Primitive(kind) => json!(kind.name()),
            Node::Enum(e) => {
                if !self.defined.insert(e.name().to_string()) {
                    return json!(e.name());
                }
                json!({ "type": "enum", "name": e.name(), "symbols": e.symbols() })
            }
            Node::Array(items) => json!({ "type": "array", "items": self.node(items) }),
            Node::Union(u) => Value::Array(u.members().iter().map(|m| self.node(m)).collect()),
            Node::Record(id) => {
                let record = self.schema.record(*id);
                if !self.defined.insert(record.name().to_string()) {
                    return json!(record.name());
                }
                let mut fields = Vec::with_capacity(record.fields().len());
                for field in record.fields() {
                    let mut out = Map::new();
                    out.insert("name".into(), json!(field.name()));
                    out.insert("type".into(), self.node(field.schema()));
                    if let Some(default) = field.default() {
                        out.insert("default".into(), datum_json(self.schema, default, field.schema()));
                    }
                    fields.push(Value::Object(out));
                }
                json!({ "type": "record", "name": record.name(), "fields": fields })
            }
        }
    }
}

fn datum_json(schema: &Schema, datum: &Datum, node: &Node) -> Value {
    match datum {
        Datum::Null => Value::Null,
        Datum::Boolean(b) => json!(b),
        Datum::Int(v) => json!(v),
        Datum::Long(v) => json!(v),
        // shortest decimal that reads back as the same f32, so 3.14f32 prints as 3.14
        Datum::Float(v) => float_json(v.0.to_string().parse::<f64>().unwrap_or(f64::NAN)),
        Datum::Double(v) => float_json(v.0),
        Datum::String(s) | Datum::Enum(s) => json!(s),
        Datum::Array(items) => {
            let item_node = match node {
                Node::Array(items) => items.as_ref(),
                other => other,
            };
            Value::Array(items.iter().map(|d| datum_json(schema, d, item_node)).collect())
        }
        Datum::Record(fields) => {
            let record = node.as_record().map(|id| schema.record(id));
            let mut out = Map::new();
            for (name, value) in fields {
                let field_node = record.and_then(|r| r.field(name)).map(|f| f.schema()).unwrap_or(&Node::Null);
                out.insert(name.clone(), datum_json(schema, value, field_node));
            }
            Value::Object(out)
        }
        Datum::Union { index, value } => {
            let member = node.as_union().and_then(|u| u.members().get(*index)).unwrap_or(node);
            datum_json(schema, value, member)
        }
    }
}

fn float_json(v: f64) -> Value {
    match serde_json::Number::from_f64(v) {
        Some(n) => Value::Number(n),
        None => Value::String(v.to_string()),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;
    use crate::schema::{EnumSchema, Field, RecordArena, RecordSchema, UnionSchema, WireKind};

    #[test]
    fn recursive_record_is_referenced_by_name() {
        let mut arena = RecordArena::new();
        let id = arena.alloc(RecordSchema::new("Human", TypeId::of::<()>(), None));
        arena.set_fields(id, vec![
            Field::new("name", Node::Primitive(WireKind::String)),
            Field::new("friends", Node::array(Node::Record(id))),
        ]);
        let schema = arena.finish(Node::Record(id));

        assert_eq!(schema.to_json(), json!({
            "type": "record",
            "name": "Human",
            "fields": [
                { "name": "name", "type": "string" },
                { "name": "friends", "type": { "type": "array", "items": "Human" } }
            ]
        }));
    }

    #[test]
    fn union_literals_are_bare_values() {
        let arena = RecordArena::new();
        let schema = arena.finish(Node::Null);
        let first = Node::Enum(EnumSchema::new("First", vec!["A".into(), "B".into()]));
        let union = Node::Union(UnionSchema::new(vec![Node::Null, first]));

        let tagged = Datum::union(1, Datum::Enum("B".into()));
        assert_eq!(schema.datum_to_json(&tagged, &union), json!("B"));
        assert_eq!(schema.datum_to_json(&Datum::union(0, Datum::Null), &union), Value::Null);
    }

    #[test]
    fn floats_print_their_shortest_form() {
        let arena = RecordArena::new();
        let schema = arena.finish(Node::Null);
        let node = Node::Primitive(WireKind::Float);
        assert_eq!(schema.datum_to_json(&Datum::float(3.14), &node), json!(3.14));
    }
}
