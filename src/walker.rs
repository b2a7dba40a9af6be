//! Type graph walker: `TypeInfo` → `Schema`.
//!
//! Records are memoized by `TypeId` for the duration of one build. The record
//! slot is allocated and memoized *before* its fields are walked, so a field
//! that leads back to the record (directly, through a sequence, or through a
//! union) resolves to the partially built record instead of recursing.
//! Sequences, optionals and unions are not named, so a cycle that never passes
//! through a record cannot be represented and is rejected.
//!
//! Union members are checked for duplicate shapes only after the whole arena
//! is filled; comparing shapes of records that are still being built would
//! see their fields as empty.
use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::nullability::{apply_nullability, is_nullable};
use crate::options::BuildOptions;
use crate::path::FieldPath;
use crate::reflect::{FieldInfo, FieldMeta, RecordInfo, TypeInfo, TypeKind, TypeRef};
use crate::schema::{EnumSchema, Field, Node, RecordArena, RecordId, RecordSchema, Schema, UnionSchema};
use crate::union::ensure_distinct;

static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

pub struct SchemaBuilder<'o> {
    options: &'o BuildOptions,
    arena: RecordArena,
    records: HashMap<TypeId, RecordId>,
    enums: HashMap<&'static str, TypeId>,
    in_progress: HashSet<TypeId>,
    pending_unions: Vec<(FieldPath, UnionSchema)>,
}

impl<'o> SchemaBuilder<'o> {
    pub fn new(options: &'o BuildOptions) -> Self {
        Self {
            options,
            arena: RecordArena::new(),
            records: HashMap::new(),
            enums: HashMap::new(),
            in_progress: HashSet::new(),
            pending_unions: Vec::new(),
        }
    }

    pub fn build(mut self, ty: &TypeInfo) -> Result<Schema> {
        let path = FieldPath::root(ty.name());
        let root = self.node(ty, &path)?;
        let pending = std::mem::take(&mut self.pending_unions);
        let schema = self.arena.finish(root);
        for (path, union) in &pending {
            ensure_distinct(union, &schema, path)?;
        }
        Ok(schema)
    }

    fn node(&mut self, ty: &TypeInfo, path: &FieldPath) -> Result<Node> {
        let anonymous = matches!(ty.kind(), TypeKind::Sequence(_) | TypeKind::Optional(_) | TypeKind::Union(_));
        if anonymous && !self.in_progress.insert(ty.id()) {
            return Err(SchemaError::inference(path, ty.name(), "recursive type must pass through a record"));
        }
        let node = self.kind(ty, path);
        if anonymous {
            self.in_progress.remove(&ty.id());
        }
        node
    }

    fn kind(&mut self, ty: &TypeInfo, path: &FieldPath) -> Result<Node> {
        match ty.kind() {
            TypeKind::Primitive(kind) => Ok(Node::Primitive(kind.wire())),
            TypeKind::Enum(symbols) => self.enumeration(ty, symbols, path),
            TypeKind::Sequence(element) => Ok(Node::array(self.node(&element.info(), &path.items())?)),
            TypeKind::Optional(inner) => Ok(apply_nullability(self.node(&inner.info(), path)?, true)),
            TypeKind::Union(members) => self.resolve_union(members, path),
            TypeKind::Record(info) => self.record(ty, info, path),
            TypeKind::Opaque => Err(SchemaError::inference(
                path,
                ty.name(),
                "type has no static shape; declare the concrete types it may hold",
            )),
        }
    }

    // ------------------------------ Records ------------------------------- //

    fn record(&mut self, ty: &TypeInfo, info: &RecordInfo, path: &FieldPath) -> Result<Node> {
        if let Some(id) = self.records.get(&ty.id()) {
            return Ok(Node::Record(*id));
        }
        self.claim_name(ty, path)?;
        if info.fields().is_empty() {
            return Err(SchemaError::inference(path, ty.name(), "record has no fields"));
        }

        let id = self.arena.alloc(RecordSchema::new(ty.name(), ty.id(), info.prototype()));
        self.records.insert(ty.id(), id);
        // a record breaks any cycle above it
        let outer = std::mem::take(&mut self.in_progress);

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(info.fields().len());
        for field in info.fields() {
            let field_path = path.field(field.name());
            if !NAME.is_match(field.name()) {
                return Err(SchemaError::inference(&field_path, ty.name(), format!("`{}` is not a valid field name", field.name())));
            }
            if !seen.insert(field.name()) {
                return Err(SchemaError::inference(&field_path, ty.name(), format!("field `{}` is declared twice", field.name())));
            }
            let meta = self.options.lookup().field_meta(ty, field);
            let node = self.field(field, &meta, &field_path)?;
            fields.push(Field::new(field.name(), node));
        }
        self.in_progress = outer;
        self.arena.set_fields(id, fields);
        Ok(Node::Record(id))
    }

    fn field(&mut self, field: &FieldInfo, meta: &FieldMeta, path: &FieldPath) -> Result<Node> {
        let declared = field.type_ref().info();
        let (inner, optional) = match declared.kind() {
            TypeKind::Optional(inner) => (inner.info(), true),
            _ => (declared, false),
        };

        let node = if let Some(schema) = &meta.schema {
            let node = schema.to_node(path)?;
            self.track_unions(&node, path);
            node
        } else if let Some(members) = &meta.union {
            self.resolve_union(members, path)?
        } else if let Some(members) = &meta.element_union {
            match inner.kind() {
                TypeKind::Sequence(_) => Node::array(self.resolve_union(members, &path.items())?),
                _ => {
                    return Err(SchemaError::inference(
                        path,
                        inner.name(),
                        "element union declared on a field that is not a sequence",
                    ));
                }
            }
        } else {
            self.node(&inner, path)?
        };

        Ok(apply_nullability(node, is_nullable(meta, optional, self.options.allows_null())))
    }

    // ------------------------------- Enums -------------------------------- //

    fn enumeration(&mut self, ty: &TypeInfo, symbols: &[&'static str], path: &FieldPath) -> Result<Node> {
        if self.enums.get(ty.name()) != Some(&ty.id()) {
            self.claim_name(ty, path)?;
            if symbols.is_empty() {
                return Err(SchemaError::inference(path, ty.name(), "enum has no symbols"));
            }
            let mut seen = HashSet::new();
            for symbol in symbols {
                if !NAME.is_match(symbol) || !seen.insert(*symbol) {
                    return Err(SchemaError::inference(path, ty.name(), format!("invalid or repeated symbol `{symbol}`")));
                }
            }
            self.enums.insert(ty.name(), ty.id());
        }
        let symbols = symbols.iter().map(|s| s.to_string()).collect();
        Ok(Node::Enum(EnumSchema::new(ty.name(), symbols)))
    }

    /// Record and enum names share one namespace and must be unique per schema.
    fn claim_name(&self, ty: &TypeInfo, path: &FieldPath) -> Result<()> {
        if !NAME.is_match(ty.name()) {
            return Err(SchemaError::inference(path, ty.name(), "not a valid schema name"));
        }
        let taken_by_record = self.arena.find_name(ty.name()).is_some_and(|r| r.type_id != ty.id());
        let taken_by_enum = self.enums.get(ty.name()).is_some_and(|id| *id != ty.id());
        if taken_by_record || taken_by_enum {
            return Err(SchemaError::inference(path, ty.name(), "name is already used by another type"));
        }
        Ok(())
    }

    // ------------------------------- Unions ------------------------------- //

    /// Union of `members` in declaration order; the order becomes the wire tag order.
    pub(crate) fn resolve_union(&mut self, members: &[TypeRef], path: &FieldPath) -> Result<Node> {
        if members.is_empty() {
            return Err(SchemaError::inference(path, "union", "union declares no members"));
        }
        let mut nodes = Vec::with_capacity(members.len());
        for (i, member) in members.iter().enumerate() {
            let info = member.info();
            let node = self.node(&info, &path.member(i))?;
            if matches!(node, Node::Union(_)) {
                return Err(SchemaError::inference(path, info.name(), "unions may not directly contain unions"));
            }
            nodes.push(node);
        }
        let union = UnionSchema::new(nodes);
        self.pending_unions.push((path.clone(), union.clone()));
        Ok(Node::Union(union))
    }

    fn track_unions(&mut self, node: &Node, path: &FieldPath) {
        match node {
            Node::Union(union) => self.pending_unions.push((path.clone(), union.clone())),
            Node::Array(items) => self.track_unions(items, &path.items()),
            _ => {}
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
