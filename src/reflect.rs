//! Static type descriptions.
//!
//! A type takes part in schema generation by implementing [`Reflect`]: it
//! hands out a [`TypeInfo`] describing its shape, and can view any instance
//! of itself as a dynamic [`Value`]. Nothing is discovered at runtime; the
//! walker and the default extractor only ever look at these descriptions.
//!
//! Field types are referenced through [`TypeRef`] (a plain `fn` pointer), so
//! describing a self-referential type never recurses: `Human` can list a
//! `Vec<Human>` field without calling `Human::type_info` again.
pub mod value;
mod primitives;

use std::any::TypeId;
use std::fmt;

pub use value::{EnumValue, Number, RecordValue, Value};

use crate::override_schema::OverrideSchema;
use crate::schema::WireKind;

// -------------------------------- Trait ----------------------------------- //

/// A type with a static shape description and a dynamic instance view.
///
/// ```
/// use seed_schema::reflect::{FieldInfo, Reflect, TypeInfo, Value};
///
/// #[derive(Default)]
/// struct Machine { name: String }
///
/// impl Reflect for Machine {
///     fn type_info() -> TypeInfo {
///         TypeInfo::record::<Self>("Machine", vec![FieldInfo::of::<String>("name")])
///             .with_prototype::<Self>()
///     }
///     fn reflect(&self) -> Value {
///         Value::record::<Self>([("name", self.name.reflect())])
///     }
/// }
/// ```
pub trait Reflect: 'static {
    fn type_info() -> TypeInfo
    where
        Self: Sized;

    fn reflect(&self) -> Value;
}

/// Deferred access to a type's [`TypeInfo`].
#[derive(Clone, Copy)]
pub struct TypeRef(fn() -> TypeInfo);

impl TypeRef {
    pub fn of<T: Reflect>() -> Self {
        TypeRef(T::type_info)
    }

    pub fn info(&self) -> TypeInfo {
        (self.0)()
    }

    pub fn id(&self) -> TypeId {
        self.info().id
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.info().name)
    }
}

// -------------------------------- Kinds ----------------------------------- //

/// Native scalar kinds. Several of them share one wire kind, see [`PrimitiveKind::wire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    F32,
    F64,
    String,
}

impl PrimitiveKind {
    /// Widening table: the wire format has no narrow integers, so `i8`,
    /// `i16`, `u8` and `u16` all travel as `int`; `u32` needs `long`.
    pub fn wire(self) -> WireKind {
        match self {
            PrimitiveKind::Bool => WireKind::Boolean,
            PrimitiveKind::I8
            | PrimitiveKind::I16
            | PrimitiveKind::I32
            | PrimitiveKind::U8
            | PrimitiveKind::U16 => WireKind::Int,
            PrimitiveKind::I64 | PrimitiveKind::U32 => WireKind::Long,
            PrimitiveKind::F32 => WireKind::Float,
            PrimitiveKind::F64 => WireKind::Double,
            PrimitiveKind::String => WireKind::String,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::String => "String",
        }
    }
}

#[derive(Clone, Debug)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Unit-only enum; symbols in declaration order.
    Enum(&'static [&'static str]),
    Sequence(TypeRef),
    /// `Option<T>`: the field holding it is nullable.
    Optional(TypeRef),
    Record(RecordInfo),
    /// Sum type whose variants each wrap one alternative, in declaration order.
    Union(Vec<TypeRef>),
    /// No static shape (`Box<dyn Reflect>`). Only usable behind a union declaration.
    Opaque,
}

#[derive(Clone, Debug)]
pub struct RecordInfo {
    fields: Vec<FieldInfo>,
    prototype: Option<fn() -> Value>,
}

impl RecordInfo {
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// The type's initial instance, when one was registered.
    pub fn prototype(&self) -> Option<fn() -> Value> {
        self.prototype
    }
}

// ------------------------------ TypeInfo ---------------------------------- //

#[derive(Clone, Debug)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeInfo {
    pub fn primitive<T: 'static>(kind: PrimitiveKind) -> Self {
        Self { id: TypeId::of::<T>(), name: kind.name(), kind: TypeKind::Primitive(kind) }
    }

    pub fn record<T: 'static>(name: &'static str, fields: Vec<FieldInfo>) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
            kind: TypeKind::Record(RecordInfo { fields, prototype: None }),
        }
    }

    pub fn enumeration<T: 'static>(name: &'static str, symbols: &'static [&'static str]) -> Self {
        Self { id: TypeId::of::<T>(), name, kind: TypeKind::Enum(symbols) }
    }

    pub fn union<T: 'static>(name: &'static str, members: Vec<TypeRef>) -> Self {
        Self { id: TypeId::of::<T>(), name, kind: TypeKind::Union(members) }
    }

    pub fn sequence<T: 'static>(element: TypeRef) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), kind: TypeKind::Sequence(element) }
    }

    pub fn optional<T: 'static>(inner: TypeRef) -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>(), kind: TypeKind::Optional(inner) }
    }

    pub fn opaque<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self { id: TypeId::of::<T>(), name, kind: TypeKind::Opaque }
    }

    /// Register `T::default()` as the initial instance whose field values
    /// become the record's defaults. No-op for non-record types.
    pub fn with_prototype<T: Reflect + Default>(mut self) -> Self {
        if let TypeKind::Record(record) = &mut self.kind {
            record.prototype = Some(initial_value::<T>);
        }
        self
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
}

fn initial_value<T: Reflect + Default>() -> Value {
    T::default().reflect()
}

// ------------------------------- Fields ----------------------------------- //

#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    ty: TypeRef,
    meta: FieldMeta,
}

impl FieldInfo {
    pub fn of<T: Reflect>(name: &'static str) -> Self {
        Self { name, ty: TypeRef::of::<T>(), meta: FieldMeta::default() }
    }

    pub fn with_meta(mut self, meta: FieldMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_ref(&self) -> TypeRef {
        self.ty
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}

/// Declarative per-field metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMeta {
    /// Concrete types storable in the field, in wire order.
    pub union: Option<Vec<TypeRef>>,
    /// Concrete types storable in each element of a sequence field.
    pub element_union: Option<Vec<TypeRef>>,
    /// Replaces whatever the field's type would produce.
    pub schema: Option<OverrideSchema>,
    /// `Some(_)` wins over the global `allow_null` flag.
    pub nullable: Option<bool>,
}

impl FieldMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn union(mut self, members: Vec<TypeRef>) -> Self {
        self.union = Some(members);
        self
    }

    pub fn element_union(mut self, members: Vec<TypeRef>) -> Self {
        self.element_union = Some(members);
        self
    }

    pub fn schema(mut self, schema: OverrideSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

/// Where the walker gets [`FieldMeta`] from.
pub trait MetadataLookup: Send + Sync {
    fn field_meta(&self, owner: &TypeInfo, field: &FieldInfo) -> FieldMeta;
}

/// Reads the metadata attached to each [`FieldInfo`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclaredMetadata;

impl MetadataLookup for DeclaredMetadata {
    fn field_meta(&self, _owner: &TypeInfo, field: &FieldInfo) -> FieldMeta {
        field.meta.clone()
    }
}

// ------------------------------- Tests ------------------------------------ //
