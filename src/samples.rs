//! Demo types exercising every feature of the builder, plus the catalog the
//! CLI works from.
use crate::options::BuildOptions;
use crate::override_schema::OverrideSchema;
use crate::reflect::{FieldInfo, FieldMeta, Reflect, TypeInfo, TypeRef, Value};

// ----------------------------- Primitives --------------------------------- //

/// One field per native scalar.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitives {
    pub a_boolean: bool,
    pub a_byte: i8,
    pub a_short: i16,
    pub an_int: i32,
    pub a_long: i64,
    pub a_float: f32,
    pub a_double: f64,
}

impl Default for Primitives {
    fn default() -> Self {
        Primitives {
            a_boolean: true,
            a_byte: 55,
            a_short: 555,
            an_int: 5555,
            a_long: 55_555_555,
            a_float: 3.14,
            a_double: 3.14,
        }
    }
}

impl Reflect for Primitives {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Primitives", vec![
            FieldInfo::of::<bool>("a_boolean"),
            FieldInfo::of::<i8>("a_byte"),
            FieldInfo::of::<i16>("a_short"),
            FieldInfo::of::<i32>("an_int"),
            FieldInfo::of::<i64>("a_long"),
            FieldInfo::of::<f32>("a_float"),
            FieldInfo::of::<f64>("a_double"),
        ])
        .with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([
            ("a_boolean", self.a_boolean.reflect()),
            ("a_byte", self.a_byte.reflect()),
            ("a_short", self.a_short.reflect()),
            ("an_int", self.an_int.reflect()),
            ("a_long", self.a_long.reflect()),
            ("a_float", self.a_float.reflect()),
            ("a_double", self.a_double.reflect()),
        ])
    }
}

/// Boxed scalars describe exactly like the unboxed ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Wrappers {
    pub a_boolean: Box<bool>,
    pub a_byte: Box<i8>,
    pub a_short: Box<i16>,
    pub an_int: Box<i32>,
    pub a_long: Box<i64>,
    pub a_float: Box<f32>,
    pub a_double: Box<f64>,
    pub an_object: Option<Primitives>,
}

impl Default for Wrappers {
    fn default() -> Self {
        let p = Primitives::default();
        Wrappers {
            a_boolean: Box::new(p.a_boolean),
            a_byte: Box::new(p.a_byte),
            a_short: Box::new(p.a_short),
            an_int: Box::new(p.an_int),
            a_long: Box::new(p.a_long),
            a_float: Box::new(p.a_float),
            a_double: Box::new(p.a_double),
            an_object: None,
        }
    }
}

impl Reflect for Wrappers {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Wrappers", vec![
            FieldInfo::of::<Box<bool>>("a_boolean"),
            FieldInfo::of::<Box<i8>>("a_byte"),
            FieldInfo::of::<Box<i16>>("a_short"),
            FieldInfo::of::<Box<i32>>("an_int"),
            FieldInfo::of::<Box<i64>>("a_long"),
            FieldInfo::of::<Box<f32>>("a_float"),
            FieldInfo::of::<Box<f64>>("a_double"),
            FieldInfo::of::<Option<Primitives>>("an_object"),
        ])
        .with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([
            ("a_boolean", self.a_boolean.reflect()),
            ("a_byte", self.a_byte.reflect()),
            ("a_short", self.a_short.reflect()),
            ("an_int", self.an_int.reflect()),
            ("a_long", self.a_long.reflect()),
            ("a_float", self.a_float.reflect()),
            ("a_double", self.a_double.reflect()),
            ("an_object", self.an_object.reflect()),
        ])
    }
}

// ------------------------------ Nullability ------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DoubleOrLong {
    Double(f64),
    Long(i64),
}

impl Reflect for DoubleOrLong {
    fn type_info() -> TypeInfo {
        TypeInfo::union::<Self>("DoubleOrLong", vec![TypeRef::of::<f64>(), TypeRef::of::<i64>()])
    }

    fn reflect(&self) -> Value {
        match self {
            DoubleOrLong::Double(v) => v.reflect(),
            DoubleOrLong::Long(v) => v.reflect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WithNullable {
    pub a_double: Option<f64>,
    pub double_or_long: DoubleOrLong,
    pub double_or_long_or_null1: Option<DoubleOrLong>,
    pub double_or_long_or_null2: Option<DoubleOrLong>,
    pub double_or_long_or_null3: Option<DoubleOrLong>,
}

impl Default for WithNullable {
    fn default() -> Self {
        WithNullable {
            a_double: None,
            double_or_long: DoubleOrLong::Long(0),
            double_or_long_or_null1: None,
            double_or_long_or_null2: None,
            double_or_long_or_null3: None,
        }
    }
}

fn double_long() -> OverrideSchema {
    OverrideSchema::union(vec![OverrideSchema::named("double"), OverrideSchema::named("long")])
}

fn double_long_null() -> OverrideSchema {
    OverrideSchema::union(vec![
        OverrideSchema::named("double"),
        OverrideSchema::named("long"),
        OverrideSchema::named("null"),
    ])
}

impl Reflect for WithNullable {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("WithNullable", vec![
            FieldInfo::of::<Option<f64>>("a_double").with_meta(FieldMeta::new().nullable(true)),
            FieldInfo::of::<DoubleOrLong>("double_or_long").with_meta(FieldMeta::new().schema(double_long())),
            FieldInfo::of::<Option<DoubleOrLong>>("double_or_long_or_null1")
                .with_meta(FieldMeta::new().nullable(true).schema(double_long())),
            FieldInfo::of::<Option<DoubleOrLong>>("double_or_long_or_null2")
                .with_meta(FieldMeta::new().schema(double_long_null())),
            FieldInfo::of::<Option<DoubleOrLong>>("double_or_long_or_null3")
                .with_meta(FieldMeta::new().nullable(true).schema(double_long_null())),
        ])
        .with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([
            ("a_double", self.a_double.reflect()),
            ("double_or_long", self.double_or_long.reflect()),
            ("double_or_long_or_null1", self.double_or_long_or_null1.reflect()),
            ("double_or_long_or_null2", self.double_or_long_or_null2.reflect()),
            ("double_or_long_or_null3", self.double_or_long_or_null3.reflect()),
        ])
    }
}

// ------------------------- Records, enums, unions ------------------------- //

#[derive(Clone, Debug, PartialEq)]
pub struct Human {
    pub name: String,
    pub friends: Vec<Human>,
}

impl Human {
    pub fn named(name: &str) -> Self {
        Human { name: name.to_string(), friends: Vec::new() }
    }
}

impl Default for Human {
    fn default() -> Self {
        Human::named("Andy")
    }
}

impl Reflect for Human {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Human", vec![
            FieldInfo::of::<String>("name"),
            FieldInfo::of::<Vec<Human>>("friends"),
        ])
        .with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([("name", self.name.reflect()), ("friends", self.friends.reflect())])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Machine {
    pub name: String,
}

impl Default for Machine {
    fn default() -> Self {
        Machine { name: "BB-8".to_string() }
    }
}

impl Reflect for Machine {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Machine", vec![FieldInfo::of::<String>("name")]).with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([("name", self.name.reflect())])
    }
}

/// Closed sum: either a `Human` or a `Machine`.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    Human(Human),
    Machine(Machine),
}

impl Reflect for Kind {
    fn type_info() -> TypeInfo {
        TypeInfo::union::<Self>("Kind", vec![TypeRef::of::<Human>(), TypeRef::of::<Machine>()])
    }

    fn reflect(&self) -> Value {
        match self {
            Kind::Human(h) => h.reflect(),
            Kind::Machine(m) => m.reflect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum First {
    A,
    B,
    C,
}

impl Reflect for First {
    fn type_info() -> TypeInfo {
        TypeInfo::enumeration::<Self>("First", &["A", "B", "C"])
    }

    fn reflect(&self) -> Value {
        Value::symbol::<Self>(match self {
            First::A => "A",
            First::B => "B",
            First::C => "C",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Second {
    X,
    Y,
    Z,
}

impl Reflect for Second {
    fn type_info() -> TypeInfo {
        TypeInfo::enumeration::<Self>("Second", &["X", "Y", "Z"])
    }

    fn reflect(&self) -> Value {
        Value::symbol::<Self>(match self {
            Second::X => "X",
            Second::Y => "Y",
            Second::Z => "Z",
        })
    }
}

/// Heterogeneous collections whose element types are declared per field.
#[derive(Default)]
pub struct Meta {
    pub ranks: Vec<Box<dyn Reflect>>,
    pub kinds: Vec<Box<dyn Reflect>>,
    pub categories: Vec<Kind>,
    pub name: Option<String>,
}

impl Meta {
    pub fn populated() -> Self {
        Meta {
            ranks: vec![Box::new(First::A), Box::new(Second::Z)],
            kinds: vec![Box::new(Human::default()), Box::new(Machine::default())],
            categories: vec![Kind::Machine(Machine::default()), Kind::Human(Human::named("Rey"))],
            name: Some("crew".to_string()),
        }
    }
}

impl Reflect for Meta {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Meta", vec![
            FieldInfo::of::<Vec<Box<dyn Reflect>>>("ranks")
                .with_meta(FieldMeta::new().element_union(vec![TypeRef::of::<First>(), TypeRef::of::<Second>()])),
            FieldInfo::of::<Vec<Box<dyn Reflect>>>("kinds")
                .with_meta(FieldMeta::new().element_union(vec![TypeRef::of::<Human>(), TypeRef::of::<Machine>()])),
            FieldInfo::of::<Vec<Kind>>("categories"),
            FieldInfo::of::<Option<String>>("name"),
        ])
        .with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([
            ("ranks", self.ranks.reflect()),
            ("kinds", self.kinds.reflect()),
            ("categories", self.categories.reflect()),
            ("name", self.name.reflect()),
        ])
    }
}

/// A single optional slot that may hold either a `Machine` or a `Human`.
#[derive(Default)]
pub struct Assignment {
    pub kind: Option<Box<dyn Reflect>>,
}

impl Reflect for Assignment {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Assignment", vec![
            FieldInfo::of::<Option<Box<dyn Reflect>>>("kind")
                .with_meta(FieldMeta::new().union(vec![TypeRef::of::<Machine>(), TypeRef::of::<Human>()])),
        ])
        .with_prototype::<Self>()
    }

    fn reflect(&self) -> Value {
        Value::record::<Self>([("kind", self.kind.reflect())])
    }
}

// ------------------------------- Catalog ---------------------------------- //

/// A named demo: a type plus the prototypes to try against it.
#[derive(Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub about: &'static str,
    type_info: fn() -> TypeInfo,
    prototype: fn() -> Value,
    zero: fn() -> Value,
    options: fn() -> BuildOptions,
}

impl Sample {
    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }

    /// Instance whose attributes become the schema defaults.
    pub fn prototype(&self) -> Value {
        (self.prototype)()
    }

    /// A fresh `Default` instance, unrelated to the prototype.
    pub fn zero(&self) -> Value {
        (self.zero)()
    }

    pub fn options(&self) -> BuildOptions {
        (self.options)()
    }
}

impl std::fmt::Debug for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sample").field("name", &self.name).finish_non_exhaustive()
    }
}

pub fn catalog() -> Vec<Sample> {
    vec![
        Sample {
            name: "primitives",
            about: "every native scalar with its widened wire type",
            type_info: Primitives::type_info,
            zero: || Primitives::default().reflect(),
            prototype: || Primitives::default().reflect(),
            options: BuildOptions::new,
        },
        Sample {
            name: "wrappers",
            about: "boxed scalars and an optional nested record, all nullable",
            type_info: Wrappers::type_info,
            zero: || Wrappers::default().reflect(),
            prototype: || Wrappers::default().reflect(),
            options: || BuildOptions::new().allow_null(true),
        },
        Sample {
            name: "nullable",
            about: "explicit nullability and union overrides",
            type_info: WithNullable::type_info,
            zero: || WithNullable::default().reflect(),
            prototype: || {
                WithNullable {
                    a_double: Some(2.5),
                    double_or_long_or_null1: Some(DoubleOrLong::Long(7)),
                    ..WithNullable::default()
                }
                .reflect()
            },
            options: BuildOptions::new,
        },
        Sample {
            name: "human",
            about: "a self-referential record",
            type_info: Human::type_info,
            zero: || Human::default().reflect(),
            prototype: || {
                Human { name: "Andy".to_string(), friends: vec![Human::named("Grass")] }.reflect()
            },
            options: BuildOptions::new,
        },
        Sample {
            name: "meta",
            about: "element unions over enums and records, plus a sum type",
            type_info: Meta::type_info,
            zero: || Meta::default().reflect(),
            prototype: || Meta::populated().reflect(),
            options: BuildOptions::new,
        },
        Sample {
            name: "assignment",
            about: "a nullable union field holding a record",
            type_info: Assignment::type_info,
            zero: || Assignment::default().reflect(),
            prototype: || Assignment { kind: Some(Box::new(Machine::default())) }.reflect(),
            options: BuildOptions::new,
        },
    ]
}

pub fn find(name: &str) -> Option<Sample> {
    catalog().into_iter().find(|s| s.name == name)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = catalog().iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog().len());
        assert!(find("meta").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn sum_types_reflect_their_payload() {
        let value = Kind::Machine(Machine::default()).reflect();
        assert_eq!(value, Machine::default().reflect());
    }
}
