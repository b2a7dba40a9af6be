use seed_schema::reflect::{FieldInfo, FieldMeta, TypeInfo, TypeRef, Value};
use seed_schema::samples::{self, Assignment, Human, Kind, Machine, Meta, Primitives, WithNullable, Wrappers};
use seed_schema::{
    BuildOptions, Datum, Reflect, Schema, SchemaError, build_schema, build_schema_with_defaults, verify,
    verify_defaults,
};

fn default_of<'s>(schema: &'s Schema, record: &str, field: &str) -> Option<&'s Datum> {
    schema.record_named(record).unwrap().field(field).unwrap().default()
}

fn human(name: &str, friends: Vec<Datum>) -> Datum {
    Datum::record([("name", Datum::string(name)), ("friends", Datum::Array(friends))])
}

#[test]
fn human_prototype_becomes_nested_default() {
    let prototype = Human { name: "andy".into(), friends: vec![Human::named("grass")] };
    let schema = build_schema_with_defaults(&prototype, &BuildOptions::new()).unwrap();

    assert_eq!(default_of(&schema, "Human", "name"), Some(&Datum::string("andy")));
    assert_eq!(default_of(&schema, "Human", "friends"), Some(&Datum::Array(vec![human("grass", vec![])])));
    verify(&prototype.reflect(), &schema, &BuildOptions::new()).unwrap();
    verify(&Human::default().reflect(), &schema, &BuildOptions::new()).unwrap();
}

#[test]
fn primitive_defaults_are_widened() {
    for options in [BuildOptions::new(), BuildOptions::new().allow_null(true)] {
        let schema = build_schema::<Primitives>(&options).unwrap();
        let strip = |d: &Datum| d.as_union().map(|(_, v)| v.clone()).unwrap_or_else(|| d.clone());
        let get = |field: &str| strip(default_of(&schema, "Primitives", field).unwrap());

        assert_eq!(get("a_boolean"), Datum::Boolean(true));
        assert_eq!(get("a_byte"), Datum::Int(55));
        assert_eq!(get("a_short"), Datum::Int(555));
        assert_eq!(get("an_int"), Datum::Int(5555));
        assert_eq!(get("a_long"), Datum::Long(55_555_555));
        assert_eq!(get("a_float"), Datum::float(3.14));
        assert_eq!(get("a_double"), Datum::double(3.14));
        verify_defaults(&schema).unwrap();
    }
}

#[test]
fn nullable_wrappers_pick_the_value_member() {
    let schema = build_schema::<Wrappers>(&BuildOptions::new().allow_null(true)).unwrap();
    assert_eq!(default_of(&schema, "Wrappers", "a_byte"), Some(&Datum::union(1, Datum::Int(55))));
    assert_eq!(default_of(&schema, "Wrappers", "an_object"), Some(&Datum::union(0, Datum::Null)));
}

#[test]
fn explicit_prototype_for_nested_type() {
    let nested = Primitives { a_byte: -1, ..Primitives::default() };
    let options = BuildOptions::new().with_default(&nested);
    let schema = build_schema::<Wrappers>(&options).unwrap();
    assert_eq!(default_of(&schema, "Primitives", "a_byte"), Some(&Datum::Int(-1)));
    assert_eq!(default_of(&schema, "Wrappers", "a_byte"), Some(&Datum::Int(55)));
}

#[test]
fn nullable_matrix_defaults() {
    let prototype = WithNullable {
        a_double: Some(1.0),
        double_or_long: samples::DoubleOrLong::Double(2.0),
        double_or_long_or_null1: Some(samples::DoubleOrLong::Long(3)),
        double_or_long_or_null2: None,
        double_or_long_or_null3: Some(samples::DoubleOrLong::Double(4.0)),
    };
    let schema = build_schema_with_defaults(&prototype, &BuildOptions::new()).unwrap();
    assert_eq!(default_of(&schema, "WithNullable", "a_double"), Some(&Datum::union(1, Datum::double(1.0))));
    assert_eq!(default_of(&schema, "WithNullable", "double_or_long"), Some(&Datum::union(0, Datum::double(2.0))));
    assert_eq!(
        default_of(&schema, "WithNullable", "double_or_long_or_null1"),
        Some(&Datum::union(1, Datum::Long(3))),
    );
    assert_eq!(default_of(&schema, "WithNullable", "double_or_long_or_null2"), Some(&Datum::union(2, Datum::Null)));
    verify(&prototype.reflect(), &schema, &BuildOptions::new()).unwrap();
    verify(&WithNullable::default().reflect(), &schema, &BuildOptions::new()).unwrap();
}

#[test]
fn meta_union_defaults() {
    let schema = build_schema_with_defaults(&Meta::populated(), &BuildOptions::new()).unwrap();
    let kinds = default_of(&schema, "Meta", "kinds").unwrap();
    assert_eq!(kinds, &Datum::Array(vec![
        Datum::union(0, human("Andy", vec![])),
        Datum::union(1, Datum::record([("name", Datum::string("BB-8"))])),
    ]));
    let ranks = default_of(&schema, "Meta", "ranks").unwrap();
    assert_eq!(ranks, &Datum::Array(vec![
        Datum::union(0, Datum::Enum("A".into())),
        Datum::union(1, Datum::Enum("Z".into())),
    ]));
    let categories = default_of(&schema, "Meta", "categories").unwrap();
    assert_eq!(categories.clone(), Datum::Array(vec![
        Datum::union(1, Datum::record([("name", Datum::string("BB-8"))])),
        Datum::union(0, human("Rey", vec![])),
    ]));

    let options = BuildOptions::new();
    verify(&Meta::populated().reflect(), &schema, &options).unwrap();
    verify(&Meta::default().reflect(), &schema, &options).unwrap();
    verify_defaults(&schema).unwrap();
}

#[test]
fn meta_union_defaults_with_nullable_fields() {
    let options = BuildOptions::new().allow_null(true);
    let schema = build_schema_with_defaults(&Meta::populated(), &options).unwrap();
    let Some((1, Datum::Array(kinds))) = default_of(&schema, "Meta", "kinds").and_then(Datum::as_union) else {
        panic!("kinds should default to the array member");
    };
    let tags: Vec<usize> = kinds.iter().filter_map(|k| k.as_union().map(|(i, _)| i)).collect();
    assert_eq!(tags, vec![0, 1]);

    verify(&Meta::populated().reflect(), &schema, &options).unwrap();
    verify(&Meta::default().reflect(), &schema, &options).unwrap();
    verify_defaults(&schema).unwrap();
}

#[test]
fn polymorphic_default_selects_declared_member() {
    let prototype = Assignment { kind: Some(Box::new(Machine::default())) };
    let schema = build_schema_with_defaults(&prototype, &BuildOptions::new()).unwrap();
    assert_eq!(
        default_of(&schema, "Assignment", "kind"),
        Some(&Datum::union(0, Datum::record([("name", Datum::string("BB-8"))]))),
    );

    let empty = Assignment::default();
    let schema = build_schema_with_defaults(&empty, &BuildOptions::new()).unwrap();
    assert_eq!(default_of(&schema, "Assignment", "kind"), Some(&Datum::union(2, Datum::Null)));
}

/// Declares only `Human` and `Machine`, in that order.
struct Crew {
    member: Box<dyn Reflect>,
}

impl Reflect for Crew {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("Crew", vec![
            FieldInfo::of::<Box<dyn Reflect>>("member")
                .with_meta(FieldMeta::new().union(vec![TypeRef::of::<Human>(), TypeRef::of::<Machine>()])),
        ])
    }
    fn reflect(&self) -> Value {
        Value::record::<Self>([("member", self.member.reflect())])
    }
}

/// Forgets to declare `Machine`.
struct HumansOnly {
    member: Box<dyn Reflect>,
}

impl Reflect for HumansOnly {
    fn type_info() -> TypeInfo {
        TypeInfo::record::<Self>("HumansOnly", vec![
            FieldInfo::of::<Box<dyn Reflect>>("member")
                .with_meta(FieldMeta::new().union(vec![TypeRef::of::<Human>()])),
        ])
    }
    fn reflect(&self) -> Value {
        Value::record::<Self>([("member", self.member.reflect())])
    }
}

#[test]
fn machine_matches_second_member() {
    let crew = Crew { member: Box::new(Machine::default()) };
    let schema = build_schema_with_defaults(&crew, &BuildOptions::new()).unwrap();
    assert_eq!(
        default_of(&schema, "Crew", "member"),
        Some(&Datum::union(1, Datum::record([("name", Datum::string("BB-8"))]))),
    );
}

#[test]
fn undeclared_member_is_rejected() {
    let crew = HumansOnly { member: Box::new(Machine::default()) };
    let err = build_schema_with_defaults(&crew, &BuildOptions::new()).unwrap_err();
    assert_eq!(err, SchemaError::UnionMemberNotDeclared { path: "HumansOnly.member".into(), found: "Machine".into() });
}

#[test]
fn sum_type_values_match_their_variant() {
    let categories = vec![Kind::Human(Human::named("Finn"))];
    let meta = Meta { categories, ..Meta::default() };
    let schema = build_schema_with_defaults(&meta, &BuildOptions::new()).unwrap();
    assert_eq!(
        default_of(&schema, "Meta", "categories"),
        Some(&Datum::Array(vec![Datum::union(0, human("Finn", vec![]))])),
    );
}

#[test]
fn shallow_depth_limit_fails_cleanly() {
    let mut deep = Human::named("root");
    for i in 0..10 {
        deep = Human { name: format!("level{i}"), friends: vec![deep] };
    }
    let err = build_schema_with_defaults(&deep, &BuildOptions::new().max_depth(8)).unwrap_err();
    assert!(matches!(err, SchemaError::DefaultExtractionDepthExceeded { limit: 8, .. }), "{err}");
}
