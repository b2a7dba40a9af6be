use proptest::prelude::*;

use seed_schema::samples::{self, Human, Primitives};
use seed_schema::{BuildOptions, Reflect, build_schema_with_defaults, build_schema_with_prototype, verify, verify_defaults};

#[test]
fn every_sample_round_trips() {
    for sample in samples::catalog() {
        let options = sample.options();
        let schema = build_schema_with_prototype(&sample.type_info(), &sample.prototype(), &options)
            .unwrap_or_else(|err| panic!("{}: {err}", sample.name));
        verify(&sample.prototype(), &schema, &options).unwrap_or_else(|err| panic!("{} prototype: {err}", sample.name));
        verify(&sample.zero(), &schema, &options).unwrap_or_else(|err| panic!("{} zero: {err}", sample.name));
        verify_defaults(&schema).unwrap_or_else(|err| panic!("{} defaults: {err}", sample.name));
    }
}

fn arb_primitives() -> impl Strategy<Value = Primitives> {
    (any::<bool>(), any::<i8>(), any::<i16>(), any::<i32>(), any::<i64>(), any::<f32>(), any::<f64>()).prop_map(
        |(a_boolean, a_byte, a_short, an_int, a_long, a_float, a_double)| Primitives {
            a_boolean,
            a_byte,
            a_short,
            an_int,
            a_long,
            a_float,
            a_double,
        },
    )
}

fn arb_human() -> impl Strategy<Value = Human> {
    let leaf = "[a-z]{0,8}".prop_map(|name| Human::named(&name));
    leaf.prop_recursive(3, 16, 4, |inner| {
        ("[a-z]{0,8}", prop::collection::vec(inner, 0..4)).prop_map(|(name, friends)| Human { name, friends })
    })
}

proptest! {
    /// A prototype always verifies against the schema built from it, and so
    /// does an unrelated fresh instance.
    #[test]
    fn prototypes_verify_against_their_schema(prototype in arb_primitives()) {
        let options = BuildOptions::new();
        let schema = build_schema_with_defaults(&prototype, &options).unwrap();
        prop_assert!(verify(&prototype.reflect(), &schema, &options).is_ok());
        prop_assert!(verify(&Primitives::default().reflect(), &schema, &options).is_ok());
        prop_assert!(verify_defaults(&schema).is_ok());
    }

    #[test]
    fn recursive_prototypes_verify(prototype in arb_human()) {
        let options = BuildOptions::new();
        let schema = build_schema_with_defaults(&prototype, &options).unwrap();
        prop_assert!(verify(&prototype.reflect(), &schema, &options).is_ok());
        prop_assert!(verify(&Human::default().reflect(), &schema, &options).is_ok());
    }
}
