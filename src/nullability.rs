//! Optional-field policy.
use crate::reflect::FieldMeta;
use crate::schema::{Node, UnionSchema};

/// Make `node` accept `null` when `nullable` is set.
///
/// - plain node → `[null, node]`
/// - union without null → null appended after the declared members
/// - union with null → unchanged
pub fn apply_nullability(node: Node, nullable: bool) -> Node {
    if !nullable {
        return node;
    }
    match node {
        Node::Null => Node::Null,
        Node::Union(mut union) => {
            if union.null_index().is_none() {
                union.push(Node::Null);
            }
            Node::Union(union)
        }
        other => Node::Union(UnionSchema::new(vec![Node::Null, other])),
    }
}

/// Explicit annotation first, then the global flag. `Option<T>` fields are
/// nullable regardless.
pub fn is_nullable(meta: &FieldMeta, optional_type: bool, allow_null: bool) -> bool {
    optional_type || meta.nullable.unwrap_or(allow_null)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::schema::{RecordId, WireKind};

    fn double_or_long() -> Node {
        Node::Union(UnionSchema::new(vec![
            Node::Primitive(WireKind::Double),
            Node::Primitive(WireKind::Long),
        ]))
    }

    #[test]
    fn plain_node_gets_null_first() {
        let node = apply_nullability(Node::Primitive(WireKind::Double), true);
        assert_eq!(node, Node::Union(UnionSchema::new(vec![Node::Null, Node::Primitive(WireKind::Double)])));
    }

    #[test]
    fn declared_union_gets_null_appended() {
        let node = apply_nullability(double_or_long(), true);
        assert_eq!(node, Node::Union(UnionSchema::new(vec![
            Node::Primitive(WireKind::Double),
            Node::Primitive(WireKind::Long),
            Node::Null,
        ])));
    }

    #[test]
    fn union_with_null_keeps_its_order() {
        let declared = Node::Union(UnionSchema::new(vec![
            Node::Primitive(WireKind::Double),
            Node::Null,
            Node::Primitive(WireKind::Long),
        ]));
        assert_eq!(apply_nullability(declared.clone(), true), declared);
    }

    #[test]
    fn not_nullable_is_untouched() {
        assert_eq!(apply_nullability(double_or_long(), false), double_or_long());
    }

    #[test]
    fn explicit_annotation_beats_global_flag() {
        let off = FieldMeta::new().nullable(false);
        let on = FieldMeta::new().nullable(true);
        assert!(!is_nullable(&off, false, true));
        assert!(is_nullable(&on, false, false));
        assert!(is_nullable(&FieldMeta::new(), false, true));
        assert!(!is_nullable(&FieldMeta::new(), false, false));
        assert!(is_nullable(&off, true, false), "Option<T> stays nullable");
    }

    // ---------------------------------------------------------------------
    // Strategies
    // ---------------------------------------------------------------------

    fn arb_wire() -> impl Strategy<Value = WireKind> {
        prop::sample::select(vec![
            WireKind::Boolean,
            WireKind::Int,
            WireKind::Long,
            WireKind::Float,
            WireKind::Double,
            WireKind::String,
        ])
    }

    fn arb_member() -> impl Strategy<Value = Node> {
        prop_oneof![
            Just(Node::Null),
            arb_wire().prop_map(Node::Primitive),
            (0usize..4).prop_map(|i| Node::Record(RecordId(i))),
            arb_wire().prop_map(|k| Node::array(Node::Primitive(k))),
        ]
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        prop_oneof![
            arb_member(),
            prop::collection::vec(arb_member(), 1..5).prop_map(|m| Node::Union(UnionSchema::new(m))),
        ]
    }

    proptest! {
        /// Applying the policy twice equals applying it once.
        #[test]
        fn nullability_is_idempotent(node in arb_node(), nullable in any::<bool>()) {
            let once = apply_nullability(node, nullable);
            let twice = apply_nullability(once.clone(), nullable);
            prop_assert_eq!(once, twice);
        }

        /// Existing members keep their relative order.
        #[test]
        fn nullability_preserves_member_order(members in prop::collection::vec(arb_member(), 1..5)) {
            let out = apply_nullability(Node::Union(UnionSchema::new(members.clone())), true);
            let out = out.as_union().expect("still a union").members().to_vec();
            prop_assert_eq!(&out[..members.len()], &members[..]);
            prop_assert!(out.iter().any(|m| matches!(m, Node::Null)));
        }
    }
}
