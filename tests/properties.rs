//! Property tests: payload round trip and idempotent field propagation.

use paper_query::propagate::propagate_fields;
use paper_query::Query;
use proptest::prelude::*;

fn term() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}( [a-z]{1,6}){0,2}",
        "[a-z]{3,6}\\*",
        "[a-z]{1,3}\\?[a-z]{0,3}",
    ]
}

fn field_prefix() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just(String::new()),
        1 => prop::sample::select(vec!["ti", "ABS", "key", "tiabs", "TiAbsKey"]).prop_map(String::from),
    ]
}

fn connector() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["AND", "OR", "AND NOT", "and", "or", "and not"])
}

/// Valid query strings built from the grammar: operands joined by connectors,
/// with nested parenthesized groups.
fn query_string() -> impl Strategy<Value = String> {
    let operand = (field_prefix(), term()).prop_map(|(field, term)| format!("{field}[{term}]"));
    operand.prop_recursive(4, 24, 4, |inner| {
        (
            field_prefix(),
            inner.clone(),
            prop::collection::vec((connector(), inner), 1..4),
        )
            .prop_map(|(field, first, rest)| {
                let mut body = first;
                for (connector, operand) in rest {
                    body.push(' ');
                    body.push_str(connector);
                    body.push(' ');
                    body.push_str(&operand);
                }
                format!("{field}({body})")
            })
    })
}

proptest! {
    #[test]
    fn payload_round_trip(raw in query_string()) {
        let query = Query::new(&raw).unwrap();
        let payload = query.to_payload();
        let restored = Query::from_payload(&payload).unwrap();

        prop_assert_eq!(restored.raw_query(), query.raw_query());
        prop_assert_eq!(restored.to_payload(), payload);
    }

    #[test]
    fn json_round_trip(raw in query_string()) {
        let query = Query::new(&raw).unwrap();
        let restored = Query::from_json(&query.to_json().unwrap()).unwrap();
        prop_assert_eq!(restored.root(), query.root());
    }

    #[test]
    fn propagation_is_idempotent(raw in query_string()) {
        let query = Query::new(&raw).unwrap();
        let mut again = query.root().clone();
        propagate_fields(&mut again);
        prop_assert_eq!(&again, query.root());
    }

    #[test]
    fn canonical_string_preserves_tree(raw in query_string()) {
        let query = Query::new(&raw).unwrap();
        let reparsed = Query::new(&query.to_canonical_string()).unwrap();
        prop_assert_eq!(reparsed.root(), query.root());
        prop_assert_eq!(reparsed.get_all_terms(), query.get_all_terms());
    }

    #[test]
    fn validation_never_panics(raw in "[\\[\\]() a-zA-Z?*\"]{0,24}") {
        let _ = Query::new(&raw);
    }
}
