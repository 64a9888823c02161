//! Property-based tests for comparison invariants.

use deepcheck::{
    compare_structure, Asserter, AssertionSettings, CompareType, ComparerRegistry,
    ComparisonOptions, SinkKind, Value,
};
use proptest::prelude::*;
use serde_json::Value as JsonValue;

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        any::<i32>().prop_map(|v| JsonValue::Number(v.into())),
        "[a-z]{0,6}".prop_map(JsonValue::String),
    ];

    leaf.prop_recursive(max_depth, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
            prop::collection::btree_map("[a-c]{1,2}", inner, 0..4)
                .prop_map(|map| JsonValue::Object(map.into_iter().collect())),
        ]
    })
}

fn primitive_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        any::<i64>().prop_map(|n| Value::bigint(n.into())),
        ".*".prop_map(Value::from),
    ]
}

fn values_equal(a: &Value, b: &Value, compare_type: CompareType) -> bool {
    let options = ComparisonOptions::for_type(compare_type);
    compare_structure(a, b, &options, &ComparerRegistry::standard())
        .unwrap()
        .values_equal()
}

fn quiet() -> Asserter {
    Asserter::new(
        ComparerRegistry::standard(),
        AssertionSettings {
            sink: SinkKind::Silent,
            ..AssertionSettings::default()
        },
    )
}

proptest! {
    #[test]
    fn primitives_strictly_equal_themselves(x in primitive_strategy()) {
        prop_assert!(values_equal(&x, &x, CompareType::Equality));
    }

    #[test]
    fn references_equal_themselves_without_descending(json in json_value_strategy(3)) {
        let value = Value::from(json);
        let options = ComparisonOptions::for_type(CompareType::Equality);
        let registry = ComparerRegistry::standard();
        let result = compare_structure(&value, &value, &options, &registry).unwrap();
        prop_assert!(result.values_equal());
        prop_assert_eq!(result.len(), 1);
    }

    #[test]
    fn independent_copies_are_equivalent(json in json_value_strategy(3)) {
        let a = Value::from(json.clone());
        let b = Value::from(json);
        prop_assert!(values_equal(&a, &b, CompareType::Equivalency));
        prop_assert!(values_equal(&a, &b, CompareType::Roughly));
    }

    #[test]
    fn equivalency_is_symmetric(
        a in json_value_strategy(3),
        b in json_value_strategy(3),
    ) {
        let a = Value::from(a);
        let b = Value::from(b);
        prop_assert_eq!(
            values_equal(&a, &b, CompareType::Equivalency),
            values_equal(&b, &a, CompareType::Equivalency)
        );
    }

    #[test]
    fn roughly_ignores_permutations(
        (original, shuffled) in prop::collection::vec(any::<i16>(), 0..8)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a = Value::array(original.iter().map(|n| Value::from(i32::from(*n))));
        let b = Value::array(shuffled.iter().map(|n| Value::from(i32::from(*n))));

        let asserter = quiet();
        prop_assert!(asserter.that(a.clone()).is_roughly(b.clone()).is_ok());

        let ordered = asserter.that(a).is_equivalent_to(b).is_ok();
        prop_assert_eq!(ordered, original == shuffled);
    }
}
