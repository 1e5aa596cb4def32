use ason_core::{compare, equals, normalize, parse, Kind, Value};
use std::cmp::Ordering;

fn p(text: &str) -> Value {
    parse(text).unwrap_or_else(|e| panic!("parse failed for {text:?}: {e}"))
}

fn assert_less(a: &str, b: &str) {
    assert_eq!(compare(&p(a), &p(b)), Ordering::Less, "{a} < {b}");
    assert_eq!(compare(&p(b), &p(a)), Ordering::Greater, "{b} > {a}");
}

// ============================================================================
// Kind order
// ============================================================================

#[test]
fn kinds_order_by_rank() {
    let ascending = ["null", "false", "0", r#""""#, "[]", "{}", "v", "1 & 2", "1 | 2"];
    for pair in ascending.windows(2) {
        assert_less(pair[0], pair[1]);
    }
}

#[test]
fn rank_table_is_strictly_increasing() {
    let kinds = [
        Kind::Null,
        Kind::Boolean,
        Kind::Number,
        Kind::String,
        Kind::List,
        Kind::Object,
        Kind::Variable,
        Kind::Intersection,
        Kind::Union,
    ];
    for pair in kinds.windows(2) {
        assert!(pair[0].rank() < pair[1].rank(), "{} < {}", pair[0], pair[1]);
    }
}

#[test]
fn any_number_sorts_before_any_string() {
    assert_less("1e400", r#""""#);
}

// ============================================================================
// Within a kind
// ============================================================================

#[test]
fn booleans() {
    assert_less("false", "true");
}

#[test]
fn numbers_compare_by_value_not_text() {
    assert_less("2", "10");
    assert_less("-3", "-2.5");
    assert_less("1.5", "2");
    assert_eq!(compare(&p("1.0"), &p("1")), Ordering::Equal);
}

#[test]
fn strings_compare_by_codepoint() {
    assert_less(r#""B""#, r#""a""#);
    assert_less(r#""a""#, r#""ab""#);
    assert_less(r#""z""#, r#""é""#);
}

#[test]
fn lists_compare_element_wise() {
    assert_less("[1, 2]", "[1, 3]");
    assert_less("[1]", "[1, 0]");
    assert_less("[]", "[null]");
    assert_less("[1, 0]", "[2]");
}

#[test]
fn objects_compare_by_sorted_entries() {
    assert_less(r#"{"a": 1}"#, r#"{"a": 2}"#);
    assert_less(r#"{"a": 9}"#, r#"{"b": 0}"#);
    assert_less(r#"{"a": 1}"#, r#"{"a": 1, "b": 0}"#);
    assert_less("{}", r#"{"a": null}"#);
}

#[test]
fn variables_compare_by_name() {
    assert_less("a", "b");
    assert_less("_", "a");
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn object_equality_ignores_key_order() {
    assert!(equals(&p(r#"{"a": 1, "b": 2}"#), &p(r#"{"b": 2, "a": 1}"#)));
}

#[test]
fn equality_is_structural_before_normalization() {
    let a = p("1 | 2");
    let b = p("2 | 1");
    assert_ne!(a, b);
    assert_eq!(normalize(&a).unwrap(), normalize(&b).unwrap());
}

#[test]
fn shared_subtrees_compare_equal() {
    let shared = p(r#"{"deep": [1, 2, {"x": "y"}]}"#);
    let a = Value::list([shared.clone(), Value::from(1)]);
    let b = Value::list([shared, Value::from(1)]);
    assert_eq!(a, b);
}

#[test]
fn sort_uses_value_order() {
    let mut values = vec![p(r#""s""#), p("[1]"), p("3"), p("null"), p("true"), p("1")];
    values.sort();
    let expected = vec![p("null"), p("true"), p("1"), p("3"), p(r#""s""#), p("[1]")];
    assert_eq!(values, expected);
}

#[test]
fn order_is_transitive_on_a_sample() {
    let sample: Vec<Value> = [
        "null", "true", "-1", "0", "0.5", r#""""#, r#""a""#, "[]", "[0]", "[0, 0]", "{}",
        r#"{"a": 0}"#, "x", "y",
    ]
    .iter()
    .map(|t| p(t))
    .collect();
    for a in &sample {
        for b in &sample {
            for c in &sample {
                if a < b && b < c {
                    assert!(a < c, "{a} < {b} < {c}");
                }
            }
        }
    }
}
