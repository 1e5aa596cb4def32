use ason_core::{normalize, parse, AsonError, Kind, Value};
use serde_json::json;

fn p(text: &str) -> Value {
    parse(text).unwrap_or_else(|e| panic!("parse failed for {text:?}: {e}"))
}

// ============================================================================
// JSON → ASON
// ============================================================================

#[test]
fn json_document_is_an_ason_value() {
    let text = r#"{"a": [1, 2.5, "x", null, true], "b": {}}"#;
    assert_eq!(Value::from_json_str(text).unwrap(), p(text));
}

#[test]
fn from_serde_json_value() {
    let value = Value::try_from(json!({"k": [1, "v"], "n": null})).unwrap();
    assert_eq!(value, p(r#"{"k": [1, "v"], "n": null}"#));
}

#[test]
fn json_floats_become_exact_decimals() {
    assert_eq!(Value::try_from(json!(1.0)).unwrap(), Value::from(1));
    assert_eq!(Value::try_from(json!(0.25)).unwrap(), p("0.25"));
    assert_eq!(Value::try_from(json!(-3)).unwrap(), Value::from(-3));
}

#[test]
fn large_json_integers_stay_exact() {
    assert_eq!(
        Value::from_json_str("12345678901234567890").unwrap(),
        p("12345678901234567890")
    );
}

#[test]
fn json_decimals_keep_every_digit() {
    let text = "0.1000000000000000000001";
    let value = Value::from_json_str(text).unwrap();
    assert_eq!(value, p(text));
    assert_eq!(value.as_number().unwrap().to_string(), text);
}

#[test]
fn json_exponents_beyond_f64_are_accepted() {
    assert_eq!(Value::from_json_str("1e400").unwrap(), p("1e400"));
    assert_eq!(Value::from_json_str("[-2.5e-400]").unwrap(), p("[-25e-401]"));
}

#[test]
fn unrepresentable_json_number_is_an_error() {
    let json: serde_json::Value = serde_json::from_str("1e99999999999999999999").unwrap();
    assert!(matches!(
        Value::try_from(&json),
        Err(AsonError::InvalidNumber(_))
    ));
}

#[test]
fn invalid_json_is_a_json_error() {
    assert!(matches!(
        Value::from_json_str("{\"a\": }"),
        Err(AsonError::Json(_))
    ));
    // ASON operators are not JSON.
    assert!(Value::from_json_str("1 | 2").is_err());
}

// ============================================================================
// ASON → JSON
// ============================================================================

#[test]
fn ground_values_convert_to_json() {
    let value = normalize(&p(r#"{"b": 1, "a": [0.5, "s", false]}"#)).unwrap();
    assert_eq!(value.to_json_string().unwrap(), r#"{"a":[0.5,"s",false],"b":1}"#);
}

#[test]
fn try_from_produces_serde_value() {
    let json = serde_json::Value::try_from(&p(r#"{"n": 12e3, "l": []}"#)).unwrap();
    assert_eq!(json, json!({"l": [], "n": 12000}));
}

#[test]
fn unions_have_no_json_form() {
    let err = p("1 | 2").to_json_string().unwrap_err();
    assert!(matches!(
        err,
        AsonError::TypeMismatch {
            found: Kind::Union,
            ..
        }
    ));
    assert!(Value::empty().to_json_string().is_err());
}

#[test]
fn variables_have_no_json_form() {
    let err = p(r#"{"a": [v]}"#).to_json_string().unwrap_err();
    assert!(matches!(
        err,
        AsonError::TypeMismatch {
            found: Kind::Variable,
            ..
        }
    ));
}

#[test]
fn numbers_convert_to_json_exactly() {
    assert_eq!(p("1e400").to_json_string().unwrap(), "1e400");
    let text = "12345678901234567890.000000000000000000001";
    assert_eq!(p(text).to_json_string().unwrap(), text);
}

#[test]
fn exact_numbers_round_trip_through_json() {
    for text in ["0.1000000000000000000001", "-125e-31", "1e30", "98765432109876543210"] {
        let value = p(text);
        let back = Value::from_json_str(&value.to_json_string().unwrap()).unwrap();
        assert_eq!(back, value, "number: {text}");
    }
}
