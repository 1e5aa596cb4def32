use ason_core::{
    parse, parse_with, IdentifierMode, Kind, Number, ParseErrorKind, ParseOptions, Precedence,
    Value,
};

/// Helper: parse or fail the test with the error.
fn p(text: &str) -> Value {
    parse(text).unwrap_or_else(|e| panic!("parse failed for {text:?}: {e}"))
}

fn error_kind(text: &str) -> ParseErrorKind {
    parse(text).expect_err("expected a parse error").kind
}

fn num(text: &str) -> Value {
    Value::Number(text.parse::<Number>().unwrap())
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn parse_null() {
    assert_eq!(p("null"), Value::Null);
}

#[test]
fn parse_booleans() {
    assert_eq!(p("true"), Value::Boolean(true));
    assert_eq!(p("false"), Value::Boolean(false));
}

#[test]
fn parse_integer() {
    assert_eq!(p("42"), Value::from(42));
    assert_eq!(p("-7"), Value::from(-7));
}

#[test]
fn parse_decimal_keeps_exact_value() {
    assert_eq!(p("3.14"), num("3.14"));
    assert_eq!(p("1.50"), num("1.5"));
    assert_eq!(p("1e2"), Value::from(100));
}

#[test]
fn parse_number_beyond_f64_precision() {
    let text = "12345678901234567890123456789.000000000000000000001";
    let value = p(text);
    assert_eq!(value.as_number().unwrap().to_string(), text);
}

#[test]
fn parse_string() {
    assert_eq!(p(r#""hello world""#), Value::from("hello world"));
    assert_eq!(p(r#""""#), Value::from(""));
}

#[test]
fn parse_string_escapes() {
    assert_eq!(
        p(r#""a\"b\\c\/d\n\t\r\b\f""#),
        Value::from("a\"b\\c/d\n\t\r\u{0008}\u{000C}")
    );
}

#[test]
fn parse_unicode_escapes() {
    assert_eq!(p(r#""caf\u00e9""#), Value::from("caf\u{00e9}"));
    // Surrogate pair for U+1F600.
    assert_eq!(p(r#""\ud83d\ude00""#), Value::from("\u{1F600}"));
}

#[test]
fn parse_raw_unicode() {
    assert_eq!(p("\"\u{4f60}\u{597d}\""), Value::from("\u{4f60}\u{597d}"));
}

#[test]
fn parse_empty_literal() {
    let value = p("empty");
    assert!(value.is_empty_union());
    assert_ne!(value, Value::Null);
}

// ============================================================================
// Lists and objects
// ============================================================================

#[test]
fn parse_empty_list_and_object() {
    assert_eq!(p("[]"), Value::list([]));
    assert_eq!(p("{}"), Value::object(Vec::<(&str, Value)>::new()));
}

#[test]
fn parse_list() {
    assert_eq!(
        p("[1, \"two\", null]"),
        Value::list([Value::from(1), Value::from("two"), Value::Null])
    );
}

#[test]
fn parse_object() {
    let value = p(r#"{"b": 2, "a": [true]}"#);
    assert_eq!(
        value,
        Value::object([
            ("a", Value::list([Value::Boolean(true)])),
            ("b", Value::from(2)),
        ])
    );
    let keys: Vec<&str> = value.keys().unwrap().collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn parse_whitespace_is_insignificant() {
    assert_eq!(p(" {\n\t\"a\" :\r\n 1 } "), p(r#"{"a":1}"#));
}

#[test]
fn parse_duplicate_key_keeps_last() {
    assert_eq!(p(r#"{"a": 1, "a": 2}"#), p(r#"{"a": 2}"#));
}

// ============================================================================
// Operators and precedence
// ============================================================================

#[test]
fn parse_union_chain_is_flat() {
    let value = p("1 | 2 | 3");
    assert_eq!(value.kind(), Kind::Union);
    assert_eq!(value.members().unwrap().len(), 3);
}

#[test]
fn parse_intersection_binds_tighter_by_default() {
    let value = p("1 | 2 & 3");
    assert_eq!(
        value,
        Value::union(
            Value::from(1),
            Value::intersect(Value::from(2), Value::from(3))
        )
    );

    let value = p("1 & 2 | 3");
    assert_eq!(
        value,
        Value::union(
            Value::intersect(Value::from(1), Value::from(2)),
            Value::from(3)
        )
    );
}

#[test]
fn parse_parentheses_group() {
    let value = p("(1 | 2) & 3");
    assert_eq!(
        value,
        Value::intersect(
            Value::union(Value::from(1), Value::from(2)),
            Value::from(3)
        )
    );
}

#[test]
fn parse_union_first_precedence() {
    let options = ParseOptions {
        precedence: Precedence::UnionFirst,
        ..ParseOptions::default()
    };
    let value = parse_with("1 & 2 | 3", &options).unwrap();
    assert_eq!(
        value,
        Value::intersect(
            Value::from(1),
            Value::union(Value::from(2), Value::from(3))
        )
    );
}

#[test]
fn parse_left_to_right_precedence() {
    let options = ParseOptions {
        precedence: Precedence::LeftToRight,
        ..ParseOptions::default()
    };
    let value = parse_with("1 | 2 & 3", &options).unwrap();
    assert_eq!(
        value,
        Value::intersect(
            Value::union(Value::from(1), Value::from(2)),
            Value::from(3)
        )
    );
}

#[test]
fn parse_operators_inside_containers() {
    let value = p(r#"{"a": 1 | 2, "b": [3 & 3]}"#);
    let a = value.field("a").unwrap().unwrap();
    assert_eq!(a.kind(), Kind::Union);
    let b = value.field("b").unwrap().unwrap().get(0).unwrap().unwrap();
    assert_eq!(b.kind(), Kind::Intersection);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn parse_identifier_as_variable() {
    assert_eq!(p("v"), Value::variable("v"));
    assert_eq!(p("item_2"), Value::variable("item_2"));
}

#[test]
fn parse_wildcard() {
    assert_eq!(p("_"), Value::wildcard());
}

#[test]
fn parse_identifier_bindings() {
    let options = ParseOptions::default().with_binding("base", p(r#"{"a": 1}"#));
    let value = parse_with("base & other", &options).unwrap();
    assert_eq!(
        value,
        Value::intersect(p(r#"{"a": 1}"#), Value::variable("other"))
    );
}

#[test]
fn parse_bindings_only_rejects_unknown() {
    let options = ParseOptions {
        identifiers: IdentifierMode::BindingsOnly,
        ..ParseOptions::default()
    }
    .with_binding("known", Value::from(1));
    assert_eq!(parse_with("known", &options).unwrap(), Value::from(1));

    let err = parse_with("known | unknown", &options).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::UnknownIdentifier("unknown".to_string())
    );
    assert_eq!(err.position.column, 9);
}

#[test]
fn parse_reserved_words_ignore_bindings() {
    let options = ParseOptions::default().with_binding("null", Value::from(1));
    assert_eq!(parse_with("null", &options).unwrap(), Value::Null);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn error_empty_input() {
    assert_eq!(error_kind(""), ParseErrorKind::UnexpectedEnd);
    assert_eq!(error_kind("   "), ParseErrorKind::UnexpectedEnd);
}

#[test]
fn error_unterminated_list() {
    assert_eq!(error_kind("[1, 2"), ParseErrorKind::UnexpectedEnd);
}

#[test]
fn error_unterminated_object() {
    assert_eq!(error_kind(r#"{"a": 1"#), ParseErrorKind::UnexpectedEnd);
}

#[test]
fn error_unterminated_parenthesis() {
    assert_eq!(error_kind("(1 | 2"), ParseErrorKind::UnexpectedEnd);
}

#[test]
fn error_unterminated_string() {
    let err = parse(r#"[1, "abc"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    assert_eq!(err.position.offset, 4);
}

#[test]
fn error_invalid_escape() {
    assert_eq!(error_kind(r#""\x""#), ParseErrorKind::InvalidEscape);
    assert_eq!(error_kind(r#""\ud83d""#), ParseErrorKind::InvalidEscape);
}

#[test]
fn error_control_character_in_string() {
    assert!(matches!(
        error_kind("\"a\nb\""),
        ParseErrorKind::UnexpectedToken(_)
    ));
}

#[test]
fn error_invalid_numbers() {
    for text in ["01", "1.", "1e", "-", "1.2.3", "--1", "1e+", "-01"] {
        assert!(
            matches!(error_kind(text), ParseErrorKind::InvalidNumber(_)),
            "expected InvalidNumber for {text:?}"
        );
    }
}

#[test]
fn error_trailing_input() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
    assert_eq!(err.position.offset, 2);
    assert_eq!(err.position.column, 3);
}

#[test]
fn error_trailing_comma() {
    assert_eq!(
        error_kind("[1,]"),
        ParseErrorKind::UnexpectedToken("']'".to_string())
    );
    assert_eq!(
        error_kind(r#"{"a": 1,}"#),
        ParseErrorKind::UnexpectedToken("'}'".to_string())
    );
}

#[test]
fn error_unquoted_key() {
    assert_eq!(
        error_kind("{a: 1}"),
        ParseErrorKind::UnexpectedToken("identifier 'a'".to_string())
    );
}

#[test]
fn error_dangling_operator() {
    assert_eq!(error_kind("1 |"), ParseErrorKind::UnexpectedEnd);
    assert_eq!(
        error_kind("& 1"),
        ParseErrorKind::UnexpectedToken("'&'".to_string())
    );
}

#[test]
fn error_unknown_character() {
    assert!(matches!(error_kind("1 # 2"), ParseErrorKind::UnexpectedToken(_)));
}

#[test]
fn error_complement_is_unsupported() {
    assert_eq!(error_kind("!1"), ParseErrorKind::UnsupportedComplement);
    let err = parse(r#"{"a": 1} & !{"b": 2}"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnsupportedComplement);
    assert_eq!(err.position.column, 12);
    assert!(err.to_string().contains("complement"));
}

#[test]
fn error_position_tracks_lines() {
    let err = parse("[1,\n  }").unwrap_err();
    assert_eq!(err.position.line, 2);
    assert_eq!(err.position.column, 3);
}

#[test]
fn error_nesting_too_deep() {
    let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
    assert_eq!(error_kind(&deep), ParseErrorKind::NestingTooDeep);

    let ok = format!("{}{}", "[".repeat(100), "]".repeat(100));
    assert!(parse(&ok).is_ok());
}

#[test]
fn error_message_includes_position() {
    let err = parse("[1 2]").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 1, column 4"), "{message}");
    assert!(message.contains("number 2"), "{message}");
}
