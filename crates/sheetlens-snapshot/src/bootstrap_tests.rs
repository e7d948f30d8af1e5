use super::*;
use serde_json::json;

const VAR: &str = "bootstrapData";

#[test]
fn test_object_literal_with_nested_braces() {
    let script = r#"var x = 1; var bootstrapData = {"changes":{"firstchunk":[["c1","[[null,0]]"]]},"s":"}{"}; init();"#;
    let value = ObjectLiteral.try_extract(script, VAR).unwrap().unwrap();
    assert_eq!(value["s"], "}{");
    assert!(value["changes"]["firstchunk"].is_array());
}

#[test]
fn test_object_literal_absent() {
    assert!(ObjectLiteral.try_extract("var other = {};", VAR).is_none());
}

#[test]
fn test_object_literal_ignores_longer_identifier() {
    let script = r#"mybootstrapData = {"a":1}; bootstrapData = {"b":2};"#;
    let value = ObjectLiteral.try_extract(script, VAR).unwrap().unwrap();
    assert_eq!(value, json!({"b": 2}));
}

#[test]
fn test_object_literal_invalid_json() {
    let script = "bootstrapData = {changes: 1};";
    let result = ObjectLiteral.try_extract(script, VAR).unwrap();
    assert!(result.is_err());
}

#[test]
fn test_json_parse_double_quoted() {
    let script = r#"bootstrapData = JSON.parse("{\"changes\":{\"firstchunk\":[]},\"t\":\"a\u00e9\x41\"}");"#;
    let value = JsonParseCall.try_extract(script, VAR).unwrap().unwrap();
    assert!(value["changes"]["firstchunk"].is_array());
    assert_eq!(value["t"], "aéA");
}

#[test]
fn test_json_parse_single_quoted() {
    let script = r#"bootstrapData = JSON.parse('{"q":"it\'s"}');"#;
    let value = JsonParseCall.try_extract(script, VAR).unwrap().unwrap();
    assert_eq!(value["q"], "it's");
}

#[test]
fn test_unescape_surrogate_pair() {
    let decoded = unescape_js_string(r#"\ud83d\ude00""#, '"').unwrap();
    assert_eq!(decoded, "😀");
}

#[test]
fn test_unescape_unterminated() {
    assert!(unescape_js_string("no closing quote", '"').is_none());
}

#[test]
fn test_matching_brace_skips_strings() {
    let src = r#"{"a":"}","b":{"c":[1,{"d":2}]}} tail"#;
    let close = matching_brace(src, 0).unwrap();
    assert_eq!(&src[close + 1..], " tail");
}

#[test]
fn test_parse_prefers_live_object() {
    let live = json!({"changes": {"firstchunk": []}});
    let parsed = BootstrapParser::new()
        .parse(Some("garbage"), Some(&live), VAR)
        .unwrap();
    assert!(matches!(parsed, Cow::Borrowed(_)));
}

#[test]
fn test_parse_ignores_non_object_live_value() {
    let live = json!("not an object");
    let parsed = BootstrapParser::new()
        .parse(Some(r#"bootstrapData = {"a":1};"#), Some(&live), VAR)
        .unwrap();
    assert_eq!(*parsed, json!({"a": 1}));
}

#[test]
fn test_parse_missing_script() {
    let err = BootstrapParser::new().parse(None, None, VAR).unwrap_err();
    assert!(matches!(err, SnapshotError::ScriptNotFound));
}

#[test]
fn test_parse_assignment_not_found() {
    let err = BootstrapParser::new()
        .parse(Some("var firstchunk = 1;"), None, VAR)
        .unwrap_err();
    assert!(matches!(err, SnapshotError::AssignmentNotFound));
}

#[test]
fn test_parse_invalid_json() {
    let err = BootstrapParser::new()
        .parse(Some("bootstrapData = {broken: true};"), None, VAR)
        .unwrap_err();
    assert!(matches!(err, SnapshotError::InvalidJson(_)));
}

#[test]
fn test_parse_falls_through_to_string_form() {
    let script = r#"bootstrapData = JSON.parse("{\"a\":[1,2]}");"#;
    let parsed = BootstrapParser::new().parse(Some(script), None, VAR).unwrap();
    assert_eq!(*parsed, json!({"a": [1, 2]}));
}

struct FixedStrategy;

impl ExtractStrategy for FixedStrategy {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn try_extract(&self, _source: &str, _variable: &str) -> Extracted {
        Some(Ok(json!({"from": "fixed"})))
    }
}

#[test]
fn test_custom_strategy_runs_last() {
    let parser = BootstrapParser::new().with_strategy(Box::new(FixedStrategy));
    let parsed = parser.parse(Some("nothing here"), None, VAR).unwrap();
    assert_eq!(parsed["from"], "fixed");
}
