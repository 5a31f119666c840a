//! Unit tests for bridge protocol types.

use rstest::rstest;
use serde_json::json;

use super::*;

#[test]
fn format_request_flattens_operation_fields() {
    let mut options = EngineOptions::new();
    options.insert("semi".into(), json!(false));
    let request = BridgeRequest::new(
        Path::new("/project/node_modules/prettier/index.cjs"),
        BridgeOperation::Format {
            text: "a\n".into(),
            options,
        },
    );

    let value = serde_json::to_value(&request).expect("serialise request");
    assert_eq!(
        value,
        json!({
            "module": "/project/node_modules/prettier/index.cjs",
            "operation": "format",
            "text": "a\n",
            "options": {"semi": false},
        })
    );
}

#[test]
fn resolve_config_request_carries_query() {
    let request = BridgeRequest::new(
        Path::new("/engine/index.cjs"),
        BridgeOperation::ResolveConfig {
            path: PathBuf::from("/project/src/app.ts"),
            query: ConfigQuery::uncached(None, true),
        },
    );

    let value = serde_json::to_value(&request).expect("serialise request");
    assert_eq!(value["operation"], json!("resolve_config"));
    assert_eq!(value["query"]["useCache"], json!(false));
    assert_eq!(value["query"]["config"], json!(null));
}

#[test]
fn ok_response_without_result_reads_as_null() {
    let response: BridgeResponse =
        serde_json::from_str(r#"{"status":"ok"}"#).expect("parse response");
    assert_eq!(
        response,
        BridgeResponse::Ok {
            result: serde_json::Value::Null
        }
    );
}

#[test]
fn error_response_carries_message() {
    let response: BridgeResponse =
        serde_json::from_str(r#"{"status":"error","message":"SyntaxError"}"#)
            .expect("parse response");
    assert!(matches!(response, BridgeResponse::Error { message } if message == "SyntaxError"));
}

#[rstest]
#[case(
    BridgeOperation::FileInfo {
        path: PathBuf::from("a.js"),
        query: FileInfoQuery { ignore_path: PathBuf::from(".prettierignore") },
    },
    "file_info"
)]
#[case(
    BridgeOperation::Check { text: String::new(), options: EngineOptions::new() },
    "check"
)]
fn operation_names_match_wire_tags(#[case] operation: BridgeOperation, #[case] expected: &str) {
    assert_eq!(operation.name(), expected);
    let value = serde_json::to_value(&operation).expect("serialise operation");
    assert_eq!(value["operation"], json!(expected));
}
