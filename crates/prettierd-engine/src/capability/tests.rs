//! Unit tests for capability types.

use serde_json::json;

use super::*;

#[test]
fn config_query_serialises_with_engine_field_names() {
    let query = ConfigQuery::uncached(Some(PathBuf::from("/etc/prettierrc")), false);
    let value = serde_json::to_value(&query).expect("serialise query");
    assert_eq!(
        value,
        json!({"config": "/etc/prettierrc", "editorconfig": false, "useCache": false})
    );
}

#[test]
fn file_info_tolerates_missing_parser() {
    let info: FileInfo = serde_json::from_value(json!({"ignored": true})).expect("parse info");
    assert!(info.ignored);
    assert!(info.inferred_parser.is_none());
}

#[test]
fn file_info_reads_inferred_parser() {
    let info: FileInfo =
        serde_json::from_value(json!({"ignored": false, "inferredParser": "babel"}))
            .expect("parse info");
    assert_eq!(info.inferred_parser.as_deref(), Some("babel"));
}

#[test]
fn discovered_config_is_a_transparent_object() {
    let config: DiscoveredConfig =
        serde_json::from_value(json!({"semi": false, "overrides": []})).expect("parse config");
    assert_eq!(config.options().get("semi"), Some(&json!(false)));
    assert_eq!(config.into_options().len(), 2);
}
