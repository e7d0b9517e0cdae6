use anyhow::Result;
use serde_json::{json, Value};

use rashomon_sdk::{report, ActionReport, Metadata};

#[test]
fn test_payload_has_all_three_fields() -> Result<()> {
    let payload = report("agent-9", "network_request", None)?;
    let value: Value = serde_json::from_str(&payload)?;

    let object = value.as_object().expect("payload is a JSON object");
    assert_eq!(object.len(), 3);
    assert_eq!(object["agent_id"], json!("agent-9"));
    assert_eq!(object["action"], json!("network_request"));
    assert_eq!(object["metadata"], json!({}));

    Ok(())
}

#[test]
fn test_payload_round_trips_nested_metadata() -> Result<()> {
    let metadata: Metadata = serde_json::from_value(json!({
        "target": "https://api.example.com",
        "headers": { "x-trace": "abc" },
        "sizes": [1, 2, 3],
        "flagged": false,
    }))?;

    let payload = report("agent-9", "network_request", Some(metadata.clone()))?;
    let parsed = ActionReport::from_json(&payload)?;

    assert_eq!(parsed, ActionReport::new("agent-9", "network_request").with_metadata(metadata));
    Ok(())
}

#[test]
fn test_external_payload_without_metadata() -> Result<()> {
    let parsed = ActionReport::from_json(r#"{"agent_id":"py","action":"noop"}"#)?;

    assert_eq!(parsed.agent_id, "py");
    assert!(parsed.metadata.is_empty());
    assert_eq!(report(&parsed.agent_id, &parsed.action, None)?, r#"{"agent_id":"py","action":"noop","metadata":{}}"#);

    Ok(())
}
