use proptest::prelude::*;
use serde_json::json;

use tibera_core::event::{truncate_key, CLIENT_SOURCE, MAX_IDEMPOTENCY_KEY_CHARS};
use tibera_core::{Attributes, EmitOptions, Event, PrivacyLevel, TiberaError};

fn attrs(value: serde_json::Value) -> Attributes {
    value.as_object().cloned().unwrap()
}

#[test]
fn compose_fills_defaults() {
    let event = Event::compose(
        "meal.saved",
        json!({"id": "abc"}),
        EmitOptions::default(),
        &Attributes::new(),
        None,
    )
    .unwrap();

    assert_eq!(event.event_type, "meal.saved");
    assert_eq!(event.source, CLIENT_SOURCE);
    assert_eq!(event.idempotency_key, event.event_id);
    assert_eq!(event.schema_version, 1);
    assert_eq!(event.privacy_level, PrivacyLevel::Standard);
    assert!(event.session_id.is_none());
    assert!(event.correlation_id.is_none());
    assert_eq!(event.payload["id"], "abc");
    assert!(uuid::Uuid::parse_str(&event.event_id).is_ok());
}

#[test]
fn compose_generates_unique_ids() {
    let a = Event::compose("a.b", json!({}), EmitOptions::default(), &Attributes::new(), None).unwrap();
    let b = Event::compose("a.b", json!({}), EmitOptions::default(), &Attributes::new(), None).unwrap();
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn compose_rejects_empty_event_type() {
    let err = Event::compose("", json!({}), EmitOptions::default(), &Attributes::new(), None)
        .unwrap_err();
    assert!(matches!(err, TiberaError::InvalidEvent { .. }));
}

#[test]
fn compose_keeps_whitespace_event_type() {
    let event = Event::compose("  ", json!({}), EmitOptions::default(), &Attributes::new(), None)
        .unwrap();
    assert_eq!(event.event_type, "  ");
}

#[test]
fn compose_accepts_null_payload_as_empty_object() {
    let event = Event::compose("x.y", serde_json::Value::Null, EmitOptions::default(), &Attributes::new(), None)
        .unwrap();
    assert!(event.payload.is_empty());
}

#[test]
fn compose_rejects_non_object_payload() {
    for payload in [json!(1), json!("text"), json!([1, 2]), json!(true)] {
        let result = Event::compose("x.y", payload, EmitOptions::default(), &Attributes::new(), None);
        assert!(matches!(result, Err(TiberaError::InvalidEvent { .. })));
    }
}

#[test]
fn per_call_context_wins_over_base_context() {
    let base = attrs(json!({"app_version": "1.2.0", "screen": "home"}));
    let options = EmitOptions::new().context(attrs(json!({"screen": "meal_log"})));
    let event = Event::compose("screen.viewed", json!({}), options, &base, None).unwrap();

    assert_eq!(event.context["app_version"], "1.2.0");
    assert_eq!(event.context["screen"], "meal_log");
}

#[test]
fn session_id_option_overrides_queue_session() {
    let from_queue =
        Event::compose("a.b", json!({}), EmitOptions::default(), &Attributes::new(), Some("sess-q")).unwrap();
    assert_eq!(from_queue.session_id.as_deref(), Some("sess-q"));

    let overridden = Event::compose(
        "a.b",
        json!({}),
        EmitOptions::new().session_id("sess-call"),
        &Attributes::new(),
        Some("sess-q"),
    )
    .unwrap();
    assert_eq!(overridden.session_id.as_deref(), Some("sess-call"));
}

#[test]
fn explicit_idempotency_key_is_truncated() {
    let long_key = "k".repeat(400);
    let event = Event::compose(
        "a.b",
        json!({}),
        EmitOptions::new().idempotency_key(long_key),
        &Attributes::new(),
        None,
    )
    .unwrap();
    assert_eq!(event.idempotency_key.chars().count(), MAX_IDEMPOTENCY_KEY_CHARS);
}

#[test]
fn empty_idempotency_key_falls_back_to_event_id() {
    let event = Event::compose(
        "a.b",
        json!({}),
        EmitOptions::new().idempotency_key(""),
        &Attributes::new(),
        None,
    )
    .unwrap();
    assert_eq!(event.idempotency_key, event.event_id);
}

#[test]
fn event_serializes_with_wire_field_names() {
    let event = Event::compose(
        "assistant.v3.error",
        json!({"code": 42}),
        EmitOptions::new().privacy_level(PrivacyLevel::Sensitive),
        &Attributes::new(),
        None,
    )
    .unwrap();
    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["event_type"], "assistant.v3.error");
    assert_eq!(value["privacy_level"], "sensitive");
    assert_eq!(value["source"], "client");
    assert!(value["session_id"].is_null());
    assert!(value["correlation_id"].is_null());
    let ts = value["ts"].as_str().unwrap();
    assert!(ts.ends_with('Z'), "timestamp should be UTC: {ts}");
    assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
}

#[test]
fn persisted_event_without_optional_fields_decodes_with_defaults() {
    let raw = json!({
        "event_id": "e-1",
        "event_type": "sleep.logged",
        "ts": "2024-03-01T07:30:00.000Z",
        "idempotency_key": "e-1"
    });
    let event: Event = serde_json::from_value(raw).unwrap();
    assert_eq!(event.source, "client");
    assert_eq!(event.schema_version, 1);
    assert_eq!(event.privacy_level, PrivacyLevel::Standard);
    assert!(event.payload.is_empty());
}

proptest! {
    #[test]
    fn truncated_key_never_exceeds_limit(key in ".{0,400}") {
        let truncated = truncate_key(&key);
        prop_assert!(truncated.chars().count() <= MAX_IDEMPOTENCY_KEY_CHARS);
        prop_assert!(key.starts_with(&truncated));
    }
}
