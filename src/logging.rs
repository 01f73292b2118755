use crate::config::ReelConfig;
use serde_json::json;

/// Variants are declared from least to most severe; the derived order is
/// the filtering threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

pub fn log_event(config: &ReelConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let payload = build_payload(now_unix_seconds(), level, event, fields);
    emit(level, &payload.to_string());
}

fn build_payload(ts: u64, level: LogLevel, event: &str, fields: serde_json::Value) -> serde_json::Value {
    let mut payload = json!({ "ts": ts, "level": level.as_str(), "event": event });

    if let (Some(envelope), serde_json::Value::Object(extra)) = (payload.as_object_mut(), fields) {
        envelope.extend(extra);
    }

    payload
}

#[cfg(target_arch = "wasm32")]
fn emit(level: LogLevel, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        LogLevel::Error => web_sys::console::error_1(&line),
        LogLevel::Debug | LogLevel::Info => web_sys::console::log_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: LogLevel, line: &str) {
    match level {
        LogLevel::Error => eprintln!("{line}"),
        LogLevel::Debug | LogLevel::Info => println!("{line}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn now_unix_seconds() -> u64 {
    (js_sys::Date::now() / 1_000.0) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_unix_seconds() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_merges_fields_after_envelope() {
        let payload = build_payload(
            1_700_000_000,
            LogLevel::Info,
            "facet_selected",
            json!({ "group": "type", "value": "edit" }),
        );

        assert_eq!(
            payload,
            json!({
                "ts": 1_700_000_000u64,
                "level": "info",
                "event": "facet_selected",
                "group": "type",
                "value": "edit",
            })
        );
    }

    #[test]
    fn non_object_fields_are_dropped() {
        let payload = build_payload(1, LogLevel::Debug, "visibility_evaluated", json!(3));

        assert_eq!(payload.as_object().map(|map| map.len()), Some(3));
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Error);
        assert_eq!(LogLevel::from_str("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("trace"), None);
    }
}
