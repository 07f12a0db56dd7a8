use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One JSON object per line on stderr.
#[derive(Clone, Debug, Serialize)]
pub struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: u64,
    pub level: LogLevel,
    pub event: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    pub details: Value,
}

pub fn build_log_line(
    level: LogLevel,
    event: &str,
    session_id: &str,
    seed: Option<u32>,
    details: Value,
) -> StructuredLogLine {
    StructuredLogLine {
        timestamp_ms: now_ms(),
        level,
        event: event.to_string(),
        session_id: session_id.to_string(),
        seed,
        details,
    }
}

pub fn emit_log(level: LogLevel, event: &str, session_id: &str, seed: Option<u32>, details: Value) {
    let log_line = build_log_line(level, event, session_id, seed, details);
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub fn default_session_id(prefix: &str, seed: u32, timestamp_ms: u64) -> String {
    format!("{prefix}-{seed}-{timestamp_ms}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn log_line_uses_camel_case_keys() {
        let line = build_log_line(
            LogLevel::Warn,
            "invalid_command",
            "play-1-2",
            Some(1),
            json!({ "input": "x" }),
        );
        let value = serde_json::to_value(&line).expect("log line should serialize");
        assert_eq!(value["level"], "warn");
        assert_eq!(value["event"], "invalid_command");
        assert_eq!(value["sessionId"], "play-1-2");
        assert_eq!(value["seed"], 1);
        assert_eq!(value["details"]["input"], "x");
        assert!(value["timestampMs"].as_u64().is_some());
    }

    #[test]
    fn log_line_omits_missing_seed() {
        let line = build_log_line(LogLevel::Info, "run_finished", "sim", None, json!({}));
        let value = serde_json::to_value(&line).expect("log line should serialize");
        assert!(value.get("seed").is_none());
    }

    #[test]
    fn default_session_id_contains_seed_and_timestamp() {
        assert_eq!(default_session_id("sim", 42, 123456789), "sim-42-123456789");
    }
}
