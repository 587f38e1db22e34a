// BAPI return messages
// Every BAPI reports diagnostics through the standard RETURN table
// (BAPIRET2). Only the fields this tooling acts on are mapped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message severity as SAP encodes it in the TYPE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "S")]
    Success,
    #[serde(rename = "I")]
    Info,
    #[serde(rename = "W")]
    Warning,
    #[serde(rename = "E")]
    Error,
    #[serde(rename = "A")]
    Abort,
}

impl Severity {
    /// Error and Abort suppress the commit; Success, Info, and Warning do not.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error | Severity::Abort)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Success => "S",
            Severity::Info => "I",
            Severity::Warning => "W",
            Severity::Error => "E",
            Severity::Abort => "A",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnMessage {
    #[serde(rename = "TYPE")]
    pub severity: Severity,

    /// Message class, e.g. "M8".
    #[serde(rename = "ID", default)]
    pub id: String,

    #[serde(rename = "NUMBER", default)]
    pub number: String,

    #[serde(rename = "MESSAGE", default)]
    pub message: String,
}

impl ReturnMessage {
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// One-line rendering of a RETURN table for diagnostics.
pub fn summarize(messages: &[ReturnMessage]) -> String {
    if messages.is_empty() {
        return "no messages returned".to_string();
    }
    messages
        .iter()
        .map(|m| format!("{} {}{}: {}", m.severity, m.id, m.number, m.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(severity: Severity) -> ReturnMessage {
        ReturnMessage {
            severity,
            id: "M8".to_string(),
            number: "286".to_string(),
            message: "test".to_string(),
        }
    }

    #[test]
    fn only_error_and_abort_block() {
        assert!(message(Severity::Error).is_blocking());
        assert!(message(Severity::Abort).is_blocking());
        assert!(!message(Severity::Success).is_blocking());
        assert!(!message(Severity::Warning).is_blocking());
        assert!(!message(Severity::Info).is_blocking());
    }

    #[test]
    fn severity_parses_from_sap_codes() {
        let raw = r#"{"TYPE": "E", "ID": "M8", "NUMBER": "286", "MESSAGE": "Vendor unknown"}"#;
        let parsed: ReturnMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.severity, Severity::Error);
        assert_eq!(parsed.message, "Vendor unknown");
    }

    #[test]
    fn summary_joins_all_messages() {
        let messages = vec![message(Severity::Success), message(Severity::Error)];
        let summary = summarize(&messages);
        assert!(summary.contains("S M8286"));
        assert!(summary.contains("E M8286"));
    }
}
