//! Core domain models
//!
//! Field names on the wire follow the rule-management API, which speaks
//! lower-case compound names (`networkprotocol`, `actionname`); the Rust
//! side keeps snake_case and maps across with serde renames.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Priority assigned to rules created from templates. The server picks the
/// next free slot when this one is already taken on the zone.
pub const DEFAULT_PRIORITY: u32 = 1;

/// Network protocols a zone listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkProtocol {
    Dns,
    Http,
}

impl NetworkProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkProtocol::Dns => "dns",
            NetworkProtocol::Http => "http",
        }
    }
}

impl fmt::Display for NetworkProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkProtocol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dns" => Ok(NetworkProtocol::Dns),
            "http" => Ok(NetworkProtocol::Http),
            other => Err(CoreError::UnknownProtocol(other.to_string())),
        }
    }
}

/// A rule component that has not been persisted yet.
///
/// The action name is kept as a plain string: whether it is meaningful for
/// the owning rule's protocol and side is the server's call, not ours (see
/// [`ActionName::valid_for`](crate::ActionName::valid_for) for consumers
/// that want the check up front).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRuleComponent {
    #[serde(rename = "actionname")]
    pub action_name: String,
    #[serde(rename = "actionvalue")]
    pub action_value: String,
    #[serde(rename = "ispredicate")]
    pub is_predicate: bool,
}

impl NewRuleComponent {
    pub fn predicate(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action_name: name.into(),
            action_value: value.into(),
            is_predicate: true,
        }
    }

    pub fn result(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action_name: name.into(),
            action_value: value.into(),
            is_predicate: false,
        }
    }
}

/// A persisted rule component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleComponent {
    #[serde(rename = "componentid")]
    pub component_id: Uuid,
    #[serde(rename = "actionname")]
    pub action_name: String,
    #[serde(rename = "actionvalue")]
    pub action_value: String,
    #[serde(rename = "ispredicate")]
    pub is_predicate: bool,
}

/// A rule definition ready to be submitted: the compiler's output and the
/// creation payload for the rule-management API.
///
/// `zone` stays empty until the definition is instantiated against one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRule {
    pub name: String,
    pub zone: String,
    pub priority: u32,
    #[serde(rename = "networkprotocol")]
    pub protocol: NetworkProtocol,
    #[serde(rename = "rulecomponents")]
    pub components: Vec<NewRuleComponent>,
}

impl NewRule {
    pub fn new(name: impl Into<String>, protocol: NetworkProtocol) -> Self {
        Self {
            name: name.into(),
            zone: String::new(),
            priority: DEFAULT_PRIORITY,
            protocol,
            components: Vec::new(),
        }
    }
}

/// A rule as the server knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "ruleid")]
    pub rule_id: Uuid,
    pub name: String,
    pub zone: String,
    pub priority: u32,
    #[serde(rename = "networkprotocol")]
    pub protocol: NetworkProtocol,
    #[serde(rename = "rulecomponents", default)]
    pub components: Vec<RuleComponent>,
}

/// A zone: a unique subdomain that receives and logs inbound traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub fqdn: String,
    pub domain: String,
}

/// One logged callback against a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub zone: String,
    pub id: i64,
    pub time: DateTime<Utc>,
    pub fqdn: String,
    pub protocol: String,
    pub clientip: String,
    pub request: serde_json::Value,
    pub response: serde_json::Value,
    pub reqsummary: String,
    pub respsummary: String,
}

/// A pre-authored bundle of rule definitions, instantiable against any
/// zone. Owns its rules; rules own their components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rules: Vec<NewRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_use_wire_field_names() {
        let component = NewRuleComponent::predicate("http.method", "get");
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["actionname"], "http.method");
        assert_eq!(json["actionvalue"], "get");
        assert_eq!(json["ispredicate"], true);
    }

    #[test]
    fn rules_use_wire_field_names() {
        let mut rule = NewRule::new("test", NetworkProtocol::Http);
        rule.components.push(NewRuleComponent::result("http.code", "200"));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["networkprotocol"], "http");
        assert_eq!(json["rulecomponents"][0]["actionname"], "http.code");
        assert_eq!(json["priority"], 1);
    }

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("DNS".parse::<NetworkProtocol>().unwrap(), NetworkProtocol::Dns);
        assert_eq!("http".parse::<NetworkProtocol>().unwrap(), NetworkProtocol::Http);
        assert!("smtp".parse::<NetworkProtocol>().is_err());
    }

    #[test]
    fn persisted_rule_deserializes_without_components() {
        let raw = serde_json::json!({
            "ruleid": "7b2ae3e4-8a3c-4f8e-9d2a-111111111111",
            "name": "catch all",
            "zone": "abc.example.net",
            "priority": 3,
            "networkprotocol": "dns"
        });
        let rule: Rule = serde_json::from_value(raw).unwrap();
        assert!(rule.components.is_empty());
    }
}
