//! # Plugin Options
//!
//! Static configuration of the apology rule, loaded once by the host and never
//! changed while the plugin is mounted. Keys are snake_case; the camelCase
//! names used by other server tooling are accepted as aliases.
//!
//! ```toml
//! attacker_message = "Please apologise for ALL TKs in ALL chat!"
//! victim_message = "You were killed by your own team."
//! apology_keywords = ["sorry", "sry", "my bad"]
//! ```
//!
//! An empty `attacker_message` or `victim_message` disables that notice.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ATTACKER_MESSAGE: &str = "Please apologise for ALL TKs in ALL chat!";
pub const DEFAULT_REMINDER_MESSAGE: &str = "You have 30 seconds left to apologize for the teamkill!";
pub const DEFAULT_THANK_YOU_MESSAGE: &str = "Thank you for apologizing.";
pub const DEFAULT_APOLOGY_KEYWORDS: [&str; 5] = ["sorry", "sry", "apologies", "my bad", "forgive me"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTkWarnOptions {
    /// Sent to the attacker on a teamkill; disabling it also disables tracking
    #[serde(alias = "attackerMessage", skip_serializing_if = "Option::is_none")]
    pub attacker_message: Option<String>,
    /// Sent when the reminder deadline passes without an apology
    #[serde(alias = "reminderMessage")]
    pub reminder_message: String,
    /// Sent once to the victim, if set
    #[serde(alias = "victimMessage", skip_serializing_if = "Option::is_none")]
    pub victim_message: Option<String>,
    /// Substrings accepted as an apology, case-insensitive
    #[serde(alias = "apologyKeywords")]
    pub apology_keywords: Vec<String>,
    /// Sent when an apology is accepted
    #[serde(alias = "thankYouMessage")]
    pub thank_you_message: String,
}

impl Default for AutoTkWarnOptions {
    fn default() -> Self {
        Self {
            attacker_message: Some(DEFAULT_ATTACKER_MESSAGE.to_string()),
            reminder_message: DEFAULT_REMINDER_MESSAGE.to_string(),
            victim_message: None,
            apology_keywords: DEFAULT_APOLOGY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            thank_you_message: DEFAULT_THANK_YOU_MESSAGE.to_string(),
        }
    }
}

impl AutoTkWarnOptions {
    /// The attacker notice, or `None` when the warn/track path is switched off.
    pub fn attacker_message(&self) -> Option<&str> {
        non_empty(self.attacker_message.as_deref())
    }

    /// The victim notice, or `None` when victims are not notified.
    pub fn victim_message(&self) -> Option<&str> {
        non_empty(self.victim_message.as_deref())
    }
}

fn non_empty(message: Option<&str>) -> Option<&str> {
    message.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AutoTkWarnOptions::default();
        assert_eq!(options.attacker_message(), Some(DEFAULT_ATTACKER_MESSAGE));
        assert_eq!(options.victim_message(), None);
        assert_eq!(options.apology_keywords.len(), 5);
        assert_eq!(options.apology_keywords[0], "sorry");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options: AutoTkWarnOptions = toml::from_str(
            r#"
            victim_message = "You were killed by your own team."
            "#,
        )
        .unwrap();

        assert_eq!(options.victim_message(), Some("You were killed by your own team."));
        assert_eq!(options.attacker_message(), Some(DEFAULT_ATTACKER_MESSAGE));
        assert_eq!(options.thank_you_message, DEFAULT_THANK_YOU_MESSAGE);
    }

    #[test]
    fn test_camel_case_aliases() {
        let options: AutoTkWarnOptions = serde_json::from_str(
            r#"{"attackerMessage": "Say sorry", "apologyKeywords": ["oops"], "thankYouMessage": "ty"}"#,
        )
        .unwrap();

        assert_eq!(options.attacker_message(), Some("Say sorry"));
        assert_eq!(options.apology_keywords, vec!["oops".to_string()]);
        assert_eq!(options.thank_you_message, "ty");
    }

    #[test]
    fn test_empty_messages_disable_notices() {
        let options = AutoTkWarnOptions {
            attacker_message: Some(String::new()),
            victim_message: Some("   ".to_string()),
            ..AutoTkWarnOptions::default()
        };
        assert_eq!(options.attacker_message(), None);
        assert_eq!(options.victim_message(), None);
    }
}
