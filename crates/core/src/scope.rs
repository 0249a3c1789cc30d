//! Workspace scopes.
//!
//! A scope identifies the isolated workspace a job or event belongs to:
//! either a single user's personal workspace or a team's shared one. Scopes
//! are owned by the surrounding application; this core only reads them to
//! derive partition keys.

use serde::{Deserialize, Serialize};

/// Which kind of workspace a scope points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeVariant {
    User,
    Team,
}

impl ScopeVariant {
    /// The exact token used in persisted keys (`USER` / `TEAM`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeVariant::User => "USER",
            ScopeVariant::Team => "TEAM",
        }
    }
}

/// A workspace partition: variant plus the id of the user or team it targets.
///
/// A job belongs to exactly one scope for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub variant: ScopeVariant,
    pub variant_target_id: String,
}

impl Scope {
    pub fn user(target_id: impl Into<String>) -> Self {
        Self {
            variant: ScopeVariant::User,
            variant_target_id: target_id.into(),
        }
    }

    pub fn team(target_id: impl Into<String>) -> Self {
        Self {
            variant: ScopeVariant::Team,
            variant_target_id: target_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_tokens_match_persisted_layout() {
        assert_eq!(ScopeVariant::User.as_str(), "USER");
        assert_eq!(ScopeVariant::Team.as_str(), "TEAM");
    }

    #[test]
    fn scope_serializes_with_wire_field_names() {
        let scope = Scope::team("alpha");
        let json = serde_json::to_value(&scope).expect("serialization should succeed");
        assert_eq!(json["variant"], "TEAM");
        assert_eq!(json["variantTargetId"], "alpha");
    }
}
