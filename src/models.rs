//! Core data models for the budget assistant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

//
// ================= Profile =================
//

/// Basic identity information for the user.
///
/// Every field is independently optional; updates never clear a field that
/// was already set (see [`crate::assistant::BudgetAssistant::update_profile`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_currency: Option<String>,
}

impl UserProfile {
    /// Currency used when rendering prompts; falls back to USD.
    pub fn currency(&self) -> &str {
        self.preferred_currency.as_deref().unwrap_or("USD")
    }
}

//
// ================= Budget =================
//

/// The running budget record accumulated across the conversation.
///
/// Maps use `BTreeMap` so serialized forms (and the prompts rendered from
/// them) are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetInfo {
    pub monthly_income: Option<i64>,
    #[serde(default)]
    pub monthly_expenses: BTreeMap<String, f64>,
    #[serde(default)]
    pub savings_goals: Vec<String>,
    pub investment_preferences: Option<String>,
    #[serde(default)]
    pub debt_info: BTreeMap<String, f64>,
}

//
// ================= Updates =================
//

/// Partial identity update. Absent or empty fields leave existing values
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub preferred_currency: Option<String>,
}

/// Partial budget update.
///
/// Income and investment preferences are last-write-wins; expense and debt
/// maps are merged into the existing record; savings goals are replaced
/// wholesale when non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdate {
    pub monthly_income: Option<i64>,
    pub expenses: Option<BTreeMap<String, f64>>,
    pub savings_goals: Option<SavingsGoals>,
    pub investment_preferences: Option<String>,
    pub debt_info: Option<BTreeMap<String, f64>>,
}

/// Savings goals arrive either as a single string or a list of strings; a
/// single value is normalized into a one-element list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SavingsGoals {
    One(String),
    Many(Vec<String>),
}

impl SavingsGoals {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SavingsGoals::One(goal) => vec![goal],
            SavingsGoals::Many(goals) => goals,
        }
    }
}

impl From<&str> for SavingsGoals {
    fn from(goal: &str) -> Self {
        SavingsGoals::One(goal.to_string())
    }
}

impl From<Vec<String>> for SavingsGoals {
    fn from(goals: Vec<String>) -> Self {
        SavingsGoals::Many(goals)
    }
}

//
// ================= Conversation =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the conversation log. The log is append-only and retained for
/// the session lifetime; it is never replayed into prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_fallback() {
        let profile = UserProfile::default();
        assert_eq!(profile.currency(), "USD");

        let profile = UserProfile {
            preferred_currency: Some("EUR".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.currency(), "EUR");
    }

    #[test]
    fn test_savings_goals_normalization() {
        let one: SavingsGoals = serde_json::from_str(r#""emergency fund""#).unwrap();
        assert_eq!(one.into_vec(), vec!["emergency fund".to_string()]);

        let many: SavingsGoals = serde_json::from_str(r#"["house", "car"]"#).unwrap();
        assert_eq!(
            many.into_vec(),
            vec!["house".to_string(), "car".to_string()]
        );
    }

    #[test]
    fn test_budget_info_roundtrip() {
        let mut budget = BudgetInfo::default();
        budget.monthly_income = Some(5000);
        budget.monthly_expenses.insert("rent".to_string(), 1500.0);
        budget.savings_goals.push("vacation".to_string());

        let json = serde_json::to_string(&budget).unwrap();
        let back: BudgetInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, back);
    }

    #[test]
    fn test_chat_turn_roles() {
        let user = ChatTurn::user("hello");
        let agent = ChatTurn::assistant("hi there");
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(agent.role, ChatRole::Assistant);
        assert_eq!(user.role.to_string(), "user");
    }
}
