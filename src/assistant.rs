//! The budget assistant pipeline
//!
//! Owns one user's profile, budget record and conversation log, and runs the
//! extract → route → render → generate pipeline over incoming messages.
//!
//! PIPELINE:
//! MESSAGE → EXTRACT INCOME → SELECT STRATEGY → RENDER PROMPT → GENERATE → LOG

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::classifier::{self, Strategy};
use crate::error::Result;
use crate::gemini::TextGenerator;
use crate::models::{BudgetInfo, BudgetUpdate, ChatTurn, ProfileUpdate, UserProfile};
use crate::prompts;

/// Returned when a budget breakdown is requested before income is known.
pub const INCOME_REQUIRED: &str = "Please provide your monthly income first.";
/// Returned when debt advice is requested before any debt is recorded.
pub const DEBT_REQUIRED: &str = "Please provide your debt information first.";

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const BUDGET_UPDATED: &str = "Budget information updated successfully!";
pub const PROFILE_SAVED: &str = "User profile saved successfully!";
pub const PROFILE_LOADED: &str = "User profile loaded successfully!";
pub const PROFILE_MISSING: &str = "No profile found. Let's create a new one!";

/// One user's assistant: profile, budget record and conversation log.
///
/// Created empty and kept for the session lifetime. The log is append-only
/// and unbounded.
#[derive(Debug, Default)]
pub struct BudgetAssistant {
    profile: UserProfile,
    budget: BudgetInfo,
    history: Vec<ChatTurn>,
}

/// On-disk shape of a saved profile: one JSON document, two top-level keys.
#[derive(Serialize, Deserialize)]
struct ProfileDocument {
    profile: UserProfile,
    budget_info: BudgetInfo,
}

impl BudgetAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn budget_info(&self) -> &BudgetInfo {
        &self.budget
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Run one message through the pipeline.
    ///
    /// The raw message is logged as a user turn before classification and the
    /// produced text as an assistant turn after, including the two
    /// precondition short-circuit messages, which are returned as if they had
    /// been generated. A classified generation failure propagates to the
    /// caller; only the user turn has been logged in that case.
    pub async fn process_message(
        &mut self,
        message: &str,
        generator: &dyn TextGenerator,
    ) -> Result<String> {
        self.history.push(ChatTurn::user(message));

        if let Some(income) = classifier::extract_monthly_income(message) {
            info!(income, "extracted monthly income from message");
            self.budget.monthly_income = Some(income);
        }

        let strategy = classifier::classify(message);
        info!(?strategy, "routing message");

        let response = match strategy {
            Strategy::BudgetBreakdown if self.budget.monthly_income.is_none() => {
                INCOME_REQUIRED.to_string()
            }
            Strategy::Debt if self.budget.debt_info.is_empty() => DEBT_REQUIRED.to_string(),
            _ => {
                let prompt = prompts::render(strategy, &self.profile, &self.budget, message);
                generator.generate(&prompt).await?
            }
        };

        self.history.push(ChatTurn::assistant(response.clone()));

        Ok(response)
    }

    /// Partial identity update. Absent or empty fields leave existing values
    /// untouched; an update never clears anything.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> &'static str {
        if let Some(name) = update.name.filter(|n| !n.is_empty()) {
            self.profile.name = Some(name);
        }
        if let Some(age) = update.age {
            self.profile.age = Some(age);
        }
        if let Some(currency) = update.preferred_currency.filter(|c| !c.is_empty()) {
            self.profile.preferred_currency = Some(currency);
        }

        PROFILE_UPDATED
    }

    /// Merge a budget update into the running record.
    ///
    /// Income and investment preferences are last-write-wins; expenses and
    /// debts merge key-by-key (same key → new value wins); savings goals are
    /// replaced wholesale when the update carries any.
    pub fn set_budget_info(&mut self, update: BudgetUpdate) -> &'static str {
        if let Some(income) = update.monthly_income {
            self.budget.monthly_income = Some(income);
        }
        if let Some(expenses) = update.expenses {
            self.budget.monthly_expenses.extend(expenses);
        }
        if let Some(goals) = update.savings_goals {
            let goals = goals.into_vec();
            if !goals.is_empty() {
                self.budget.savings_goals = goals;
            }
        }
        if let Some(preferences) = update.investment_preferences.filter(|p| !p.is_empty()) {
            self.budget.investment_preferences = Some(preferences);
        }
        if let Some(debts) = update.debt_info {
            self.budget.debt_info.extend(debts);
        }

        BUDGET_UPDATED
    }

    /// Serialize profile and budget to one JSON document, overwriting the
    /// file unconditionally.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<&'static str> {
        let document = ProfileDocument {
            profile: self.profile.clone(),
            budget_info: self.budget.clone(),
        };

        fs::write(path.as_ref(), serde_json::to_string(&document)?)?;
        info!(path = %path.as_ref().display(), "profile saved");

        Ok(PROFILE_SAVED)
    }

    /// Replace profile and budget wholesale from a saved document.
    ///
    /// A missing file is the friendly starting-fresh outcome; any other I/O
    /// or parse failure propagates.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&'static str> {
        let raw = match fs::read_to_string(path.as_ref()) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.as_ref().display(), "no saved profile");
                return Ok(PROFILE_MISSING);
            }
            Err(e) => return Err(e.into()),
        };

        let document: ProfileDocument = serde_json::from_str(&raw)?;
        self.profile = document.profile;
        self.budget = document.budget_info;
        info!(path = %path.as_ref().display(), "profile loaded");

        Ok(PROFILE_LOADED)
    }
}
