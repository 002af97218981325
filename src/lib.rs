//! Budget Assistant
//!
//! A single-user budgeting chatbot service that:
//! - Routes free-text messages to one of five response strategies
//! - Accumulates financial context (income, expenses, goals, debts) per session
//! - Renders strategy prompts over the accumulated profile
//! - Calls the Gemini API for the final response text
//! - Persists the profile to a single JSON document on request
//!
//! PIPELINE:
//! MESSAGE → EXTRACT → ROUTE → RENDER → GENERATE → LOG

pub mod api;
pub mod assistant;
pub mod classifier;
pub mod error;
pub mod gemini;
pub mod models;
pub mod prompts;
pub mod session;

pub use error::Result;

// Re-export common types
pub use assistant::BudgetAssistant;
pub use classifier::{classify, extract_monthly_income, Strategy};
pub use models::*;
