//! Message routing and income extraction
//!
//! Routes each raw message to one of five response strategies via an ordered
//! keyword table, and opportunistically pulls a monthly income figure out of
//! the text ("I make 5k per month" → 5000).

use regex::Regex;
use std::sync::OnceLock;

/// Response strategy selected for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    BudgetBreakdown,
    Savings,
    Investment,
    Debt,
    General,
}

/// Ordered routing table — scanned top to bottom, first match wins.
///
/// A message containing both "budget" and "debt" routes to the budget
/// breakdown because that row comes first.
pub const ROUTES: &[(&[&str], Strategy)] = &[
    (&["budget", "breakdown"], Strategy::BudgetBreakdown),
    (&["save", "savings"], Strategy::Savings),
    (&["invest", "investment"], Strategy::Investment),
    (&["debt"], Strategy::Debt),
];

/// Select a strategy by case-insensitive substring containment.
pub fn classify(message: &str) -> Strategy {
    let message = message.to_lowercase();

    for (keywords, strategy) in ROUTES {
        if keywords.iter().any(|kw| message.contains(kw)) {
            return *strategy;
        }
    }

    Strategy::General
}

/// Integer immediately followed by an income-per-month marker, whitespace
/// optional. Alternation order matters: "k" also covers the "k/month" form.
static INCOME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn income_pattern() -> &'static Regex {
    INCOME_PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\s*(?:k|thousand|k/month|per month)")
            .expect("income pattern is valid")
    })
}

/// Extract a monthly income figure from free text.
///
/// The captured integer is in thousands, so "5k" and "5 thousand" both
/// yield 5000. No sign or magnitude validation is applied.
pub fn extract_monthly_income(message: &str) -> Option<i64> {
    let message = message.to_lowercase();

    income_pattern()
        .captures(&message)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .map(|n| n * 1000)
}
