//! Prompt templates for each response strategy
//!
//! Pure functions of the current profile snapshot. Interpolation rules are
//! uniform across templates: missing scalars render as "Not specified",
//! empty goal lists as "None specified", and maps as serialized JSON
//! (including "{}" when empty). Interpolated values are not escaped, so user
//! text flows into the prompt verbatim.

use std::collections::BTreeMap;

use crate::classifier::Strategy;
use crate::models::{BudgetInfo, UserProfile};

/// Render the prompt for a strategy over the current profile snapshot.
///
/// `message` is only embedded by the general-query template; the four
/// specialised templates are built from accumulated state alone.
pub fn render(
    strategy: Strategy,
    profile: &UserProfile,
    budget: &BudgetInfo,
    message: &str,
) -> String {
    match strategy {
        Strategy::BudgetBreakdown => budget_breakdown(profile, budget),
        Strategy::Savings => savings_strategies(budget),
        Strategy::Investment => investment_advice(budget),
        Strategy::Debt => debt_management(budget),
        Strategy::General => general_query(budget, message),
    }
}

fn scalar<T: ToString>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "Not specified".to_string(),
    }
}

fn goal_list(goals: &[String]) -> String {
    if goals.is_empty() {
        "None specified".to_string()
    } else {
        goals.join(", ")
    }
}

fn map_json(map: &BTreeMap<String, f64>) -> String {
    serde_json::to_value(map)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "{}".to_string())
}

fn budget_breakdown(profile: &UserProfile, budget: &BudgetInfo) -> String {
    format!(
        "Create a detailed monthly budget breakdown for someone with a monthly income of {income} in {currency}.\n\
         \n\
         Current expenses: {expenses}\n\
         Savings goals: {goals}\n\
         Investment preferences: {preferences}\n\
         Debt information: {debts}\n\
         \n\
         Provide a breakdown of:\n\
         1. Essential expenses (housing, utilities, groceries, etc.)\n\
         2. Discretionary spending\n\
         3. Savings allocation\n\
         4. Debt payments\n\
         5. Investment contributions\n\
         \n\
         For each category, suggest specific strategies to optimize spending and maximize savings.\n\
         Include tips for reducing expenses and increasing savings.",
        income = scalar(&budget.monthly_income),
        currency = profile.currency(),
        expenses = map_json(&budget.monthly_expenses),
        goals = goal_list(&budget.savings_goals),
        preferences = scalar(&budget.investment_preferences),
        debts = map_json(&budget.debt_info),
    )
}

fn savings_strategies(budget: &BudgetInfo) -> String {
    format!(
        "Suggest personalized savings strategies based on:\n\
         Monthly income: {income}\n\
         Current expenses: {expenses}\n\
         Savings goals: {goals}\n\
         \n\
         Include:\n\
         1. Recommended savings rate based on income\n\
         2. Specific areas where expenses can be reduced\n\
         3. High-yield savings account recommendations\n\
         4. Automated savings strategies\n\
         5. Emergency fund recommendations\n\
         6. Tips for staying motivated to save",
        income = scalar(&budget.monthly_income),
        expenses = map_json(&budget.monthly_expenses),
        goals = goal_list(&budget.savings_goals),
    )
}

fn investment_advice(budget: &BudgetInfo) -> String {
    format!(
        "Provide investment advice based on:\n\
         Monthly income: {income}\n\
         Investment preferences: {preferences}\n\
         Savings goals: {goals}\n\
         \n\
         Include:\n\
         1. Recommended investment allocation\n\
         2. Risk assessment\n\
         3. Investment vehicle suggestions\n\
         4. Tax-advantaged account recommendations\n\
         5. Long-term investment strategies\n\
         6. Common investment mistakes to avoid",
        income = scalar(&budget.monthly_income),
        preferences = scalar(&budget.investment_preferences),
        goals = goal_list(&budget.savings_goals),
    )
}

fn debt_management(budget: &BudgetInfo) -> String {
    format!(
        "Provide debt management strategies based on:\n\
         Debt information: {debts}\n\
         Monthly income: {income}\n\
         \n\
         Include:\n\
         1. Debt payoff prioritization\n\
         2. Debt consolidation options\n\
         3. Negotiation strategies with creditors\n\
         4. Budget adjustments to accelerate debt payoff\n\
         5. Emergency fund considerations\n\
         6. Warning signs of problematic debt",
        debts = map_json(&budget.debt_info),
        income = scalar(&budget.monthly_income),
    )
}

fn general_query(budget: &BudgetInfo, message: &str) -> String {
    format!(
        "You are a helpful budget assistant. The user has provided the following information:\n\
         Monthly income: {income}\n\
         Current expenses: {expenses}\n\
         Savings goals: {goals}\n\
         \n\
         Please provide a helpful response to: {message}\n\
         \n\
         Focus on:\n\
         1. Budget management\n\
         2. Savings strategies\n\
         3. Investment opportunities\n\
         4. Debt management\n\
         5. Financial planning",
        income = scalar(&budget.monthly_income),
        expenses = map_json(&budget.monthly_expenses),
        goals = goal_list(&budget.savings_goals),
        message = message,
    )
}
