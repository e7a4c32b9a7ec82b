use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::Result;

/// loan parameters supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageInput {
    /// loan amount
    pub principal: Decimal,
    /// annual rate as a percentage (5 means 5%)
    pub annual_interest_rate: Decimal,
    pub term_years: u32,
    /// additional principal paid every month; absent means none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_monthly_payment: Option<Decimal>,
}

impl MortgageInput {
    pub fn new(principal: Decimal, annual_interest_rate: Decimal, term_years: u32) -> Self {
        Self {
            principal,
            annual_interest_rate,
            term_years,
            extra_monthly_payment: None,
        }
    }

    pub fn with_extra_payment(mut self, extra: Decimal) -> Self {
        self.extra_monthly_payment = Some(extra);
        self
    }

    /// parse the camelCase json shape used by the presentation layer
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn annual_rate(&self) -> Rate {
        Rate::from_percentage(self.annual_interest_rate)
    }
}

/// one month of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub month: u32,
    pub interest_paid: Money,
    /// principal covered by the regular payment
    pub principal_paid: Money,
    /// principal covered by the extra payment
    pub extra_payment: Money,
    pub total_payment: Money,
    pub remaining_balance: Money,
}

impl AmortizationRow {
    /// total principal retired this month
    pub fn principal_reduction(&self) -> Money {
        self.principal_paid + self.extra_payment
    }
}

/// output of a single schedule run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub schedule: Vec<AmortizationRow>,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl ScheduleResult {
    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// row for a 1-based month number
    pub fn row(&self, month: u32) -> Option<&AmortizationRow> {
        month
            .checked_sub(1)
            .and_then(|idx| self.schedule.get(idx as usize))
    }

    /// remaining balance after the given month, zero once the loan is gone
    pub fn balance_after(&self, month: u32) -> Option<Money> {
        if month as usize > self.schedule.len() {
            return self.schedule.last().map(|r| r.remaining_balance);
        }
        self.row(month).map(|r| r.remaining_balance)
    }

    pub fn is_paid_off(&self) -> bool {
        self.schedule
            .last()
            .map(|r| r.remaining_balance.is_zero())
            .unwrap_or(false)
    }
}

/// payoff statistics for an accelerated scenario against its baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageSummary {
    /// fixed payment excluding extra
    pub monthly_payment: Money,
    pub extra_monthly_payment: Money,
    pub payoff_months: u32,
    pub baseline_months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub interest_saved: Money,
    pub schedule: Vec<AmortizationRow>,
}

impl MortgageSummary {
    pub fn months_saved(&self) -> u32 {
        self.baseline_months.saturating_sub(self.payoff_months)
    }

    pub fn final_row(&self) -> Option<&AmortizationRow> {
        self.schedule.last()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// alias for to_json_pretty
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}
