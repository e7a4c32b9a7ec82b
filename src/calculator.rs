use log::debug;
use rust_decimal::Decimal;

use crate::config::CalculatorConfig;
use crate::decimal::Money;
use crate::errors::{MortgageError, Result};
use crate::payments::{build_schedule, calculate_monthly_payment};
use crate::types::{MortgageInput, MortgageSummary, ScheduleResult};

/// summary with the default configuration
pub fn summarize(input: &MortgageInput) -> Result<MortgageSummary> {
    MortgageCalculator::new().summarize(input)
}

/// Runs the payment formula and schedule builder for a mortgage.
///
/// Holds configuration only; every call computes from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MortgageCalculator {
    config: CalculatorConfig,
}

impl MortgageCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// fixed payment for the input, extra payment excluded
    pub fn monthly_payment(&self, input: &MortgageInput) -> Result<Money> {
        validate(input)?;
        calculate_monthly_payment(input.principal, input.annual_rate(), input.term_years)
    }

    /// accelerated schedule only
    pub fn schedule(&self, input: &MortgageInput) -> Result<ScheduleResult> {
        let payment = self.monthly_payment(input)?;
        build_schedule(
            input.principal,
            input.annual_rate(),
            input.term_years,
            payment,
            normalized_extra(input),
            &self.config,
        )
    }

    /// baseline and accelerated schedules folded into payoff statistics
    pub fn summarize(&self, input: &MortgageInput) -> Result<MortgageSummary> {
        let extra_monthly_payment = normalized_extra(input);
        let monthly_payment = self.monthly_payment(input)?;
        let rate = input.annual_rate();

        let baseline = build_schedule(
            input.principal,
            rate,
            input.term_years,
            monthly_payment,
            Money::ZERO,
            &self.config,
        )?;
        let scenario = build_schedule(
            input.principal,
            rate,
            input.term_years,
            monthly_payment,
            extra_monthly_payment,
            &self.config,
        )?;

        let interest_saved = baseline.total_interest - scenario.total_interest;

        debug!(
            "payoff in {} of {} months, interest saved {}",
            scenario.len(),
            baseline.len(),
            interest_saved
        );

        Ok(MortgageSummary {
            monthly_payment,
            extra_monthly_payment,
            payoff_months: scenario.len() as u32,
            baseline_months: baseline.len() as u32,
            total_interest: scenario.total_interest,
            total_paid: scenario.total_paid,
            interest_saved,
            schedule: scenario.schedule,
        })
    }
}

fn validate(input: &MortgageInput) -> Result<()> {
    if input.principal <= Decimal::ZERO {
        return Err(MortgageError::InvalidPrincipal {
            principal: input.principal,
        });
    }
    if input.annual_interest_rate < Decimal::ZERO {
        return Err(MortgageError::InvalidRate {
            rate: input.annual_interest_rate,
        });
    }
    Ok(())
}

fn normalized_extra(input: &MortgageInput) -> Money {
    Money::from_decimal(input.extra_monthly_payment.unwrap_or(Decimal::ZERO)).max(Money::ZERO)
}

/// builder for mortgage inputs
#[derive(Debug, Clone, Default)]
pub struct MortgageInputBuilder {
    principal: Option<Decimal>,
    rate: Option<Decimal>,
    term_years: Option<u32>,
    extra_monthly_payment: Option<Decimal>,
}

impl MortgageInputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Decimal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// annual rate as a percentage
    pub fn rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn term_years(mut self, years: u32) -> Self {
        self.term_years = Some(years);
        self
    }

    pub fn extra_monthly_payment(mut self, extra: Decimal) -> Self {
        self.extra_monthly_payment = Some(extra);
        self
    }

    pub fn build(self) -> Result<MortgageInput> {
        let principal = self.principal.ok_or(MortgageError::InvalidConfiguration {
            message: "Principal required".to_string(),
        })?;

        let rate = self.rate.ok_or(MortgageError::InvalidConfiguration {
            message: "Rate required".to_string(),
        })?;

        let term_years = self.term_years.ok_or(MortgageError::InvalidConfiguration {
            message: "Term required".to_string(),
        })?;

        Ok(MortgageInput {
            principal,
            annual_interest_rate: rate,
            term_years,
            extra_monthly_payment: self.extra_monthly_payment,
        })
    }
}

impl MortgageInput {
    pub fn builder() -> MortgageInputBuilder {
        MortgageInputBuilder::new()
    }
}
