use serde::{Deserialize, Serialize};

use crate::errors::{MortgageError, Result};

pub const MONTHS_IN_YEAR: u32 = 12;

/// months allowed past the contractual term before the schedule loop gives up
pub const DEFAULT_OVERRUN_MONTHS: u32 = MONTHS_IN_YEAR * 10;

/// calculator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorConfig {
    /// iteration guard on top of `term_years * 12`
    pub overrun_months: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            overrun_months: DEFAULT_OVERRUN_MONTHS,
        }
    }
}

impl CalculatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CalculatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrun_months(mut self, months: u32) -> Self {
        self.overrun_months = months;
        self
    }

    /// maximum schedule length for a loan term
    pub fn max_months(&self, term_years: u32) -> u32 {
        term_years
            .saturating_mul(MONTHS_IN_YEAR)
            .saturating_add(self.overrun_months)
    }

    pub fn validate(&self) -> Result<()> {
        if self.overrun_months > MONTHS_IN_YEAR * 100 {
            return Err(MortgageError::InvalidConfiguration {
                message: format!(
                    "overrun of {} months exceeds the 100 year ceiling",
                    self.overrun_months
                ),
            });
        }
        Ok(())
    }
}
