pub mod calculator;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod payments;
pub mod types;

// re-export key types
pub use calculator::{summarize, MortgageCalculator, MortgageInputBuilder};
pub use config::CalculatorConfig;
pub use decimal::{Money, Rate};
pub use errors::{MortgageError, Result};
pub use payments::{build_schedule, calculate_monthly_payment};
pub use types::{AmortizationRow, MortgageInput, MortgageSummary, ScheduleResult};

// re-export external dependencies that users will need
pub use rust_decimal::Decimal;
