pub mod amortization;

pub use amortization::{build_schedule, calculate_monthly_payment};
