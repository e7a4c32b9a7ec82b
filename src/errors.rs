use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum MortgageError {
    #[error("invalid principal: {principal} must be greater than zero")]
    InvalidPrincipal {
        principal: Decimal,
    },

    #[error("invalid interest rate: {rate}% cannot be negative")]
    InvalidRate {
        rate: Decimal,
    },

    #[error("invalid loan term: {term_years} years must be greater than zero")]
    InvalidTerm {
        term_years: u32,
    },

    #[error("payment insufficient in month {month}: payment {payment} does not cover interest {interest}")]
    InsufficientPayment {
        month: u32,
        payment: Money,
        interest: Money,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MortgageError>;
