use log::{debug, trace, warn};
use rust_decimal::Decimal;

use crate::config::{CalculatorConfig, MONTHS_IN_YEAR};
use crate::decimal::{Money, Rate};
use crate::errors::{MortgageError, Result};
use crate::types::{AmortizationRow, ScheduleResult};

/// Fixed monthly payment that repays `principal` over `term_years`.
///
/// `payment = P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r` the monthly rate,
/// or `P / n` when the rate is zero. Rounded half away from zero to cents.
pub fn calculate_monthly_payment(principal: Decimal, annual_rate: Rate, term_years: u32) -> Result<Money> {
    let months = term_months(term_years)?;
    let monthly_rate = annual_rate.monthly_rate();

    if monthly_rate.is_zero() {
        return Ok(even_split(principal, months));
    }

    let r = monthly_rate.as_decimal();
    let periodic_interest = principal
        .checked_mul(r)
        .ok_or_else(|| overflow("monthly payment"))?;
    let payment = match compound_factor(r, months) {
        Some(compound) => match compound.checked_div(compound - Decimal::ONE) {
            Some(annuity) => periodic_interest
                .checked_mul(annuity)
                .map(Money::from_decimal)
                .ok_or_else(|| overflow("monthly payment"))?,
            None => even_split(principal, months),
        },
        // (1 + r)^n beyond decimal range: the annuity ratio is 1 to well below a cent
        None => Money::from_decimal(periodic_interest),
    };

    debug!(
        "monthly payment {} for principal {} at {} over {} months",
        payment, principal, annual_rate, months
    );
    Ok(payment)
}

/// Month-by-month schedule paying `base_payment + extra_payment` until the balance is gone.
///
/// The final month is clamped to the outstanding balance. In that month the extra
/// column only carries what the regular payment could not cover, so the split between
/// the two columns is never overstated.
pub fn build_schedule(
    principal: Decimal,
    annual_rate: Rate,
    term_years: u32,
    base_payment: Money,
    extra_payment: Money,
    config: &CalculatorConfig,
) -> Result<ScheduleResult> {
    let monthly_rate = annual_rate.monthly_rate();
    let payment_with_extra = base_payment
        .checked_add(extra_payment)
        .ok_or_else(|| overflow("payment with extra"))?;
    let max_months = config.max_months(term_years);

    let mut balance = Money::from_decimal(principal);
    let mut schedule = Vec::new();
    let mut total_interest = Money::ZERO;
    let mut total_paid = Money::ZERO;
    let mut month = 1;

    while balance.is_positive() && month <= max_months {
        let interest = balance
            .interest_at(monthly_rate)
            .ok_or_else(|| overflow("monthly interest"))?;
        let mut principal_payment = payment_with_extra - interest;
        let mut applied_extra = extra_payment;

        if !principal_payment.is_positive() {
            return Err(MortgageError::InsufficientPayment {
                month,
                payment: payment_with_extra,
                interest,
            });
        }

        if principal_payment > balance {
            let base_principal = base_payment - interest;
            let left_after_base = (balance - base_principal).max(Money::ZERO);

            principal_payment = balance;
            applied_extra = extra_payment.min(left_after_base);
        }

        applied_extra = applied_extra.min(principal_payment);
        let regular_principal = (principal_payment - applied_extra).max(Money::ZERO);

        balance -= principal_payment;
        let total_payment = interest
            .checked_add(principal_payment)
            .ok_or_else(|| overflow("total payment"))?;

        trace!(
            "month {}: interest {}, principal {}, extra {}, balance {}",
            month, interest, regular_principal, applied_extra, balance
        );

        schedule.push(AmortizationRow {
            month,
            interest_paid: interest,
            principal_paid: regular_principal,
            extra_payment: applied_extra,
            total_payment,
            remaining_balance: balance.max(Money::ZERO),
        });

        total_interest = total_interest
            .checked_add(interest)
            .ok_or_else(|| overflow("total interest"))?;
        total_paid = total_paid
            .checked_add(total_payment)
            .ok_or_else(|| overflow("total paid"))?;
        month += 1;
    }

    if balance.is_positive() {
        warn!(
            "schedule stopped at the {} month guard with {} still outstanding",
            max_months, balance
        );
    }

    debug!(
        "schedule of {} months, total interest {}, total paid {}",
        schedule.len(),
        total_interest,
        total_paid
    );

    Ok(ScheduleResult {
        schedule,
        total_interest,
        total_paid,
    })
}

fn term_months(term_years: u32) -> Result<u32> {
    term_years
        .checked_mul(MONTHS_IN_YEAR)
        .filter(|months| *months > 0)
        .ok_or(MortgageError::InvalidTerm { term_years })
}

fn overflow(what: &str) -> MortgageError {
    MortgageError::CalculationError {
        message: format!("{} exceeds the decimal range", what),
    }
}

fn even_split(principal: Decimal, months: u32) -> Money {
    Money::from_decimal(principal / Decimal::from(months))
}

/// (1 + r)^n by repeated squaring, or None if it leaves the decimal range
fn compound_factor(r: Decimal, n: u32) -> Option<Decimal> {
    let mut base = Decimal::ONE.checked_add(r)?;
    let mut exp = n;
    let mut compound = Decimal::ONE;
    while exp > 0 {
        if exp & 1 == 1 {
            compound = compound.checked_mul(base)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)?;
        }
    }
    Some(compound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn rate(p: Decimal) -> Rate {
        Rate::from_percentage(p)
    }

    fn schedule(principal: Decimal, annual: Decimal, years: u32, extra: Money) -> ScheduleResult {
        let payment = calculate_monthly_payment(principal, rate(annual), years).unwrap();
        build_schedule(principal, rate(annual), years, payment, extra, &CalculatorConfig::default()).unwrap()
    }

    #[test]
    fn test_standard_fixed_rate_payment() {
        let payment = calculate_monthly_payment(dec!(300000), rate(dec!(5)), 30).unwrap();
        assert_eq!(payment, Money::from_str_exact("1610.46").unwrap());

        let payment = calculate_monthly_payment(dec!(250000), rate(dec!(4)), 30).unwrap();
        assert_eq!(payment, Money::from_str_exact("1193.54").unwrap());
    }

    #[test]
    fn test_zero_rate_payment_splits_evenly() {
        let payment = calculate_monthly_payment(dec!(120000), Rate::ZERO, 15).unwrap();
        assert_eq!(payment, Money::from_str_exact("666.67").unwrap());

        let payment = calculate_monthly_payment(dec!(60000), Rate::ZERO, 10).unwrap();
        assert_eq!(payment, Money::from_major(500));
    }

    #[test]
    fn test_zero_term_is_rejected() {
        let err = calculate_monthly_payment(dec!(100000), rate(dec!(5)), 0).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidTerm { term_years: 0 }));
    }

    #[test]
    fn test_huge_rate_does_not_overflow() {
        // (1.5)^360 is far outside the decimal range
        let payment = calculate_monthly_payment(dec!(100000), rate(dec!(600)), 30).unwrap();
        assert_eq!(payment, Money::from_major(50_000));
    }

    #[test]
    fn test_oversized_principal_fails_instead_of_overflowing() {
        let err = calculate_monthly_payment(dec!(70000000000000000000000000000), rate(dec!(1500)), 30).unwrap_err();
        assert!(matches!(err, MortgageError::CalculationError { .. }));
        assert_eq!(err.to_string(), "calculation error: monthly payment exceeds the decimal range");
    }

    #[test]
    fn test_compound_factor_matches_repeated_multiplication() {
        assert_eq!(compound_factor(dec!(0.5), 0), Some(Decimal::ONE));
        assert_eq!(compound_factor(dec!(0.5), 1), Some(dec!(1.5)));
        assert_eq!(compound_factor(dec!(1), 10), Some(dec!(1024)));
        assert_eq!(compound_factor(dec!(0.1), 5), Some(dec!(1.61051)));
        assert_eq!(compound_factor(dec!(1), 97), None);
    }

    #[test]
    fn test_long_term_near_zero_rate_is_fast() {
        // a few hundred million months; needs logarithmic work to finish
        let tiny = Rate::from_percentage(dec!(0.0000000000000000000000001));
        let payment = calculate_monthly_payment(dec!(100000), tiny, 300_000_000).unwrap();
        assert!(payment < Money::CENT);
    }

    #[test]
    fn test_huge_extra_payment_fails_instead_of_overflowing() {
        let err = build_schedule(
            dec!(1000),
            rate(dec!(5)),
            1,
            Money::from_str_exact("85.61").unwrap(),
            Money::from_decimal(Decimal::MAX),
            &CalculatorConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MortgageError::CalculationError { .. }));
    }

    #[test]
    fn test_interest_overflow_is_reported() {
        // 2400% a year is 200% a month on a balance near the decimal ceiling
        let err = build_schedule(
            dec!(50000000000000000000000000000),
            rate(dec!(2400)),
            1,
            Money::from_major(1),
            Money::ZERO,
            &CalculatorConfig::default(),
        )
        .unwrap_err();
        match err {
            MortgageError::CalculationError { message } => assert_eq!(message, "monthly interest exceeds the decimal range"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_running_total_overflow_is_reported() {
        // month one pays 7.8e28, month two pushes the running total past the ceiling
        let err = build_schedule(
            dec!(75000000000000000000000000000),
            rate(dec!(120)),
            1,
            Money::from_decimal(dec!(78000000000000000000000000000)),
            Money::ZERO,
            &CalculatorConfig::default(),
        )
        .unwrap_err();
        match err {
            MortgageError::CalculationError { message } => assert_eq!(message, "total paid exceeds the decimal range"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_schedule_runs_full_term() {
        let result = schedule(dec!(250000), dec!(4), 30, Money::ZERO);

        assert_eq!(result.len(), 360);
        assert!(result.is_paid_off());
        assert!(result.total_interest > Money::ZERO);

        let first = result.row(1).unwrap();
        assert_eq!(first.interest_paid, Money::from_str_exact("833.33").unwrap());
        assert_eq!(first.principal_paid, Money::from_str_exact("360.21").unwrap());
        assert_eq!(first.extra_payment, Money::ZERO);
    }

    #[test]
    fn test_rows_reconcile() {
        let result = schedule(dec!(250000), dec!(4), 30, Money::from_major(200));

        let mut retired = Money::ZERO;
        for row in &result.schedule {
            assert_eq!(row.total_payment, row.interest_paid + row.principal_paid + row.extra_payment);
            assert!(row.principal_paid + row.extra_payment <= row.total_payment);
            assert!(!row.remaining_balance.is_negative());
            retired += row.principal_reduction();
        }
        assert_eq!(retired, Money::from_major(250_000));

        let interest: Money = result
            .schedule
            .iter()
            .fold(Money::ZERO, |acc, r| acc + r.interest_paid);
        assert_eq!(interest, result.total_interest);
    }

    #[test]
    fn test_months_are_sequential() {
        let result = schedule(dec!(50000), dec!(6.5), 5, Money::from_major(75));
        for (idx, row) in result.schedule.iter().enumerate() {
            assert_eq!(row.month as usize, idx + 1);
        }
    }

    #[test]
    fn test_final_month_extra_not_needed() {
        // 1000 / 12 -> 83.33 regular, 133.33 with extra
        let result = schedule(dec!(1000), dec!(0), 1, Money::from_major(50));

        assert_eq!(result.len(), 8);
        let last = result.row(8).unwrap();
        assert_eq!(last.principal_paid, Money::from_str_exact("66.69").unwrap());
        assert_eq!(last.extra_payment, Money::ZERO);
        assert_eq!(last.total_payment, Money::from_str_exact("66.69").unwrap());
        assert_eq!(last.remaining_balance, Money::ZERO);
    }

    #[test]
    fn test_final_month_extra_partially_needed() {
        // five months of 183.33 leaves 83.35; the regular 83.33 leaves two cents for the extra column
        let result = schedule(dec!(1000), dec!(0), 1, Money::from_major(100));

        assert_eq!(result.len(), 6);
        let last = result.row(6).unwrap();
        assert_eq!(last.principal_paid, Money::from_str_exact("83.33").unwrap());
        assert_eq!(last.extra_payment, Money::from_cents(2));
        assert_eq!(last.total_payment, Money::from_str_exact("83.35").unwrap());
        assert_eq!(last.remaining_balance, Money::ZERO);
    }

    #[test]
    fn test_rounding_remainder_adds_a_month() {
        // 12 x 83.33 = 999.96, the last four cents spill into month 13
        let result = schedule(dec!(1000), dec!(0), 1, Money::ZERO);

        assert_eq!(result.len(), 13);
        let last = result.row(13).unwrap();
        assert_eq!(last.principal_paid, Money::from_cents(4));
        assert_eq!(last.total_payment, Money::from_cents(4));
        assert_eq!(result.total_paid, Money::from_major(1000));
    }

    #[test]
    fn test_insufficient_payment_fails_in_first_month() {
        let err = build_schedule(
            dec!(100000),
            rate(dec!(12)),
            30,
            Money::from_major(500),
            Money::ZERO,
            &CalculatorConfig::default(),
        )
        .unwrap_err();

        match err {
            MortgageError::InsufficientPayment { month, payment, interest } => {
                assert_eq!(month, 1);
                assert_eq!(payment, Money::from_major(500));
                assert_eq!(interest, Money::from_major(1_000));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_payment_rounding_to_zero_is_insufficient() {
        let payment = calculate_monthly_payment(dec!(0.01), rate(dec!(5)), 30).unwrap();
        assert_eq!(payment, Money::ZERO);

        let err = build_schedule(dec!(0.01), rate(dec!(5)), 30, payment, Money::ZERO, &CalculatorConfig::default())
            .unwrap_err();
        assert!(matches!(err, MortgageError::InsufficientPayment { month: 1, .. }));
    }

    #[test]
    fn test_iteration_guard_truncates_schedule() {
        let result = build_schedule(
            dec!(1000),
            Rate::ZERO,
            1,
            Money::from_major(1),
            Money::ZERO,
            &CalculatorConfig::default(),
        )
        .unwrap();

        assert_eq!(result.len(), 132);
        assert!(!result.is_paid_off());
        assert_eq!(result.balance_after(132), Some(Money::from_major(868)));
    }

    #[test]
    fn test_iteration_guard_follows_config() {
        let config = CalculatorConfig::default().with_overrun_months(0);
        let result = build_schedule(dec!(1000), Rate::ZERO, 1, Money::from_major(1), Money::ZERO, &config).unwrap();
        assert_eq!(result.len(), 12);
    }
}
