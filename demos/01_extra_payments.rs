/// extra payments - compare a baseline loan with an accelerated one
use mortgage_amortization_rs::{Decimal, MortgageInput, MortgageCalculator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loan = MortgageInput::builder()
        .principal(Decimal::from(250_000))
        .rate(Decimal::from(4))
        .term_years(30)
        .extra_monthly_payment(Decimal::from(200))
        .build()?;

    let summary = MortgageCalculator::new().summarize(&loan)?;

    println!(
        "paying {} + {} extra each month",
        summary.monthly_payment, summary.extra_monthly_payment
    );
    println!(
        "paid off in {} months instead of {} ({} months sooner)",
        summary.payoff_months,
        summary.baseline_months,
        summary.months_saved()
    );
    println!("interest saved: {}", summary.interest_saved);

    // first year and final month
    println!("{:>5} {:>10} {:>10} {:>10} {:>12}", "month", "interest", "principal", "extra", "balance");
    for row in summary.schedule.iter().take(12).chain(summary.final_row()) {
        println!(
            "{:>5} {:>10} {:>10} {:>10} {:>12}",
            row.month, row.interest_paid, row.principal_paid, row.extra_payment, row.remaining_balance
        );
    }

    Ok(())
}
