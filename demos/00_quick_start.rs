/// quick start - monthly payment and payoff for a 30 year loan
use mortgage_amortization_rs::{summarize, Decimal, MortgageInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // $300,000 at 5% over 30 years
    let loan = MortgageInput::new(Decimal::from(300_000), Decimal::from(5), 30);
    let summary = summarize(&loan)?;

    println!("monthly payment: {}", summary.monthly_payment);
    println!("payoff months:   {}", summary.payoff_months);
    println!("total interest:  {}", summary.total_interest);
    println!("total paid:      {}", summary.total_paid);

    Ok(())
}
