/// json input - read a loan from json and print the summary as json
use mortgage_amortization_rs::{CalculatorConfig, MortgageCalculator, MortgageInput};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loan = MortgageInput::from_json(
        r#"{"principal": 60000, "annualInterestRate": 0, "termYears": 10, "extraMonthlyPayment": 100}"#,
    )?;
    let config = CalculatorConfig::from_json(r#"{"overrunMonths": 60}"#)?;

    let summary = MortgageCalculator::with_config(config).summarize(&loan)?;
    println!("{}", summary.json());

    Ok(())
}
