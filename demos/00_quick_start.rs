/// quick start - price a loan and print its repayment schedule
use chrono::NaiveDate;
use loan_servicing_rs::{generate_schedule, LoanTerms, Money, PaymentFrequency, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a $12,000 loan at 12% over 12 months, paid monthly
    let terms = LoanTerms {
        principal: Money::from_major(12_000),
        annual_rate: Rate::from_percentage(dec!(12)),
        tenure_months: 12,
        payment_frequency: PaymentFrequency::Monthly,
        first_payment_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    };

    let schedule = generate_schedule(&terms)?;

    println!("payments:       {}", schedule.num_payments());
    println!("total interest: {}", schedule.total_interest);
    println!("total payment:  {}", schedule.total_payment);
    println!();
    println!("  #  due date     principal  interest     total    balance");
    for entry in &schedule.entries {
        println!(
            "{:>3}  {}  {:>9}  {:>8}  {:>8}  {:>9}",
            entry.payment_number,
            entry.due_date,
            entry.principal_due,
            entry.interest_due,
            entry.total_due,
            entry.remaining_balance_after,
        );
    }

    Ok(())
}
