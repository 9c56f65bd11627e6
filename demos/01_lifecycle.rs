/// lifecycle - create, approve, penalize, pay, cancel, pay off, cash out
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use loan_servicing_rs::{
    Account, EarningsLedger, InMemoryAccountDirectory, LoanServicer, LoanStatus, LoanTerms,
    LoanView, Money, PaymentFrequency, Rate, SafeTimeProvider, ServicingConfig, TimeSource,
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan servicing lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    // account directory with a commissioned agent
    let agent_id = Uuid::new_v4();
    let mut directory = InMemoryAccountDirectory::new();
    let account_id = directory.insert(
        Account::new("ACC-1001".to_string(), "Amara Okafor".to_string(), time.now())
            .with_agent(agent_id),
    );

    let mut servicer =
        LoanServicer::new(&directory, "ops.lead".to_string(), ServicingConfig::default());
    let mut ledger = EarningsLedger::new();

    // 1. creation
    println!("1. creation phase");
    println!("-----------------");
    let terms = LoanTerms {
        principal: Money::from_major(12_000),
        annual_rate: Rate::from_percentage(dec!(12)),
        tenure_months: 12,
        payment_frequency: PaymentFrequency::Monthly,
        first_payment_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    };
    let mut loan = servicer.create_loan(
        &terms,
        account_id,
        LoanStatus::PendingApproval,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        &time,
    )?;
    println!("  date: {}", time.now().format("%Y-%m-%d"));
    println!("  status: {:?}", loan.status);
    println!("  scheduled payments: {}", loan.schedule.num_payments());
    println!("  periodic payment: ${}", loan.schedule.entries[0].total_due);

    // 2. approval
    println!("\n2. approval phase");
    println!("-----------------");
    servicer.approve(&mut loan, &time)?;
    println!("  ✓ approved by {}", loan.approved_by.clone().unwrap_or_default());
    println!("  status: {:?}", loan.status);

    // 3. servicing: a late penalty, then a payment covering it
    println!("\n3. servicing phase");
    println!("------------------");
    controller.advance(Duration::days(31));
    println!("  date: {}", time.now().format("%Y-%m-%d"));
    servicer.assess_penalty(
        &mut loan,
        Money::from_major(100),
        "late payment".to_string(),
        time.now().date_naive(),
        &time,
    )?;
    println!("  penalty assessed: $100.00");

    let payment = servicer.apply_payment(
        &mut loan,
        &mut ledger,
        Money::from_decimal(dec!(1166.19)),
        time.now().date_naive(),
        &time,
    )?;
    println!("  ✓ payment applied: ${}", payment.amount);
    println!("    to penalty:   ${}", payment.applied_to_penalty);
    println!("    to interest:  ${}", payment.applied_to_interest);
    println!("    to principal: ${}", payment.applied_to_principal);
    println!("  balance: ${}", loan.current_balance);

    controller.advance(Duration::days(29));
    let mut second = servicer.apply_payment(
        &mut loan,
        &mut ledger,
        Money::from_decimal(dec!(1066.19)),
        time.now().date_naive(),
        &time,
    )?;
    println!("\n  date: {}", time.now().format("%Y-%m-%d"));
    println!("  ✓ payment applied: ${}", second.amount);
    println!("  balance: ${}", loan.current_balance);

    // 4. cancellation restores the recorded principal component
    println!("\n4. cancellation phase");
    println!("---------------------");
    servicer.cancel_payment(
        &mut loan,
        &mut second,
        &mut ledger,
        "reversed by bank".to_string(),
        &time,
    )?;
    println!("  ✗ payment cancelled: ${}", second.amount);
    println!("  balance restored: ${}", loan.current_balance);
    println!("  status: {:?}", loan.status);

    // 5. payoff: balance plus one month of interest
    println!("\n5. payoff phase");
    println!("---------------");
    controller.advance(Duration::days(30));
    let interest_due = Money::from_decimal(
        loan.current_balance.as_decimal() * loan.annual_rate.monthly_rate().as_decimal(),
    );
    let payoff = loan.current_balance + interest_due;
    servicer.apply_payment(&mut loan, &mut ledger, payoff, time.now().date_naive(), &time)?;
    println!("  date: {}", time.now().format("%Y-%m-%d"));
    println!("  ✓ paid off: ${}", payoff);
    println!("  final status: {:?}", loan.status);
    assert_eq!(loan.status, LoanStatus::Closed);

    // 6. agent earnings and cashout
    println!("\n6. agent earnings phase");
    println!("-----------------------");
    let entry = ledger.entry(agent_id).ok_or("missing earnings record")?;
    println!("  total earnings: ${}", entry.total_earnings);
    println!("  collectible:    ${}", entry.collectible_earnings);

    let mut cashout =
        servicer.request_cashout(&ledger, agent_id, Money::from_major(100), &time)?;
    servicer.approve_cashout(&mut ledger, &mut cashout, &time)?;
    let entry = ledger.entry(agent_id).ok_or("missing earnings record")?;
    println!("  ✓ cashout approved: ${}", cashout.amount);
    println!("  collectible after: ${}", entry.collectible_earnings);
    println!("  cashed out:        ${}", entry.cashed_out_amount);

    // 7. a rejected application cannot be activated
    println!("\n7. rejected application");
    println!("-----------------------");
    let mut rejected = servicer.create_loan(
        &terms,
        account_id,
        LoanStatus::PendingApproval,
        time.now().date_naive(),
        &time,
    )?;
    servicer.reject(&mut rejected, "income verification failed".to_string(), &time)?;
    println!("  ✗ rejected: {:?}", rejected.status);
    match servicer.approve(&mut rejected, &time) {
        Ok(_) => println!("  error: rejected loan must not activate!"),
        Err(e) => println!("  ✓ cannot approve: {}", e),
    }

    // 8. audit trail and final state
    println!("\n8. audit trail");
    println!("--------------");
    let events = servicer.take_events();
    println!("  {} events emitted", events.len());

    println!("\n9. final state (json)");
    println!("---------------------");
    println!("{}", LoanView::from_loan(&loan).to_json_pretty()?);

    Ok(())
}
