use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::schedule::{cadence, LoanTerms};

/// one planned installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub principal_due: Money,
    pub interest_due: Money,
    pub total_due: Money,
    pub remaining_balance_after: Money,
}

/// full repayment schedule, set once at loan creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub entries: Vec<ScheduleEntry>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl RepaymentSchedule {
    /// entry for a payment number, counted from 1
    pub fn entry(&self, payment_number: u32) -> Option<&ScheduleEntry> {
        self.entries.get(payment_number.checked_sub(1)? as usize)
    }

    pub fn num_payments(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.due_date)
    }
}

/// build the level-payment schedule for the given terms
///
/// the single source of truth for schedules: preview and persisted
/// generation both call this, so they cannot diverge
pub fn generate_schedule(terms: &LoanTerms) -> Result<RepaymentSchedule> {
    terms.validate()?;

    let total_payments = terms.total_payments();
    let periodic_rate = terms
        .annual_rate
        .periodic(terms.payment_frequency.payments_per_year())
        .as_decimal();
    let level_payment = level_payment_amount(terms.principal, periodic_rate, total_payments);

    let mut entries = Vec::with_capacity(total_payments as usize);
    let mut balance = terms.principal;

    for number in 1..=total_payments {
        let due_date = cadence::due_date(terms.payment_frequency, terms.first_payment_date, number);
        let interest_due = Money::from_decimal(balance.as_decimal() * periodic_rate);

        if number < total_payments {
            let principal_due = level_payment - interest_due;
            let remaining = (balance - principal_due).max(Money::ZERO);
            if remaining.is_zero() {
                return Err(inconsistent(format!(
                    "balance exhausted at payment {} of {}",
                    number, total_payments
                )));
            }
            entries.push(ScheduleEntry {
                payment_number: number,
                due_date,
                principal_due,
                interest_due,
                total_due: level_payment,
                remaining_balance_after: remaining,
            });
            balance = remaining;
        } else {
            // fold the rounding residual into the last installment so
            // the schedule ends at exactly zero
            let principal_due = balance;
            let unadjusted = level_payment - interest_due;
            let residual = (principal_due - unadjusted).abs();
            if !principal_due.is_positive() || residual >= level_payment {
                return Err(inconsistent(format!(
                    "final installment fold out of bounds: principal {}, residual {}",
                    principal_due, residual
                )));
            }
            entries.push(ScheduleEntry {
                payment_number: number,
                due_date,
                principal_due,
                interest_due,
                total_due: principal_due + interest_due,
                remaining_balance_after: Money::ZERO,
            });
        }
    }

    let total_interest = entries.iter().map(|e| e.interest_due).sum();
    let total_payment = entries.iter().map(|e| e.total_due).sum();

    Ok(RepaymentSchedule {
        entries,
        total_interest,
        total_payment,
    })
}

fn inconsistent(message: String) -> ServicingError {
    warn!("schedule generation produced an inconsistent result: {message}");
    ServicingError::ArithmeticInconsistency { message }
}

/// level payment by the standard annuity formula
/// P * r * (1 + r)^n / ((1 + r)^n - 1)
fn level_payment_amount(principal: Money, periodic_rate: Decimal, total_payments: u32) -> Money {
    if periodic_rate.is_zero() {
        return principal / Decimal::from(total_payments);
    }

    let base = Decimal::ONE + periodic_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..total_payments {
        compound *= base;
    }

    let numerator = principal.as_decimal() * periodic_rate * compound;
    Money::from_decimal(numerator / (compound - Decimal::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::PaymentFrequency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_terms() -> LoanTerms {
        LoanTerms {
            principal: Money::from_major(12_000),
            annual_rate: Rate::from_percentage(dec!(12)),
            tenure_months: 12,
            payment_frequency: PaymentFrequency::Monthly,
            first_payment_date: date(2024, 1, 15),
        }
    }

    fn assert_invariants(schedule: &RepaymentSchedule, principal: Money) {
        let mut balance = principal;
        for entry in &schedule.entries {
            assert_eq!(
                entry.total_due,
                entry.principal_due + entry.interest_due,
                "component sum mismatch at payment {}",
                entry.payment_number
            );
            assert_eq!(
                entry.remaining_balance_after,
                (balance - entry.principal_due).max(Money::ZERO),
                "balance mismatch at payment {}",
                entry.payment_number
            );
            balance = entry.remaining_balance_after;
        }
        assert_eq!(balance, Money::ZERO);
    }

    #[test]
    fn test_twelve_month_level_schedule() {
        let schedule = generate_schedule(&monthly_terms()).unwrap();

        assert_eq!(schedule.entries.len(), 12);
        assert_invariants(&schedule, Money::from_major(12_000));

        let first = &schedule.entries[0];
        assert_eq!(first.due_date, date(2024, 1, 15));
        assert_eq!(first.total_due, Money::from_str_exact("1066.19").unwrap());
        assert_eq!(first.interest_due, Money::from_major(120));
        assert_eq!(first.principal_due, Money::from_str_exact("946.19").unwrap());
        assert_eq!(
            first.remaining_balance_after,
            Money::from_str_exact("11053.81").unwrap()
        );

        let last = &schedule.entries[11];
        assert_eq!(last.due_date, date(2024, 12, 15));
        assert_eq!(last.interest_due, Money::from_str_exact("10.56").unwrap());
        assert_eq!(last.principal_due, Money::from_str_exact("1055.58").unwrap());
        assert_eq!(last.total_due, Money::from_str_exact("1066.14").unwrap());
        assert_eq!(last.remaining_balance_after, Money::ZERO);

        assert_eq!(schedule.total_interest, Money::from_str_exact("794.23").unwrap());
        assert_eq!(schedule.total_payment, Money::from_str_exact("12794.23").unwrap());
    }

    #[test]
    fn test_principal_components_sum_to_principal() {
        let schedule = generate_schedule(&monthly_terms()).unwrap();
        let principal_total: Money = schedule.entries.iter().map(|e| e.principal_due).sum();
        assert_eq!(principal_total, Money::from_major(12_000));
    }

    #[test]
    fn test_zero_rate_splits_principal_evenly() {
        let terms = LoanTerms {
            principal: Money::from_major(1_000),
            annual_rate: Rate::ZERO,
            tenure_months: 12,
            payment_frequency: PaymentFrequency::Monthly,
            first_payment_date: date(2024, 2, 1),
        };
        let schedule = generate_schedule(&terms).unwrap();

        assert_eq!(schedule.entries.len(), 12);
        assert_invariants(&schedule, terms.principal);
        for entry in &schedule.entries[..11] {
            assert_eq!(entry.interest_due, Money::ZERO);
            assert_eq!(entry.principal_due, Money::from_str_exact("83.33").unwrap());
        }
        // the even split leaves four cents for the final installment
        assert_eq!(
            schedule.entries[11].principal_due,
            Money::from_str_exact("83.37").unwrap()
        );
        assert_eq!(schedule.total_interest, Money::ZERO);
        assert_eq!(schedule.total_payment, Money::from_major(1_000));
    }

    #[test]
    fn test_weekly_schedule_length_and_dates() {
        let terms = LoanTerms {
            principal: Money::from_major(5_200),
            annual_rate: Rate::from_percentage(dec!(12)),
            tenure_months: 12,
            payment_frequency: PaymentFrequency::Weekly,
            first_payment_date: date(2024, 1, 5),
        };
        let schedule = generate_schedule(&terms).unwrap();

        assert_eq!(schedule.entries.len(), 52);
        assert_eq!(schedule.entries[0].due_date, date(2024, 1, 5));
        assert_eq!(schedule.entries[2].due_date, date(2024, 1, 19));
        assert_invariants(&schedule, terms.principal);
    }

    #[test]
    fn test_bimonthly_schedule_uses_pattern_days() {
        let terms = LoanTerms {
            principal: Money::from_major(10_000),
            annual_rate: Rate::from_percentage(dec!(10)),
            tenure_months: 12,
            payment_frequency: PaymentFrequency::BiMonthly,
            first_payment_date: date(2024, 3, 5),
        };
        let schedule = generate_schedule(&terms).unwrap();

        assert_eq!(schedule.entries.len(), 24);
        assert_eq!(schedule.entries[0].due_date, date(2024, 3, 5));
        assert_eq!(schedule.entries[1].due_date, date(2024, 3, 20));
        assert_eq!(schedule.entries[2].due_date, date(2024, 4, 5));
        assert_invariants(&schedule, terms.principal);
    }

    #[test]
    fn test_partial_year_weekly_count_rounds_up() {
        let terms = LoanTerms {
            principal: Money::from_major(13_000),
            annual_rate: Rate::from_percentage(dec!(8)),
            tenure_months: 13,
            payment_frequency: PaymentFrequency::Weekly,
            first_payment_date: date(2024, 6, 7),
        };
        let schedule = generate_schedule(&terms).unwrap();
        assert_eq!(schedule.entries.len(), 57);
        assert_invariants(&schedule, terms.principal);
    }

    #[test]
    fn test_invalid_terms_produce_no_schedule() {
        let mut terms = monthly_terms();
        terms.principal = Money::from_major(-1);
        assert!(matches!(
            generate_schedule(&terms),
            Err(ServicingError::Validation { .. })
        ));
    }

    #[test]
    fn test_degenerate_rounding_is_rejected() {
        // one dollar over 52 weekly installments cannot amortize at
        // two decimal places; the balance runs out early
        let terms = LoanTerms {
            principal: Money::from_major(1),
            annual_rate: Rate::from_percentage(dec!(12)),
            tenure_months: 12,
            payment_frequency: PaymentFrequency::Weekly,
            first_payment_date: date(2024, 1, 5),
        };
        assert!(matches!(
            generate_schedule(&terms),
            Err(ServicingError::ArithmeticInconsistency { .. })
        ));
    }

    #[test]
    fn test_entry_lookup() {
        let schedule = generate_schedule(&monthly_terms()).unwrap();
        assert_eq!(schedule.entry(1).unwrap().payment_number, 1);
        assert_eq!(schedule.entry(12).unwrap().payment_number, 12);
        assert!(schedule.entry(0).is_none());
        assert!(schedule.entry(13).is_none());
        assert_eq!(schedule.num_payments(), 12);
        assert_eq!(schedule.final_due_date(), Some(date(2024, 12, 15)));
    }
}
