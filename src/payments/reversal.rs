use log::warn;

use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::payments::{LoanBalanceSnapshot, PaymentRecord};
use crate::types::{LoanStatus, PaymentStatus};

/// loan state after reversing a payment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReversalOutcome {
    pub new_balance: Money,
    pub new_total_paid: Money,
    pub new_status: LoanStatus,
}

/// undo a received payment's effect on the loan balances
///
/// restores the recorded principal component additively, never by
/// recomputing the split; the loan reverts to active even from closed.
/// penalties settled by the payment stay settled
pub fn reverse_allocation(
    payment: &PaymentRecord,
    loan: &LoanBalanceSnapshot,
) -> Result<ReversalOutcome> {
    if payment.status != PaymentStatus::Received {
        return Err(ServicingError::PaymentNotCancellable {
            status: payment.status,
        });
    }
    if !matches!(loan.status, LoanStatus::Active | LoanStatus::Closed) {
        return Err(ServicingError::StateConflict {
            current: loan.status,
            operation: "cancel payment",
        });
    }
    if payment.amount > loan.total_paid {
        let message = format!(
            "payment {} of {} exceeds recorded total paid {}",
            payment.id, payment.amount, loan.total_paid
        );
        warn!("reversal rejected: {message}");
        return Err(ServicingError::ArithmeticInconsistency { message });
    }

    Ok(ReversalOutcome {
        new_balance: loan.current_balance + payment.applied_to_principal,
        new_total_paid: loan.total_paid - payment.amount,
        new_status: LoanStatus::Active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::payments::allocation::allocate_payment;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn received_payment(amount: i64, to_principal: i64) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            loan_id: Uuid::new_v4(),
            amount: Money::from_major(amount),
            payment_date: date(2024, 2, 15),
            applied_to_principal: Money::from_major(to_principal),
            applied_to_interest: Money::from_major(amount - to_principal),
            applied_to_penalty: Money::ZERO,
            status: PaymentStatus::Received,
            cancelled_at: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn test_restores_recorded_principal() {
        let payment = received_payment(600, 500);
        let loan = LoanBalanceSnapshot {
            current_balance: Money::from_major(9_500),
            total_paid: Money::from_major(600),
            status: LoanStatus::Active,
        };

        let outcome = reverse_allocation(&payment, &loan).unwrap();
        assert_eq!(outcome.new_balance, Money::from_major(10_000));
        assert_eq!(outcome.new_total_paid, Money::ZERO);
        assert_eq!(outcome.new_status, LoanStatus::Active);
    }

    #[test]
    fn test_round_trip_with_allocator() {
        // apply then cancel a payment that does not clamp the balance;
        // both balance and total paid come back exactly
        let loan = LoanBalanceSnapshot {
            current_balance: Money::from_major(10_000),
            total_paid: Money::from_major(1_200),
            status: LoanStatus::Active,
        };
        let amount = Money::from_major(600);
        let outcome =
            allocate_payment(&loan, &[], amount, Rate::from_decimal(dec!(0.01))).unwrap();

        let payment =
            PaymentRecord::new(Uuid::new_v4(), amount, date(2024, 3, 1), outcome.allocation);
        let after_payment = LoanBalanceSnapshot {
            current_balance: outcome.new_balance,
            total_paid: loan.total_paid + amount,
            status: outcome.new_status,
        };

        let reversed = reverse_allocation(&payment, &after_payment).unwrap();
        assert_eq!(reversed.new_balance, loan.current_balance);
        assert_eq!(reversed.new_total_paid, loan.total_paid);
        assert_eq!(reversed.new_status, LoanStatus::Active);
    }

    #[test]
    fn test_reopens_a_closed_loan() {
        let payment = received_payment(505, 500);
        let loan = LoanBalanceSnapshot {
            current_balance: Money::ZERO,
            total_paid: Money::from_major(505),
            status: LoanStatus::Closed,
        };

        let outcome = reverse_allocation(&payment, &loan).unwrap();
        assert_eq!(outcome.new_balance, Money::from_major(500));
        assert_eq!(outcome.new_status, LoanStatus::Active);
    }

    #[test]
    fn test_rejects_already_cancelled_payment() {
        let mut payment = received_payment(100, 90);
        payment.status = PaymentStatus::Cancelled;
        let loan = LoanBalanceSnapshot {
            current_balance: Money::from_major(1_000),
            total_paid: Money::from_major(100),
            status: LoanStatus::Active,
        };

        assert!(matches!(
            reverse_allocation(&payment, &loan),
            Err(ServicingError::PaymentNotCancellable {
                status: PaymentStatus::Cancelled
            })
        ));
    }

    #[test]
    fn test_rejects_unservable_loan_state() {
        let payment = received_payment(100, 90);
        let loan = LoanBalanceSnapshot {
            current_balance: Money::from_major(1_000),
            total_paid: Money::from_major(100),
            status: LoanStatus::PendingApproval,
        };

        assert!(matches!(
            reverse_allocation(&payment, &loan),
            Err(ServicingError::StateConflict { .. })
        ));
    }

    #[test]
    fn test_rejects_amount_beyond_total_paid() {
        let payment = received_payment(600, 500);
        let loan = LoanBalanceSnapshot {
            current_balance: Money::from_major(9_500),
            total_paid: Money::from_major(100),
            status: LoanStatus::Active,
        };

        assert!(matches!(
            reverse_allocation(&payment, &loan),
            Err(ServicingError::ArithmeticInconsistency { .. })
        ));
    }
}
