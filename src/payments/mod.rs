pub mod allocation;
pub mod reversal;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus, PaymentAllocation, PaymentId, PaymentStatus};

pub use allocation::{allocate_payment, AllocationOutcome};
pub use reversal::{reverse_allocation, ReversalOutcome};

/// the loan fields the allocator and reversal read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanBalanceSnapshot {
    pub current_balance: Money,
    pub total_paid: Money,
    pub status: LoanStatus,
}

/// payment record, created once per payment event
///
/// cancellation flips the status and fills the audit fields; the
/// record itself is never deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub applied_to_principal: Money,
    pub applied_to_interest: Money,
    pub applied_to_penalty: Money,
    pub status: PaymentStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

impl PaymentRecord {
    pub fn new(
        loan_id: LoanId,
        amount: Money,
        payment_date: NaiveDate,
        allocation: PaymentAllocation,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            payment_date,
            applied_to_principal: allocation.to_principal,
            applied_to_interest: allocation.to_interest,
            applied_to_penalty: allocation.to_penalty,
            status: PaymentStatus::Received,
            cancelled_at: None,
            cancellation_reason: None,
        }
    }

    pub fn allocation(&self) -> PaymentAllocation {
        PaymentAllocation {
            to_penalty: self.applied_to_penalty,
            to_interest: self.applied_to_interest,
            to_principal: self.applied_to_principal,
        }
    }

    pub fn mark_cancelled(&mut self, reason: String, timestamp: DateTime<Utc>) {
        self.status = PaymentStatus::Cancelled;
        self.cancellation_reason = Some(reason);
        self.cancelled_at = Some(timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_carries_allocation_components() {
        let allocation = PaymentAllocation {
            to_penalty: Money::from_major(100),
            to_interest: Money::from_major(5),
            to_principal: Money::from_major(595),
        };
        let record = PaymentRecord::new(
            Uuid::new_v4(),
            Money::from_major(700),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            allocation,
        );

        assert_eq!(record.status, PaymentStatus::Received);
        assert_eq!(record.allocation(), allocation);
        assert_eq!(record.allocation().total(), record.amount);
        assert!(record.cancelled_at.is_none());
    }

    #[test]
    fn test_cancellation_keeps_the_record() {
        let mut record = PaymentRecord::new(
            Uuid::new_v4(),
            Money::from_major(50),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            PaymentAllocation::default(),
        );
        record.mark_cancelled("duplicate entry".to_string(), Utc::now());

        assert_eq!(record.status, PaymentStatus::Cancelled);
        assert_eq!(record.cancellation_reason.as_deref(), Some("duplicate entry"));
        assert!(record.cancelled_at.is_some());
        assert_eq!(record.amount, Money::from_major(50));
    }
}
