use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a customer account
pub type AccountId = Uuid;

/// unique identifier for a payment record
pub type PaymentId = Uuid;

/// unique identifier for a penalty
pub type PenaltyId = Uuid;

/// unique identifier for a sales agent
pub type AgentId = Uuid;

/// unique identifier for a cashout request
pub type CashoutId = Uuid;

/// repayment cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    /// every 7 days
    Weekly,
    /// twice a month on fixed pattern days
    BiMonthly,
    /// same day each month, clamped to month length
    Monthly,
}

impl PaymentFrequency {
    pub fn payments_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::BiMonthly => 24,
            PaymentFrequency::Monthly => 12,
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFrequency::Weekly => write!(f, "weekly"),
            PaymentFrequency::BiMonthly => write!(f, "bi-monthly"),
            PaymentFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// application captured, not yet submitted for review
    Draft,
    /// awaiting an approval decision
    PendingApproval,
    /// approved and accepting payments
    Active,
    /// balance reached zero
    Closed,
    /// declined with a recorded reason
    Rejected,
}

impl LoanStatus {
    /// terminal states admit no further transitions except payment
    /// cancellation reopening a closed loan
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Closed | LoanStatus::Rejected)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanStatus::Draft => write!(f, "draft"),
            LoanStatus::PendingApproval => write!(f, "pending approval"),
            LoanStatus::Active => write!(f, "active"),
            LoanStatus::Closed => write!(f, "closed"),
            LoanStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// customer account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
    Closed,
}

/// payment record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// applied to the loan and counted in totals
    Received,
    /// reversed; the record is retained for audit
    Cancelled,
}

/// cashout request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashoutStatus {
    Pending,
    Approved,
    Rejected,
}

/// where a payment went, by component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentAllocation {
    pub to_penalty: Money,
    pub to_interest: Money,
    pub to_principal: Money,
}

impl PaymentAllocation {
    pub fn total(&self) -> Money {
        self.to_penalty + self.to_interest + self.to_principal
    }
}
