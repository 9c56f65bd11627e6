use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{
    AccountId, AgentId, CashoutId, LoanId, LoanStatus, PaymentAllocation, PaymentFrequency,
    PaymentId, PenaltyId,
};

/// all events emitted during servicing operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanCreated {
        loan_id: LoanId,
        principal: Money,
        annual_rate: Rate,
        tenure_months: u32,
        payment_frequency: PaymentFrequency,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    LoanApproved {
        loan_id: LoanId,
        approved_by: String,
        timestamp: DateTime<Utc>,
    },
    LoanRejected {
        loan_id: LoanId,
        rejected_by: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    LoanClosed {
        loan_id: LoanId,
        total_paid: Money,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentApplied {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        allocation: PaymentAllocation,
        new_balance: Money,
        payment_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PaymentCancelled {
        loan_id: LoanId,
        payment_id: PaymentId,
        amount: Money,
        restored_balance: Money,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    // penalty events
    PenaltyAssessed {
        loan_id: LoanId,
        penalty_id: PenaltyId,
        amount: Money,
        reason: String,
        penalty_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PenaltySettled {
        loan_id: LoanId,
        penalty_id: PenaltyId,
        amount: Money,
        payment_id: PaymentId,
        timestamp: DateTime<Utc>,
    },

    // commission events
    CommissionAccrued {
        agent_id: AgentId,
        loan_id: LoanId,
        basis_amount: Money,
        commission: Money,
        timestamp: DateTime<Utc>,
    },
    CommissionReversed {
        agent_id: AgentId,
        loan_id: LoanId,
        basis_amount: Money,
        commission: Money,
        timestamp: DateTime<Utc>,
    },

    // cashout events
    CashoutRequested {
        cashout_id: CashoutId,
        agent_id: AgentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    CashoutApproved {
        cashout_id: CashoutId,
        agent_id: AgentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    CashoutRejected {
        cashout_id: CashoutId,
        agent_id: AgentId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        loan_id: LoanId,
        old_status: LoanStatus,
        new_status: LoanStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    // notification hand-off, delivery happens outside this crate
    NotificationQueued {
        loan_id: LoanId,
        recipient_account: AccountId,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
///
/// emission never fails and never rolls back the financial mutation it
/// describes; the caller drains events and forwards them to the
/// transaction log and notification delivery
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
