use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::payments::LoanBalanceSnapshot;
use crate::penalties::Penalty;
use crate::schedule::{LoanTerms, RepaymentSchedule};
use crate::types::{AccountId, LoanId, LoanStatus, PaymentFrequency, PenaltyId};

/// loan state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    // identification
    pub id: LoanId,
    pub account_id: AccountId,

    // terms
    pub principal_amount: Money,
    pub annual_rate: Rate,
    pub tenure_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub start_date: NaiveDate,
    pub first_payment_date: NaiveDate,

    // schedule, set once at creation and never regenerated
    pub schedule: RepaymentSchedule,

    // balances
    pub current_balance: Money,
    pub total_paid: Money,
    pub total_penalties: Money,
    pub penalties: Vec<Penalty>,

    // payment tracking
    pub payment_count: u32,
    pub last_payment_date: Option<NaiveDate>,

    // approval workflow
    pub status: LoanStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,

    // timestamps
    pub created_at: DateTime<Utc>,
    pub last_status_change: DateTime<Utc>,
}

impl Loan {
    /// create loan state from validated terms and a generated schedule
    pub fn new(
        account_id: AccountId,
        terms: &LoanTerms,
        schedule: RepaymentSchedule,
        start_date: NaiveDate,
        initial_status: LoanStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            principal_amount: terms.principal,
            annual_rate: terms.annual_rate,
            tenure_months: terms.tenure_months,
            payment_frequency: terms.payment_frequency,
            start_date,
            first_payment_date: terms.first_payment_date,
            schedule,
            current_balance: terms.principal,
            total_paid: Money::ZERO,
            total_penalties: Money::ZERO,
            penalties: Vec::new(),
            payment_count: 0,
            last_payment_date: None,
            status: initial_status,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at,
            last_status_change: created_at,
        }
    }

    /// the terms the schedule was generated from
    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal_amount,
            annual_rate: self.annual_rate,
            tenure_months: self.tenure_months,
            payment_frequency: self.payment_frequency,
            first_payment_date: self.first_payment_date,
        }
    }

    /// check if the loan can accept payments
    pub fn can_accept_payment(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// update status
    pub fn update_status(&mut self, new_status: LoanStatus, timestamp: DateTime<Utc>) {
        self.status = new_status;
        self.last_status_change = timestamp;
    }

    /// record a received payment against the totals
    pub fn record_payment(&mut self, amount: Money, payment_date: NaiveDate) {
        self.total_paid += amount;
        self.payment_count += 1;
        self.last_payment_date = Some(payment_date);
    }

    /// penalties still owed, in assessment order
    pub fn unpaid_penalties(&self) -> Vec<Penalty> {
        self.penalties.iter().filter(|p| !p.is_paid).cloned().collect()
    }

    pub fn unpaid_penalty_total(&self) -> Money {
        self.penalties
            .iter()
            .filter(|p| !p.is_paid)
            .map(|p| p.amount)
            .sum()
    }

    /// attach a newly assessed penalty
    pub fn add_penalty(&mut self, penalty: Penalty) {
        self.total_penalties += penalty.amount;
        self.penalties.push(penalty);
    }

    /// mark the given penalties as paid
    pub fn mark_penalties_paid(&mut self, ids: &[PenaltyId]) {
        for penalty in &mut self.penalties {
            if ids.contains(&penalty.id) {
                penalty.is_paid = true;
            }
        }
    }

    /// the fields the allocator reads
    pub fn balance_snapshot(&self) -> LoanBalanceSnapshot {
        LoanBalanceSnapshot {
            current_balance: self.current_balance,
            total_paid: self.total_paid,
            status: self.status,
        }
    }
}
