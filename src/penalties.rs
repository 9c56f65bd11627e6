use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{LoanId, PenaltyId};

/// a penalty assessed against a loan
///
/// penalties are never partially payable; settlement marks a penalty
/// fully paid or leaves it untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    pub id: PenaltyId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub reason: String,
    pub penalty_date: NaiveDate,
    pub is_paid: bool,
}

impl Penalty {
    pub fn new(loan_id: LoanId, amount: Money, reason: String, penalty_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            reason,
            penalty_date,
            is_paid: false,
        }
    }
}

/// outcome of planning penalty settlement for an incoming payment
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltySettlement {
    /// monetary total applied to penalties, min(funds, total unpaid)
    pub applied: Money,
    /// penalties covered in full by the applied funds
    pub settled_ids: Vec<PenaltyId>,
}

/// plan which penalties an incoming amount settles
///
/// the applied total always equals min(funds, total unpaid) even when
/// the last covered penalty is only partially funded; that penalty
/// stays unpaid and the marked set can sum to less than the applied
/// total
pub fn plan_settlement(unpaid: &[Penalty], funds: Money) -> PenaltySettlement {
    let total_unpaid: Money = unpaid.iter().map(|p| p.amount).sum();
    let applied = funds.min(total_unpaid);

    let mut remaining = applied;
    let mut settled_ids = Vec::new();
    for penalty in unpaid {
        if penalty.amount <= remaining {
            remaining -= penalty.amount;
            settled_ids.push(penalty.id);
        }
    }

    PenaltySettlement {
        applied,
        settled_ids,
    }
}
