use crate::decimal::{Money, Rate};
use crate::errors::{Result, ServicingError};
use crate::payments::LoanBalanceSnapshot;
use crate::penalties::{plan_settlement, Penalty};
use crate::types::{LoanStatus, PaymentAllocation, PenaltyId};

/// result of allocating one incoming payment
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    pub allocation: PaymentAllocation,
    pub settled_penalties: Vec<PenaltyId>,
    pub new_balance: Money,
    pub new_status: LoanStatus,
}

/// split an incoming payment across penalties, interest, and principal
///
/// strict priority order, no partial skipping: unpaid penalties absorb
/// funds first, then one month of interest on the current balance,
/// then principal takes the entire remainder. the remainder goes to
/// principal even past the outstanding balance; the new balance clamps
/// at zero and the loan closes there.
///
/// pure function: identical inputs produce identical outcomes, and the
/// caller commits the resulting state
pub fn allocate_payment(
    loan: &LoanBalanceSnapshot,
    unpaid_penalties: &[Penalty],
    incoming_amount: Money,
    monthly_rate: Rate,
) -> Result<AllocationOutcome> {
    if !incoming_amount.is_positive() {
        return Err(ServicingError::InvalidPaymentAmount {
            amount: incoming_amount,
        });
    }

    let settlement = plan_settlement(unpaid_penalties, incoming_amount);
    let to_penalty = settlement.applied;
    let mut remaining = incoming_amount - to_penalty;

    // interest accrues on the current balance, not the original
    // principal
    let interest_due = Money::from_decimal(loan.current_balance.as_decimal() * monthly_rate.as_decimal());
    let to_interest = remaining.min(interest_due);
    remaining -= to_interest;

    let to_principal = remaining;
    let new_balance = (loan.current_balance - to_principal).max(Money::ZERO);
    let new_status = if new_balance.is_zero() {
        LoanStatus::Closed
    } else {
        loan.status
    };

    Ok(AllocationOutcome {
        allocation: PaymentAllocation {
            to_penalty,
            to_interest,
            to_principal,
        },
        settled_penalties: settlement.settled_ids,
        new_balance,
        new_status,
    })
}
