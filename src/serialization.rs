/// serialization support for loans and agent earnings
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{CommissionBasis, ServicingConfig};
use crate::decimal::{Money, Rate};
use crate::earnings::AgentEarnings;
use crate::payments::PaymentRecord;
use crate::state::Loan;
use crate::types::{
    AccountId, AgentId, LoanId, LoanStatus, PaymentFrequency, PaymentId, PaymentStatus,
};

/// serializable view of a loan's state
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub account_id: AccountId,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub financial: FinancialView,
    pub schedule: ScheduleSummaryView,
    pub payments: PaymentTrackingView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinancialView {
    pub principal_amount: Money,
    pub annual_rate: Rate,
    pub current_balance: Money,
    pub total_paid: Money,
    pub total_penalties: Money,
    pub unpaid_penalty_total: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleSummaryView {
    pub payment_frequency: PaymentFrequency,
    pub tenure_months: u32,
    pub num_payments: u32,
    pub periodic_payment: Option<Money>,
    pub first_payment_date: NaiveDate,
    pub final_due_date: Option<NaiveDate>,
    pub total_interest: Money,
    pub total_payment: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentTrackingView {
    pub payment_count: u32,
    pub last_payment_date: Option<NaiveDate>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            id: loan.id,
            account_id: loan.account_id,
            status: loan.status,
            created_at: loan.created_at,
            approved_by: loan.approved_by.clone(),
            approved_at: loan.approved_at,
            financial: FinancialView {
                principal_amount: loan.principal_amount,
                annual_rate: loan.annual_rate,
                current_balance: loan.current_balance,
                total_paid: loan.total_paid,
                total_penalties: loan.total_penalties,
                unpaid_penalty_total: loan.unpaid_penalty_total(),
            },
            schedule: ScheduleSummaryView {
                payment_frequency: loan.payment_frequency,
                tenure_months: loan.tenure_months,
                num_payments: loan.schedule.num_payments(),
                periodic_payment: loan.schedule.entries.first().map(|e| e.total_due),
                first_payment_date: loan.first_payment_date,
                final_due_date: loan.schedule.final_due_date(),
                total_interest: loan.schedule.total_interest,
                total_payment: loan.schedule.total_payment,
            },
            payments: PaymentTrackingView {
                payment_count: loan.payment_count,
                last_payment_date: loan.last_payment_date,
            },
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// agent earnings with a per-payment commission breakdown
///
/// each line recomputes commission on the configured basis, so the
/// reporting view and the accrual path cannot disagree
#[derive(Debug, Serialize, Deserialize)]
pub struct EarningsView {
    pub agent_id: AgentId,
    pub commission_rate: Rate,
    pub commission_basis: CommissionBasis,
    pub total_earnings: Money,
    pub collectible_earnings: Money,
    pub cashed_out_amount: Money,
    pub breakdown: Vec<CommissionLineView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommissionLineView {
    pub payment_id: PaymentId,
    pub loan_id: LoanId,
    pub payment_date: NaiveDate,
    pub basis_amount: Money,
    pub commission: Money,
}

impl EarningsView {
    /// build the view from a ledger entry and the payments credited to
    /// the agent; cancelled payments are excluded
    pub fn from_earnings(
        earnings: &AgentEarnings,
        payments: &[PaymentRecord],
        config: &ServicingConfig,
    ) -> Self {
        let breakdown = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Received)
            .map(|payment| {
                let basis_amount = config
                    .commission_basis
                    .amount_from(payment.amount, payment.applied_to_interest);
                let commission = Money::from_decimal(
                    basis_amount.as_decimal() * earnings.commission_rate.as_decimal(),
                );
                CommissionLineView {
                    payment_id: payment.id,
                    loan_id: payment.loan_id,
                    payment_date: payment.payment_date,
                    basis_amount,
                    commission,
                }
            })
            .collect();

        EarningsView {
            agent_id: earnings.agent_id,
            commission_rate: earnings.commission_rate,
            commission_basis: config.commission_basis,
            total_earnings: earnings.total_earnings,
            collectible_earnings: earnings.collectible_earnings,
            cashed_out_amount: earnings.cashed_out_amount,
            breakdown,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
