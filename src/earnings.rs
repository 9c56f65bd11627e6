use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ServicingError};
use crate::types::{AgentId, CashoutId, CashoutStatus};

/// accumulated commission for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEarnings {
    pub agent_id: AgentId,
    pub total_earnings: Money,
    pub collectible_earnings: Money,
    pub cashed_out_amount: Money,
    pub commission_rate: Rate,
}

impl AgentEarnings {
    pub fn new(agent_id: AgentId, commission_rate: Rate) -> Self {
        Self {
            agent_id,
            total_earnings: Money::ZERO,
            collectible_earnings: Money::ZERO,
            cashed_out_amount: Money::ZERO,
            commission_rate,
        }
    }
}

/// a request to withdraw collectible earnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cashout {
    pub id: CashoutId,
    pub agent_id: AgentId,
    pub amount: Money,
    pub status: CashoutStatus,
    pub requested_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// additive commission ledger keyed by agent
///
/// the earnings record is created the first time an agent earns, at
/// the default rate passed in; every later accrual or reversal uses
/// the rate stored on the record
#[derive(Debug, Default)]
pub struct EarningsLedger {
    entries: HashMap<AgentId, AgentEarnings>,
}

impl EarningsLedger {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn entry(&self, agent_id: AgentId) -> Option<&AgentEarnings> {
        self.entries.get(&agent_id)
    }

    fn entry_or_create(&mut self, agent_id: AgentId, default_rate: Rate) -> &mut AgentEarnings {
        self.entries
            .entry(agent_id)
            .or_insert_with(|| AgentEarnings::new(agent_id, default_rate))
    }

    /// credit commission on an applied payment; returns the amount
    /// credited
    pub fn record_commission(
        &mut self,
        agent_id: AgentId,
        basis_amount: Money,
        default_rate: Rate,
    ) -> Money {
        let entry = self.entry_or_create(agent_id, default_rate);
        let commission = basis_amount * entry.commission_rate.as_decimal();
        entry.total_earnings += commission;
        entry.collectible_earnings += commission;
        commission
    }

    /// debit the commission previously credited for a cancelled
    /// payment; returns the amount debited
    pub fn reverse_commission(
        &mut self,
        agent_id: AgentId,
        basis_amount: Money,
        default_rate: Rate,
    ) -> Money {
        let entry = self.entry_or_create(agent_id, default_rate);
        let commission = basis_amount * entry.commission_rate.as_decimal();
        entry.total_earnings -= commission;
        entry.collectible_earnings -= commission;
        commission
    }

    /// create a pending cashout, guarded against the collectible
    /// balance at request time
    pub fn request_cashout(
        &self,
        agent_id: AgentId,
        amount: Money,
        requested_at: DateTime<Utc>,
    ) -> Result<Cashout> {
        if !amount.is_positive() {
            return Err(ServicingError::Validation {
                message: format!("cashout amount must be positive, got {amount}"),
            });
        }
        let entry = self
            .entry(agent_id)
            .ok_or(ServicingError::AgentNotFound { agent_id })?;
        if amount > entry.collectible_earnings {
            return Err(ServicingError::InsufficientCollectible {
                available: entry.collectible_earnings,
                requested: amount,
            });
        }

        Ok(Cashout {
            id: Uuid::new_v4(),
            agent_id,
            amount,
            status: CashoutStatus::Pending,
            requested_at,
            resolved_at: None,
            rejection_reason: None,
        })
    }

    /// move a pending cashout's amount out of collectible earnings
    ///
    /// the collectible guard ran at request time; approval does not
    /// re-check, so a stale approval can drive the balance negative
    pub fn approve_cashout(&mut self, cashout: &mut Cashout, approved_at: DateTime<Utc>) -> Result<()> {
        if cashout.status != CashoutStatus::Pending {
            return Err(ServicingError::CashoutNotPending {
                status: cashout.status,
            });
        }
        let entry = self
            .entries
            .get_mut(&cashout.agent_id)
            .ok_or(ServicingError::AgentNotFound {
                agent_id: cashout.agent_id,
            })?;

        entry.collectible_earnings -= cashout.amount;
        entry.cashed_out_amount += cashout.amount;
        cashout.status = CashoutStatus::Approved;
        cashout.resolved_at = Some(approved_at);
        Ok(())
    }

    /// decline a pending cashout; earnings are untouched
    pub fn reject_cashout(
        &self,
        cashout: &mut Cashout,
        reason: String,
        rejected_at: DateTime<Utc>,
    ) -> Result<()> {
        if cashout.status != CashoutStatus::Pending {
            return Err(ServicingError::CashoutNotPending {
                status: cashout.status,
            });
        }
        if reason.trim().is_empty() {
            return Err(ServicingError::EmptyReason {
                operation: "cashout rejection",
            });
        }

        cashout.status = CashoutStatus::Rejected;
        cashout.rejection_reason = Some(reason);
        cashout.resolved_at = Some(rejected_at);
        Ok(())
    }
}
