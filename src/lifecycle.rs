use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::accounts::AccountDirectory;
use crate::config::ServicingConfig;
use crate::decimal::Money;
use crate::earnings::{Cashout, EarningsLedger};
use crate::errors::{Result, ServicingError};
use crate::events::{Event, EventStore};
use crate::payments::{allocate_payment, reverse_allocation, PaymentRecord};
use crate::penalties::Penalty;
use crate::schedule::{generate_schedule, LoanTerms};
use crate::state::Loan;
use crate::types::{AccountId, AgentId, LoanStatus};

/// lifecycle manager for loan aggregates
///
/// holds no loan state of its own: every operation validates the
/// transition, mutates the aggregate passed in, and emits events for
/// the caller to drain. persistence is the caller's concern, and each
/// operation expects to run inside a single row-level transaction so
/// two mutations of the same loan cannot interleave
pub struct LoanServicer<'a> {
    accounts: &'a dyn AccountDirectory,
    operator: String,
    config: ServicingConfig,
    events: EventStore,
}

impl<'a> LoanServicer<'a> {
    pub fn new(
        accounts: &'a dyn AccountDirectory,
        operator: String,
        config: ServicingConfig,
    ) -> Self {
        Self {
            accounts,
            operator,
            config,
            events: EventStore::new(),
        }
    }

    /// create a loan against an active account
    ///
    /// placement is draft or pending approval; any other status is
    /// rejected. the repayment schedule is generated exactly once here
    /// and never regenerated
    pub fn create_loan(
        &mut self,
        terms: &LoanTerms,
        account_id: AccountId,
        placement: LoanStatus,
        start_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let account = self
            .accounts
            .find(account_id)
            .ok_or(ServicingError::AccountNotFound { id: account_id })?;

        if !account.is_active() {
            return Err(ServicingError::AccountNotActive {
                status: account.status,
            });
        }

        if !matches!(
            placement,
            LoanStatus::Draft | LoanStatus::PendingApproval
        ) {
            return Err(ServicingError::Validation {
                message: format!(
                    "loans are created as draft or pending approval, not {}",
                    placement
                ),
            });
        }

        // term validation happens inside schedule generation
        let schedule = generate_schedule(terms)?;

        let now = time_provider.now();
        let loan = Loan::new(account_id, terms, schedule, start_date, placement, now);

        self.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            principal: loan.principal_amount,
            annual_rate: loan.annual_rate,
            tenure_months: loan.tenure_months,
            payment_frequency: loan.payment_frequency,
            status: loan.status,
            timestamp: now,
        });

        Ok(loan)
    }

    /// approve a pending loan, activating it immediately
    pub fn approve(&mut self, loan: &mut Loan, time_provider: &SafeTimeProvider) -> Result<()> {
        if loan.status != LoanStatus::PendingApproval {
            return Err(ServicingError::StateConflict {
                current: loan.status,
                operation: "approve",
            });
        }

        let now = time_provider.now();
        let old_status = loan.status;
        loan.approved_by = Some(self.operator.clone());
        loan.approved_at = Some(now);
        loan.update_status(LoanStatus::Active, now);

        self.events.emit(Event::LoanApproved {
            loan_id: loan.id,
            approved_by: self.operator.clone(),
            timestamp: now,
        });
        self.events.emit(Event::StatusChanged {
            loan_id: loan.id,
            old_status,
            new_status: LoanStatus::Active,
            reason: format!("approved by {}", self.operator),
            timestamp: now,
        });

        Ok(())
    }

    /// reject a pending loan with a reason
    pub fn reject(
        &mut self,
        loan: &mut Loan,
        reason: String,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if loan.status != LoanStatus::PendingApproval {
            return Err(ServicingError::StateConflict {
                current: loan.status,
                operation: "reject",
            });
        }
        if reason.trim().is_empty() {
            return Err(ServicingError::EmptyReason {
                operation: "reject",
            });
        }

        let now = time_provider.now();
        let old_status = loan.status;
        loan.rejection_reason = Some(reason.clone());
        loan.update_status(LoanStatus::Rejected, now);

        self.events.emit(Event::LoanRejected {
            loan_id: loan.id,
            rejected_by: self.operator.clone(),
            reason: reason.clone(),
            timestamp: now,
        });
        self.events.emit(Event::StatusChanged {
            loan_id: loan.id,
            old_status,
            new_status: LoanStatus::Rejected,
            reason,
            timestamp: now,
        });

        Ok(())
    }

    /// assess a penalty against an active loan
    pub fn assess_penalty(
        &mut self,
        loan: &mut Loan,
        amount: Money,
        reason: String,
        penalty_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Penalty> {
        if !loan.can_accept_payment() {
            return Err(ServicingError::LoanNotActive {
                status: loan.status,
            });
        }
        if !amount.is_positive() {
            return Err(ServicingError::Validation {
                message: format!("penalty amount must be positive, got {}", amount),
            });
        }
        if reason.trim().is_empty() {
            return Err(ServicingError::EmptyReason {
                operation: "assess penalty",
            });
        }

        let penalty = Penalty::new(loan.id, amount, reason.clone(), penalty_date);
        loan.add_penalty(penalty.clone());

        self.events.emit(Event::PenaltyAssessed {
            loan_id: loan.id,
            penalty_id: penalty.id,
            amount,
            reason,
            penalty_date,
            timestamp: time_provider.now(),
        });

        Ok(penalty)
    }

    /// apply a payment to an active loan
    ///
    /// delegates the split to the allocator, commits the outcome to the
    /// aggregate, closes the loan on a zero balance, and accrues agent
    /// commission on the configured basis. the returned record is the
    /// transaction-log entry for the payment
    pub fn apply_payment(
        &mut self,
        loan: &mut Loan,
        ledger: &mut EarningsLedger,
        amount: Money,
        payment_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<PaymentRecord> {
        if !loan.can_accept_payment() {
            return Err(ServicingError::LoanNotActive {
                status: loan.status,
            });
        }

        let unpaid = loan.unpaid_penalties();
        let outcome = allocate_payment(
            &loan.balance_snapshot(),
            &unpaid,
            amount,
            loan.annual_rate.monthly_rate(),
        )?;

        let now = time_provider.now();
        let record = PaymentRecord::new(loan.id, amount, payment_date, outcome.allocation);

        loan.mark_penalties_paid(&outcome.settled_penalties);
        loan.current_balance = outcome.new_balance;
        loan.record_payment(amount, payment_date);

        self.events.emit(Event::PaymentApplied {
            loan_id: loan.id,
            payment_id: record.id,
            amount,
            allocation: outcome.allocation,
            new_balance: outcome.new_balance,
            payment_date,
            timestamp: now,
        });

        for penalty in &unpaid {
            if outcome.settled_penalties.contains(&penalty.id) {
                self.events.emit(Event::PenaltySettled {
                    loan_id: loan.id,
                    penalty_id: penalty.id,
                    amount: penalty.amount,
                    payment_id: record.id,
                    timestamp: now,
                });
            }
        }

        if outcome.new_status == LoanStatus::Closed {
            let old_status = loan.status;
            loan.update_status(LoanStatus::Closed, now);

            self.events.emit(Event::LoanClosed {
                loan_id: loan.id,
                total_paid: loan.total_paid,
                timestamp: now,
            });
            self.events.emit(Event::StatusChanged {
                loan_id: loan.id,
                old_status,
                new_status: LoanStatus::Closed,
                reason: "balance fully repaid".to_string(),
                timestamp: now,
            });
        }

        if let Some(agent_id) = self.agent_for(loan) {
            let basis = self
                .config
                .commission_basis
                .amount_from(amount, outcome.allocation.to_interest);
            let commission =
                ledger.record_commission(agent_id, basis, self.config.default_commission_rate);

            self.events.emit(Event::CommissionAccrued {
                agent_id,
                loan_id: loan.id,
                basis_amount: basis,
                commission,
                timestamp: now,
            });
        }

        // delivery happens outside this crate; queue failures must not
        // roll back the financial mutation above
        let message = if loan.status == LoanStatus::Closed {
            format!("payment of {} received; loan fully repaid", amount)
        } else {
            format!(
                "payment of {} received; outstanding balance {}",
                amount, outcome.new_balance
            )
        };
        self.events.emit(Event::NotificationQueued {
            loan_id: loan.id,
            recipient_account: loan.account_id,
            message,
            timestamp: now,
        });

        Ok(record)
    }

    /// cancel a received payment, restoring the loan balances
    ///
    /// the principal component is restored from the record, never
    /// recomputed; the loan reverts to active even if the payment had
    /// closed it. commission accrued for the payment is reversed on the
    /// same basis it was recorded on
    pub fn cancel_payment(
        &mut self,
        loan: &mut Loan,
        payment: &mut PaymentRecord,
        ledger: &mut EarningsLedger,
        reason: String,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        if reason.trim().is_empty() {
            return Err(ServicingError::EmptyReason {
                operation: "cancel payment",
            });
        }
        if payment.loan_id != loan.id {
            return Err(ServicingError::Validation {
                message: format!(
                    "payment {} does not belong to loan {}",
                    payment.id, loan.id
                ),
            });
        }

        let outcome = reverse_allocation(payment, &loan.balance_snapshot())?;

        let now = time_provider.now();
        loan.current_balance = outcome.new_balance;
        loan.total_paid = outcome.new_total_paid;

        if loan.status != outcome.new_status {
            let old_status = loan.status;
            loan.update_status(outcome.new_status, now);

            self.events.emit(Event::StatusChanged {
                loan_id: loan.id,
                old_status,
                new_status: outcome.new_status,
                reason: "payment cancelled".to_string(),
                timestamp: now,
            });
        }

        payment.mark_cancelled(reason.clone(), now);

        self.events.emit(Event::PaymentCancelled {
            loan_id: loan.id,
            payment_id: payment.id,
            amount: payment.amount,
            restored_balance: outcome.new_balance,
            reason,
            timestamp: now,
        });

        if let Some(agent_id) = self.agent_for(loan) {
            let basis = self
                .config
                .commission_basis
                .amount_from(payment.amount, payment.applied_to_interest);
            let commission =
                ledger.reverse_commission(agent_id, basis, self.config.default_commission_rate);

            self.events.emit(Event::CommissionReversed {
                agent_id,
                loan_id: loan.id,
                basis_amount: basis,
                commission,
                timestamp: now,
            });
        }

        Ok(())
    }

    /// record a cashout request against an agent's collectible earnings
    pub fn request_cashout(
        &mut self,
        ledger: &EarningsLedger,
        agent_id: AgentId,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Cashout> {
        let now = time_provider.now();
        let cashout = ledger.request_cashout(agent_id, amount, now)?;

        self.events.emit(Event::CashoutRequested {
            cashout_id: cashout.id,
            agent_id,
            amount,
            timestamp: now,
        });

        Ok(cashout)
    }

    /// approve a pending cashout, moving funds out of collectible
    pub fn approve_cashout(
        &mut self,
        ledger: &mut EarningsLedger,
        cashout: &mut Cashout,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        ledger.approve_cashout(cashout, now)?;

        self.events.emit(Event::CashoutApproved {
            cashout_id: cashout.id,
            agent_id: cashout.agent_id,
            amount: cashout.amount,
            timestamp: now,
        });

        Ok(())
    }

    /// reject a pending cashout with a reason; no balances move
    pub fn reject_cashout(
        &mut self,
        ledger: &EarningsLedger,
        cashout: &mut Cashout,
        reason: String,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        ledger.reject_cashout(cashout, reason.clone(), now)?;

        self.events.emit(Event::CashoutRejected {
            cashout_id: cashout.id,
            agent_id: cashout.agent_id,
            reason,
            timestamp: now,
        });

        Ok(())
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn agent_for(&self, loan: &Loan) -> Option<AgentId> {
        self.accounts
            .find(loan.account_id)
            .and_then(|account| account.agent_id)
    }
}
