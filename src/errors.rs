use thiserror::Error;

use crate::decimal::Money;
use crate::types::{AccountStatus, CashoutStatus, LoanStatus, PaymentStatus};

#[derive(Error, Debug)]
pub enum ServicingError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("loan not active: current status is {status:?}")]
    LoanNotActive {
        status: LoanStatus,
    },

    #[error("operation {operation} not permitted while loan is {current:?}")]
    StateConflict {
        current: LoanStatus,
        operation: &'static str,
    },

    #[error("payment cannot be cancelled: current status is {status:?}")]
    PaymentNotCancellable {
        status: PaymentStatus,
    },

    #[error("account not active: current status is {status:?}")]
    AccountNotActive {
        status: AccountStatus,
    },

    #[error("account not found: {id}")]
    AccountNotFound {
        id: uuid::Uuid,
    },

    #[error("a reason is required for {operation}")]
    EmptyReason {
        operation: &'static str,
    },

    #[error("insufficient collectible earnings: available {available}, requested {requested}")]
    InsufficientCollectible {
        available: Money,
        requested: Money,
    },

    #[error("cashout not pending: current status is {status:?}")]
    CashoutNotPending {
        status: CashoutStatus,
    },

    #[error("no earnings record for agent: {agent_id}")]
    AgentNotFound {
        agent_id: uuid::Uuid,
    },

    #[error("arithmetic inconsistency: {message}")]
    ArithmeticInconsistency {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ServicingError>;
