pub mod accounts;
pub mod config;
pub mod decimal;
pub mod earnings;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod payments;
pub mod penalties;
pub mod schedule;
pub mod serialization;
pub mod state;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{Result, ServicingError};
pub use events::{Event, EventStore};
pub use accounts::{Account, AccountDirectory, InMemoryAccountDirectory};
pub use config::{CommissionBasis, ServicingConfig};
pub use earnings::{AgentEarnings, Cashout, EarningsLedger};
pub use lifecycle::LoanServicer;
pub use payments::{
    allocate_payment, reverse_allocation, AllocationOutcome, LoanBalanceSnapshot, PaymentRecord,
    ReversalOutcome,
};
pub use penalties::{plan_settlement, Penalty, PenaltySettlement};
pub use schedule::{
    due_date, generate_schedule, LoanTerms, RepaymentSchedule, ScheduleEntry, MAX_TENURE_MONTHS,
};
pub use serialization::{EarningsView, LoanView};
pub use state::Loan;
pub use types::{
    AccountId, AccountStatus, AgentId, CashoutId, CashoutStatus, LoanId, LoanStatus,
    PaymentAllocation, PaymentFrequency, PaymentId, PaymentStatus, PenaltyId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
