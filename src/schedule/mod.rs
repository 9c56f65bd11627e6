pub mod cadence;
pub mod generator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ServicingError};
use crate::types::PaymentFrequency;

pub use cadence::{days_in_month, due_date, is_leap_year};
pub use generator::{generate_schedule, RepaymentSchedule, ScheduleEntry};

/// policy cap on loan length
pub const MAX_TENURE_MONTHS: u32 = 360;

/// immutable inputs to schedule generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub tenure_months: u32,
    pub payment_frequency: PaymentFrequency,
    pub first_payment_date: NaiveDate,
}

impl LoanTerms {
    /// boundary validation, rejected before any schedule is built
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(ServicingError::Validation {
                message: format!("principal must be positive, got {}", self.principal),
            });
        }
        if self.annual_rate < Rate::ZERO {
            return Err(ServicingError::Validation {
                message: format!("interest rate cannot be negative, got {}", self.annual_rate),
            });
        }
        if self.annual_rate > Rate::ONE {
            return Err(ServicingError::Validation {
                message: format!("interest rate cannot exceed 100%, got {}", self.annual_rate),
            });
        }
        if self.tenure_months == 0 {
            return Err(ServicingError::Validation {
                message: "tenure must be at least one month".to_string(),
            });
        }
        if self.tenure_months > MAX_TENURE_MONTHS {
            return Err(ServicingError::Validation {
                message: format!(
                    "tenure of {} months exceeds the {} month maximum",
                    self.tenure_months, MAX_TENURE_MONTHS
                ),
            });
        }
        Ok(())
    }

    /// number of scheduled payments over the full tenure
    pub fn total_payments(&self) -> u32 {
        let per_year = self.payment_frequency.payments_per_year();
        (self.tenure_months * per_year).div_ceil(12)
    }
}
