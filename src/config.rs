use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// which amount commission is computed on
///
/// historically the payment path accrued on the gross payment while a
/// reporting view recomputed on the interest portion; the basis is now
/// chosen once here and used for accrual, reversal, and reporting alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionBasis {
    /// full payment amount
    GrossPayment,
    /// interest component of the allocation only
    InterestPortion,
}

impl CommissionBasis {
    /// pick the basis amount from a payment's components
    pub fn amount_from(&self, gross: Money, interest_portion: Money) -> Money {
        match self {
            CommissionBasis::GrossPayment => gross,
            CommissionBasis::InterestPortion => interest_portion,
        }
    }
}

/// servicing policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicingConfig {
    pub commission_basis: CommissionBasis,
    /// rate used when an agent earns for the first time
    pub default_commission_rate: Rate,
}

impl Default for ServicingConfig {
    fn default() -> Self {
        Self {
            commission_basis: CommissionBasis::GrossPayment,
            default_commission_rate: Rate::from_decimal(dec!(0.10)),
        }
    }
}

impl ServicingConfig {
    /// preset accruing commission on the interest portion
    pub fn interest_based_commission() -> Self {
        Self {
            commission_basis: CommissionBasis::InterestPortion,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_is_ten_percent() {
        let config = ServicingConfig::default();
        assert_eq!(config.default_commission_rate.as_percentage(), dec!(10));
        assert_eq!(config.commission_basis, CommissionBasis::GrossPayment);
    }

    #[test]
    fn test_interest_preset() {
        let config = ServicingConfig::interest_based_commission();
        assert_eq!(config.commission_basis, CommissionBasis::InterestPortion);
        assert_eq!(config.default_commission_rate, Rate::from_decimal(dec!(0.10)));
    }

    #[test]
    fn test_basis_selection() {
        let gross = Money::from_major(1_000);
        let interest = Money::from_major(120);
        assert_eq!(CommissionBasis::GrossPayment.amount_from(gross, interest), gross);
        assert_eq!(
            CommissionBasis::InterestPortion.amount_from(gross, interest),
            interest
        );
    }
}
