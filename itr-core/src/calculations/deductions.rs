//! Deduction buckets: four independent statutory caps applied to a
//! period's declared deduction inputs.
//!
//! The caps never interact — overflowing one bucket does not shift
//! allowance into another. A period with no deduction profile simply
//! deducts nothing; that is not an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::DeductionProfile;

/// Savings-instrument (80C) ceiling.
fn savings_instrument_cap() -> Decimal {
    Decimal::from(150_000)
}

/// Medical-insurance (80D) ceiling without senior-citizen parents.
fn medical_cap() -> Decimal {
    Decimal::from(100_000)
}

/// Medical-insurance (80D) ceiling with senior-citizen parents.
fn medical_cap_senior_parents() -> Decimal {
    Decimal::from(150_000)
}

/// Savings-account interest (80TTA) ceiling.
fn savings_interest_cap() -> Decimal {
    Decimal::from(10_000)
}

/// Capped deduction bucket totals for one filing period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSummary {
    /// Savings-instrument bucket, capped at 150,000.
    pub section_80c: Decimal,
    /// Pension contributions (self + employer), uncapped.
    pub section_80ccd: Decimal,
    /// Medical-insurance bucket, ceiling depends on the
    /// senior-citizen-parents flag.
    pub section_80d: Decimal,
    /// Savings-account interest exemption, capped at 10,000.
    pub section_80tta: Decimal,
    pub total: Decimal,
}

/// Applies the four caps to a period's deduction inputs.
///
/// `savings_interest` is the aggregated savings-account interest from
/// the period's income records; it only earns the exemption when a
/// deduction profile exists for the period.
pub fn calculate_deductions(
    profile: Option<&DeductionProfile>,
    savings_interest: Decimal,
) -> DeductionSummary {
    let Some(profile) = profile else {
        debug!("no deduction profile for period; all buckets are zero");
        return DeductionSummary::default();
    };

    let section_80c = profile.savings_instrument_total().min(savings_instrument_cap());
    let section_80ccd = profile.pension_total();
    let medical_ceiling = if profile.senior_citizen_parents {
        medical_cap_senior_parents()
    } else {
        medical_cap()
    };
    let section_80d = profile.medical_total().min(medical_ceiling);
    let section_80tta = savings_interest.min(savings_interest_cap());

    DeductionSummary {
        section_80c,
        section_80ccd,
        section_80d,
        section_80tta,
        total: section_80c + section_80ccd + section_80d + section_80tta,
    }
}
