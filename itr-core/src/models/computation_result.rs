use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::regime::TaxRegime;

/// Breakdown of tax already collected, by channel. The three channels
/// are disjoint and sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPaidBreakdown {
    pub tds: Decimal,
    pub self_assessment: Decimal,
    pub advance_tax: Decimal,
    pub total: Decimal,
}

/// The three underpayment interest charges and their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestBreakdown {
    pub section_234a: Decimal,
    pub section_234b: Decimal,
    pub section_234c: Decimal,
    pub total: Decimal,
}

/// Full computation output for one filing period under one regime.
///
/// Created fresh on every computation and never mutated afterwards;
/// recomputing a regime replaces the stored result. Every monetary field
/// is rounded to the nearest whole currency unit (half-up) at assembly;
/// `tax_payable` is signed — negative means a refund is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationResult {
    pub filing_period_id: String,
    pub regime: TaxRegime,

    // Category subtotals
    pub salary_income: Decimal,
    pub rental_income: Decimal,
    pub capital_gains_income: Decimal,
    pub business_income: Decimal,
    pub other_income: Decimal,
    pub exempt_income: Decimal,

    // Income to tax
    pub gross_total_income: Decimal,
    pub total_deductions: Decimal,
    pub total_income: Decimal,

    // Liability pipeline
    pub tax_liability: Decimal,
    pub tax_rebate: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub net_tax_payable: Decimal,

    // Settlement
    pub tax_paid: TaxPaidBreakdown,
    pub interest: InterestBreakdown,
    pub penalty_234f: Decimal,
    pub balance_tax_to_be_paid: Decimal,
    pub tax_payable: Decimal,
}
