use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Itemized deduction inputs for one filing period.
///
/// Holds raw declared amounts only; the capped bucket totals are derived
/// by the deduction calculator and never stored back here. A period with
/// no profile simply has zero deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionProfile {
    // Savings-instrument bucket (80C)
    pub life_insurance_premium: Decimal,
    pub provident_fund: Decimal,
    pub elss_investment: Decimal,
    pub home_loan_principal: Decimal,
    pub tuition_fees: Decimal,
    pub stamp_duty: Decimal,
    pub other_80c: Decimal,

    // Pension-contribution bucket (80CCD)
    pub pension_contribution_self: Decimal,
    pub pension_contribution_employer: Decimal,

    // Medical-insurance bucket (80D), split self/parents
    pub health_insurance_self: Decimal,
    pub health_checkup_self: Decimal,
    pub medical_expenditure_self: Decimal,
    pub health_insurance_parents: Decimal,
    pub health_checkup_parents: Decimal,
    pub medical_expenditure_parents: Decimal,

    /// Taxpayer is a senior citizen. Stored for the reporting layer; no
    /// cap in this engine depends on it.
    pub senior_citizen: bool,
    /// Parents are senior citizens; selects the higher 80D ceiling.
    pub senior_citizen_parents: bool,
}

impl DeductionProfile {
    /// Sum of the savings-instrument bucket's itemized inputs, before
    /// the statutory cap.
    pub fn savings_instrument_total(&self) -> Decimal {
        self.life_insurance_premium
            + self.provident_fund
            + self.elss_investment
            + self.home_loan_principal
            + self.tuition_fees
            + self.stamp_duty
            + self.other_80c
    }

    /// Sum of self and employer pension contributions.
    pub fn pension_total(&self) -> Decimal {
        self.pension_contribution_self + self.pension_contribution_employer
    }

    /// Sum of all six medical sub-fields, before the cap.
    pub fn medical_total(&self) -> Decimal {
        self.health_insurance_self
            + self.health_checkup_self
            + self.medical_expenditure_self
            + self.health_insurance_parents
            + self.health_checkup_parents
            + self.medical_expenditure_parents
    }
}
