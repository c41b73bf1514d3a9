use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax already collected against the filing period's liability.
///
/// Withheld-at-source entries count unconditionally. Dated entries are
/// classified by the paid-tax aggregator as advance tax (paid inside the
/// period) or self-assessment tax (paid outside it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxPaymentRecord {
    WithheldAtSource {
        amount: Decimal,
    },
    SelfAssessmentOrAdvance {
        paid_on: NaiveDate,
        amount: Decimal,
    },
}
