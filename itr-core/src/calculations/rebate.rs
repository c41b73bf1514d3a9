//! Small-taxpayer rebate (§87A): a cliff-edge rule with no phase-out.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::TaxRegime;

fn threshold(regime: TaxRegime) -> Decimal {
    match regime {
        TaxRegime::Old => Decimal::from(500_000),
        TaxRegime::New => Decimal::from(700_000),
    }
}

fn cap(regime: TaxRegime) -> Decimal {
    match regime {
        TaxRegime::Old => Decimal::from(12_500),
        TaxRegime::New => Decimal::from(25_000),
    }
}

/// Rebate against gross tax liability.
///
/// Income at or below the regime's threshold earns `min(cap, tax)`;
/// one rupee above it earns nothing.
pub fn rebate_87a(
    total_income: Decimal,
    tax_liability: Decimal,
    regime: TaxRegime,
) -> Decimal {
    if total_income > threshold(regime) {
        return Decimal::ZERO;
    }
    let rebate = cap(regime).min(tax_liability);
    if rebate == tax_liability && rebate > Decimal::ZERO {
        debug!(%total_income, %rebate, "rebate fully offsets tax liability");
    }
    rebate
}
