//! High-income surcharge tiers.
//!
//! The tier a taxpayer lands in applies its rate to the income above
//! that tier's own lower bound only; lower tiers are not layered in.
//! This mirrors the source system exactly, including its departure from
//! textbook marginal-surcharge design.

use rust_decimal::Decimal;

use crate::models::TaxRegime;

fn lakh(n: i64) -> Decimal {
    Decimal::from(n * 100_000)
}

/// Surcharge for the given total income.
pub fn surcharge(
    total_income: Decimal,
    regime: TaxRegime,
) -> Decimal {
    let rate_pct = |pct: i64| Decimal::new(pct, 2);

    if total_income <= lakh(50) {
        Decimal::ZERO
    } else if total_income <= lakh(100) {
        (total_income - lakh(50)) * rate_pct(10)
    } else if total_income <= lakh(200) {
        (total_income - lakh(100)) * rate_pct(15)
    } else if total_income <= lakh(500) {
        (total_income - lakh(200)) * rate_pct(25)
    } else {
        let top_rate = match regime {
            TaxRegime::Old => rate_pct(37),
            TaxRegime::New => rate_pct(25),
        };
        (total_income - lakh(500)) * top_rate
    }
}
