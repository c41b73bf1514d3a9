//! Health and education cess: a flat 4% levy on the post-rebate,
//! post-surcharge liability. Runs after rebate and surcharge, never
//! before.

use rust_decimal::Decimal;

fn cess_rate() -> Decimal {
    Decimal::new(4, 2)
}

/// `(tax + surcharge − rebate) × 4%`. No brackets, no cap.
pub fn health_and_education_cess(
    tax_liability: Decimal,
    surcharge: Decimal,
    rebate: Decimal,
) -> Decimal {
    (tax_liability + surcharge - rebate) * cess_rate()
}
