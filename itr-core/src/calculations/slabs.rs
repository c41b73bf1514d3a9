//! Progressive slab tables and the marginal tax walk.
//!
//! Each slab taxes only its own slice of income, so the function is
//! continuous at every boundary and monotonic non-decreasing in income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TaxRegime;

/// One slab of a regime's schedule. `upper` is `None` for the open-ended
/// top slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// The statutory slab schedule for a regime, ordered by `lower`.
pub fn slab_schedule(regime: TaxRegime) -> Vec<TaxSlab> {
    let slab = |lower: i64, upper: Option<i64>, rate_pct: i64| TaxSlab {
        lower: Decimal::from(lower),
        upper: upper.map(Decimal::from),
        rate: Decimal::new(rate_pct, 2),
    };

    match regime {
        TaxRegime::Old => vec![
            slab(0, Some(250_000), 0),
            slab(250_000, Some(500_000), 5),
            slab(500_000, Some(1_000_000), 20),
            slab(1_000_000, None, 30),
        ],
        TaxRegime::New => vec![
            slab(0, Some(300_000), 0),
            slab(300_000, Some(600_000), 5),
            slab(600_000, Some(900_000), 10),
            slab(900_000, Some(1_200_000), 15),
            slab(1_200_000, Some(1_500_000), 20),
            slab(1_500_000, None, 30),
        ],
    }
}

/// Gross tax liability for the given taxable income under a regime's
/// slab schedule, taxing each slice at its own rate.
pub fn slab_tax(
    taxable_income: Decimal,
    regime: TaxRegime,
) -> Decimal {
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut tax = Decimal::ZERO;
    for slab in slab_schedule(regime) {
        if taxable_income <= slab.lower {
            break;
        }
        let slice_top = match slab.upper {
            Some(upper) => taxable_income.min(upper),
            None => taxable_income,
        };
        tax += (slice_top - slab.lower) * slab.rate;
    }
    tax
}
