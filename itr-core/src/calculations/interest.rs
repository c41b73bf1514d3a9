//! Underpayment interest (§234A/B/C) and the late-filing penalty
//! (§234F).
//!
//! All three interest charges work off the same balance:
//! `net_tax_payable − advance_tax − tds`. The multipliers are the flat
//! ones the source system uses — nine months for §234B and three months
//! per missed checkpoint for §234C — not day-counted interest.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::tax_paid::AdvanceInstallment;
use crate::models::{FilingPeriod, InterestBreakdown};

/// 1% simple interest per month.
fn monthly_rate() -> Decimal {
    Decimal::new(1, 2)
}

/// §234B applies when advance tax falls short of 90% of the liability.
fn advance_coverage_factor() -> Decimal {
    Decimal::new(90, 2)
}

/// Everything the interest and penalty formulas need for one regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestPenaltyInput<'a> {
    pub net_tax_payable: Decimal,
    pub total_income: Decimal,
    pub tds: Decimal,
    pub advance_tax: Decimal,
    pub advance_installments: &'a [AdvanceInstallment],
    pub period: &'a FilingPeriod,
    pub filing_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPenaltyResult {
    /// `net_tax_payable − advance_tax − tds`, signed; negative means the
    /// period is already overpaid.
    pub balance: Decimal,
    pub interest: InterestBreakdown,
    pub penalty_234f: Decimal,
}

/// Computes the three interest charges and the §234F penalty.
pub fn calculate(input: &InterestPenaltyInput<'_>) -> InterestPenaltyResult {
    let balance = input.net_tax_payable - input.advance_tax - input.tds;
    if balance < Decimal::ZERO {
        warn!(%balance, "tax paid exceeds liability; no interest accrues");
    }

    let section_234a = interest_234a(balance, input.period.due_date, input.filing_date);
    let section_234b = interest_234b(balance, input.net_tax_payable, input.advance_tax);
    let section_234c = interest_234c(
        input.net_tax_payable,
        input.advance_installments,
        input.period,
    );
    let penalty_234f = penalty_234f(input.total_income, input.period.due_date, input.filing_date);

    InterestPenaltyResult {
        balance,
        interest: InterestBreakdown {
            section_234a,
            section_234b,
            section_234c,
            total: section_234a + section_234b + section_234c,
        },
        penalty_234f,
    }
}

/// §234A — late filing: 1% per whole month between due date and filing
/// date, counted on calendar months with no day-of-month proration.
pub fn interest_234a(
    balance: Decimal,
    due_date: NaiveDate,
    filing_date: NaiveDate,
) -> Decimal {
    if filing_date <= due_date {
        return Decimal::ZERO;
    }
    let months_late = (filing_date.year() - due_date.year()) * 12
        + (filing_date.month() as i32 - due_date.month() as i32);
    if months_late <= 0 {
        return Decimal::ZERO;
    }
    balance.max(Decimal::ZERO) * monthly_rate() * Decimal::from(months_late)
}

/// §234B — advance-tax shortfall: zero when advance tax covered at
/// least 90% of the liability, otherwise a flat nine months of interest
/// on the balance.
pub fn interest_234b(
    balance: Decimal,
    net_tax_payable: Decimal,
    advance_tax: Decimal,
) -> Decimal {
    if advance_tax >= net_tax_payable * advance_coverage_factor() {
        return Decimal::ZERO;
    }
    balance.max(Decimal::ZERO) * monthly_rate() * Decimal::from(9)
}

/// §234C — installment shortfall: four cumulative checkpoints, each
/// evaluated independently, each missed one accruing three months of
/// interest on its own shortfall.
pub fn interest_234c(
    net_tax_payable: Decimal,
    installments: &[AdvanceInstallment],
    period: &FilingPeriod,
) -> Decimal {
    let mut interest = Decimal::ZERO;
    for (checkpoint, required_fraction) in installment_checkpoints(period) {
        let paid_by_checkpoint: Decimal = installments
            .iter()
            .filter(|i| i.paid_on <= checkpoint)
            .map(|i| i.amount)
            .sum();
        let required = net_tax_payable * required_fraction;
        let shortfall = required - paid_by_checkpoint;
        if shortfall > Decimal::ZERO {
            interest += shortfall * monthly_rate() * Decimal::from(3);
        }
    }
    interest
}

/// §234F — late-filing penalty: a flat fee, tiered first by total
/// income (the small-income tier takes precedence) and then by how far
/// past the due date's calendar year the return landed.
pub fn penalty_234f(
    total_income: Decimal,
    due_date: NaiveDate,
    filing_date: NaiveDate,
) -> Decimal {
    if filing_date <= due_date {
        return Decimal::ZERO;
    }
    if total_income <= Decimal::from(500_000) {
        return Decimal::from(1_000);
    }
    if filing_date.year() == due_date.year() {
        Decimal::from(5_000)
    } else {
        Decimal::from(10_000)
    }
}

/// The four cumulative advance-tax checkpoints for a period: 15% by
/// mid-June, 45% by mid-September, 75% by mid-December, 100% by
/// mid-March of the fiscal year end.
fn installment_checkpoints(period: &FilingPeriod) -> Vec<(NaiveDate, Decimal)> {
    let start_year = period.start_date.year();
    let end_year = period.end_date.year();
    [
        (start_year, 6, 15, 15),
        (start_year, 9, 15, 45),
        (start_year, 12, 15, 75),
        (end_year, 3, 15, 100),
    ]
    .into_iter()
    .filter_map(|(year, month, day, pct)| {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| (date, Decimal::new(pct, 2)))
    })
    .collect()
}
