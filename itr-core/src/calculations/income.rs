//! Income aggregation: turns a filing period's itemized records into
//! per-category totals and a gross total, with no rounding anywhere in
//! this stage.
//!
//! Salary is the one regime-dependent category: both regimes subtract
//! the base standard deduction, but only the old regime additionally
//! subtracts the HRA exemption. Everything else aggregates identically
//! under either regime.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{AssetType, IncomeRecord, OccupancyStatus, TaxRegime};

/// Base standard deduction applied to every salary record.
fn standard_deduction() -> Decimal {
    Decimal::from(50_000)
}

/// HRA basic-pay factor: 50% in a metro city, 40% elsewhere.
fn hra_basic_factor(in_metro_city: bool) -> Decimal {
    if in_metro_city {
        Decimal::new(50, 2)
    } else {
        Decimal::new(40, 2)
    }
}

/// Rent offset in the HRA exemption: 10% of basic pay.
fn rent_offset_factor() -> Decimal {
    Decimal::new(10, 2)
}

/// Standard deduction on house property: 30% of net annual value.
fn rental_standard_factor() -> Decimal {
    Decimal::new(30, 2)
}

/// Per-category income totals for one filing period under one regime.
///
/// Every total is independently computable and `gross_total_income` is
/// the exact sum of the taxable categories — exempt income (agriculture
/// plus other exempt receipts) is reported but excluded from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub salary: Decimal,
    pub rental: Decimal,

    /// Long-term gains on §112A-eligible listed securities.
    pub ltcg_112a: Decimal,
    /// Long-term gains on every other asset class.
    pub ltcg_other: Decimal,
    /// Short-term gains, all asset classes.
    pub stcg: Decimal,
    pub capital_gains: Decimal,

    pub business: Decimal,

    pub interest: Decimal,
    pub dividend: Decimal,
    pub betting: Decimal,
    /// interest + dividend + betting.
    pub other_income: Decimal,

    pub agriculture: Decimal,
    pub exempt: Decimal,
    /// agriculture + exempt.
    pub exempt_income: Decimal,

    /// Interest flagged as coming from savings accounts, tracked for the
    /// savings-interest exemption.
    pub savings_account_interest: Decimal,

    pub gross_total_income: Decimal,
}

/// Sums each income category for the given regime.
pub fn aggregate_income(
    records: &[IncomeRecord],
    regime: TaxRegime,
) -> IncomeSummary {
    let mut summary = IncomeSummary::default();

    for record in records {
        match record {
            IncomeRecord::Salary {
                gross_salary,
                basic,
                hra_received,
                rent_paid,
                in_metro_city,
            } => {
                summary.salary += net_salary(
                    *gross_salary,
                    *basic,
                    *hra_received,
                    *rent_paid,
                    *in_metro_city,
                    regime,
                );
            }
            IncomeRecord::Rental {
                annual_rent,
                property_tax_paid,
                interest_on_borrowed_capital,
                occupancy,
            } => {
                summary.rental += net_rental(
                    *annual_rent,
                    *property_tax_paid,
                    *interest_on_borrowed_capital,
                    *occupancy,
                );
            }
            IncomeRecord::CapitalGain {
                asset_type,
                long_term,
                gain_amount,
            } => match (asset_type, long_term) {
                (AssetType::ListedEquity, true) => summary.ltcg_112a += *gain_amount,
                (_, true) => summary.ltcg_other += *gain_amount,
                (_, false) => summary.stcg += *gain_amount,
            },
            IncomeRecord::Business {
                cash_profit,
                bank_profit,
            } => {
                summary.business += *cash_profit + *bank_profit;
            }
            IncomeRecord::Agriculture { amount } => summary.agriculture += *amount,
            IncomeRecord::Exempt { amount } => summary.exempt += *amount,
            IncomeRecord::Interest {
                amount,
                from_savings_account,
            } => {
                summary.interest += *amount;
                if *from_savings_account {
                    summary.savings_account_interest += *amount;
                }
            }
            IncomeRecord::Dividend { amount } => summary.dividend += *amount,
            IncomeRecord::Betting { amount } => summary.betting += *amount,
        }
    }

    summary.capital_gains = summary.ltcg_112a + summary.ltcg_other + summary.stcg;
    summary.other_income = summary.interest + summary.dividend + summary.betting;
    summary.exempt_income = summary.agriculture + summary.exempt;
    summary.gross_total_income = summary.salary
        + summary.rental
        + summary.capital_gains
        + summary.business
        + summary.other_income;

    summary
}

/// Net taxable salary for one record.
///
/// The HRA exemption is `min(hra received, basic × 0.50 or 0.40, rent
/// paid − basic × 0.10)`, floored at zero; only the old regime subtracts
/// it. The record's net salary never goes below zero — the deductions
/// cannot manufacture a salary loss.
fn net_salary(
    gross_salary: Decimal,
    basic: Decimal,
    hra_received: Decimal,
    rent_paid: Decimal,
    in_metro_city: bool,
    regime: TaxRegime,
) -> Decimal {
    let net = match regime {
        TaxRegime::Old => {
            let exemption =
                hra_exemption(basic, hra_received, rent_paid, in_metro_city);
            gross_salary - standard_deduction() - exemption
        }
        TaxRegime::New => gross_salary - standard_deduction(),
    };
    net.max(Decimal::ZERO)
}

fn hra_exemption(
    basic: Decimal,
    hra_received: Decimal,
    rent_paid: Decimal,
    in_metro_city: bool,
) -> Decimal {
    let basic_share = basic * hra_basic_factor(in_metro_city);
    let rent_excess = rent_paid - basic * rent_offset_factor();
    hra_received.min(basic_share).min(rent_excess).max(Decimal::ZERO)
}

/// Net rental income for one property.
///
/// Property tax reduces the annual value only for let-out properties;
/// the 30% standard deduction applies to the net annual value, and
/// interest on borrowed capital comes off after that. The result may be
/// negative (a loss from house property).
fn net_rental(
    annual_rent: Decimal,
    property_tax_paid: Decimal,
    interest_on_borrowed_capital: Decimal,
    occupancy: OccupancyStatus,
) -> Decimal {
    let net_annual_value = match occupancy {
        OccupancyStatus::LetOut => annual_rent - property_tax_paid,
        OccupancyStatus::SelfOccupied => annual_rent,
    };
    let net = net_annual_value
        - net_annual_value * rental_standard_factor()
        - interest_on_borrowed_capital;

    if net < Decimal::ZERO {
        warn!(
            annual_rent = %annual_rent,
            interest_on_borrowed_capital = %interest_on_borrowed_capital,
            net = %net,
            "net rental income is negative"
        );
    }
    net
}
