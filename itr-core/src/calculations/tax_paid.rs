//! Aggregation of tax already collected: TDS, advance tax, and
//! self-assessment tax.
//!
//! Dated payments inside the filing period's window count as advance
//! tax; anything dated outside it is self-assessment tax. The three
//! totals are disjoint and sum to `total`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{FilingPeriod, TaxPaymentRecord};

/// One advance-tax payment, retained with its date for the installment
/// checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceInstallment {
    pub paid_on: NaiveDate,
    pub amount: Decimal,
}

/// Totals of tax already collected for a filing period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPaidSummary {
    pub tds: Decimal,
    pub self_assessment: Decimal,
    pub advance_tax: Decimal,
    pub total: Decimal,
    /// Dated advance payments, in input order.
    pub advance_installments: Vec<AdvanceInstallment>,
}

/// Sums payment records and classifies dated entries against the
/// period's advance-tax window.
pub fn aggregate_tax_paid(
    payments: &[TaxPaymentRecord],
    period: &FilingPeriod,
) -> TaxPaidSummary {
    let mut summary = TaxPaidSummary::default();

    for payment in payments {
        match payment {
            TaxPaymentRecord::WithheldAtSource { amount } => {
                summary.tds += *amount;
            }
            TaxPaymentRecord::SelfAssessmentOrAdvance { paid_on, amount } => {
                if period.contains(*paid_on) {
                    summary.advance_tax += *amount;
                    summary.advance_installments.push(AdvanceInstallment {
                        paid_on: *paid_on,
                        amount: *amount,
                    });
                } else {
                    if *paid_on < period.start_date {
                        warn!(
                            paid_on = %paid_on,
                            period_start = %period.start_date,
                            "payment dated before the filing period; \
                             classified as self-assessment"
                        );
                    }
                    summary.self_assessment += *amount;
                }
            }
        }
    }

    summary.total = summary.tds + summary.self_assessment + summary.advance_tax;
    summary
}
