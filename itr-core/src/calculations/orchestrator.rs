//! End-to-end computation for one filing period.
//!
//! `compute_regime` is the pure pipeline: aggregate income, cap
//! deductions, walk the slabs, apply rebate, surcharge and cess, settle
//! against tax already paid, and price the shortfall. The orchestrator
//! wraps it with record retrieval and result persistence and can run
//! both regimes to recommend the cheaper one. Regime runs share no
//! state; running "both" is two fully independent computations.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::cess::health_and_education_cess;
use crate::calculations::common::{max, round_rupee};
use crate::calculations::deductions::calculate_deductions;
use crate::calculations::income::aggregate_income;
use crate::calculations::interest::{self, InterestPenaltyInput};
use crate::calculations::rebate::rebate_87a;
use crate::calculations::slabs::slab_tax;
use crate::calculations::surcharge::surcharge;
use crate::calculations::tax_paid::aggregate_tax_paid;
use crate::db::repository::{FilingRepository, RepositoryError};
use crate::models::{
    ComputationResult, DeductionProfile, FilingPeriod, FilingPeriodError, IncomeRecord,
    InterestBreakdown, InvalidRegime, RegimeSelection, TaxPaidBreakdown, TaxPaymentRecord,
    TaxRegime,
};

#[derive(Debug, Error)]
pub enum ComputationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    FilingPeriod(#[from] FilingPeriodError),

    #[error(transparent)]
    Regime(#[from] InvalidRegime),
}

/// One computation request: which period, which regime(s), and the
/// filing date §234A/§234F should assume (today when omitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationRequest {
    pub filing_period_id: String,
    pub regime: RegimeSelection,
    pub filing_date: Option<NaiveDate>,
}

/// Results for every regime that was run, plus a recommendation when
/// both were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationOutcome {
    pub results: Vec<ComputationResult>,
    /// The regime with the lower final payable, only set when both
    /// regimes were computed. Ties go to the old regime.
    pub recommended_regime: Option<TaxRegime>,
}

/// Runs the computation pipeline against a repository.
pub struct ComputationOrchestrator {
    repository: Arc<dyn FilingRepository>,
}

impl ComputationOrchestrator {
    pub fn new(repository: Arc<dyn FilingRepository>) -> Self {
        Self { repository }
    }

    /// Loads the period's records, runs each requested regime, persists
    /// each result (upsert per regime), and returns the outcome.
    pub async fn compute(
        &self,
        request: &ComputationRequest,
    ) -> Result<ComputationOutcome, ComputationError> {
        let period = self
            .repository
            .get_filing_period(&request.filing_period_id)
            .await?;
        period.validate()?;

        let records = self
            .repository
            .list_income_records(&request.filing_period_id)
            .await?;
        let profile = self
            .repository
            .get_deduction_profile(&request.filing_period_id)
            .await?;
        let payments = self
            .repository
            .list_tax_payments(&request.filing_period_id)
            .await?;

        let filing_date = request
            .filing_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut results = Vec::new();
        for regime in request.regime.regimes() {
            debug!(
                period = %period.id,
                regime = regime.as_str(),
                "computing regime"
            );
            let result = compute_regime(
                &period,
                &records,
                profile.as_ref(),
                &payments,
                regime,
                filing_date,
            );
            self.repository.save_computation(&result).await?;
            results.push(result);
        }

        let recommended_regime = if request.regime == RegimeSelection::Both {
            results
                .iter()
                .min_by_key(|r| r.tax_payable)
                .map(|r| r.regime)
        } else {
            None
        };

        Ok(ComputationOutcome {
            results,
            recommended_regime,
        })
    }
}

/// The pure per-regime pipeline. Deterministic: identical inputs always
/// produce field-for-field identical results.
pub fn compute_regime(
    period: &FilingPeriod,
    records: &[IncomeRecord],
    profile: Option<&DeductionProfile>,
    payments: &[TaxPaymentRecord],
    regime: TaxRegime,
    filing_date: NaiveDate,
) -> ComputationResult {
    let income = aggregate_income(records, regime);
    let deductions = calculate_deductions(profile, income.savings_account_interest);

    let total_income = max(income.gross_total_income - deductions.total, Decimal::ZERO);
    let tax_liability = slab_tax(total_income, regime);
    let tax_rebate = rebate_87a(total_income, tax_liability, regime);
    let surcharge_amount = surcharge(total_income, regime);
    let cess = health_and_education_cess(tax_liability, surcharge_amount, tax_rebate);
    let net_tax_payable = tax_liability - tax_rebate + surcharge_amount + cess;

    let paid = aggregate_tax_paid(payments, period);
    let settlement = interest::calculate(&InterestPenaltyInput {
        net_tax_payable,
        total_income,
        tds: paid.tds,
        advance_tax: paid.advance_tax,
        advance_installments: &paid.advance_installments,
        period,
        filing_date,
    });

    // Whole-rupee rounding happens here and only here. Dependent fields
    // are rebuilt from the rounded components so the published figures
    // stay additive.
    let tds = round_rupee(paid.tds);
    let self_assessment = round_rupee(paid.self_assessment);
    let advance_tax = round_rupee(paid.advance_tax);
    let net_tax_payable_r = round_rupee(net_tax_payable);
    let section_234a = round_rupee(settlement.interest.section_234a);
    let section_234b = round_rupee(settlement.interest.section_234b);
    let section_234c = round_rupee(settlement.interest.section_234c);
    let interest_total = section_234a + section_234b + section_234c;
    let penalty_234f = round_rupee(settlement.penalty_234f);
    let balance_tax_to_be_paid = net_tax_payable_r - advance_tax - tds;
    let tax_payable = balance_tax_to_be_paid + interest_total + penalty_234f;

    ComputationResult {
        filing_period_id: period.id.clone(),
        regime,
        salary_income: round_rupee(income.salary),
        rental_income: round_rupee(income.rental),
        capital_gains_income: round_rupee(income.capital_gains),
        business_income: round_rupee(income.business),
        other_income: round_rupee(income.other_income),
        exempt_income: round_rupee(income.exempt_income),
        gross_total_income: round_rupee(income.gross_total_income),
        total_deductions: round_rupee(deductions.total),
        total_income: round_rupee(total_income),
        tax_liability: round_rupee(tax_liability),
        tax_rebate: round_rupee(tax_rebate),
        surcharge: round_rupee(surcharge_amount),
        cess: round_rupee(cess),
        net_tax_payable: net_tax_payable_r,
        tax_paid: TaxPaidBreakdown {
            tds,
            self_assessment,
            advance_tax,
            total: tds + self_assessment + advance_tax,
        },
        interest: InterestBreakdown {
            section_234a,
            section_234b,
            section_234c,
            total: interest_total,
        },
        penalty_234f,
        balance_tax_to_be_paid,
        tax_payable,
    }
}
