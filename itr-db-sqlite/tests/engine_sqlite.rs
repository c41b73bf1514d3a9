//! End-to-end run of the computation pipeline against the SQLite
//! backend: ingest a filing period through the repository, compute both
//! regimes through the orchestrator, and read the persisted results
//! back.

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

use itr_core::calculations::{ComputationOrchestrator, ComputationRequest};
use itr_core::{
    DeductionProfile, FilingPeriod, FilingRepository, IncomeCategory, IncomeRecordInput,
    RegimeSelection, TaxPaymentRecord, TaxRegime,
};
use itr_db_sqlite::SqliteRepository;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn seeded_repository() -> Arc<SqliteRepository> {
    init_tracing();
    let repo = SqliteRepository::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    repo.run_migrations().await.expect("migrations");

    repo.insert_filing_period(&FilingPeriod {
        id: "fy-2023-24".to_string(),
        start_date: date(2023, 4, 1),
        end_date: date(2024, 3, 31),
        due_date: date(2024, 7, 31),
    })
    .await
    .expect("period");

    repo.insert_income_record(
        "fy-2023-24",
        &IncomeRecordInput {
            category: Some(IncomeCategory::Salary),
            gross_salary: Some(dec!(1100000)),
            basic: Some(dec!(550000)),
            hra_received: Some(dec!(200000)),
            rent_paid: Some(dec!(240000)),
            in_metro_city: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("salary record");

    repo.insert_income_record(
        "fy-2023-24",
        &IncomeRecordInput {
            category: Some(IncomeCategory::Interest),
            amount: Some(dec!(18000)),
            from_savings_account: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("interest record");

    repo.upsert_deduction_profile(
        "fy-2023-24",
        &DeductionProfile {
            provident_fund: dec!(120000),
            health_insurance_self: dec!(25000),
            ..Default::default()
        },
    )
    .await
    .expect("profile");

    repo.insert_tax_payment(
        "fy-2023-24",
        &TaxPaymentRecord::WithheldAtSource {
            amount: dec!(70000),
        },
    )
    .await
    .expect("tds");
    repo.insert_tax_payment(
        "fy-2023-24",
        &TaxPaymentRecord::SelfAssessmentOrAdvance {
            paid_on: date(2023, 12, 10),
            amount: dec!(20000),
        },
    )
    .await
    .expect("advance");

    Arc::new(repo)
}

fn request() -> ComputationRequest {
    ComputationRequest {
        filing_period_id: "fy-2023-24".to_string(),
        regime: RegimeSelection::Both,
        filing_date: Some(date(2024, 7, 1)),
    }
}

#[tokio::test]
async fn both_regimes_compute_and_persist_through_sqlite() {
    let repo = seeded_repository().await;
    let orchestrator = ComputationOrchestrator::new(repo.clone());

    let outcome = orchestrator.compute(&request()).await.unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].regime, TaxRegime::Old);
    assert_eq!(outcome.results[1].regime, TaxRegime::New);
    assert!(outcome.recommended_regime.is_some());

    // The stored rows round-trip field for field; every published figure
    // is a whole-rupee amount, which REAL columns represent exactly.
    for result in &outcome.results {
        let stored = repo
            .get_computation("fy-2023-24", result.regime)
            .await
            .unwrap();
        assert_eq!(&stored, result);
    }
}

#[tokio::test]
async fn old_regime_pipeline_figures_survive_storage() {
    let repo = seeded_repository().await;
    let orchestrator = ComputationOrchestrator::new(repo.clone());

    orchestrator
        .compute(&ComputationRequest {
            regime: RegimeSelection::Old,
            ..request()
        })
        .await
        .unwrap();

    let stored = repo
        .get_computation("fy-2023-24", TaxRegime::Old)
        .await
        .unwrap();

    // Salary nets the 50,000 standard deduction and the 185,000 HRA
    // exemption; savings interest rides along as other income.
    assert_eq!(stored.salary_income, dec!(865000));
    assert_eq!(stored.gross_total_income, dec!(883000));
    // 120,000 (80C) + 25,000 (80D) + 10,000 (80TTA cap)
    assert_eq!(stored.total_deductions, dec!(155000));
    assert_eq!(stored.total_income, dec!(728000));
    // 250,000 @ 5% + 228,000 @ 20%
    assert_eq!(stored.tax_liability, dec!(58100));
    assert_eq!(stored.tax_rebate, dec!(0));
    assert_eq!(stored.surcharge, dec!(0));
    assert_eq!(stored.cess, dec!(2324));
    assert_eq!(stored.net_tax_payable, dec!(60424));
    assert_eq!(stored.tax_paid.tds, dec!(70000));
    assert_eq!(stored.tax_paid.advance_tax, dec!(20000));
    // 60,424 - 20,000 - 70,000: tax already paid exceeds the liability.
    assert_eq!(stored.balance_tax_to_be_paid, dec!(-29576));
    assert_eq!(stored.interest.section_234a, dec!(0));
    assert_eq!(stored.interest.section_234b, dec!(0));
    // The Dec 10 installment only covers part of the Dec and Mar
    // checkpoints; the earlier two were missed outright.
    assert_eq!(stored.interest.section_234c, dec!(3060));
    assert_eq!(stored.penalty_234f, dec!(0));
    assert_eq!(stored.tax_payable, dec!(-26516));
}

#[tokio::test]
async fn recomputation_replaces_stored_rows_instead_of_duplicating() {
    let repo = seeded_repository().await;
    let orchestrator = ComputationOrchestrator::new(repo.clone());

    let first = orchestrator.compute(&request()).await.unwrap();
    let second = orchestrator.compute(&request()).await.unwrap();

    assert_eq!(first, second);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM computations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}
