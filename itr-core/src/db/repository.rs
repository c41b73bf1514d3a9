use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    ComputationResult, DeductionProfile, FilingPeriod, IncomeRecord, TaxPaymentRecord, TaxRegime,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Record retrieval and result persistence for the computation engine.
///
/// The engine reads the four input collections for a filing period
/// through this trait and writes one [`ComputationResult`] per regime
/// back through it. `save_computation` has upsert semantics on
/// `(filing_period_id, regime)`: recomputing a regime replaces its
/// stored result, never duplicates it.
#[async_trait]
pub trait FilingRepository: Send + Sync {
    async fn get_filing_period(&self, id: &str) -> Result<FilingPeriod, RepositoryError>;

    async fn list_income_records(
        &self,
        period_id: &str,
    ) -> Result<Vec<IncomeRecord>, RepositoryError>;

    /// `Ok(None)` when the period has no deduction profile; that is a
    /// legal state, not an error.
    async fn get_deduction_profile(
        &self,
        period_id: &str,
    ) -> Result<Option<DeductionProfile>, RepositoryError>;

    async fn list_tax_payments(
        &self,
        period_id: &str,
    ) -> Result<Vec<TaxPaymentRecord>, RepositoryError>;

    async fn save_computation(&self, result: &ComputationResult) -> Result<(), RepositoryError>;

    async fn get_computation(
        &self,
        period_id: &str,
        regime: TaxRegime,
    ) -> Result<ComputationResult, RepositoryError>;
}
