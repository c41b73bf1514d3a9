//! Calculation modules for the income-tax computation pipeline.
//!
//! Leaf-first: income aggregation and deduction caps feed the slab walk;
//! rebate, surcharge, and cess refine the liability; the paid-tax
//! aggregator and the interest/penalty calculator settle it; the
//! orchestrator sequences the whole pipeline once per regime.

pub mod cess;
pub mod common;
pub mod deductions;
pub mod income;
pub mod interest;
pub mod orchestrator;
pub mod rebate;
pub mod slabs;
pub mod surcharge;
pub mod tax_paid;

pub use deductions::{DeductionSummary, calculate_deductions};
pub use income::{IncomeSummary, aggregate_income};
pub use interest::{InterestPenaltyInput, InterestPenaltyResult};
pub use orchestrator::{
    ComputationError, ComputationOrchestrator, ComputationOutcome, ComputationRequest,
    compute_regime,
};
pub use slabs::{TaxSlab, slab_schedule, slab_tax};
pub use tax_paid::{AdvanceInstallment, TaxPaidSummary, aggregate_tax_paid};
