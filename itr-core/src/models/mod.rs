mod computation_result;
mod deduction_profile;
mod filing_period;
mod income_record;
mod regime;
mod tax_payment;

pub use computation_result::{ComputationResult, InterestBreakdown, TaxPaidBreakdown};
pub use deduction_profile::DeductionProfile;
pub use filing_period::{FilingPeriod, FilingPeriodError};
pub use income_record::{
    AssetType, IncomeCategory, IncomeRecord, IncomeRecordError, IncomeRecordInput, OccupancyStatus,
};
pub use regime::{InvalidRegime, RegimeSelection, TaxRegime};
pub use tax_payment::TaxPaymentRecord;
