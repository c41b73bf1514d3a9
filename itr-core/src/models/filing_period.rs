use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilingPeriodError {
    /// The period's dates are inconsistent. Detected at load time, before
    /// any computation runs.
    #[error(
        "invalid filing period '{id}': start {start}, end {end}, due {due} \
         (start must precede end, due must not precede end)"
    )]
    InvalidFilingPeriod {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
        due: NaiveDate,
    },
}

/// One filing period: the span income belongs to, plus the statutory
/// filing deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingPeriod {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl FilingPeriod {
    /// Enforces `start_date < end_date` and `due_date >= end_date`.
    pub fn validate(&self) -> Result<(), FilingPeriodError> {
        if self.start_date >= self.end_date || self.due_date < self.end_date {
            return Err(FilingPeriodError::InvalidFilingPeriod {
                id: self.id.clone(),
                start: self.start_date,
                end: self.end_date,
                due: self.due_date,
            });
        }
        Ok(())
    }

    /// Whether a payment date falls inside the period's advance-tax
    /// window (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
