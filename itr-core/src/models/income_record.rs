use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building an [`IncomeRecord`] from loosely-typed
/// input.
///
/// Purely additive amount fields default to zero when absent; the fields
/// that decide how a record is categorized must be present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IncomeRecordError {
    #[error("income record {id}: missing category")]
    MissingCategory { id: i64 },

    #[error("income record {id}: missing '{field}' on a {category} record")]
    MissingField {
        id: i64,
        category: IncomeCategory,
        field: &'static str,
    },
}

/// Income categories recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeCategory {
    Salary,
    Rental,
    CapitalGain,
    Business,
    Agriculture,
    Exempt,
    Interest,
    Dividend,
    Betting,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Rental => "rental",
            Self::CapitalGain => "capital_gain",
            Self::Business => "business",
            Self::Agriculture => "agriculture",
            Self::Exempt => "exempt",
            Self::Interest => "interest",
            Self::Dividend => "dividend",
            Self::Betting => "betting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "salary" => Some(Self::Salary),
            "rental" => Some(Self::Rental),
            "capital_gain" => Some(Self::CapitalGain),
            "business" => Some(Self::Business),
            "agriculture" => Some(Self::Agriculture),
            "exempt" => Some(Self::Exempt),
            "interest" => Some(Self::Interest),
            "dividend" => Some(Self::Dividend),
            "betting" => Some(Self::Betting),
            _ => None,
        }
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset class of a capital gain. Listed equity is the §112A-eligible
/// class and gets its own long-term bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    ListedEquity,
    Property,
    Other,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListedEquity => "listed_equity",
            Self::Property => "property",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "listed_equity" => Some(Self::ListedEquity),
            "property" => Some(Self::Property),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Occupancy status of a rental property. Only let-out properties carry
/// property tax as a separate line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupancyStatus {
    SelfOccupied,
    LetOut,
}

impl OccupancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfOccupied => "self_occupied",
            Self::LetOut => "let_out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "self_occupied" => Some(Self::SelfOccupied),
            "let_out" => Some(Self::LetOut),
            _ => None,
        }
    }
}

/// One itemized income entry for a filing period, immutable once
/// aggregated. Each variant carries only the fields its category needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeRecord {
    Salary {
        gross_salary: Decimal,
        basic: Decimal,
        hra_received: Decimal,
        rent_paid: Decimal,
        in_metro_city: bool,
    },
    Rental {
        annual_rent: Decimal,
        property_tax_paid: Decimal,
        interest_on_borrowed_capital: Decimal,
        occupancy: OccupancyStatus,
    },
    CapitalGain {
        asset_type: AssetType,
        long_term: bool,
        gain_amount: Decimal,
    },
    Business {
        cash_profit: Decimal,
        bank_profit: Decimal,
    },
    Agriculture {
        amount: Decimal,
    },
    Exempt {
        amount: Decimal,
    },
    Interest {
        amount: Decimal,
        from_savings_account: bool,
    },
    Dividend {
        amount: Decimal,
    },
    Betting {
        amount: Decimal,
    },
}

impl IncomeRecord {
    pub fn category(&self) -> IncomeCategory {
        match self {
            Self::Salary { .. } => IncomeCategory::Salary,
            Self::Rental { .. } => IncomeCategory::Rental,
            Self::CapitalGain { .. } => IncomeCategory::CapitalGain,
            Self::Business { .. } => IncomeCategory::Business,
            Self::Agriculture { .. } => IncomeCategory::Agriculture,
            Self::Exempt { .. } => IncomeCategory::Exempt,
            Self::Interest { .. } => IncomeCategory::Interest,
            Self::Dividend { .. } => IncomeCategory::Dividend,
            Self::Betting { .. } => IncomeCategory::Betting,
        }
    }
}

/// Loosely-typed construction surface for [`IncomeRecord`].
///
/// This is the shape storage and transport layers hand the engine: a
/// category tag plus optional fields. `into_record` performs the single
/// validation pass — after it succeeds there is no such thing as a
/// malformed record anywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecordInput {
    pub id: i64,
    pub category: Option<IncomeCategory>,
    pub gross_salary: Option<Decimal>,
    pub basic: Option<Decimal>,
    pub hra_received: Option<Decimal>,
    pub rent_paid: Option<Decimal>,
    pub in_metro_city: Option<bool>,
    pub annual_rent: Option<Decimal>,
    pub property_tax_paid: Option<Decimal>,
    pub interest_on_borrowed_capital: Option<Decimal>,
    pub occupancy: Option<OccupancyStatus>,
    pub asset_type: Option<AssetType>,
    pub long_term: Option<bool>,
    pub gain_amount: Option<Decimal>,
    pub cash_profit: Option<Decimal>,
    pub bank_profit: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub from_savings_account: Option<bool>,
}

impl IncomeRecordInput {
    /// Validates the input and produces the closed tagged record.
    ///
    /// Missing amount fields are treated as zero. Missing
    /// categorization-relevant fields (`category`, `asset_type` on a
    /// capital gain, `occupancy` on a rental) fail with
    /// [`IncomeRecordError::MissingField`] naming the offending record.
    pub fn into_record(self) -> Result<IncomeRecord, IncomeRecordError> {
        let category = self
            .category
            .ok_or(IncomeRecordError::MissingCategory { id: self.id })?;

        let amount = |v: Option<Decimal>| v.unwrap_or(Decimal::ZERO);

        match category {
            IncomeCategory::Salary => Ok(IncomeRecord::Salary {
                gross_salary: amount(self.gross_salary),
                basic: amount(self.basic),
                hra_received: amount(self.hra_received),
                rent_paid: amount(self.rent_paid),
                in_metro_city: self.in_metro_city.unwrap_or(false),
            }),
            IncomeCategory::Rental => {
                let occupancy = self.occupancy.ok_or(IncomeRecordError::MissingField {
                    id: self.id,
                    category,
                    field: "occupancy",
                })?;
                Ok(IncomeRecord::Rental {
                    annual_rent: amount(self.annual_rent),
                    property_tax_paid: amount(self.property_tax_paid),
                    interest_on_borrowed_capital: amount(self.interest_on_borrowed_capital),
                    occupancy,
                })
            }
            IncomeCategory::CapitalGain => {
                let asset_type = self.asset_type.ok_or(IncomeRecordError::MissingField {
                    id: self.id,
                    category,
                    field: "asset_type",
                })?;
                Ok(IncomeRecord::CapitalGain {
                    asset_type,
                    long_term: self.long_term.unwrap_or(false),
                    gain_amount: amount(self.gain_amount),
                })
            }
            IncomeCategory::Business => Ok(IncomeRecord::Business {
                cash_profit: amount(self.cash_profit),
                bank_profit: amount(self.bank_profit),
            }),
            IncomeCategory::Agriculture => Ok(IncomeRecord::Agriculture {
                amount: amount(self.amount),
            }),
            IncomeCategory::Exempt => Ok(IncomeRecord::Exempt {
                amount: amount(self.amount),
            }),
            IncomeCategory::Interest => Ok(IncomeRecord::Interest {
                amount: amount(self.amount),
                from_savings_account: self.from_savings_account.unwrap_or(false),
            }),
            IncomeCategory::Dividend => Ok(IncomeRecord::Dividend {
                amount: amount(self.amount),
            }),
            IncomeCategory::Betting => Ok(IncomeRecord::Betting {
                amount: amount(self.amount),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn salary_input_defaults_missing_amounts_to_zero() {
        let input = IncomeRecordInput {
            id: 1,
            category: Some(IncomeCategory::Salary),
            gross_salary: Some(dec!(900000)),
            ..Default::default()
        };

        let record = input.into_record().unwrap();

        assert_eq!(
            record,
            IncomeRecord::Salary {
                gross_salary: dec!(900000),
                basic: dec!(0),
                hra_received: dec!(0),
                rent_paid: dec!(0),
                in_metro_city: false,
            }
        );
    }

    #[test]
    fn capital_gain_without_asset_type_is_rejected() {
        let input = IncomeRecordInput {
            id: 7,
            category: Some(IncomeCategory::CapitalGain),
            gain_amount: Some(dec!(50000)),
            long_term: Some(true),
            ..Default::default()
        };

        let err = input.into_record().unwrap_err();

        assert_eq!(
            err,
            IncomeRecordError::MissingField {
                id: 7,
                category: IncomeCategory::CapitalGain,
                field: "asset_type",
            }
        );
    }

    #[test]
    fn rental_without_occupancy_is_rejected() {
        let input = IncomeRecordInput {
            id: 3,
            category: Some(IncomeCategory::Rental),
            annual_rent: Some(dec!(240000)),
            ..Default::default()
        };

        let err = input.into_record().unwrap_err();

        assert_eq!(
            err,
            IncomeRecordError::MissingField {
                id: 3,
                category: IncomeCategory::Rental,
                field: "occupancy",
            }
        );
    }

    #[test]
    fn capital_gain_holding_term_defaults_to_short_term() {
        let input = IncomeRecordInput {
            id: 4,
            category: Some(IncomeCategory::CapitalGain),
            asset_type: Some(AssetType::ListedEquity),
            gain_amount: Some(dec!(10000)),
            ..Default::default()
        };

        let record = input.into_record().unwrap();

        assert_eq!(
            record,
            IncomeRecord::CapitalGain {
                asset_type: AssetType::ListedEquity,
                long_term: false,
                gain_amount: dec!(10000),
            }
        );
    }

    #[test]
    fn error_message_names_record_and_field() {
        let err = IncomeRecordError::MissingField {
            id: 42,
            category: IncomeCategory::CapitalGain,
            field: "asset_type",
        };

        assert_eq!(
            err.to_string(),
            "income record 42: missing 'asset_type' on a capital_gain record"
        );
    }

    #[test]
    fn category_str_round_trips() {
        for category in [
            IncomeCategory::Salary,
            IncomeCategory::Rental,
            IncomeCategory::CapitalGain,
            IncomeCategory::Business,
            IncomeCategory::Agriculture,
            IncomeCategory::Exempt,
            IncomeCategory::Interest,
            IncomeCategory::Dividend,
            IncomeCategory::Betting,
        ] {
            assert_eq!(IncomeCategory::parse(category.as_str()), Some(category));
        }
    }
}
