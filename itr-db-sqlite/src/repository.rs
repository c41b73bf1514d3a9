use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, sqlite::SqlitePool};

use itr_core::{
    AssetType, ComputationResult, DeductionProfile, FilingPeriod, FilingRepository,
    IncomeCategory, IncomeRecord, IncomeRecordInput, InterestBreakdown, OccupancyStatus,
    RepositoryError, TaxPaidBreakdown, TaxPaymentRecord, TaxRegime,
};

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ── ingestion surface ────────────────────────────────────────────────
    // The engine only reads these collections; the surrounding CRUD layer
    // (and the tests here) write them through the methods below.

    pub async fn insert_filing_period(
        &self,
        period: &FilingPeriod,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO filing_periods (id, start_date, end_date, due_date)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&period.id)
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.due_date)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Inserts one income row and returns its id. The input is stored
    /// as-is; validation happens when rows are read back into records.
    pub async fn insert_income_record(
        &self,
        period_id: &str,
        input: &IncomeRecordInput,
    ) -> Result<i64, RepositoryError> {
        let category = input
            .category
            .ok_or_else(|| RepositoryError::Database("income record without category".into()))?;

        let result = sqlx::query(
            "INSERT INTO income_records (
                filing_period_id, category,
                gross_salary, basic, hra_received, rent_paid, in_metro_city,
                annual_rent, property_tax_paid, interest_on_borrowed_capital, occupancy,
                asset_type, long_term, gain_amount,
                cash_profit, bank_profit,
                amount, from_savings_account
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(period_id)
        .bind(category.as_str())
        .bind(input.gross_salary.map(decimal_to_f64))
        .bind(input.basic.map(decimal_to_f64))
        .bind(input.hra_received.map(decimal_to_f64))
        .bind(input.rent_paid.map(decimal_to_f64))
        .bind(input.in_metro_city)
        .bind(input.annual_rent.map(decimal_to_f64))
        .bind(input.property_tax_paid.map(decimal_to_f64))
        .bind(input.interest_on_borrowed_capital.map(decimal_to_f64))
        .bind(input.occupancy.map(|o| o.as_str()))
        .bind(input.asset_type.map(|a| a.as_str()))
        .bind(input.long_term)
        .bind(input.gain_amount.map(decimal_to_f64))
        .bind(input.cash_profit.map(decimal_to_f64))
        .bind(input.bank_profit.map(decimal_to_f64))
        .bind(input.amount.map(decimal_to_f64))
        .bind(input.from_savings_account)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    pub async fn upsert_deduction_profile(
        &self,
        period_id: &str,
        profile: &DeductionProfile,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO deduction_profiles (
                filing_period_id,
                life_insurance_premium, provident_fund, elss_investment,
                home_loan_principal, tuition_fees, stamp_duty, other_80c,
                pension_contribution_self, pension_contribution_employer,
                health_insurance_self, health_checkup_self, medical_expenditure_self,
                health_insurance_parents, health_checkup_parents, medical_expenditure_parents,
                senior_citizen, senior_citizen_parents
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (filing_period_id) DO UPDATE SET
                life_insurance_premium = excluded.life_insurance_premium,
                provident_fund = excluded.provident_fund,
                elss_investment = excluded.elss_investment,
                home_loan_principal = excluded.home_loan_principal,
                tuition_fees = excluded.tuition_fees,
                stamp_duty = excluded.stamp_duty,
                other_80c = excluded.other_80c,
                pension_contribution_self = excluded.pension_contribution_self,
                pension_contribution_employer = excluded.pension_contribution_employer,
                health_insurance_self = excluded.health_insurance_self,
                health_checkup_self = excluded.health_checkup_self,
                medical_expenditure_self = excluded.medical_expenditure_self,
                health_insurance_parents = excluded.health_insurance_parents,
                health_checkup_parents = excluded.health_checkup_parents,
                medical_expenditure_parents = excluded.medical_expenditure_parents,
                senior_citizen = excluded.senior_citizen,
                senior_citizen_parents = excluded.senior_citizen_parents",
        )
        .bind(period_id)
        .bind(decimal_to_f64(profile.life_insurance_premium))
        .bind(decimal_to_f64(profile.provident_fund))
        .bind(decimal_to_f64(profile.elss_investment))
        .bind(decimal_to_f64(profile.home_loan_principal))
        .bind(decimal_to_f64(profile.tuition_fees))
        .bind(decimal_to_f64(profile.stamp_duty))
        .bind(decimal_to_f64(profile.other_80c))
        .bind(decimal_to_f64(profile.pension_contribution_self))
        .bind(decimal_to_f64(profile.pension_contribution_employer))
        .bind(decimal_to_f64(profile.health_insurance_self))
        .bind(decimal_to_f64(profile.health_checkup_self))
        .bind(decimal_to_f64(profile.medical_expenditure_self))
        .bind(decimal_to_f64(profile.health_insurance_parents))
        .bind(decimal_to_f64(profile.health_checkup_parents))
        .bind(decimal_to_f64(profile.medical_expenditure_parents))
        .bind(profile.senior_citizen)
        .bind(profile.senior_citizen_parents)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    pub async fn insert_tax_payment(
        &self,
        period_id: &str,
        payment: &TaxPaymentRecord,
    ) -> Result<i64, RepositoryError> {
        let (kind, paid_on, amount) = match payment {
            TaxPaymentRecord::WithheldAtSource { amount } => {
                ("withheld_at_source", None, *amount)
            }
            TaxPaymentRecord::SelfAssessmentOrAdvance { paid_on, amount } => {
                ("self_assessment_or_advance", Some(*paid_on), *amount)
            }
        };

        let result = sqlx::query(
            "INSERT INTO tax_payments (filing_period_id, kind, paid_on, amount)
             VALUES (?, ?, ?, ?)",
        )
        .bind(period_id)
        .bind(kind)
        .bind(paid_on)
        .bind(decimal_to_f64(amount))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }
}

fn row_to_income_record(row: &sqlx::sqlite::SqliteRow) -> Result<IncomeRecord, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(db_err)?;

    let category_str: String = row.try_get("category").map_err(db_err)?;
    let category = IncomeCategory::parse(&category_str).ok_or_else(|| {
        RepositoryError::Database(format!(
            "income record {}: unknown category '{}'",
            id, category_str
        ))
    })?;

    let occupancy = row
        .try_get::<Option<String>, _>("occupancy")
        .map_err(db_err)?
        .map(|s| {
            OccupancyStatus::parse(&s).ok_or_else(|| {
                RepositoryError::Database(format!(
                    "income record {}: unknown occupancy '{}'",
                    id, s
                ))
            })
        })
        .transpose()?;

    let asset_type = row
        .try_get::<Option<String>, _>("asset_type")
        .map_err(db_err)?
        .map(|s| {
            AssetType::parse(&s).ok_or_else(|| {
                RepositoryError::Database(format!(
                    "income record {}: unknown asset type '{}'",
                    id, s
                ))
            })
        })
        .transpose()?;

    let input = IncomeRecordInput {
        id,
        category: Some(category),
        gross_salary: get_optional_decimal(row, "gross_salary")?,
        basic: get_optional_decimal(row, "basic")?,
        hra_received: get_optional_decimal(row, "hra_received")?,
        rent_paid: get_optional_decimal(row, "rent_paid")?,
        in_metro_city: row.try_get("in_metro_city").map_err(db_err)?,
        annual_rent: get_optional_decimal(row, "annual_rent")?,
        property_tax_paid: get_optional_decimal(row, "property_tax_paid")?,
        interest_on_borrowed_capital: get_optional_decimal(row, "interest_on_borrowed_capital")?,
        occupancy,
        asset_type,
        long_term: row.try_get("long_term").map_err(db_err)?,
        gain_amount: get_optional_decimal(row, "gain_amount")?,
        cash_profit: get_optional_decimal(row, "cash_profit")?,
        bank_profit: get_optional_decimal(row, "bank_profit")?,
        amount: get_optional_decimal(row, "amount")?,
        from_savings_account: row.try_get("from_savings_account").map_err(db_err)?,
    };

    input
        .into_record()
        .map_err(|e| RepositoryError::Database(e.to_string()))
}

fn row_to_computation(row: &sqlx::sqlite::SqliteRow) -> Result<ComputationResult, RepositoryError> {
    let regime_str: String = row.try_get("regime").map_err(db_err)?;
    let regime = TaxRegime::parse(&regime_str)
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

    Ok(ComputationResult {
        filing_period_id: row.try_get("filing_period_id").map_err(db_err)?,
        regime,
        salary_income: get_decimal(row, "salary_income")?,
        rental_income: get_decimal(row, "rental_income")?,
        capital_gains_income: get_decimal(row, "capital_gains_income")?,
        business_income: get_decimal(row, "business_income")?,
        other_income: get_decimal(row, "other_income")?,
        exempt_income: get_decimal(row, "exempt_income")?,
        gross_total_income: get_decimal(row, "gross_total_income")?,
        total_deductions: get_decimal(row, "total_deductions")?,
        total_income: get_decimal(row, "total_income")?,
        tax_liability: get_decimal(row, "tax_liability")?,
        tax_rebate: get_decimal(row, "tax_rebate")?,
        surcharge: get_decimal(row, "surcharge")?,
        cess: get_decimal(row, "cess")?,
        net_tax_payable: get_decimal(row, "net_tax_payable")?,
        tax_paid: TaxPaidBreakdown {
            tds: get_decimal(row, "tds")?,
            self_assessment: get_decimal(row, "self_assessment")?,
            advance_tax: get_decimal(row, "advance_tax")?,
            total: get_decimal(row, "tax_paid_total")?,
        },
        interest: InterestBreakdown {
            section_234a: get_decimal(row, "interest_234a")?,
            section_234b: get_decimal(row, "interest_234b")?,
            section_234c: get_decimal(row, "interest_234c")?,
            total: get_decimal(row, "interest_total")?,
        },
        penalty_234f: get_decimal(row, "penalty_234f")?,
        balance_tax_to_be_paid: get_decimal(row, "balance_tax_to_be_paid")?,
        tax_payable: get_decimal(row, "tax_payable")?,
    })
}

#[async_trait]
impl FilingRepository for SqliteRepository {
    async fn get_filing_period(&self, id: &str) -> Result<FilingPeriod, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, start_date, end_date, due_date FROM filing_periods WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(FilingPeriod {
            id: row.try_get("id").map_err(db_err)?,
            start_date: row.try_get::<NaiveDate, _>("start_date").map_err(db_err)?,
            end_date: row.try_get::<NaiveDate, _>("end_date").map_err(db_err)?,
            due_date: row.try_get::<NaiveDate, _>("due_date").map_err(db_err)?,
        })
    }

    async fn list_income_records(
        &self,
        period_id: &str,
    ) -> Result<Vec<IncomeRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM income_records WHERE filing_period_id = ? ORDER BY id",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_income_record).collect()
    }

    async fn get_deduction_profile(
        &self,
        period_id: &str,
    ) -> Result<Option<DeductionProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM deduction_profiles WHERE filing_period_id = ?",
        )
        .bind(period_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(DeductionProfile {
            life_insurance_premium: get_decimal(&row, "life_insurance_premium")?,
            provident_fund: get_decimal(&row, "provident_fund")?,
            elss_investment: get_decimal(&row, "elss_investment")?,
            home_loan_principal: get_decimal(&row, "home_loan_principal")?,
            tuition_fees: get_decimal(&row, "tuition_fees")?,
            stamp_duty: get_decimal(&row, "stamp_duty")?,
            other_80c: get_decimal(&row, "other_80c")?,
            pension_contribution_self: get_decimal(&row, "pension_contribution_self")?,
            pension_contribution_employer: get_decimal(&row, "pension_contribution_employer")?,
            health_insurance_self: get_decimal(&row, "health_insurance_self")?,
            health_checkup_self: get_decimal(&row, "health_checkup_self")?,
            medical_expenditure_self: get_decimal(&row, "medical_expenditure_self")?,
            health_insurance_parents: get_decimal(&row, "health_insurance_parents")?,
            health_checkup_parents: get_decimal(&row, "health_checkup_parents")?,
            medical_expenditure_parents: get_decimal(&row, "medical_expenditure_parents")?,
            senior_citizen: row.try_get("senior_citizen").map_err(db_err)?,
            senior_citizen_parents: row.try_get("senior_citizen_parents").map_err(db_err)?,
        }))
    }

    async fn list_tax_payments(
        &self,
        period_id: &str,
    ) -> Result<Vec<TaxPaymentRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, kind, paid_on, amount FROM tax_payments
             WHERE filing_period_id = ? ORDER BY id",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut payments = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.try_get("id").map_err(db_err)?;
            let kind: String = row.try_get("kind").map_err(db_err)?;
            let amount = get_decimal(row, "amount")?;
            let payment = match kind.as_str() {
                "withheld_at_source" => TaxPaymentRecord::WithheldAtSource { amount },
                "self_assessment_or_advance" => {
                    let paid_on = row
                        .try_get::<Option<NaiveDate>, _>("paid_on")
                        .map_err(db_err)?
                        .ok_or_else(|| {
                            RepositoryError::Database(format!(
                                "tax payment {}: dated payment without a date",
                                id
                            ))
                        })?;
                    TaxPaymentRecord::SelfAssessmentOrAdvance { paid_on, amount }
                }
                other => {
                    return Err(RepositoryError::Database(format!(
                        "tax payment {}: unknown kind '{}'",
                        id, other
                    )));
                }
            };
            payments.push(payment);
        }
        Ok(payments)
    }

    async fn save_computation(
        &self,
        result: &ComputationResult,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO computations (
                filing_period_id, regime,
                salary_income, rental_income, capital_gains_income,
                business_income, other_income, exempt_income,
                gross_total_income, total_deductions, total_income,
                tax_liability, tax_rebate, surcharge, cess, net_tax_payable,
                tds, self_assessment, advance_tax, tax_paid_total,
                interest_234a, interest_234b, interest_234c, interest_total,
                penalty_234f, balance_tax_to_be_paid, tax_payable
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                       ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (filing_period_id, regime) DO UPDATE SET
                salary_income = excluded.salary_income,
                rental_income = excluded.rental_income,
                capital_gains_income = excluded.capital_gains_income,
                business_income = excluded.business_income,
                other_income = excluded.other_income,
                exempt_income = excluded.exempt_income,
                gross_total_income = excluded.gross_total_income,
                total_deductions = excluded.total_deductions,
                total_income = excluded.total_income,
                tax_liability = excluded.tax_liability,
                tax_rebate = excluded.tax_rebate,
                surcharge = excluded.surcharge,
                cess = excluded.cess,
                net_tax_payable = excluded.net_tax_payable,
                tds = excluded.tds,
                self_assessment = excluded.self_assessment,
                advance_tax = excluded.advance_tax,
                tax_paid_total = excluded.tax_paid_total,
                interest_234a = excluded.interest_234a,
                interest_234b = excluded.interest_234b,
                interest_234c = excluded.interest_234c,
                interest_total = excluded.interest_total,
                penalty_234f = excluded.penalty_234f,
                balance_tax_to_be_paid = excluded.balance_tax_to_be_paid,
                tax_payable = excluded.tax_payable,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(&result.filing_period_id)
        .bind(result.regime.as_str())
        .bind(decimal_to_f64(result.salary_income))
        .bind(decimal_to_f64(result.rental_income))
        .bind(decimal_to_f64(result.capital_gains_income))
        .bind(decimal_to_f64(result.business_income))
        .bind(decimal_to_f64(result.other_income))
        .bind(decimal_to_f64(result.exempt_income))
        .bind(decimal_to_f64(result.gross_total_income))
        .bind(decimal_to_f64(result.total_deductions))
        .bind(decimal_to_f64(result.total_income))
        .bind(decimal_to_f64(result.tax_liability))
        .bind(decimal_to_f64(result.tax_rebate))
        .bind(decimal_to_f64(result.surcharge))
        .bind(decimal_to_f64(result.cess))
        .bind(decimal_to_f64(result.net_tax_payable))
        .bind(decimal_to_f64(result.tax_paid.tds))
        .bind(decimal_to_f64(result.tax_paid.self_assessment))
        .bind(decimal_to_f64(result.tax_paid.advance_tax))
        .bind(decimal_to_f64(result.tax_paid.total))
        .bind(decimal_to_f64(result.interest.section_234a))
        .bind(decimal_to_f64(result.interest.section_234b))
        .bind(decimal_to_f64(result.interest.section_234c))
        .bind(decimal_to_f64(result.interest.total))
        .bind(decimal_to_f64(result.penalty_234f))
        .bind(decimal_to_f64(result.balance_tax_to_be_paid))
        .bind(decimal_to_f64(result.tax_payable))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_computation(
        &self,
        period_id: &str,
        regime: TaxRegime,
    ) -> Result<ComputationResult, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM computations WHERE filing_period_id = ? AND regime = ?",
        )
        .bind(period_id)
        .bind(regime.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_computation(&row)
    }
}
