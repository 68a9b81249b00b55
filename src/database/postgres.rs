use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    Company, CompanyIndustry, Industry, Invoice, InvoiceCompanyRow, InvoiceDetail,
};
use super::store::Store;

const SELECT_COMPANIES: &str = "SELECT code, name, description FROM companies";
const SELECT_COMPANY: &str = "SELECT code, name, description FROM companies WHERE code = $1";
const INSERT_COMPANY: &str = "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) \
     RETURNING code, name, description";
const UPDATE_COMPANY: &str = "UPDATE companies SET name = $1, description = $2 WHERE code = $3 \
     RETURNING code, name, description";
const DELETE_COMPANY: &str = "DELETE FROM companies WHERE code = $1 RETURNING code";
const SELECT_COMPANY_INVOICES: &str = "SELECT id, comp_code, amt, paid, add_date, paid_date \
     FROM invoices WHERE comp_code = $1 ORDER BY id";
const SELECT_COMPANY_INDUSTRIES: &str = "SELECT i.industry FROM industries AS i \
     JOIN comp_indus AS ci ON ci.indus_code = i.code WHERE ci.comp_code = $1";

const SELECT_INVOICES: &str = "SELECT id, comp_code, amt, paid, add_date, paid_date FROM invoices";
const SELECT_INVOICE: &str = "SELECT id, comp_code, amt, paid, add_date, paid_date \
     FROM invoices WHERE id = $1";
const SELECT_INVOICE_DETAIL: &str = "SELECT i.id, i.comp_code, i.amt, i.paid, i.add_date, i.paid_date, \
     c.name, c.description FROM invoices AS i JOIN companies AS c ON i.comp_code = c.code \
     WHERE i.id = $1";
const INSERT_INVOICE: &str = "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) \
     RETURNING id, comp_code, amt, paid, add_date, paid_date";
const UPDATE_INVOICE_AMOUNT: &str = "UPDATE invoices SET amt = $1 WHERE id = $2 \
     RETURNING id, comp_code, amt, paid, add_date, paid_date";
const DELETE_INVOICE: &str = "DELETE FROM invoices WHERE id = $1 RETURNING id";

const SELECT_INDUSTRIES: &str = "SELECT code, industry FROM industries";
const SELECT_INDUSTRY: &str = "SELECT code, industry FROM industries WHERE code = $1";
const INSERT_INDUSTRY: &str = "INSERT INTO industries (code, industry) VALUES ($1, $2) \
     RETURNING code, industry";
const SELECT_INDUSTRY_COMPANIES: &str = "SELECT c.code FROM companies AS c \
     JOIN comp_indus AS ci ON c.code = ci.comp_code WHERE ci.indus_code = $1";
const INSERT_ASSOCIATION: &str = "INSERT INTO comp_indus (comp_code, indus_code) VALUES ($1, $2) \
     RETURNING comp_code, indus_code";

// Default names Postgres gives the `UNIQUE` columns in sql/biztime.sql
const COMPANIES_NAME_KEY: &str = "companies_name_key";
const INDUSTRIES_LABEL_KEY: &str = "industries_industry_key";

/// `Store` backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    query_logging: bool,
    slow_query_threshold: Option<Duration>,
}

impl PgStore {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            query_logging: config.enable_query_logging,
            slow_query_threshold: config
                .enable_slow_query_warning
                .then(|| Duration::from_millis(config.slow_query_threshold_ms)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run one statement, logging it and warning when it is slow
    async fn observe<T, F>(&self, sql: &'static str, fut: F) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        if self.query_logging {
            debug!(sql, "executing statement");
        }

        let started = Instant::now();
        let result = fut.await;
        let elapsed = started.elapsed();

        if let Some(threshold) = self.slow_query_threshold {
            if elapsed > threshold {
                warn!(sql, elapsed_ms = elapsed.as_millis() as u64, "slow query");
            }
        }
        result
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let query = sqlx::query_as::<_, Company>(SELECT_COMPANIES).fetch_all(&self.pool);
        Ok(self.observe(SELECT_COMPANIES, query).await?)
    }

    async fn find_company(&self, code: &str) -> Result<Option<Company>, DatabaseError> {
        let query = sqlx::query_as::<_, Company>(SELECT_COMPANY)
            .bind(code)
            .fetch_optional(&self.pool);
        Ok(self.observe(SELECT_COMPANY, query).await?)
    }

    async fn insert_company(&self, company: &Company) -> Result<Company, DatabaseError> {
        let query = sqlx::query_as::<_, Company>(INSERT_COMPANY)
            .bind(&company.code)
            .bind(&company.name)
            .bind(&company.description)
            .fetch_one(&self.pool);
        self.observe(INSERT_COMPANY, query).await.map_err(|e| {
            DatabaseError::from_write(e, |constraint| match constraint {
                Some(COMPANIES_NAME_KEY) => DatabaseError::company_name_taken(&company.name),
                _ => DatabaseError::company_code_taken(&company.code),
            })
        })
    }

    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<Option<Company>, DatabaseError> {
        let query = sqlx::query_as::<_, Company>(UPDATE_COMPANY)
            .bind(name)
            .bind(description)
            .bind(code)
            .fetch_optional(&self.pool);
        self.observe(UPDATE_COMPANY, query)
            .await
            .map_err(|e| DatabaseError::from_write(e, |_| DatabaseError::company_name_taken(name)))
    }

    async fn delete_company(&self, code: &str) -> Result<bool, DatabaseError> {
        let query = sqlx::query_scalar::<_, String>(DELETE_COMPANY)
            .bind(code)
            .fetch_optional(&self.pool);
        Ok(self.observe(DELETE_COMPANY, query).await?.is_some())
    }

    async fn company_invoices(&self, code: &str) -> Result<Vec<Invoice>, DatabaseError> {
        let query = sqlx::query_as::<_, Invoice>(SELECT_COMPANY_INVOICES)
            .bind(code)
            .fetch_all(&self.pool);
        Ok(self.observe(SELECT_COMPANY_INVOICES, query).await?)
    }

    async fn company_industries(&self, code: &str) -> Result<Vec<String>, DatabaseError> {
        let query = sqlx::query_scalar::<_, String>(SELECT_COMPANY_INDUSTRIES)
            .bind(code)
            .fetch_all(&self.pool);
        Ok(self.observe(SELECT_COMPANY_INDUSTRIES, query).await?)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let query = sqlx::query_as::<_, Invoice>(SELECT_INVOICES).fetch_all(&self.pool);
        Ok(self.observe(SELECT_INVOICES, query).await?)
    }

    async fn find_invoice(&self, id: i32) -> Result<Option<Invoice>, DatabaseError> {
        let query = sqlx::query_as::<_, Invoice>(SELECT_INVOICE)
            .bind(id)
            .fetch_optional(&self.pool);
        Ok(self.observe(SELECT_INVOICE, query).await?)
    }

    async fn find_invoice_detail(&self, id: i32) -> Result<Option<InvoiceDetail>, DatabaseError> {
        let query = sqlx::query_as::<_, InvoiceCompanyRow>(SELECT_INVOICE_DETAIL)
            .bind(id)
            .fetch_optional(&self.pool);
        let row = self.observe(SELECT_INVOICE_DETAIL, query).await?;
        Ok(row.map(InvoiceDetail::from))
    }

    async fn insert_invoice(&self, comp_code: &str, amt: f64) -> Result<Invoice, DatabaseError> {
        let query = sqlx::query_as::<_, Invoice>(INSERT_INVOICE)
            .bind(comp_code)
            .bind(amt)
            .fetch_one(&self.pool);
        self.observe(INSERT_INVOICE, query)
            .await
            .map_err(|e| {
                DatabaseError::from_write(e, |_| {
                    DatabaseError::Conflict("Invoice already exists".to_string())
                })
            })
    }

    async fn update_invoice_amount(
        &self,
        id: i32,
        amt: f64,
    ) -> Result<Option<Invoice>, DatabaseError> {
        let query = sqlx::query_as::<_, Invoice>(UPDATE_INVOICE_AMOUNT)
            .bind(amt)
            .bind(id)
            .fetch_optional(&self.pool);
        self.observe(UPDATE_INVOICE_AMOUNT, query)
            .await
            .map_err(|e| {
                DatabaseError::from_write(e, |_| {
                    DatabaseError::Conflict("Invoice already exists".to_string())
                })
            })
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool, DatabaseError> {
        let query = sqlx::query_scalar::<_, i32>(DELETE_INVOICE)
            .bind(id)
            .fetch_optional(&self.pool);
        Ok(self.observe(DELETE_INVOICE, query).await?.is_some())
    }

    async fn list_industries(&self) -> Result<Vec<Industry>, DatabaseError> {
        let query = sqlx::query_as::<_, Industry>(SELECT_INDUSTRIES).fetch_all(&self.pool);
        Ok(self.observe(SELECT_INDUSTRIES, query).await?)
    }

    async fn find_industry(&self, code: &str) -> Result<Option<Industry>, DatabaseError> {
        let query = sqlx::query_as::<_, Industry>(SELECT_INDUSTRY)
            .bind(code)
            .fetch_optional(&self.pool);
        Ok(self.observe(SELECT_INDUSTRY, query).await?)
    }

    async fn insert_industry(&self, industry: &Industry) -> Result<Industry, DatabaseError> {
        let query = sqlx::query_as::<_, Industry>(INSERT_INDUSTRY)
            .bind(&industry.code)
            .bind(&industry.industry)
            .fetch_one(&self.pool);
        self.observe(INSERT_INDUSTRY, query).await.map_err(|e| {
            DatabaseError::from_write(e, |constraint| match constraint {
                Some(INDUSTRIES_LABEL_KEY) => DatabaseError::industry_label_taken(&industry.industry),
                _ => DatabaseError::industry_code_taken(&industry.code),
            })
        })
    }

    async fn industry_company_codes(&self, code: &str) -> Result<Vec<String>, DatabaseError> {
        let query = sqlx::query_scalar::<_, String>(SELECT_INDUSTRY_COMPANIES)
            .bind(code)
            .fetch_all(&self.pool);
        Ok(self.observe(SELECT_INDUSTRY_COMPANIES, query).await?)
    }

    async fn insert_association(
        &self,
        comp_code: &str,
        indus_code: &str,
    ) -> Result<CompanyIndustry, DatabaseError> {
        let query = sqlx::query_as::<_, CompanyIndustry>(INSERT_ASSOCIATION)
            .bind(comp_code)
            .bind(indus_code)
            .fetch_one(&self.pool);
        self.observe(INSERT_ASSOCIATION, query).await.map_err(|e| {
            DatabaseError::from_write(e, |_| DatabaseError::association_exists(comp_code, indus_code))
        })
    }
}
