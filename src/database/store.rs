//! Database access seam used by the HTTP handlers.
//!
//! Every method maps to exactly one statement against the backing store, so a
//! handler that needs related rows calls several methods in sequence. Nothing
//! here runs inside a shared transaction.

use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Company, CompanyIndustry, Industry, Invoice, InvoiceDetail};

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity probe for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;

    // Companies

    async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError>;

    async fn find_company(&self, code: &str) -> Result<Option<Company>, DatabaseError>;

    /// Insert a company; a duplicate code is `DatabaseError::Conflict`
    async fn insert_company(&self, company: &Company) -> Result<Company, DatabaseError>;

    /// Update name and description; `None` when no row has `code`
    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<Option<Company>, DatabaseError>;

    /// Returns whether a row was deleted
    async fn delete_company(&self, code: &str) -> Result<bool, DatabaseError>;

    async fn company_invoices(&self, code: &str) -> Result<Vec<Invoice>, DatabaseError>;

    /// Industry labels linked to the company
    async fn company_industries(&self, code: &str) -> Result<Vec<String>, DatabaseError>;

    // Invoices

    async fn list_invoices(&self) -> Result<Vec<Invoice>, DatabaseError>;

    async fn find_invoice(&self, id: i32) -> Result<Option<Invoice>, DatabaseError>;

    /// Invoice joined with its owning company
    async fn find_invoice_detail(&self, id: i32) -> Result<Option<InvoiceDetail>, DatabaseError>;

    /// Insert with store defaults for `paid`, `add_date` and `paid_date`.
    /// An unknown `comp_code` is `DatabaseError::Constraint`.
    async fn insert_invoice(&self, comp_code: &str, amt: f64) -> Result<Invoice, DatabaseError>;

    async fn update_invoice_amount(&self, id: i32, amt: f64)
        -> Result<Option<Invoice>, DatabaseError>;

    async fn delete_invoice(&self, id: i32) -> Result<bool, DatabaseError>;

    // Industries

    async fn list_industries(&self) -> Result<Vec<Industry>, DatabaseError>;

    async fn find_industry(&self, code: &str) -> Result<Option<Industry>, DatabaseError>;

    async fn insert_industry(&self, industry: &Industry) -> Result<Industry, DatabaseError>;

    /// Codes of companies linked to the industry
    async fn industry_company_codes(&self, code: &str) -> Result<Vec<String>, DatabaseError>;

    /// Link a company to an industry; a duplicate pair is `DatabaseError::Conflict`
    async fn insert_association(
        &self,
        comp_code: &str,
        indus_code: &str,
    ) -> Result<CompanyIndustry, DatabaseError>;
}
