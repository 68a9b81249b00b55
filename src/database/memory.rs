//! In-memory implementation of `Store` for tests and local development

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Local;

use super::manager::DatabaseError;
use super::models::{Company, CompanyIndustry, Industry, Invoice, InvoiceCompany, InvoiceDetail};
use super::store::Store;

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    invoices: Vec<Invoice>,
    industries: Vec<Industry>,
    associations: Vec<CompanyIndustry>,
    last_invoice_id: i32,
}

/// `Store` keeping rows in insertion order behind a lock.
///
/// Mirrors the constraints of `sql/biztime.sql`: unique codes, company names
/// and industry labels, foreign keys from invoices and associations,
/// `amt > 0`, and cascading company deletes.
/// Every trait call counts as one statement, see [`MemoryStore::query_count`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the same rows as the SQL fixture
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write().unwrap_or_else(|e| e.into_inner());
            tables.companies = vec![
                Company {
                    code: "apple".into(),
                    name: "Apple Computer".into(),
                    description: "Maker of OSX.".into(),
                },
                Company {
                    code: "ibm".into(),
                    name: "IBM".into(),
                    description: "Big blue.".into(),
                },
            ];
            tables.industries = vec![
                Industry { code: "tech".into(), industry: "Technology".into() },
                Industry { code: "acct".into(), industry: "Accounting".into() },
            ];
            tables.associations = vec![
                CompanyIndustry { comp_code: "apple".into(), indus_code: "tech".into() },
                CompanyIndustry { comp_code: "ibm".into(), indus_code: "tech".into() },
            ];
            let today = Local::now().date_naive();
            for (comp_code, amt, paid) in [
                ("apple", 100.0, false),
                ("apple", 200.0, false),
                ("apple", 300.0, true),
                ("ibm", 400.0, false),
            ] {
                tables.last_invoice_id += 1;
                let id = tables.last_invoice_id;
                tables.invoices.push(Invoice {
                    id,
                    comp_code: comp_code.into(),
                    amt,
                    paid,
                    add_date: today,
                    paid_date: paid.then_some(today),
                });
            }
        }
        store
    }

    /// Number of statements served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DatabaseError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.tables
            .read()
            .map_err(|e| DatabaseError::QueryError(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DatabaseError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.tables
            .write()
            .map_err(|e| DatabaseError::QueryError(format!("Failed to acquire write lock: {}", e)))
    }
}

fn amount_check(amt: f64) -> Result<(), DatabaseError> {
    if amt > 0.0 {
        Ok(())
    } else {
        Err(DatabaseError::Constraint(
            "new row for relation \"invoices\" violates check constraint \"invoices_amt_check\""
                .into(),
        ))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.read().map(|_| ())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        Ok(self.read()?.companies.clone())
    }

    async fn find_company(&self, code: &str) -> Result<Option<Company>, DatabaseError> {
        Ok(self.read()?.companies.iter().find(|c| c.code == code).cloned())
    }

    async fn insert_company(&self, company: &Company) -> Result<Company, DatabaseError> {
        let mut tables = self.write()?;
        if tables.companies.iter().any(|c| c.code == company.code) {
            return Err(DatabaseError::company_code_taken(&company.code));
        }
        if tables.companies.iter().any(|c| c.name == company.name) {
            return Err(DatabaseError::company_name_taken(&company.name));
        }
        tables.companies.push(company.clone());
        Ok(company.clone())
    }

    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> Result<Option<Company>, DatabaseError> {
        let mut tables = self.write()?;
        if !tables.companies.iter().any(|c| c.code == code) {
            return Ok(None);
        }
        if tables.companies.iter().any(|c| c.code != code && c.name == name) {
            return Err(DatabaseError::company_name_taken(name));
        }
        Ok(tables.companies.iter_mut().find(|c| c.code == code).map(|c| {
            c.name = name.to_string();
            c.description = description.to_string();
            c.clone()
        }))
    }

    async fn delete_company(&self, code: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.write()?;
        let before = tables.companies.len();
        tables.companies.retain(|c| c.code != code);
        if tables.companies.len() == before {
            return Ok(false);
        }
        // ON DELETE CASCADE
        tables.invoices.retain(|i| i.comp_code != code);
        tables.associations.retain(|a| a.comp_code != code);
        Ok(true)
    }

    async fn company_invoices(&self, code: &str) -> Result<Vec<Invoice>, DatabaseError> {
        Ok(self
            .read()?
            .invoices
            .iter()
            .filter(|i| i.comp_code == code)
            .cloned()
            .collect())
    }

    async fn company_industries(&self, code: &str) -> Result<Vec<String>, DatabaseError> {
        let tables = self.read()?;
        Ok(tables
            .associations
            .iter()
            .filter(|a| a.comp_code == code)
            .filter_map(|a| tables.industries.iter().find(|i| i.code == a.indus_code))
            .map(|i| i.industry.clone())
            .collect())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, DatabaseError> {
        Ok(self.read()?.invoices.clone())
    }

    async fn find_invoice(&self, id: i32) -> Result<Option<Invoice>, DatabaseError> {
        Ok(self.read()?.invoices.iter().find(|i| i.id == id).cloned())
    }

    async fn find_invoice_detail(&self, id: i32) -> Result<Option<InvoiceDetail>, DatabaseError> {
        let tables = self.read()?;
        let Some(invoice) = tables.invoices.iter().find(|i| i.id == id) else {
            return Ok(None);
        };
        Ok(tables
            .companies
            .iter()
            .find(|c| c.code == invoice.comp_code)
            .map(|c| {
                InvoiceDetail::from_parts(
                    invoice.clone(),
                    InvoiceCompany {
                        code: c.code.clone(),
                        name: c.name.clone(),
                        description: c.description.clone(),
                    },
                )
            }))
    }

    async fn insert_invoice(&self, comp_code: &str, amt: f64) -> Result<Invoice, DatabaseError> {
        let mut tables = self.write()?;
        if !tables.companies.iter().any(|c| c.code == comp_code) {
            return Err(DatabaseError::Constraint(format!(
                "insert on table \"invoices\" violates foreign key constraint \"invoices_comp_code_fkey\" (comp_code)=({})",
                comp_code
            )));
        }
        amount_check(amt)?;

        tables.last_invoice_id += 1;
        let invoice = Invoice {
            id: tables.last_invoice_id,
            comp_code: comp_code.to_string(),
            amt,
            paid: false,
            add_date: Local::now().date_naive(),
            paid_date: None,
        };
        tables.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice_amount(
        &self,
        id: i32,
        amt: f64,
    ) -> Result<Option<Invoice>, DatabaseError> {
        let mut tables = self.write()?;
        let Some(invoice) = tables.invoices.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        amount_check(amt)?;
        invoice.amt = amt;
        Ok(Some(invoice.clone()))
    }

    async fn delete_invoice(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.write()?;
        let before = tables.invoices.len();
        tables.invoices.retain(|i| i.id != id);
        Ok(tables.invoices.len() != before)
    }

    async fn list_industries(&self) -> Result<Vec<Industry>, DatabaseError> {
        Ok(self.read()?.industries.clone())
    }

    async fn find_industry(&self, code: &str) -> Result<Option<Industry>, DatabaseError> {
        Ok(self.read()?.industries.iter().find(|i| i.code == code).cloned())
    }

    async fn insert_industry(&self, industry: &Industry) -> Result<Industry, DatabaseError> {
        let mut tables = self.write()?;
        if tables.industries.iter().any(|i| i.code == industry.code) {
            return Err(DatabaseError::industry_code_taken(&industry.code));
        }
        if tables.industries.iter().any(|i| i.industry == industry.industry) {
            return Err(DatabaseError::industry_label_taken(&industry.industry));
        }
        tables.industries.push(industry.clone());
        Ok(industry.clone())
    }

    async fn industry_company_codes(&self, code: &str) -> Result<Vec<String>, DatabaseError> {
        Ok(self
            .read()?
            .associations
            .iter()
            .filter(|a| a.indus_code == code)
            .map(|a| a.comp_code.clone())
            .collect())
    }

    async fn insert_association(
        &self,
        comp_code: &str,
        indus_code: &str,
    ) -> Result<CompanyIndustry, DatabaseError> {
        let mut tables = self.write()?;
        if !tables.companies.iter().any(|c| c.code == comp_code)
            || !tables.industries.iter().any(|i| i.code == indus_code)
        {
            return Err(DatabaseError::Constraint(
                "insert on table \"comp_indus\" violates foreign key constraint".into(),
            ));
        }
        if tables
            .associations
            .iter()
            .any(|a| a.comp_code == comp_code && a.indus_code == indus_code)
        {
            return Err(DatabaseError::association_exists(comp_code, indus_code));
        }
        let association = CompanyIndustry {
            comp_code: comp_code.to_string(),
            indus_code: indus_code.to_string(),
        };
        tables.associations.push(association.clone());
        Ok(association)
    }
}
