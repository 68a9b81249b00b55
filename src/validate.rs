//! Request body checks that run before any query touches the store.
//!
//! Each function either returns the typed input for a handler or a
//! `ValidationError` listing every offending field.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::Payload;
use crate::database::models::{Company, Industry};
use crate::error::ApiError;
use crate::slug::slugify;

const REQUIRED: &str = "This field is required";

/// Name and description accepted by company updates
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyChanges {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: f64,
}

#[derive(Debug, Default)]
struct Checks {
    errors: BTreeMap<String, String>,
}

impl Checks {
    fn fail(&mut self, field: &str, reason: &str) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| reason.to_string());
    }

    /// Any string, empty allowed
    fn string(&mut self, payload: &Payload, field: &str) -> String {
        match payload.get(field) {
            None | Some(Value::Null) => {
                self.fail(field, REQUIRED);
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.fail(field, "Must be a string");
                String::new()
            }
        }
    }

    /// Non-blank string, surrounding whitespace removed
    fn text(&mut self, payload: &Payload, field: &str) -> String {
        let value = self.string(payload, field);
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail(field, "Must not be blank");
        }
        trimmed.to_string()
    }

    fn amount(&mut self, payload: &Payload, field: &str) -> f64 {
        match payload.get(field) {
            None | Some(Value::Null) => {
                self.fail(field, REQUIRED);
                0.0
            }
            Some(Value::Number(n)) => match n.as_f64() {
                Some(amt) if amt > 0.0 => amt,
                _ => {
                    self.fail(field, "Must be greater than zero");
                    0.0
                }
            },
            Some(_) => {
                self.fail(field, "Must be a number");
                0.0
            }
        }
    }

    fn finish(self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.errors)))
        }
    }
}

/// `{name, description}` for `POST /companies`; the code is the slug of `name`
pub fn new_company(payload: &Payload) -> Result<Company, ApiError> {
    let mut checks = Checks::default();
    let name = checks.text(payload, "name");
    let description = checks.string(payload, "description");

    let code = slugify(&name);
    if code.is_empty() {
        checks.fail("name", "Must contain at least one letter or digit");
    }
    checks.finish("Company requires name and description")?;

    Ok(Company {
        code,
        name,
        description,
    })
}

/// `{name, description}` for `PUT /companies/:code`
pub fn company_changes(payload: &Payload) -> Result<CompanyChanges, ApiError> {
    let mut checks = Checks::default();
    let name = checks.text(payload, "name");
    let description = checks.string(payload, "description");
    checks.finish("Company update requires name and description")?;

    Ok(CompanyChanges { name, description })
}

/// `{comp_code, amt}` for `POST /invoices`
pub fn new_invoice(payload: &Payload) -> Result<NewInvoice, ApiError> {
    let mut checks = Checks::default();
    let comp_code = checks.text(payload, "comp_code");
    let amt = checks.amount(payload, "amt");
    checks.finish("Invoice requires comp_code and amt")?;

    Ok(NewInvoice { comp_code, amt })
}

/// `{amt}` for `PUT /invoices/:id`
pub fn invoice_amount(payload: &Payload) -> Result<f64, ApiError> {
    let mut checks = Checks::default();
    let amt = checks.amount(payload, "amt");
    checks.finish("Invoice update requires amt")?;

    Ok(amt)
}

/// `{code, industry}` for `POST /industries`
pub fn new_industry(payload: &Payload) -> Result<Industry, ApiError> {
    let mut checks = Checks::default();
    let code = checks.text(payload, "code");
    let industry = checks.text(payload, "industry");
    checks.finish("Industry requires code and industry")?;

    Ok(Industry { code, industry })
}

/// `{company_code}` for `POST /industries/:ind_code`
pub fn association_company(payload: &Payload) -> Result<String, ApiError> {
    let mut checks = Checks::default();
    let company_code = checks.text(payload, "company_code");
    checks.finish("Association requires company_code")?;

    Ok(company_code)
}
