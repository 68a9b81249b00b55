use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::invoice::Invoice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// Company with its invoices and industry labels attached.
/// Both collections are always serialized, empty or not.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub invoices: Vec<Invoice>,
    pub industries: Vec<String>,
}
