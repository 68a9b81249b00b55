use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// Flat row produced by joining `invoices` with `companies`
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceCompanyRow {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceCompany {
    pub code: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub company: InvoiceCompany,
}

impl From<InvoiceCompanyRow> for InvoiceDetail {
    fn from(row: InvoiceCompanyRow) -> Self {
        Self {
            company: InvoiceCompany {
                code: row.comp_code.clone(),
                name: row.name,
                description: row.description,
            },
            id: row.id,
            comp_code: row.comp_code,
            amt: row.amt,
            paid: row.paid,
            add_date: row.add_date,
            paid_date: row.paid_date,
        }
    }
}

impl InvoiceDetail {
    pub fn from_parts(invoice: Invoice, company: InvoiceCompany) -> Self {
        Self {
            id: invoice.id,
            comp_code: invoice.comp_code,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joined_row_nests_company() {
        let row = InvoiceCompanyRow {
            id: 7,
            comp_code: "apple".into(),
            amt: 100.0,
            paid: false,
            add_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            paid_date: None,
            name: "Apple".into(),
            description: "Maker of OSX.".into(),
        };

        let value = serde_json::to_value(InvoiceDetail::from(row)).unwrap();
        assert_eq!(value["comp_code"], "apple");
        assert_eq!(value["add_date"], "2024-03-01");
        assert_eq!(value["paid_date"], json!(null));
        assert_eq!(
            value["company"],
            json!({"code": "apple", "name": "Apple", "description": "Maker of OSX."})
        );
        assert!(value.get("name").is_none());
    }
}
