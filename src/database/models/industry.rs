use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Industry {
    pub code: String,
    pub industry: String,
}

/// Industry with the codes of its linked companies
#[derive(Debug, Clone, Serialize)]
pub struct IndustrySummary {
    #[serde(flatten)]
    pub industry: Industry,
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CompanyIndustry {
    pub comp_code: String,
    pub indus_code: String,
}
