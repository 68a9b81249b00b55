pub mod company;
pub mod industry;
pub mod invoice;

pub use company::{Company, CompanyDetail};
pub use industry::{CompanyIndustry, Industry, IndustrySummary};
pub use invoice::{Invoice, InvoiceCompany, InvoiceCompanyRow, InvoiceDetail};
