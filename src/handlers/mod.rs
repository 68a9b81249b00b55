// handlers/mod.rs - HTTP handlers, one module per resource
//
// Every handler returns `ApiResult`, so any failure (validation, missing row,
// store error) flows through `ApiError::into_response` and renders the shared
// `{ "error": { message, status, code } }` envelope.

pub mod companies;  // /companies, /companies/:code
pub mod industries; // /industries, /industries/:ind_code
pub mod invoices;   // /invoices, /invoices/:id
pub mod system;     // /, /health, fallback
