pub mod payload;
pub mod response;

pub use payload::Payload;
pub use response::{ApiResponse, ApiResult};
