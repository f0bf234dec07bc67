pub mod error_code;
pub mod pagination;
pub mod response;

pub use pagination::{PaginationInfo, PaginationQuery};
