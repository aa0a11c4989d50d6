// Start of file: /src/utils/mod.rs

/*
    * Re-exports for all utility modules like error handling,
    * response formats, alert and pagination headers, shared utilities, etc.
*/

pub mod error_handler;
pub mod header_util;
pub mod pagination;
pub mod response_handler;
pub mod utils;

// End of file: /src/utils/mod.rs
