//! Entity routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request under the mount path
//!     → route_table.rs (first-match prefix lookup)
//!     → error_boundary.rs (per-entry panic isolation)
//!     → entity component (axum Router)
//!     → Response, or a 404 envelope when nothing matched
//! ```

pub mod error_boundary;
pub mod route_table;

pub use route_table::{RouteEntry, RouteTable};
