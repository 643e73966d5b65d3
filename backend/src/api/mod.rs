//! HTTP API module.
//!
//! Server, route table, response types and request logging.

pub mod logs;
pub mod routes;
pub mod server;
pub mod types;

pub use logs::*;
pub use routes::RouteTable;
pub use server::{build_router, start_server};
pub use types::*;
