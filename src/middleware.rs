//! Request-processing stages. Each stage either hands the request on with
//! `next.run` or answers it itself; `routes::app_router` fixes their order.

pub mod auth;
pub mod capture;
pub mod logging;

pub use auth::require_auth;
pub use logging::{log_requests, RequestLogSettings};
