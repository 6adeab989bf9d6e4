//! Domain service façades.
//!
//! Typed functions grouping endpoints by resource. These are deliberately
//! thin: they shape requests and responses and leave every lifecycle
//! concern (bearer attachment, refresh, retry) to the dispatcher.

pub mod admin;
pub mod auth;
pub mod payment;
pub mod store;
pub mod user;
