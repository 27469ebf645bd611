//! Session-held models for storefront.

pub mod session;

pub use session::{Confirmation, keys as session_keys};
