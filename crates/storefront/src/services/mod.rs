//! Business logic services for storefront.
//!
//! # Services
//!
//! - `document_store` - Remote JSON document store client
//! - `order_store` - Local JSON file fallback for orders
//! - `submitter` - Remote-first order submission with local fallback
//! - `payment` - UPI payment and contact hand-off links

pub mod document_store;
pub mod order_store;
pub mod payment;
pub mod submitter;

pub use document_store::{DocumentStoreClient, RemoteStoreError};
pub use order_store::{FileOrderStore, LocalStoreError, ORDERS_KEY};
pub use submitter::{
    LocalOrderStore, OrderSubmitter, RemoteOrderStore, SubmissionError, SubmissionOutcome,
};
