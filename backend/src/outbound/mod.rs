//! Outbound adapters implementing the domain ports.
//!
//! - **carrier**: reqwest client for the carrier REST API plus the offline
//!   parcel gateway used without credentials.
//! - **memory**: process-local order and webhook-receipt stores.
//! - **notifier**: log-backed notification sink.
//!
//! Adapters translate between wire or storage shapes and domain types. They
//! contain no business rules.

pub mod carrier;
pub mod memory;
pub mod notifier;
