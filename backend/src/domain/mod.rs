//! Shipping domain: types, services, and the ports they drive.
//!
//! Public surface:
//! - [`geography`]: region catalog and the live/offline reference-data
//!   resolver.
//! - [`pricing`]: billable weight rules and the tiered fee calculator.
//! - [`parcel`]: carrier parcel drafts, patches, records, and the
//!   order-linked parcel service.
//! - [`reconciliation`]: webhook authentication and the delivery-state
//!   machine.
//! - [`ports`]: driven port traits implemented by outbound adapters.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod error;
pub mod geography;
pub mod order;
pub mod parcel;
pub mod ports;
pub mod pricing;
pub mod reconciliation;
pub mod trace_id;

pub use self::error::{DomainError as Error, ErrorCode};
pub use self::trace_id::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
