//! Process-local adapters for the store ports.
//!
//! The storefront owns the real order database; these adapters back the
//! standalone service and the integration tests. State does not survive a
//! restart.

mod order_store;
mod receipts;

pub use order_store::InMemoryOrderStore;
pub use receipts::InMemoryWebhookReceipts;
