//! Canonical resource storage and the listener protocol on top of it.
//!
//! A [`ResourceStore`] holds one [`Store`] per [`ResourceKind`](crate::ResourceKind).
//! Each store assigns its own ids, so ids are only unique within one kind.

mod generic_store;
pub mod listener;
mod resource_store;

pub use generic_store::{Store, StoreType};
pub use listener::ResourceListener;
pub use resource_store::ResourceStore;
