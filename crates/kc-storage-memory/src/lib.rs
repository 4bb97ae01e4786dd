//! # kc-storage-memory
//!
//! In-memory storage backend implementing every `kc-storage` trait.
//!
//! [`InMemoryStore`] enforces the same constraints a database backend
//! would (unique usernames per realm, unique sibling group names) and
//! records every mutating call so callers can assert on exactly what was
//! issued. [`FailPoint`]s inject backend failures into the next matching
//! call.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod fault;
pub mod store;

pub use fault::FailPoint;
pub use store::{InMemoryStore, StoreOperation};
