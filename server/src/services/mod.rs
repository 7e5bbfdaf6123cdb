// server/src/services/mod.rs

//! Domain services. Each owns a handle to the document store and nothing else;
//! none of them call each other.

pub mod catalog;
pub mod directory;
pub mod orders;

pub use catalog::ProductCatalog;
pub use directory::{Registration, UserDirectory};
pub use orders::{OrderFilter, OrderLifecycle};
