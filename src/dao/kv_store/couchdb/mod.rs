//! CouchDB key-value backend.

mod config;
mod error;
mod store;

pub use config::CouchConfig;
pub use error::CouchDaoError;
pub use store::CouchKvStore;
