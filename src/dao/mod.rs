/// Key-value backends the query engine persists into.
pub mod kv_store;
/// Persisted record definitions.
pub mod models;
/// Typed collection façade over the key-value store.
pub mod query_engine;
/// Storage error types shared by every backend.
pub mod storage;
