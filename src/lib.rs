// region:    --- Modules
pub mod auth;
pub mod database;
pub mod filter;
pub mod handlers;
pub mod ingest;
pub mod inventory;
pub mod query;
pub mod storage;

// endregion: --- Modules
