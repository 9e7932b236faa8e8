pub mod cabinet;
pub mod config;
pub mod error;
pub mod games;
pub mod ledger;
pub mod session;
pub mod shell;
pub mod storage;
pub mod words;
