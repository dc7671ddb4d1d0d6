// src/services/mod.rs

pub mod feed;
pub mod ledger;

pub use feed::FeedAssembler;
pub use ledger::{LedgerError, LikeLedger};
