pub mod balance;
pub mod bid;
pub mod cancel;
pub mod cli;
pub mod close;
pub mod common;
pub mod config;
pub mod constants;
pub mod errors;
pub mod exhibit;
pub mod instruction;
pub mod keys;
pub mod ledger;
pub mod lifecycle;
pub mod pdas;
pub mod reader;
pub mod setup;
pub mod show;
pub mod state;
pub mod utils;
