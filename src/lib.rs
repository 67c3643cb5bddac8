//! REVOX client library
//!
//! Signs riders in, keeps their bikes and maintenance records in sync with
//! the REVOX API, and relays maintenance questions to the AI. The terminal
//! front end in `cli` is one consumer; [`App`] is the entry point for others.

pub mod app;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod forms;
pub mod navigation;
pub mod notify;
pub mod query;
pub mod services;
pub mod session;
pub mod storage;
pub mod stores;
pub mod token;
pub mod ui;
pub mod utils;
pub mod validation;
pub mod version;
pub mod view;

#[cfg(test)]
mod tests;

pub use app::{App, OperationKind, Outcome};
pub use error::{Result, RevoxError};
