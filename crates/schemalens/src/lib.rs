#![forbid(unsafe_code)]

pub mod chat;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod execute;
pub mod generation;
pub mod inspect;
pub mod models;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod source;
pub mod store;
pub mod synthesize;
pub mod utils;

pub use cli::app::{Cli, Command};
