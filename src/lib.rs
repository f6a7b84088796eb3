pub mod aws;
pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
