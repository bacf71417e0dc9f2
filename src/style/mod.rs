/// Text overlay style.
pub mod config;
