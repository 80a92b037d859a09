pub mod app;
pub mod blog;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod filter;
pub mod infra;
pub mod logging;
pub mod table;
pub mod web;
