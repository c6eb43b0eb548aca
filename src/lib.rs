pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod gmail;
pub mod logging;
pub mod report;
pub mod sheets;
