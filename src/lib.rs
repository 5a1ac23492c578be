pub mod auth;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod search_console;
