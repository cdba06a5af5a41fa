pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod output;
pub mod state;
