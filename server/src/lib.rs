pub mod config;
pub mod engine;
pub mod export;
pub mod gamify;
pub mod offline;
pub mod server;
pub mod statbotics;
pub mod stats;
pub mod tba;

pub mod auth;
pub mod roles;

mod handlers;
mod http_types;
mod server_state;
mod validation;
