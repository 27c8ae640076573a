pub mod config;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod renderer;
pub mod routes;
pub mod state;
pub mod types;
