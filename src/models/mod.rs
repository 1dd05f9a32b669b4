pub mod config;
pub mod disposition;
pub mod view;
