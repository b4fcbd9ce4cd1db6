pub mod api;
pub mod cli;
pub mod config;
pub mod crm;
pub mod db;
pub mod engine;
pub mod errors;
pub mod models;
pub mod scoring;
pub mod signals;
