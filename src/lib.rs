pub mod api_types;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod models;
