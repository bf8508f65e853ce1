pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod repository;
pub mod services;
pub mod validate;
