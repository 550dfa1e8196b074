pub mod auth;
pub mod config;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod password;
pub mod query;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
