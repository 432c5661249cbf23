pub mod auth;
pub mod budget;
pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod services;
pub mod state;
pub mod timeline;
