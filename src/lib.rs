pub mod cli;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod response;
pub mod sandbox;
pub mod scope;
pub mod screens;
pub mod services;
pub mod session;
pub mod validation;
