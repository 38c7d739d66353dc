pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod ipc;
pub mod policy;
pub mod service;
pub mod vault;
