pub mod cli;
pub mod commands;
pub mod config;
pub mod contract;
pub mod crypto;
pub mod eth;
pub mod game;
