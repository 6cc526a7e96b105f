pub mod aws_client;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod matcher;
pub mod search;
pub mod stack;
pub mod status;
pub mod template;
