// src/cli/handlers/mod.rs

pub mod commons;
pub mod generate;
pub mod init;
pub mod list;
pub mod run;
pub mod show;
