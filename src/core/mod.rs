// src/core/mod.rs

pub mod chain_merger;
pub mod chain_runner;
pub mod graph_display;
pub mod names;
pub mod paths;
pub mod workspace;
