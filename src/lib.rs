pub mod cli;
pub mod constants;
pub mod core;
pub mod executors;
pub mod generators;
pub mod models;
pub mod scaffold;
pub mod system;
