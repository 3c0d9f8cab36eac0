pub mod annotation;
pub mod cli;
pub mod commands;
pub mod reads;
pub mod utils;
pub mod variant;
pub mod writers;
