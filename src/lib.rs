// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod display;
pub mod export;
pub mod models;
pub mod rate;
pub mod samplers;
pub mod scheduler;
pub mod source;
