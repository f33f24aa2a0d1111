// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod counters;
pub mod error;
pub mod render;
pub mod sampler;
