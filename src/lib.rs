pub mod accumulate;
pub mod baseline;
pub mod cli;
pub mod config;
pub mod error;
pub mod exclude;
pub mod format;
pub mod gate;
pub mod gitlab;
pub mod model;
pub mod normalize;
pub mod parsers;
pub mod report;
pub mod sort;
