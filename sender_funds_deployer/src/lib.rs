pub mod config;
pub mod contracts;
pub mod deployer;
pub mod error;
pub mod report;
