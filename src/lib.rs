// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod error;
pub mod iflist;
pub mod models;
pub mod report;
pub mod sampler;
pub mod sysctl_repo;
pub mod version;
