// Library for tests to access modules

pub mod collector;
pub mod compare;
pub mod config;
pub mod detector;
pub mod matcher;
pub mod models;
pub mod report;
pub mod snapshot_repo;
