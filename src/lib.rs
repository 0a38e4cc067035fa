// Library for tests to access modules

pub mod config;
pub mod disk_repo;
pub mod docker_repo;
pub mod models;
pub mod proc_repo;
pub mod routes;
pub mod snapshot;
pub mod version;
