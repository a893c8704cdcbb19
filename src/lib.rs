pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod filters;
pub mod model;
pub mod shutdown;
pub mod sync;
pub mod worker;
