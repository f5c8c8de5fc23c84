pub mod account;
pub mod auth;
pub mod auth_middleware;
pub mod cache;
pub mod config;
pub mod env_config;
pub mod errors;
pub mod handlers;
pub mod icalendar;
pub mod kv;
pub mod logging;
pub mod orchestrator;
pub mod request_id;
pub mod state;
pub mod timetable;
pub mod upstream;
pub mod worker_pool;
