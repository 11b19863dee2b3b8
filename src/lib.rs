pub mod config;
pub mod db;
pub mod phase;
pub mod services;
