pub mod configuration;
pub use configuration::Config;

pub mod error_handling;

pub mod storage;

pub mod generation;

pub mod session_management;

pub mod kau_finalization;

pub mod submission_processing;

pub mod dashboard;

pub mod web_interface;
pub use web_interface::WebServer;
