pub mod api_client;
pub mod configuration;
pub mod contract;
pub mod domain;
pub mod fixtures;
pub mod scenarios;
pub mod suite;
pub mod telemetry;
