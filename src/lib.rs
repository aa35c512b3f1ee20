/// Basic application code
pub mod app;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects
pub mod domain;
/// Error enums
pub mod error;
/// Stored and requested records
pub mod model;
/// Repositories
pub mod repo;
/// Validation and business rules on top of the repositories
pub mod service;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
