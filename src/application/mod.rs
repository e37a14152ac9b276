/// Application layer: orchestration of domain types over infrastructure
pub mod services;
pub mod use_cases;
