// Service-level tests against the in-memory repositories

pub mod relay_hub_test;
pub mod stats_service_test;
