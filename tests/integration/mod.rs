// Full request/response cycles through the router, backed by in-memory storage

pub mod auth_integration_test;
pub mod records_integration_test;
pub mod routing_integration_test;
