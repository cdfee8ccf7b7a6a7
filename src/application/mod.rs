pub mod exit_policy;
pub mod request;
pub mod resource_client;
