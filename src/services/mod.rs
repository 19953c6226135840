//! Adapters for the external lookup services

pub mod cymru;
pub mod rdap;
pub mod registry;
pub mod whois;

pub use registry::RegistryClient;
