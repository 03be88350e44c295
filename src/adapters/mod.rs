// Adapters layer: concrete gateways for the hosted backend and for in-process use.

pub mod memory;
pub mod rest;

pub use memory::MemoryGateway;
pub use rest::RestGateway;
