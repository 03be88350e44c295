// Domain layer: records, table mapping and the gateway port. No I/O here.

pub mod model;
pub mod ports;
