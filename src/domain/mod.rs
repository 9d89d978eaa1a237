// Domain layer: document model, tables and ports. No I/O.

pub mod model;
pub mod ports;
