// Domain layer: entities, ports (interfaces) and boundary schemas.

pub mod model;
pub mod ports;
pub mod schemas;
