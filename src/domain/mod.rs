// Domain layer: dataset models and ports (interfaces).

pub mod model;
pub mod ports;
