// Domain layer: the course document and the ports the engine talks through.

pub mod model;
pub mod ports;
