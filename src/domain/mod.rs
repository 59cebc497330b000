// Domain layer: farm model, result aggregate, events and the ports the core calls through.

pub mod enums;
pub mod events;
pub mod model;
pub mod ports;
pub mod results;
