// Adapters layer: concrete implementations of the ports for external systems.

pub mod storage;
