pub mod position;
pub mod snapshot;
pub mod wire;
