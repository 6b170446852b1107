pub mod connection;
pub mod layer;
pub mod network;
pub mod spec;
pub mod unit;

pub use connection::Connection;
pub use layer::Layer;
pub use network::Network;
pub use spec::{LayerSpec, TopologySpec};
pub use unit::{ComputeUnit, SourceUnit, UnitRef};
