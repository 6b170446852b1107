pub mod activation;
pub mod error;
pub mod network;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use error::{NetError, NetResult};
pub use network::connection::Connection;
pub use network::layer::Layer;
pub use network::network::Network;
pub use network::spec::{LayerSpec, TopologySpec};
pub use network::unit::{ComputeUnit, SourceUnit, UnitRef};
