use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::network::network::Network;

/// Describes one layer of compute units: how many, and which activation
/// function they share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub units: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network topology.
///
/// Covers architecture only — trained weights travel separately as the
/// flat vectors of `get_weights`/`set_weights`. A `TopologySpec` can be
/// saved to / loaded from JSON so callers can store their architecture
/// configuration instead of hard-coding unit counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    /// Human-readable name used as the file stem.
    pub name: String,
    /// Number of network inputs.
    pub inputs: usize,
    /// Hidden layers in forward order (possibly empty).
    #[serde(default)]
    pub hidden: Vec<LayerSpec>,
    /// Output layer.
    pub output: LayerSpec,
}

impl TopologySpec {
    /// Builds an unwired network with this topology. The caller wires it
    /// with `build_dense_mesh` (randomized or with a stored weight vector).
    pub fn build(&self) -> Network {
        let mut network = Network::new(self.hidden.len());
        for _ in 0..self.inputs {
            network.create_input_unit();
        }
        for (layer_index, layer) in self.hidden.iter().enumerate() {
            for _ in 0..layer.units {
                network.create_hidden_unit(layer_index, layer.activation);
            }
        }
        for _ in 0..self.output.units {
            network.create_output_unit(self.output.activation);
        }
        network
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a `TopologySpec` from a JSON file.
    pub fn load_json(path: &str) -> std::io::Result<TopologySpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
