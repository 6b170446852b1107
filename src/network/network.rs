use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, NetResult};
use crate::network::connection::Connection;
use crate::network::layer::Layer;
use crate::network::unit::{ComputeUnit, SourceUnit, UnitRef};

/// Dense feed-forward network over an explicit unit/connection graph.
///
/// The network owns every unit: source units (inputs and bias) live in one
/// arena, compute units (hidden and output) in another, and connections
/// address their source through a copyable [`UnitRef`] handle. The graph
/// is acyclic by construction — dense wiring proceeds layer by layer, so a
/// connection only ever points at a unit created before it.
///
/// Lifecycle: create units, wire once with [`Network::build_dense_mesh`],
/// then [`Network::evaluate`] / [`Network::learn`] repeatedly. Weights may
/// be overwritten in place with [`Network::set_weights`] without rewiring.
///
/// All mutating operations take `&mut self`; a network is not meant to be
/// shared across threads without external serialization.
#[derive(Debug)]
pub struct Network {
    /// Input and bias units.
    sources: Vec<SourceUnit>,
    /// Hidden and output units.
    units: Vec<ComputeUnit>,
    /// Handles of the network inputs, in creation order.
    inputs: Vec<usize>,
    hidden_layers: Vec<Layer>,
    /// Handles of the output units, in creation order.
    outputs: Vec<usize>,
    /// Flat weight index → (compute unit, connection slot), recorded while
    /// wiring. `get_weights` and `set_weights` both traverse this map, so
    /// every weight-vector order in the engine is the creation order.
    wiring: Vec<(usize, usize)>,
}

impl Network {
    /// Creates a network with `hidden_layer_count` empty hidden layers.
    /// The layer count is fixed for the lifetime of the network; layers
    /// are populated with [`Network::create_hidden_unit`] before wiring.
    pub fn new(hidden_layer_count: usize) -> Network {
        Network {
            sources: Vec::new(),
            units: Vec::new(),
            inputs: Vec::new(),
            hidden_layers: (0..hidden_layer_count).map(|_| Layer::new()).collect(),
            outputs: Vec::new(),
            wiring: Vec::new(),
        }
    }

    // ── Topology construction ───────────────────────────────────────────

    /// Appends a network input and returns its handle.
    pub fn create_input_unit(&mut self) -> UnitRef {
        let index = self.sources.len();
        self.sources.push(SourceUnit::new());
        self.inputs.push(index);
        UnitRef::Source(index)
    }

    /// Appends an output unit with the given activation function.
    pub fn create_output_unit(&mut self, function: ActivationFunction) -> UnitRef {
        let index = self.units.len();
        self.units.push(ComputeUnit::new(function));
        self.outputs.push(index);
        UnitRef::Compute(index)
    }

    /// Appends a unit to the hidden layer at `layer_index`.
    ///
    /// # Panics
    /// Panics if `layer_index` is out of range for the layer count the
    /// network was created with.
    pub fn create_hidden_unit(
        &mut self,
        layer_index: usize,
        function: ActivationFunction,
    ) -> UnitRef {
        let index = self.units.len();
        self.units.push(ComputeUnit::new(function));
        self.hidden_layers[layer_index].push(index);
        UnitRef::Compute(index)
    }

    /// Fresh bias unit, permanently at activation 1. Never shared: each
    /// bias connection gets its own instance.
    fn create_bias_unit(&mut self) -> UnitRef {
        let index = self.sources.len();
        self.sources.push(SourceUnit::new());
        UnitRef::Source(index)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn hidden_layer_count(&self) -> usize {
        self.hidden_layers.len()
    }

    pub fn hidden_layer(&self, layer_index: usize) -> &Layer {
        &self.hidden_layers[layer_index]
    }

    /// Number of connections actually wired so far.
    pub fn connection_count(&self) -> usize {
        self.wiring.len()
    }

    /// Activation level of any unit in the network.
    pub fn activation_of(&self, unit: UnitRef) -> f64 {
        match unit {
            UnitRef::Source(index) => self.sources[index].activation(),
            UnitRef::Compute(index) => self.units[index].activation(),
        }
    }

    /// Current error term of a unit. Source units carry no error.
    pub fn delta_of(&self, unit: UnitRef) -> f64 {
        match unit {
            UnitRef::Source(_) => 0.0,
            UnitRef::Compute(index) => self.units[index].delta(),
        }
    }

    /// Activation of the `index`-th output unit.
    pub fn output(&self, index: usize) -> f64 {
        self.units[self.outputs[index]].activation()
    }

    /// Activations of all output units, in creation order.
    pub fn output_activations(&self) -> Vec<f64> {
        self.outputs
            .iter()
            .map(|&unit| self.units[unit].activation())
            .collect()
    }

    // ── Dense-mesh wiring ───────────────────────────────────────────────

    /// Number of connections a dense mesh needs for the current topology.
    ///
    /// Without hidden layers every input feeds every output. With hidden
    /// layers each adjacent pair is fully connected. With bias, every
    /// compute unit gets one extra connection.
    pub fn dense_connection_count(&self, with_bias: bool) -> usize {
        let mut count;
        if self.hidden_layers.is_empty() {
            count = self.inputs.len() * self.outputs.len();
            if with_bias {
                count += self.outputs.len();
            }
        } else {
            count = self.inputs.len() * self.hidden_layers[0].len();
            for i in 1..self.hidden_layers.len() {
                count += self.hidden_layers[i - 1].len() * self.hidden_layers[i].len();
            }
            count += self.hidden_layers[self.hidden_layers.len() - 1].len() * self.outputs.len();
            if with_bias {
                count += self.outputs.len();
                for layer in &self.hidden_layers {
                    count += layer.len();
                }
            }
        }
        count
    }

    /// Wires the dense mesh drawing any random weights from the thread
    /// RNG. See [`Network::build_dense_mesh_with`].
    pub fn build_dense_mesh(
        &mut self,
        weights: Option<&[f64]>,
        with_bias: bool,
        weight_factor: f64,
    ) -> NetResult<()> {
        self.build_dense_mesh_with(weights, with_bias, weight_factor, &mut rand::thread_rng())
    }

    /// Wires a fully connected mesh over the current topology, consuming
    /// one weight per connection created.
    ///
    /// When `weights` is `None`, `dense_connection_count(with_bias)`
    /// values are drawn uniformly from `[0, weight_factor)` using `rng`.
    /// When it is `Some`, its length must match that count exactly; a
    /// mismatch is rejected with [`NetError::DimensionMismatch`] before
    /// any connection is created.
    ///
    /// Connection creation order (the weight-vector order externally
    /// stored vectors must follow):
    /// 1. input → first hidden layer (or input → output if no hidden
    ///    layers), input-major;
    /// 2. hidden\[i\] → hidden\[i+1\] for each adjacent pair, source-major;
    /// 3. if `with_bias`: one fresh bias unit per hidden unit (layer
    ///    order, unit order within the layer), then one per output unit;
    /// 4. last hidden layer → output, source-major (skipped when there are
    ///    no hidden layers — the bias block then comes last).
    ///
    /// Wire a network once; repeated calls would append a second mesh on
    /// top of the first.
    pub fn build_dense_mesh_with<R: Rng + ?Sized>(
        &mut self,
        weights: Option<&[f64]>,
        with_bias: bool,
        weight_factor: f64,
        rng: &mut R,
    ) -> NetResult<()> {
        let expected = self.dense_connection_count(with_bias);

        let generated: Vec<f64>;
        let weights: &[f64] = match weights {
            Some(supplied) => {
                if supplied.len() != expected {
                    return Err(NetError::DimensionMismatch {
                        received: supplied.len(),
                        expected,
                        param: "weights",
                        op: "Network::build_dense_mesh",
                    });
                }
                supplied
            }
            None => {
                generated = (0..expected)
                    .map(|_| rng.gen::<f64>() * weight_factor)
                    .collect();
                &generated
            }
        };

        // Unit handles are snapshotted up front; `connect` needs `&mut self`.
        let inputs = self.inputs.clone();
        let outputs = self.outputs.clone();
        let hidden: Vec<Vec<usize>> = self
            .hidden_layers
            .iter()
            .map(|layer| layer.unit_indices().to_vec())
            .collect();

        let mut next = 0;
        if hidden.is_empty() {
            for &input in &inputs {
                for &output in &outputs {
                    self.connect(output, UnitRef::Source(input), weights[next]);
                    next += 1;
                }
            }
            if with_bias {
                for &output in &outputs {
                    let bias = self.create_bias_unit();
                    self.connect(output, bias, weights[next]);
                    next += 1;
                }
            }
        } else {
            for &input in &inputs {
                for &unit in &hidden[0] {
                    self.connect(unit, UnitRef::Source(input), weights[next]);
                    next += 1;
                }
            }
            for i in 1..hidden.len() {
                for &source in &hidden[i - 1] {
                    for &unit in &hidden[i] {
                        self.connect(unit, UnitRef::Compute(source), weights[next]);
                        next += 1;
                    }
                }
            }
            if with_bias {
                for layer in &hidden {
                    for &unit in layer {
                        let bias = self.create_bias_unit();
                        self.connect(unit, bias, weights[next]);
                        next += 1;
                    }
                }
                for &output in &outputs {
                    let bias = self.create_bias_unit();
                    self.connect(output, bias, weights[next]);
                    next += 1;
                }
            }
            let last = &hidden[hidden.len() - 1];
            for &source in last {
                for &output in &outputs {
                    self.connect(output, UnitRef::Compute(source), weights[next]);
                    next += 1;
                }
            }
        }

        Ok(())
    }

    /// Appends one connection and records its flat weight index.
    fn connect(&mut self, unit: usize, source: UnitRef, weight: f64) {
        let slot = self.units[unit].incoming.len();
        self.units[unit].push_connection(Connection::new(source, weight));
        self.wiring.push((unit, slot));
    }

    // ── Evaluation & learning ───────────────────────────────────────────

    /// Forward pass: assigns the input activations in order, then computes
    /// every hidden layer in order, then every output unit.
    ///
    /// Rejects a vector whose length differs from the input count before
    /// touching any activation.
    pub fn evaluate(&mut self, input_values: &[f64]) -> NetResult<()> {
        if input_values.len() != self.inputs.len() {
            return Err(NetError::DimensionMismatch {
                received: input_values.len(),
                expected: self.inputs.len(),
                param: "inputValues",
                op: "Network::evaluate",
            });
        }

        for (position, &value) in input_values.iter().enumerate() {
            let source = self.inputs[position];
            self.sources[source].set_activation(value);
        }

        for layer_index in 0..self.hidden_layers.len() {
            let unit_indices = self.hidden_layers[layer_index].unit_indices().to_vec();
            for unit in unit_indices {
                self.compute_activation(unit);
            }
        }
        let outputs = self.outputs.clone();
        for unit in outputs {
            self.compute_activation(unit);
        }

        Ok(())
    }

    /// Delta learn rule with backpropagation, adapting every connection
    /// weight towards the reference output values with learn step `beta`.
    ///
    /// One pass: reset all error terms, compute the output errors and push
    /// them into the last hidden layer, propagate the error backwards
    /// through the remaining hidden layers, then apply the weight updates
    /// (outputs first, hidden layers in forward order).
    ///
    /// Rejects a reference vector whose length differs from the output
    /// count before touching any state.
    pub fn learn(&mut self, references: &[f64], beta: f64) -> NetResult<()> {
        if references.len() != self.outputs.len() {
            return Err(NetError::DimensionMismatch {
                received: references.len(),
                expected: self.outputs.len(),
                param: "references",
                op: "Network::learn",
            });
        }

        self.reset_all();

        let outputs = self.outputs.clone();
        for (position, &unit) in outputs.iter().enumerate() {
            self.units[unit].set_output_error(references[position]);
            self.backpropagate_unit(unit);
        }

        // Error flows right to left. The first hidden layer's sources are
        // only inputs and bias, so it has nothing left to propagate to.
        for layer_index in (1..self.hidden_layers.len()).rev() {
            let unit_indices = self.hidden_layers[layer_index].unit_indices().to_vec();
            for unit in unit_indices {
                self.backpropagate_unit(unit);
            }
        }

        for &unit in &outputs {
            self.apply_learning_unit(unit, beta);
        }
        for layer_index in 0..self.hidden_layers.len() {
            let unit_indices = self.hidden_layers[layer_index].unit_indices().to_vec();
            for unit in unit_indices {
                self.apply_learning_unit(unit, beta);
            }
        }

        Ok(())
    }

    /// Zeroes the error term of every output and hidden unit. `learn`
    /// calls this at the start of each pass so errors never accumulate
    /// across passes.
    pub fn reset_all(&mut self) {
        for unit in &mut self.units {
            unit.reset_error();
        }
    }

    /// Recomputes one unit's weighted sum and activation from its incoming
    /// connections, in connection order.
    fn compute_activation(&mut self, unit: usize) {
        let mut weighted_sum = 0.0;
        for connection in &self.units[unit].incoming {
            weighted_sum += connection.weight() * self.activation_of(connection.source());
        }
        let function = self.units[unit].function;
        self.units[unit].weighted_sum = weighted_sum;
        self.units[unit].activation = function.function(weighted_sum);
    }

    /// Pushes this unit's weighted error into every upstream compute unit.
    /// Source units (inputs, bias) are skipped.
    fn backpropagate_unit(&mut self, unit: usize) {
        let delta = self.units[unit].delta;
        for slot in 0..self.units[unit].incoming.len() {
            let (source, weight) = {
                let connection = &self.units[unit].incoming[slot];
                (connection.source(), connection.weight())
            };
            if let UnitRef::Compute(upstream) = source {
                self.units[upstream].accumulate_error(delta * weight);
            }
        }
    }

    /// Moves every incoming weight of one unit by
    /// `beta * delta * f'(x) * source activation` (plus momentum).
    fn apply_learning_unit(&mut self, unit: usize, beta: f64) {
        let factor = beta
            * self.units[unit].delta
            * self.units[unit].function.derivative(self.units[unit].weighted_sum);
        for slot in 0..self.units[unit].incoming.len() {
            let source_activation = self.activation_of(self.units[unit].incoming[slot].source());
            self.units[unit].incoming[slot].update_weight(factor * source_activation);
        }
    }

    // ── Weight access ───────────────────────────────────────────────────

    /// Flat weight vector in creation order. The result round-trips
    /// through [`Network::set_weights`] and matches the vector consumed by
    /// [`Network::build_dense_mesh`].
    pub fn get_weights(&self) -> Vec<f64> {
        self.wiring
            .iter()
            .map(|&(unit, slot)| self.units[unit].incoming[slot].weight())
            .collect()
    }

    /// Overwrites every connection weight in place, in the same creation
    /// order the mesh was wired in. Momentum accumulators are untouched.
    ///
    /// Rejects a vector whose length differs from
    /// `dense_connection_count(with_bias)` before touching any weight.
    pub fn set_weights(&mut self, weights: &[f64], with_bias: bool) -> NetResult<()> {
        let expected = self.dense_connection_count(with_bias);
        if weights.len() != expected {
            return Err(NetError::DimensionMismatch {
                received: weights.len(),
                expected,
                param: "weights",
                op: "Network::set_weights",
            });
        }

        for (&(unit, slot), &weight) in self.wiring.iter().zip(weights.iter()) {
            self.units[unit].incoming[slot].set_weight(weight);
        }
        Ok(())
    }
}
