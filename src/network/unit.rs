use crate::activation::activation::ActivationFunction;
use crate::network::connection::Connection;

/// Handle into the network-owned unit storage. Connections hold these
/// instead of owning their source, so the wiring graph carries no
/// lifetimes and no reference counting.
///
/// Error never propagates past a `Source` handle: backpropagation skips
/// connections whose source is a plain source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRef {
    /// Externally driven unit (network input or bias).
    Source(usize),
    /// Unit whose activation is computed from its incoming connections.
    Compute(usize),
}

/// Unit with no incoming connections. Starts at activation 1.0, so an
/// untouched instance doubles as a bias unit; network inputs get their
/// activation assigned on every forward pass.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    activation: f64,
}

impl SourceUnit {
    pub fn new() -> SourceUnit {
        SourceUnit { activation: 1.0 }
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn set_activation(&mut self, value: f64) {
        self.activation = value;
    }
}

impl Default for SourceUnit {
    fn default() -> SourceUnit {
        SourceUnit::new()
    }
}

/// Unit that derives its activation from incoming connections through an
/// activation function. Used for hidden and output units.
///
/// The weighted sum is kept alongside the activation because the delta
/// rule needs the derivative at the pre-activation point, not at the
/// activation itself.
#[derive(Debug)]
pub struct ComputeUnit {
    pub(crate) activation: f64,
    pub(crate) function: ActivationFunction,
    pub(crate) incoming: Vec<Connection>,
    pub(crate) weighted_sum: f64,
    /// Backpropagated error term, valid between `reset_error` and the end
    /// of the learning pass.
    pub(crate) delta: f64,
}

impl ComputeUnit {
    pub fn new(function: ActivationFunction) -> ComputeUnit {
        ComputeUnit {
            activation: 0.0,
            function,
            incoming: Vec::new(),
            weighted_sum: 0.0,
            delta: 0.0,
        }
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn function(&self) -> ActivationFunction {
        self.function
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn connections(&self) -> &[Connection] {
        &self.incoming
    }

    pub(crate) fn push_connection(&mut self, connection: Connection) {
        self.incoming.push(connection);
    }

    /// Output-unit error against the reference value: `delta = ref - a`.
    pub fn set_output_error(&mut self, reference: f64) {
        self.delta = reference - self.activation;
    }

    /// Hidden-unit error contribution from one downstream connection.
    /// `reset_error` must have run since the previous learning pass.
    pub fn accumulate_error(&mut self, incoming: f64) {
        self.delta += incoming;
    }

    pub fn reset_error(&mut self) {
        self.delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_source_unit_acts_as_bias() {
        let unit = SourceUnit::new();
        assert_eq!(unit.activation(), 1.0);
    }

    #[test]
    fn source_activation_is_externally_settable() {
        let mut unit = SourceUnit::new();
        unit.set_activation(-2.5);
        assert_eq!(unit.activation(), -2.5);
    }

    #[test]
    fn output_error_overwrites_while_accumulate_adds() {
        let mut unit = ComputeUnit::new(ActivationFunction::Identity);
        unit.activation = 5.0;
        unit.set_output_error(2.0);
        assert_eq!(unit.delta(), -3.0);

        unit.reset_error();
        unit.accumulate_error(0.5);
        unit.accumulate_error(-0.2);
        assert_eq!(unit.delta(), 0.3);
    }
}
