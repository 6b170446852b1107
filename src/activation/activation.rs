use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Activation functions available to compute units. The set is closed:
/// forward evaluation and the delta rule only ever dispatch over these
/// four variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    Tanh,
    ReLU,
}

impl ActivationFunction {
    /// Maps the numeric activation-type ids used by callers that store
    /// unit types as plain integers: `0` Identity, `1` Sigmoid, `2` Tanh,
    /// `3` ReLU. Unrecognized ids fall back to Identity.
    pub fn from_id(id: u32) -> ActivationFunction {
        match id {
            1 => ActivationFunction::Sigmoid,
            2 => ActivationFunction::Tanh,
            3 => ActivationFunction::ReLU,
            _ => ActivationFunction::Identity,
        }
    }

    /// Activation level at `x` (the unit's weighted input sum).
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => 1.0 - 2.0 / (1.0 + E.powf(2.0 * x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
        }
    }

    /// Derivative of the activation at `x`.
    ///
    /// ReLU's derivative at exactly 0 is defined as 1 (`x < 0` is the only
    /// zero branch). Weight vectors trained against this engine depend on
    /// that convention.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let fx = self.function(x);
                1.0 - fx * fx
            }
            ActivationFunction::ReLU => if x < 0.0 { 0.0 } else { 1.0 },
        }
    }
}
