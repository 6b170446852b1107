use crate::network::unit::UnitRef;

/// Default damping factor for the momentum accumulator.
pub const DEFAULT_DAMPING: f64 = 0.9;

/// Weighted, directed edge from a source unit into a compute unit. Carries
/// a momentum accumulator: an exponentially damped running average of past
/// weight moves that speeds up convergence of the delta rule.
#[derive(Debug, Clone)]
pub struct Connection {
    source: UnitRef,
    weight: f64,
    momentum: f64,
    damping: f64,
}

impl Connection {
    pub fn new(source: UnitRef, weight: f64) -> Connection {
        Connection::with_damping(source, weight, DEFAULT_DAMPING)
    }

    /// Like `new`, with a custom momentum damping factor.
    pub fn with_damping(source: UnitRef, weight: f64, damping: f64) -> Connection {
        Connection {
            source,
            weight,
            momentum: 0.0,
            damping,
        }
    }

    pub fn source(&self) -> UnitRef {
        self.source
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Overwrites the weight in place. Momentum is left untouched so a
    /// restored weight vector continues from the current training state.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Momentum-based weight move. The momentum is updated (delta added,
    /// then damped) before it feeds the weight, so one call applies both
    /// the raw delta and the freshly damped momentum.
    pub fn update_weight(&mut self, delta: f64) {
        self.momentum = (self.momentum + delta) * self.damping;
        self.weight += delta + self.momentum;
    }
}
