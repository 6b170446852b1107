/// One hidden layer: an ordered list of compute-unit handles.
///
/// The order is creation order and is load-bearing — it defines this
/// layer's slice of the flat weight vector. The per-layer fan-outs
/// (reset, backpropagate, apply learning) are driven by `Network`, which
/// owns the unit storage the handles point into.
#[derive(Debug, Default)]
pub struct Layer {
    units: Vec<usize>,
}

impl Layer {
    pub(crate) fn new() -> Layer {
        Layer { units: Vec::new() }
    }

    pub(crate) fn push(&mut self, unit: usize) {
        self.units.push(unit);
    }

    /// Compute-unit indices in creation order.
    pub fn unit_indices(&self) -> &[usize] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
