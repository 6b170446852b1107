use std::error::Error;
use std::fmt;

/// Errors produced by the network engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// A supplied vector's length does not match what the current topology
    /// requires. The check runs before any mutation, so a rejected call
    /// leaves the network unchanged.
    DimensionMismatch {
        /// Length that was actually received.
        received: usize,
        /// Length the topology requires.
        expected: usize,
        /// Name of the violated parameter.
        param: &'static str,
        /// Operation that rejected the call.
        op: &'static str,
    },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetError::DimensionMismatch { received, expected, param, op } => write!(
                f,
                "dimension mismatch for {param}: received {received}, expected {expected} (in {op})"
            ),
        }
    }
}

impl Error for NetError {}

pub type NetResult<T> = std::result::Result<T, NetError>;
