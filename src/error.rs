//! Error types for chain construction and strap interaction.

use core::fmt;

/// Errors reported by the solver and the strap controller.
///
/// None of these reach the user: per-frame failures are reported through
/// [`FrameStatus`](crate::strap::FrameStatus) and heal on the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StrapError {
    /// A body handle is not (or no longer) live in the solver.
    NotReady,
    /// Pointer unprojection produced no usable world point.
    DegenerateRay,
    /// A joint referenced a body that does not exist.
    InvalidBody { index: usize },
    /// Rope length must be positive and finite.
    InvalidLength,
    /// Damping coefficients must be non-negative and finite.
    InvalidDamping,
    /// A chain needs between 2 and 3 links between anchor and card.
    InvalidChainLength { links: usize },
}

impl fmt::Display for StrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrapError::NotReady => write!(f, "body handle is not ready"),
            StrapError::DegenerateRay => write!(f, "pointer ray does not reach the drag plane"),
            StrapError::InvalidBody { index } => write!(f, "no live body at index {}", index),
            StrapError::InvalidLength => write!(f, "rope length must be positive and finite"),
            StrapError::InvalidDamping => write!(f, "damping must be non-negative and finite"),
            StrapError::InvalidChainLength { links } => {
                write!(f, "chain must have 2 or 3 links, got {}", links)
            }
        }
    }
}
