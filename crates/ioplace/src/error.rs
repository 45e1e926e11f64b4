//! Typed errors returned by the placement core.

use ioplace_common::InternalError;

/// Errors that stop a placement run.
///
/// Configuration errors describe caller misuse. Infeasibility errors carry
/// the counts needed to decide how much capacity to add before retrying.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// A placer parameter or boundary value is out of range.
    #[error("invalid placer parameters: {0}")]
    InvalidParams(String),

    /// A blockage reaches into more than one core edge.
    #[error("blockage #{index} spans {edges} core edges; a blockage must lie on a single edge")]
    InvalidBlockage {
        /// Position of the blockage in registration order.
        index: usize,
        /// Number of edges whose interior the blockage touches.
        edges: usize,
    },

    /// The boundary does not offer enough usable slots for all pins.
    #[error("{pins} pins cannot be placed on {slots} usable boundary slots")]
    Infeasible {
        /// Number of pins to place.
        pins: usize,
        /// Number of non-blocked slots on the ring.
        slots: usize,
    },

    /// A section received more pins than it has usable slots.
    #[error("section {section} holds {pins} pins but only {slots} usable slots")]
    SectionInfeasible {
        /// Index of the failing section.
        section: u32,
        /// Pins assigned to the section.
        pins: usize,
        /// Usable slots in the section.
        slots: usize,
    },

    /// Section rebalancing did not reach a feasible distribution.
    #[error("section partitioning did not converge after {iterations} iterations")]
    PartitionDiverged {
        /// Number of assignment passes attempted.
        iterations: usize,
    },

    /// An engine invariant was broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_infeasible() {
        let err = PlaceError::Infeasible { pins: 12, slots: 10 };
        assert_eq!(
            format!("{err}"),
            "12 pins cannot be placed on 10 usable boundary slots"
        );
    }

    #[test]
    fn display_invalid_blockage() {
        let err = PlaceError::InvalidBlockage { index: 2, edges: 2 };
        assert!(format!("{err}").starts_with("blockage #2 spans 2 core edges"));
    }

    #[test]
    fn internal_is_transparent() {
        let err: PlaceError = InternalError::new("boom").into();
        assert_eq!(format!("{err}"), "internal placer error: boom");
    }
}
