//! Error kinds surfaced by the solver.
//!
//! Node-local anomalies (infeasible RMP, infeasible pricing subproblem, missing duals,
//! stalled column generation) are *not* represented here: per the failure semantics of the
//! branch-and-price driver they are recovered in place and folded into a
//! [`crate::node::NodeOutcome`] rather than propagated. Only instance-validation and LP
//! backend failures reach the caller as an error.

use thiserror::Error;

/// Errors that can terminate a solve.
#[derive(Debug, Error)]
pub enum GapError {
    /// The problem instance failed basic validation (negative weight/profit/capacity,
    /// or mismatched matrix dimensions). Rejected before any solve starts.
    #[error("invalid problem instance: {0}")]
    InvalidInstance(String),

    /// The LP backend reported a failure that is not a recognized status (unbounded RMP,
    /// or an internal solver error). Bubbles straight out of the driver.
    #[error("LP backend failure: {0}")]
    Backend(String),
}
