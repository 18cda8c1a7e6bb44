//! BranchNode (C6): bundles a rule list, an inherited column pool, and an RMP; runs column
//! generation to optimality of the restricted LP.

use tracing::{debug, info};

use crate::branching::{schedule_satisfies_rules, BranchingRule};
use crate::column::Column;
use crate::lp_engine::{LpEngine, SolveError};
use crate::pricing::{self, EPS};
use crate::problem::Problem;
use crate::rmp::RestrictedMaster;

/// Consecutive stalled iterations (objective unchanged within `EPS`) before the CG loop
/// gives up without proof of optimality (spec §4.6).
pub const STALL_LIMIT: u32 = 50;

/// Result of running column generation to completion on one node.
pub enum NodeOutcome {
    /// RMP had no feasible solution under this node's rule set: prune.
    Infeasible,
    /// RMP is feasible; `bound_certified` is `true` iff CG stopped because no machine
    /// yielded a positive-reduced-cost column (a proven LP bound), and `false` if it
    /// stopped via the stall guard or missing duals (spec §4.8/§7/§9 Open Question #2) —
    /// an uncertified bound must never be used to prune, only to decide how to branch.
    Feasible { bound_certified: bool },
}

/// One node of the branch-and-bound tree.
pub struct BranchNode<E: LpEngine> {
    pub id: u64,
    pub rules: Vec<BranchingRule>,
    rmp: RestrictedMaster<E>,
}

impl<E: LpEngine> BranchNode<E> {
    /// Constructs a node: filters the inherited pool against `rules`, builds the RMP, and
    /// adds every surviving column (spec §4.6 construction steps 1-3).
    pub fn new(id: u64, problem: &Problem, rules: Vec<BranchingRule>, inherited: Vec<Column>) -> Self {
        let mut rmp = RestrictedMaster::new(problem);
        for column in inherited {
            let keep = match &column {
                Column::Schedule { machine, tasks } => {
                    schedule_satisfies_rules(&rules, *machine, tasks)
                }
                Column::Slack { .. } => true,
                // Each node gets its own fresh placeholder below; an inherited one would
                // otherwise double up a machine's convexity row.
                Column::Infeasible { .. } => false,
            };
            if keep {
                rmp.add_column(problem, column);
            }
        }
        for m in 0..problem.num_machines() {
            rmp.add_column(problem, Column::Infeasible { machine: m });
        }
        BranchNode { id, rules, rmp }
    }

    /// Runs the column-generation loop to completion (spec §4.6 `solve()`).
    ///
    /// Returns `Err` only for a genuine LP backend failure (spec §7) — an unrecognized
    /// solver status, not ordinary RMP infeasibility, which is folded into
    /// `NodeOutcome::Infeasible` instead. The caller must propagate the error rather than
    /// treat it as "this subtree is infeasible": a transient backend error pruning a subtree
    /// could silently produce a wrong or missing incumbent.
    pub fn solve(&mut self, problem: &Problem) -> Result<NodeOutcome, SolveError> {
        let mut previous_obj = f64::NAN;
        let mut stall_count = 0u32;

        loop {
            self.rmp.solve()?;
            if !self.rmp.is_feasible() {
                debug!(node = self.id, "RMP infeasible, pruning node");
                return Ok(NodeOutcome::Infeasible);
            }

            let obj = self.rmp.objective_value();
            if previous_obj.is_finite() && (obj - previous_obj).abs() <= EPS {
                stall_count += 1;
            } else {
                stall_count = 0;
            }
            previous_obj = obj;
            if stall_count > STALL_LIMIT {
                info!(node = self.id, "column generation stalled, bound not certified");
                return Ok(NodeOutcome::Feasible {
                    bound_certified: false,
                });
            }

            let duals = match self.rmp.duals() {
                Some(d) => d,
                None => {
                    debug!(node = self.id, "duals unavailable, terminating CG loop");
                    return Ok(NodeOutcome::Feasible {
                        bound_certified: false,
                    });
                }
            };

            let mut found_any = false;
            for m in 0..problem.num_machines() {
                let priced = pricing::price_machine(problem, &self.rules, m, &duals.pi, duals.mu[m]);
                for column in priced {
                    found_any = true;
                    self.rmp.add_column(
                        problem,
                        Column::Schedule {
                            machine: m,
                            tasks: column.tasks,
                        },
                    );
                }
            }
            if !found_any {
                info!(node = self.id, obj, "column generation converged, RMP optimal");
                return Ok(NodeOutcome::Feasible {
                    bound_certified: true,
                });
            }
        }
    }

    pub fn objective_value(&self) -> f64 {
        self.rmp.objective_value()
    }

    pub fn is_integer(&self) -> bool {
        self.rmp.is_integer()
    }

    /// An integer LP solution only represents a genuine assignment for the original problem
    /// if no machine's convexity is still resting on its bootstrap placeholder — that would
    /// mean this node's rules admit no real schedule for that machine.
    pub fn is_genuinely_feasible(&self) -> bool {
        self.rmp.is_integer() && !self.rmp.uses_infeasible_placeholder()
    }

    pub fn fractional_assignment(&self, problem: &Problem) -> Option<(usize, usize)> {
        self.rmp.fractional_assignment(problem)
    }

    pub fn integer_schedule(&self, problem: &Problem) -> Vec<(usize, Vec<usize>)> {
        self.rmp.integer_schedule(problem)
    }

    /// Snapshot of this node's column pool, to be deep-copied into both children (spec §9
    /// "deep copy on branching"). Excludes convexity bootstrap placeholders: each child
    /// gets its own fresh one.
    pub fn column_pool(&self) -> Vec<Column> {
        (0..self.rmp.num_columns())
            .map(|i| self.rmp.column(i).clone())
            .filter(|c| !matches!(c, Column::Infeasible { .. }))
            .collect()
    }
}
