//! Restricted Master Problem (C5): the Dantzig–Wolfe LP over the currently known column
//! pool, one `=1` equality per task and one `=1` convexity equality per machine.
//!
//! Resolves spec.md's Open Question #1 (see DESIGN.md): the problem statement (spec §1) is
//! "each task assigned to at most one machine", so the task row is `≤1` in spirit. It is
//! still encoded as an `=1` equality, for meaningful duals on every row, by routing the
//! slack of that `≤1` through an explicit `Column::Slack` variable with zero profit — a
//! genuine "leave this task unassigned" choice, not an artificial infeasibility marker.

use crate::column::Column;
use crate::lp_engine::{ConstrId, LpEngine, LpStatus, VarId};
use crate::problem::Problem;

const EPS: f64 = 1e-5;

/// Dual prices returned after a solve: `pi[t]` for task constraints, `mu[m]` for machine
/// convexity constraints.
pub struct Duals {
    pub pi: Vec<f64>,
    pub mu: Vec<f64>,
}

/// Maintains the column ↔ variable bookkeeping and drives an [`LpEngine`].
pub struct RestrictedMaster<E: LpEngine> {
    engine: E,
    task_constrs: Vec<ConstrId>,
    machine_constrs: Vec<ConstrId>,
    columns: Vec<Column>,
    vars: Vec<VarId>,
    status: Option<LpStatus>,
}

impl<E: LpEngine> RestrictedMaster<E> {
    /// Builds task and machine convexity constraints as equalities (spec §4.5), with no
    /// columns yet.
    pub fn new(problem: &Problem) -> Self {
        let mut engine = E::new_problem();
        let task_constrs = (0..problem.num_tasks())
            .map(|_| engine.add_eq_constraint(1.0))
            .collect();
        let machine_constrs = (0..problem.num_machines())
            .map(|_| engine.add_eq_constraint(1.0))
            .collect();
        RestrictedMaster {
            engine,
            task_constrs,
            machine_constrs,
            columns: Vec::new(),
            vars: Vec::new(),
            status: None,
        }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    /// Inserts `lambda_k`, appends coefficients to the task constraints it touches and, for
    /// a real schedule or a convexity placeholder, to its machine's convexity constraint.
    /// Task slacks never touch a convexity constraint (spec §4.3/§4.5).
    pub fn add_column(&mut self, problem: &Problem, column: Column) -> usize {
        let obj_coef = column.profit(problem);
        let mut terms: Vec<(ConstrId, f64)> = column
            .tasks()
            .iter()
            .map(|&t| (self.task_constrs[t], 1.0))
            .collect();
        if let Column::Slack { task } = &column {
            terms = vec![(self.task_constrs[*task], 1.0)];
        }
        if let Some(m) = column.machine() {
            terms.push((self.machine_constrs[m], 1.0));
        }
        let var = self.engine.add_continuous_var(obj_coef, &terms);
        let idx = self.columns.len();
        self.columns.push(column);
        self.vars.push(var);
        idx
    }

    pub fn solve(&mut self) -> Result<(), crate::lp_engine::SolveError> {
        self.status = Some(self.engine.optimize()?);
        Ok(())
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self.status, Some(LpStatus::Optimal) | Some(LpStatus::Suboptimal))
    }

    /// Duals from the last solve, or `None` if unavailable (signals CG termination, not
    /// infeasibility of the original problem — spec §4.5).
    pub fn duals(&self) -> Option<Duals> {
        if !self.is_feasible() {
            return None;
        }
        let pi = self.task_constrs.iter().map(|&c| self.engine.dual(c)).collect();
        let mu = self
            .machine_constrs
            .iter()
            .map(|&c| self.engine.dual(c))
            .collect();
        Some(Duals { pi, mu })
    }

    pub fn objective_value(&self) -> f64 {
        if self.is_feasible() {
            self.engine.obj_value()
        } else {
            f64::NAN
        }
    }

    pub fn lambda_value(&self, idx: usize) -> f64 {
        self.engine.var_value(self.vars[idx])
    }

    /// True iff every `lambda[k]` is within `EPS` of 0 or 1.
    pub fn is_integer(&self) -> bool {
        (0..self.columns.len()).all(|k| {
            let v = self.lambda_value(k);
            v < EPS || (v - 1.0).abs() < EPS
        })
    }

    /// Aggregates fractional mass per `(machine, task)` (spec §4.6) and returns the pair
    /// closest to 0.5, breaking ties lexicographically by `(machine, task)`. Returns `None`
    /// if every aggregate is integral.
    pub fn fractional_assignment(
        &self,
        problem: &Problem,
    ) -> Option<(usize, usize)> {
        let mut mass = vec![vec![0.0_f64; problem.num_tasks()]; problem.num_machines()];
        for (k, column) in self.columns.iter().enumerate() {
            if let Some(m) = column.machine() {
                let lambda = self.lambda_value(k);
                for &t in column.tasks() {
                    mass[m][t] += lambda;
                }
            }
        }
        let mut best: Option<(usize, usize, f64)> = None;
        for m in 0..problem.num_machines() {
            for t in 0..problem.num_tasks() {
                let z = mass[m][t];
                let frac = z.min(1.0 - z);
                if frac.abs() < EPS {
                    continue; // integral within tolerance
                }
                let closeness = frac;
                match &best {
                    None => best = Some((m, t, closeness)),
                    Some((_, _, best_closeness)) if closeness > *best_closeness + EPS => {
                        best = Some((m, t, closeness));
                    }
                    _ => {}
                }
            }
        }
        best.map(|(m, t, _)| (m, t))
    }

    /// True iff any machine-convexity bootstrap placeholder carries positive weight in the
    /// current solution: that machine has no real schedule honoring the node's rules.
    pub fn uses_infeasible_placeholder(&self) -> bool {
        self.columns.iter().enumerate().any(|(k, column)| {
            matches!(column, Column::Infeasible { .. }) && self.lambda_value(k) > EPS
        })
    }

    /// Aggregate schedule currently implied by the integer LP solution: for each machine,
    /// the union of tasks whose lambda is near 1 on that machine's columns. Only meaningful
    /// when [`Self::is_integer`] holds.
    pub fn integer_schedule(&self, problem: &Problem) -> Vec<(usize, Vec<usize>)> {
        let mut schedules: Vec<Vec<usize>> = vec![Vec::new(); problem.num_machines()];
        for (k, column) in self.columns.iter().enumerate() {
            if let Column::Schedule { machine, tasks } = column {
                if self.lambda_value(k) > 0.5 {
                    schedules[*machine].extend(tasks.iter().copied());
                }
            }
        }
        schedules.into_iter().enumerate().collect()
    }
}
