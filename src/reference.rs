//! Reference monolithic models (spec §6.3): used only for cross-checking, never by the
//! core solver.
//!
//! `standalone_lp_relaxation` mirrors
//! `examples/original_source/branch-and-price/src/standalone_model/
//! gap_standalone_model_builder.py` (direct `x[m][t]` assignment formulation); since
//! [`crate::lp_engine::LpEngine`] is continuous-only, this solves the LP relaxation rather
//! than the original's binary ILP. `full_dantzig_wolfe_bound` enumerates every feasible
//! machine schedule (`feasible_machine_schedules_finder.py`) and solves the unrestricted DW
//! LP — the bound a branch node converges to if column generation runs until every column
//! has been primed (spec §8 property 4). Because each machine's subproblem is itself an
//! integer knapsack, the DW reformulation's bound is generally *tighter* than (not equal
//! to) the compact assignment LP's: convexifying whole feasible schedules captures the
//! knapsack polytope's integrality in a way relaxing `x[m][t]` to `[0,1]` does not.

use crate::column::Column;
use crate::lp_engine::LpEngine;
use crate::problem::Problem;
use crate::rmp::RestrictedMaster;

/// Direct 0/1 assignment formulation, relaxed to `0 ≤ x[m][t] ≤ 1`:
/// maximize `Σ profit[m][t] x[m][t]` s.t. `Σ_m x[m][t] ≤ 1` per task and
/// `Σ_t weight[m][t] x[m][t] ≤ capacity[m]` per machine.
pub fn standalone_lp_relaxation<E: LpEngine>(problem: &Problem) -> f64 {
    // `LpEngine` only exposes equality constraints (the RMP never needs inequalities), so
    // each "≤1"/"≤capacity" row is modeled with an explicit continuous slack variable that
    // turns it into an equality.
    let mut engine = E::new_problem();
    let task_constrs: Vec<_> = (0..problem.num_tasks())
        .map(|_| engine.add_eq_constraint(1.0))
        .collect();
    let machine_constrs: Vec<_> = (0..problem.num_machines())
        .map(|m| engine.add_eq_constraint(problem.capacity(m)))
        .collect();

    for m in 0..problem.num_machines() {
        for t in 0..problem.num_tasks() {
            let terms = vec![
                (task_constrs[t], 1.0),
                (machine_constrs[m], problem.weight(m, t)),
            ];
            let _ = engine.add_continuous_var(problem.profit(m, t), &terms);
        }
    }
    // Slack variables turn each ≤ row into an equality: task slack has coefficient 1, no
    // objective contribution; machine slack likewise.
    for &constr in &task_constrs {
        let _ = engine.add_continuous_var(0.0, &[(constr, 1.0)]);
    }
    for &constr in &machine_constrs {
        let _ = engine.add_continuous_var(0.0, &[(constr, 1.0)]);
    }

    engine.optimize().expect("reference LP relaxation should solve cleanly");
    engine.obj_value()
}

/// Enumerates every feasible `(machine, task-subset)` schedule, grounded on
/// `feasible_machine_schedules_finder.py`'s recursive subset search. Exponential in the
/// number of tasks per machine; only used on the small cross-check instances in tests.
pub fn enumerate_schedules(problem: &Problem) -> Vec<Column> {
    let mut columns = Vec::new();
    for m in 0..problem.num_machines() {
        enumerate_machine(problem, m, 0, &mut Vec::new(), &mut columns);
    }
    columns
}

fn enumerate_machine(
    problem: &Problem,
    m: usize,
    next_task: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Column>,
) {
    if problem.schedule_weight(m, current) > problem.capacity(m) + 1e-9 {
        return;
    }
    out.push(Column::Schedule {
        machine: m,
        tasks: current.clone(),
    });
    for t in next_task..problem.num_tasks() {
        current.push(t);
        enumerate_machine(problem, m, t + 1, current, out);
        current.pop();
    }
}

/// Solves the full (unrestricted) Dantzig-Wolfe LP over every feasible schedule plus the
/// per-task "unassigned" slacks (spec §1's "at most one machine").
pub fn full_dantzig_wolfe_bound<E: LpEngine>(problem: &Problem) -> f64 {
    let mut rmp = RestrictedMaster::<E>::new(problem);
    for column in enumerate_schedules(problem) {
        rmp.add_column(problem, column);
    }
    for t in 0..problem.num_tasks() {
        rmp.add_column(problem, Column::Slack { task: t });
    }
    rmp.solve().expect("full DW LP should solve cleanly");
    rmp.objective_value()
}
