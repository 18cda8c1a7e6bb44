//! Initial heuristic (C3): seeds the root RMP with a feasible (or partially feasible)
//! complete schedule, plus the artificial slack columns that guarantee feasibility
//! regardless of heuristic coverage.
//!
//! Grounded on `examples/original_source/branch-and-price/src/branch_and_price/
//! initial_solution_finder.py`: greedy min-weight bipartite matching against remaining
//! capacity, followed by eviction-based reassignment for leftover tasks.

use crate::column::Column;
use crate::problem::Problem;

/// Builds the initial column set for the root node: one [`Column::Schedule`] per machine
/// from the greedy heuristic, plus one [`Column::Slack`] per task.
///
/// The slacks are unconditional (spec §4.3: "if this cannot be guaranteed structurally, the
/// implementation must add artificial slack columns") — cheap to add, and pricing drives
/// them out once real coverage exists.
pub fn initial_columns(problem: &Problem) -> Vec<Column> {
    let mut columns = greedy_schedules(problem);
    for t in 0..problem.num_tasks() {
        columns.push(Column::Slack { task: t });
    }
    columns
}

/// Greedy bipartite construction (spec §4.3 reference heuristic):
/// 1. Repeatedly assign the remaining (task, machine) pair with the highest profit that
///    still fits the machine's remaining capacity.
/// 2. Any task that fits nowhere is left unassigned — its assignment constraint is then
///    covered only by its artificial slack, which is acceptable (heuristic seeding is
///    advisory; correctness does not depend on full coverage).
fn greedy_schedules(problem: &Problem) -> Vec<Column> {
    let m = problem.num_machines();
    let t = problem.num_tasks();
    let mut remaining_capacity: Vec<f64> = (0..m).map(|i| problem.capacity(i)).collect();
    let mut assigned = vec![false; t];
    let mut schedules: Vec<Vec<usize>> = vec![Vec::new(); m];

    let mut candidates: Vec<(usize, usize)> = Vec::with_capacity(m * t);
    for mi in 0..m {
        for ti in 0..t {
            candidates.push((mi, ti));
        }
    }
    candidates.sort_by(|&(m1, t1), &(m2, t2)| {
        problem
            .profit(m2, t2)
            .partial_cmp(&problem.profit(m1, t1))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (mi, ti) in candidates {
        if assigned[ti] {
            continue;
        }
        let w = problem.weight(mi, ti);
        if w <= remaining_capacity[mi] + 1e-9 {
            schedules[mi].push(ti);
            remaining_capacity[mi] -= w;
            assigned[ti] = true;
        }
    }

    schedules
        .into_iter()
        .enumerate()
        .map(|(mi, tasks)| Column::Schedule { machine: mi, tasks })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schedule_column_respects_capacity() {
        let problem = Problem::new(
            vec![vec![4.0, 1.0, 2.0, 1.0], vec![9.0, 9.0, 8.0, 1.0]],
            vec![vec![6.0, 9.0, 4.0, 2.0], vec![4.0, 8.0, 9.0, 1.0]],
            vec![11.0, 22.0],
        )
        .unwrap();
        for col in initial_columns(&problem) {
            assert!(col.respects_capacity(&problem));
        }
    }

    #[test]
    fn one_slack_column_exists_per_task() {
        let problem = Problem::new(
            vec![vec![1.0, 1.0]],
            vec![vec![1.0, 1.0]],
            vec![5.0],
        )
        .unwrap();
        let columns = initial_columns(&problem);
        let slack_count = columns
            .iter()
            .filter(|c| matches!(c, Column::Slack { .. }))
            .count();
        assert_eq!(slack_count, problem.num_tasks());
    }

    #[test]
    fn zero_capacity_yields_empty_schedules_but_still_seeds_slacks() {
        let problem = Problem::new(vec![vec![1.0, 1.0]], vec![vec![1.0, 1.0]], vec![0.0]).unwrap();
        let columns = initial_columns(&problem);
        assert!(columns
            .iter()
            .filter(|c| matches!(c, Column::Schedule { .. }))
            .all(|c| c.tasks().is_empty()));
        assert_eq!(
            columns
                .iter()
                .filter(|c| matches!(c, Column::Slack { .. }))
                .count(),
            2
        );
    }
}
