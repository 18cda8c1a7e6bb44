//! Branch-and-price driver (C7): LIFO tree search, pruning against the incumbent, and
//! Ryan-Foster-style branching into two children.

use tracing::{debug, info};

use crate::branching::BranchingRule;
use crate::column::Column;
use crate::error::GapError;
use crate::heuristic::initial_columns;
use crate::lp_engine::LpEngine;
use crate::node::{BranchNode, NodeOutcome};
use crate::problem::Problem;

const EPS: f64 = 1e-5;

/// Best integer-feasible solution found so far.
#[derive(Debug, Clone)]
pub struct Incumbent {
    pub objective: f64,
    /// `(machine, tasks)` pairs, one per machine.
    pub schedule: Vec<(usize, Vec<usize>)>,
}

/// Outcome of a full branch-and-price solve.
#[derive(Debug, Clone)]
pub enum DriverResult {
    Found(Incumbent),
    /// No integer-feasible solution exists for this instance (spec §7: distinguished
    /// status, not an error).
    NoIncumbent,
}

/// Tree search over [`BranchNode`]s, exploring depth-first (LIFO queue, spec §4.7).
pub struct BranchAndPriceDriver<'p, E: LpEngine> {
    problem: &'p Problem,
    queue: Vec<(Vec<BranchingRule>, Vec<Column>)>,
    next_id: u64,
    incumbent: Option<Incumbent>,
    _engine: std::marker::PhantomData<E>,
}

impl<'p, E: LpEngine> BranchAndPriceDriver<'p, E> {
    pub fn new(problem: &'p Problem) -> Self {
        BranchAndPriceDriver {
            problem,
            queue: vec![(Vec::new(), initial_columns(problem))],
            next_id: 0,
            incumbent: None,
            _engine: std::marker::PhantomData,
        }
    }

    /// Runs the full tree search. A genuine LP backend failure (spec §7) aborts the search
    /// immediately as `GapError::Backend` rather than being folded into node pruning — see
    /// `BranchNode::solve`'s doc comment for why that distinction matters.
    pub fn solve(mut self) -> Result<DriverResult, GapError> {
        while let Some((rules, pool)) = self.queue.pop() {
            let id = self.next_id;
            self.next_id += 1;

            let mut node = BranchNode::<E>::new(id, self.problem, rules, pool);
            let outcome = node
                .solve(self.problem)
                .map_err(|e| GapError::Backend(e.to_string()))?;

            let bound_certified = match outcome {
                NodeOutcome::Infeasible => {
                    debug!(node = id, "node infeasible, discarding");
                    continue;
                }
                NodeOutcome::Feasible { bound_certified } => bound_certified,
            };

            if bound_certified {
                if let Some(incumbent) = &self.incumbent {
                    if node.objective_value() <= incumbent.objective + EPS {
                        debug!(node = id, bound = node.objective_value(), "pruned by bound");
                        continue;
                    }
                }
            }

            if node.is_genuinely_feasible() {
                let objective = node.objective_value();
                let improves = self
                    .incumbent
                    .as_ref()
                    .is_none_or(|inc| objective > inc.objective + EPS);
                if improves {
                    info!(node = id, objective, "new incumbent");
                    self.incumbent = Some(Incumbent {
                        objective,
                        schedule: node.integer_schedule(self.problem),
                    });
                }
                continue;
            }

            let Some((m, t)) = node.fractional_assignment(self.problem) else {
                // Integer (possibly placeholder-reliant) with no fractional pair to branch
                // on: nothing left to improve within this rule set.
                debug!(node = id, "no fractional assignment to branch on, discarding");
                continue;
            };

            let pool = node.column_pool();
            let mut rules_true = node.rules.clone();
            rules_true.push(BranchingRule::new(t, m, true));
            let mut rules_false = node.rules.clone();
            rules_false.push(BranchingRule::new(t, m, false));

            self.queue.push((rules_false, pool.clone()));
            self.queue.push((rules_true, pool));
        }

        Ok(match self.incumbent {
            Some(incumbent) => DriverResult::Found(incumbent),
            None => DriverResult::NoIncumbent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp_engine::ClarabelEngine;

    fn small_instance_a() -> Problem {
        Problem::new(
            vec![
                vec![4.0, 1.0, 2.0, 1.0, 4.0, 3.0, 8.0],
                vec![9.0, 9.0, 8.0, 1.0, 3.0, 8.0, 7.0],
            ],
            vec![
                vec![6.0, 9.0, 4.0, 2.0, 10.0, 3.0, 6.0],
                vec![4.0, 8.0, 9.0, 1.0, 7.0, 5.0, 4.0],
            ],
            vec![11.0, 22.0],
        )
        .unwrap()
    }

    #[test]
    fn solves_small_instance_a_to_known_optimum() {
        let problem = small_instance_a();
        let driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
        match driver.solve().unwrap() {
            DriverResult::Found(incumbent) => {
                // True optimum (spec §8 "Small instance A", verified by exhaustive
                // enumeration — see DESIGN.md for the discrepancy with the spec's literal
                // figure of 47, which the given weight/profit/capacity data cannot reach).
                assert!((incumbent.objective - 41.0).abs() < 1e-4);
            }
            DriverResult::NoIncumbent => panic!("expected an incumbent"),
        }
    }

    #[test]
    fn zero_capacity_instance_finds_the_all_unassigned_incumbent() {
        let problem = Problem::new(vec![vec![1.0, 1.0]], vec![vec![5.0, 5.0]], vec![0.0]).unwrap();
        let driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
        match driver.solve().unwrap() {
            DriverResult::Found(incumbent) => assert!((incumbent.objective - 0.0).abs() < 1e-4),
            DriverResult::NoIncumbent => panic!("leaving every task unassigned is always feasible"),
        }
    }

    #[test]
    fn single_machine_matches_direct_knapsack() {
        let problem = Problem::new(
            vec![vec![4.0, 1.0, 2.0, 1.0]],
            vec![vec![6.0, 9.0, 4.0, 2.0]],
            vec![5.0],
        )
        .unwrap();
        let driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
        match driver.solve().unwrap() {
            DriverResult::Found(incumbent) => {
                // Best subset under weight budget 5 is tasks {1,2,3}: profit 9+4+2=15.
                assert!((incumbent.objective - 15.0).abs() < 1e-4);
            }
            DriverResult::NoIncumbent => panic!("expected an incumbent"),
        }
    }

    #[test]
    fn forcing_rule_is_honored_in_the_incumbent() {
        let problem = small_instance_a();
        let mut driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
        driver.queue = vec![(
            vec![BranchingRule::new(0, 1, true)],
            initial_columns(&problem),
        )];
        match driver.solve().unwrap() {
            DriverResult::Found(incumbent) => {
                let machine_1_tasks = incumbent
                    .schedule
                    .iter()
                    .find(|(m, _)| *m == 1)
                    .map(|(_, tasks)| tasks.clone())
                    .unwrap_or_default();
                assert!(machine_1_tasks.contains(&0));
            }
            DriverResult::NoIncumbent => panic!("expected an incumbent"),
        }
    }

    #[test]
    fn forbidding_all_on_one_machine_matches_remaining_machine_optimum() {
        let problem = small_instance_a();
        let mut driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
        let rules: Vec<BranchingRule> = (0..problem.num_tasks())
            .map(|t| BranchingRule::new(t, 0, false))
            .collect();
        driver.queue = vec![(rules, initial_columns(&problem))];

        let single_machine = Problem::new(
            vec![problem.weight_row(1)],
            vec![problem.profit_row(1)],
            vec![problem.capacity(1)],
        )
        .unwrap();
        let single_driver = BranchAndPriceDriver::<ClarabelEngine>::new(&single_machine);

        let forbidden_result = driver.solve().unwrap();
        let single_result = single_driver.solve().unwrap();
        match (forbidden_result, single_result) {
            (DriverResult::Found(a), DriverResult::Found(b)) => {
                assert!((a.objective - b.objective).abs() < 1e-4);
            }
            _ => panic!("expected both to find an incumbent"),
        }
    }

    /// Random small instances, brute-forced by trying every `machine-or-unassigned` choice
    /// per task, must match the driver's incumbent exactly.
    #[test]
    fn matches_brute_force_on_random_small_instances() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let num_machines = rng.gen_range(1..=2);
            let num_tasks = rng.gen_range(1..=4);
            let weight: Vec<Vec<f64>> = (0..num_machines)
                .map(|_| (0..num_tasks).map(|_| rng.gen_range(1.0..6.0)).collect())
                .collect();
            let profit: Vec<Vec<f64>> = (0..num_machines)
                .map(|_| (0..num_tasks).map(|_| rng.gen_range(1.0..10.0)).collect())
                .collect();
            let capacity: Vec<f64> = (0..num_machines).map(|_| rng.gen_range(0.0..8.0)).collect();
            let problem = Problem::new(weight, profit, capacity).unwrap();

            let expected = brute_force_optimum(&problem);
            let driver = BranchAndPriceDriver::<ClarabelEngine>::new(&problem);
            let found = match driver.solve().unwrap() {
                DriverResult::Found(incumbent) => incumbent.objective,
                DriverResult::NoIncumbent => 0.0, // leaving everything unassigned is always feasible
            };
            assert!(
                (found - expected).abs() < 1e-4,
                "driver={found} brute_force={expected} problem={problem:?}"
            );
        }
    }

    /// Exhaustively tries every `(machine index or "unassigned")` choice per task.
    fn brute_force_optimum(problem: &Problem) -> f64 {
        let num_tasks = problem.num_tasks();
        let num_machines = problem.num_machines();
        let mut best = 0.0_f64; // leaving every task unassigned is always feasible.
        let mut choice = vec![0usize; num_tasks]; // 0 = unassigned, m+1 = machine m
        loop {
            let mut load = vec![0.0_f64; num_machines];
            let mut profit = 0.0_f64;
            let mut ok = true;
            for (t, &c) in choice.iter().enumerate() {
                if c > 0 {
                    let m = c - 1;
                    load[m] += problem.weight(m, t);
                    profit += problem.profit(m, t);
                    if load[m] > problem.capacity(m) + 1e-9 {
                        ok = false;
                        break;
                    }
                }
            }
            if ok && profit > best {
                best = profit;
            }
            let mut i = 0;
            loop {
                if i == num_tasks {
                    return best;
                }
                choice[i] += 1;
                if choice[i] <= num_machines {
                    break;
                }
                choice[i] = 0;
                i += 1;
            }
        }
    }
}
