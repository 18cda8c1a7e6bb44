//! Pricing oracle (C4): one capacitated 0/1 knapsack per machine, parameterized by RMP
//! duals, producing columns with positive reduced cost.
//!
//! Solved by exact branch-and-bound (fractional-relaxation bound, items ordered by
//! profit/weight ratio) rather than routed through [`crate::lp_engine::LpEngine`]: the RMP
//! needs a continuous solver with duals (`clarabel` fits), but the knapsack needs *binary*
//! variables, which `clarabel` cannot model and no MIP-capable, dual-supporting backend is
//! available to this crate (see DESIGN.md, "LP engine choice").

use crate::branching::BranchingRule;
use crate::problem::Problem;

/// A task's fixing state inside one machine's pricing subproblem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fixing {
    Free,
    Forced,
    Forbidden,
}

/// Tolerance below which a reduced cost is treated as non-positive.
pub const EPS: f64 = 1e-5;

/// Maximum number of distinct positive-reduced-cost solutions harvested per call.
pub const SOLUTION_POOL_CAP: usize = 5;

/// A priced schedule with its reduced cost, as reported by the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedColumn {
    pub tasks: Vec<usize>,
    pub reduced_cost: f64,
}

/// Derives each task's fixing state for machine `m` from the rule list (spec §4.4):
/// `assigned=true, machine=m` fixes `y[t]=1`; `assigned=true, machine!=m` or
/// `assigned=false, machine=m` fixes `y[t]=0`.
fn fixings_for_machine(rules: &[BranchingRule], m: usize, num_tasks: usize) -> Vec<Fixing> {
    let mut fixings = vec![Fixing::Free; num_tasks];
    for rule in rules {
        let slot = &mut fixings[rule.task];
        if rule.assigned && rule.machine == m {
            *slot = Fixing::Forced;
        } else if (rule.assigned && rule.machine != m) || (!rule.assigned && rule.machine == m) {
            *slot = Fixing::Forbidden;
        }
    }
    fixings
}

/// Solves the 0/1 knapsack pricing subproblem for machine `m`: maximize
/// `Σ (profit[m][t] - pi[t]) * y[t] - mu[m]` subject to `Σ weight[m][t] * y[t] ≤ capacity[m]`
/// and the rule-derived fixings, harvesting up to [`SOLUTION_POOL_CAP`] distinct solutions
/// with reduced cost `> EPS`.
///
/// Returns an empty vector if the subproblem is infeasible (forced items alone exceed
/// capacity) or no positive-reduced-cost column exists — both are treated as "no column
/// available" per spec §4.8/§7, not as an error.
pub fn price_machine(
    problem: &Problem,
    rules: &[BranchingRule],
    m: usize,
    pi: &[f64],
    mu: f64,
) -> Vec<PricedColumn> {
    let num_tasks = problem.num_tasks();
    let fixings = fixings_for_machine(rules, m, num_tasks);

    let mut items: Vec<usize> = (0..num_tasks)
        .filter(|&t| fixings[t] != Fixing::Forbidden)
        .collect();

    let forced_weight: f64 = items
        .iter()
        .filter(|&&t| fixings[t] == Fixing::Forced)
        .map(|&t| problem.weight(m, t))
        .sum();
    if forced_weight > problem.capacity(m) + EPS {
        return Vec::new();
    }

    // Free items only participate in branch-and-bound choices; forced items are always in.
    let free_items: Vec<usize> = items
        .iter()
        .copied()
        .filter(|&t| fixings[t] == Fixing::Free)
        .collect();
    items.retain(|&t| fixings[t] == Fixing::Free);

    let reduced_profit = |t: usize| problem.profit(m, t) - pi[t];

    // Sort free items by reduced-profit/weight ratio (descending) for the fractional
    // relaxation bound used to prune the search; zero-weight items sort first.
    let mut order = free_items.clone();
    order.sort_by(|&a, &b| {
        let ratio = |t: usize| {
            let w = problem.weight(m, t);
            if w <= 0.0 {
                f64::INFINITY
            } else {
                reduced_profit(t) / w
            }
        };
        ratio(b).partial_cmp(&ratio(a)).unwrap_or(std::cmp::Ordering::Equal)
    });

    let forced: Vec<usize> = (0..num_tasks).filter(|&t| fixings[t] == Fixing::Forced).collect();
    let base_profit: f64 = forced.iter().map(|&t| reduced_profit(t)).sum::<f64>() - mu;
    let base_weight = forced_weight;
    let capacity = problem.capacity(m);

    let mut pool: Vec<PricedColumn> = Vec::new();
    let mut best_seen = f64::NEG_INFINITY;

    let mut search = Search {
        problem,
        m,
        order: &order,
        capacity,
        reduced_profit: &reduced_profit,
        pool: &mut pool,
        best_seen: &mut best_seen,
        forced: &forced,
    };
    search.branch_and_bound(0, base_profit, base_weight, Vec::new());

    pool.retain(|c| c.reduced_cost > EPS);
    pool.sort_by(|a, b| b.reduced_cost.partial_cmp(&a.reduced_cost).unwrap());
    pool.truncate(SOLUTION_POOL_CAP);
    pool
}

struct Search<'a> {
    problem: &'a Problem,
    m: usize,
    order: &'a [usize],
    capacity: f64,
    reduced_profit: &'a dyn Fn(usize) -> f64,
    pool: &'a mut Vec<PricedColumn>,
    best_seen: &'a mut f64,
    forced: &'a [usize],
}

impl<'a> Search<'a> {
    /// Depth-first branch-and-bound over free items in ratio order. `idx` indexes into
    /// `order`; `profit`/`weight` accumulate the forced items plus the free items chosen so
    /// far (tracked via `chosen`).
    fn branch_and_bound(&mut self, idx: usize, profit: f64, weight: f64, chosen: Vec<usize>) {
        if idx == self.order.len() {
            self.record(profit, &chosen);
            return;
        }
        if self.fractional_bound(idx, profit, weight) <= *self.best_seen && !self.pool.is_empty() {
            return;
        }

        let t = self.order[idx];
        let w = self.problem.weight(self.m, t);

        // Branch: include item t (if it fits).
        if weight + w <= self.capacity + EPS {
            let mut with_t = chosen.clone();
            with_t.push(t);
            self.branch_and_bound(
                idx + 1,
                profit + (self.reduced_profit)(t),
                weight + w,
                with_t,
            );
        }
        // Branch: exclude item t.
        self.branch_and_bound(idx + 1, profit, weight, chosen);
    }

    /// Fractional-relaxation (Dantzig) bound on remaining ratio-sorted items: an upper bound
    /// on achievable profit from `idx..` given current `weight`, used to prune branches that
    /// cannot beat the best reduced cost found so far.
    fn fractional_bound(&self, idx: usize, profit: f64, weight: f64) -> f64 {
        let mut remaining = self.capacity - weight;
        let mut bound = profit;
        for &t in &self.order[idx..] {
            let w = self.problem.weight(self.m, t);
            if w <= 0.0 {
                bound += (self.reduced_profit)(t);
                continue;
            }
            if w <= remaining {
                bound += (self.reduced_profit)(t);
                remaining -= w;
            } else {
                bound += (self.reduced_profit)(t) * (remaining / w);
                break;
            }
        }
        bound
    }

    fn record(&mut self, profit: f64, chosen: &[usize]) {
        if profit > *self.best_seen {
            *self.best_seen = profit;
        }
        if profit > 1e-5 {
            let mut tasks: Vec<usize> = self.forced.iter().chain(chosen.iter()).copied().collect();
            tasks.sort_unstable();
            if !self.pool.iter().any(|c| c.tasks == tasks) {
                self.pool.push(PricedColumn {
                    tasks,
                    reduced_cost: profit,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_problem() -> Problem {
        Problem::new(
            vec![vec![4.0, 1.0, 2.0, 1.0]],
            vec![vec![6.0, 9.0, 4.0, 2.0]],
            vec![5.0],
        )
        .unwrap()
    }

    #[test]
    fn harvests_best_knapsack_when_duals_are_zero() {
        let problem = sample_problem();
        let pi = vec![0.0; 4];
        let columns = price_machine(&problem, &[], 0, &pi, 0.0);
        assert!(!columns.is_empty());
        let best = &columns[0];
        // weights [4,1,2,1], profits [6,9,4,2], capacity 5: optimum is tasks {1,2,3},
        // weight 1+2+1=4 <= 5, profit 9+4+2=15.
        assert_eq!(best.tasks, vec![1, 2, 3]);
        assert!((best.reduced_cost - 15.0).abs() < 1e-6);
        assert!(problem.schedule_weight(0, &best.tasks) <= 5.0);
    }

    #[test]
    fn forced_rule_fixes_task_in_every_harvested_column() {
        let problem = sample_problem();
        let rules = vec![BranchingRule::new(0, 0, true)];
        let pi = vec![0.0; 4];
        let columns = price_machine(&problem, &rules, 0, &pi, 0.0);
        assert!(columns.iter().all(|c| c.tasks.contains(&0)));
    }

    #[test]
    fn forbidden_rule_excludes_task_from_every_harvested_column() {
        let problem = sample_problem();
        let rules = vec![BranchingRule::new(1, 0, false)];
        let pi = vec![0.0; 4];
        let columns = price_machine(&problem, &rules, 0, &pi, 0.0);
        assert!(columns.iter().all(|c| !c.tasks.contains(&1)));
    }

    #[test]
    fn infeasible_forced_set_yields_no_columns() {
        let problem = sample_problem();
        // Forcing every task exceeds capacity 5 (total weight 4+1+2+1=8).
        let rules = vec![
            BranchingRule::new(0, 0, true),
            BranchingRule::new(1, 0, true),
            BranchingRule::new(2, 0, true),
            BranchingRule::new(3, 0, true),
        ];
        let pi = vec![0.0; 4];
        let columns = price_machine(&problem, &rules, 0, &pi, 0.0);
        assert!(columns.is_empty());
    }

    #[test]
    fn high_duals_suppress_all_columns() {
        let problem = sample_problem();
        let pi = vec![100.0; 4];
        let columns = price_machine(&problem, &[], 0, &pi, 0.0);
        assert!(columns.is_empty());
    }
}
