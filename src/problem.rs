//! The immutable problem instance (C1).

use crate::error::GapError;

/// A Generalized Assignment Problem instance: `num_machines` capacitated machines,
/// `num_tasks` tasks, per-(machine, task) weight and profit.
///
/// Immutable once constructed; no entity outlives a solve call.
#[derive(Debug, Clone)]
pub struct Problem {
    num_machines: usize,
    num_tasks: usize,
    weight: Vec<Vec<f64>>,
    profit: Vec<Vec<f64>>,
    capacity: Vec<f64>,
}

impl Problem {
    /// Builds a problem instance, rejecting negative weights/profits/capacities and
    /// ragged matrices up front.
    pub fn new(
        weight: Vec<Vec<f64>>,
        profit: Vec<Vec<f64>>,
        capacity: Vec<f64>,
    ) -> Result<Self, GapError> {
        let num_machines = capacity.len();
        if weight.len() != num_machines || profit.len() != num_machines {
            return Err(GapError::InvalidInstance(format!(
                "expected {num_machines} rows in weight/profit matrices, got weight={}, profit={}",
                weight.len(),
                profit.len()
            )));
        }
        let num_tasks = weight.first().map_or(0, Vec::len);
        for (m, row) in weight.iter().enumerate() {
            if row.len() != num_tasks {
                return Err(GapError::InvalidInstance(format!(
                    "weight row {m} has {} tasks, expected {num_tasks}",
                    row.len()
                )));
            }
        }
        for (m, row) in profit.iter().enumerate() {
            if row.len() != num_tasks {
                return Err(GapError::InvalidInstance(format!(
                    "profit row {m} has {} tasks, expected {num_tasks}",
                    row.len()
                )));
            }
        }
        for &c in &capacity {
            if c < 0.0 {
                return Err(GapError::InvalidInstance(format!(
                    "negative machine capacity: {c}"
                )));
            }
        }
        for row in weight.iter().chain(profit.iter()) {
            for &v in row {
                if v < 0.0 {
                    return Err(GapError::InvalidInstance(format!(
                        "negative weight/profit entry: {v}"
                    )));
                }
            }
        }
        Ok(Problem {
            num_machines,
            num_tasks,
            weight,
            profit,
            capacity,
        })
    }

    pub fn num_machines(&self) -> usize {
        self.num_machines
    }

    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    pub fn weight(&self, m: usize, t: usize) -> f64 {
        self.weight[m][t]
    }

    pub fn profit(&self, m: usize, t: usize) -> f64 {
        self.profit[m][t]
    }

    pub fn capacity(&self, m: usize) -> f64 {
        self.capacity[m]
    }

    /// Total profit of assigning task set `tasks` to machine `m`.
    pub fn schedule_profit(&self, m: usize, tasks: &[usize]) -> f64 {
        tasks.iter().map(|&t| self.profit(m, t)).sum()
    }

    /// Total weight consumed by `tasks` on machine `m`.
    pub fn schedule_weight(&self, m: usize, tasks: &[usize]) -> f64 {
        tasks.iter().map(|&t| self.weight(m, t)).sum()
    }

    /// Machine `m`'s full weight row, e.g. for projecting a sub-instance onto one machine.
    pub fn weight_row(&self, m: usize) -> Vec<f64> {
        self.weight[m].clone()
    }

    /// Machine `m`'s full profit row.
    pub fn profit_row(&self, m: usize) -> Vec<f64> {
        self.profit[m].clone()
    }
}
