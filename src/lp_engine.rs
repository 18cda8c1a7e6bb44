//! Narrow LP backend interface (C8, spec §6) and its `good_lp`/`clarabel` implementation.
//!
//! Callers outside this module only ever see [`VarId`]/[`ConstrId`] handles and `f64`s —
//! no `good_lp` type crosses the trait boundary, so the RMP (`rmp.rs`) does not take a
//! runtime dependency on any specific vendor's types beyond [`LpEngine`] itself.

use good_lp::{
    clarabel, variable, Constraint, DualValues, Expression, ProblemVariables, ResolutionError,
    Solution, SolutionStatus, SolutionWithDual, SolverModel, Variable,
};

/// Opaque handle to a continuous decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub usize);

/// Opaque handle to a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstrId(pub usize);

/// Outcome of a call to [`LpEngine::optimize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Suboptimal,
    Infeasible,
    Unbounded,
}

/// A backend-optimize failure that is not a recognized LP status.
#[derive(Debug, thiserror::Error)]
#[error("LP solve failed: {0}")]
pub struct SolveError(pub String);

/// Abstract LP backend contract: build a model column-by-column, constraint-by-constraint,
/// solve it, then query objective/variable/dual values.
///
/// Columns in a Dantzig–Wolfe master arrive one at a time, each touching a handful of
/// pre-existing constraints, so variables and constraints are added incrementally rather
/// than through a single batch `maximise(...).with_all(...)` call.
pub trait LpEngine {
    fn new_problem() -> Self;

    /// Adds a continuous variable with `obj_coef` in the objective and the given
    /// constraint coefficients (`column`), returning its handle.
    fn add_continuous_var(&mut self, obj_coef: f64, column: &[(ConstrId, f64)]) -> VarId;

    /// Registers a new `= rhs` constraint with no terms yet; terms are attached later via
    /// [`LpEngine::add_term`] as columns referencing it are added.
    fn add_eq_constraint(&mut self, rhs: f64) -> ConstrId;

    /// Adds `coef * var` to an already-registered constraint.
    fn add_term(&mut self, constr: ConstrId, var: VarId, coef: f64);

    fn optimize(&mut self) -> Result<LpStatus, SolveError>;

    /// Valid only after a successful [`LpEngine::optimize`].
    fn obj_value(&self) -> f64;

    fn var_value(&self, v: VarId) -> f64;

    /// Shadow price of a constraint. Valid only after a successful optimize.
    fn dual(&self, c: ConstrId) -> f64;
}

/// `LpEngine` backed by `good_lp`'s pure-Rust `clarabel` interior-point solver.
///
/// The model is rebuilt from scratch on every [`ClarabelEngine::optimize`] call: `good_lp`
/// exposes no incremental re-solve, and clarabel itself is a from-scratch interior-point
/// solver per call, so nothing is lost by deferring model construction to `optimize`.
pub struct ClarabelEngine {
    var_bounds: Vec<f64>,
    var_obj: Vec<f64>,
    constr_rhs: Vec<f64>,
    terms: Vec<(ConstrId, VarId, f64)>,
    solution: Option<Solved>,
}

struct Solved {
    values: Vec<f64>,
    duals: Vec<f64>,
    obj_value: f64,
}

impl LpEngine for ClarabelEngine {
    fn new_problem() -> Self {
        ClarabelEngine {
            var_bounds: Vec::new(),
            var_obj: Vec::new(),
            constr_rhs: Vec::new(),
            terms: Vec::new(),
            solution: None,
        }
    }

    fn add_continuous_var(&mut self, obj_coef: f64, column: &[(ConstrId, f64)]) -> VarId {
        let id = VarId(self.var_obj.len());
        self.var_obj.push(obj_coef);
        self.var_bounds.push(0.0);
        for &(constr, coef) in column {
            self.terms.push((constr, id, coef));
        }
        id
    }

    fn add_eq_constraint(&mut self, rhs: f64) -> ConstrId {
        let id = ConstrId(self.constr_rhs.len());
        self.constr_rhs.push(rhs);
        id
    }

    fn add_term(&mut self, constr: ConstrId, var: VarId, coef: f64) {
        self.terms.push((constr, var, coef));
    }

    fn optimize(&mut self) -> Result<LpStatus, SolveError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = (0..self.var_obj.len())
            .map(|_| vars.add(variable().min(0.0)))
            .collect();

        let mut objective = Expression::with_capacity(handles.len());
        for (idx, &coef) in self.var_obj.iter().enumerate() {
            objective.add_mul(coef, handles[idx]);
        }

        let mut constr_exprs: Vec<Expression> =
            (0..self.constr_rhs.len()).map(|_| Expression::with_capacity(4)).collect();
        for &(ConstrId(c), VarId(v), coef) in &self.terms {
            constr_exprs[c].add_mul(coef, handles[v]);
        }
        let constraints: Vec<Constraint> = constr_exprs
            .into_iter()
            .zip(self.constr_rhs.iter())
            .map(|(expr, &rhs)| expr.eq(rhs))
            .collect();

        let mut model = vars.maximise(objective).using(clarabel);
        let refs: Vec<_> = constraints
            .into_iter()
            .map(|c| model.add_constraint(c))
            .collect();

        let mut solution = match model.solve() {
            Ok(s) => s,
            Err(ResolutionError::Infeasible) => return Ok(LpStatus::Infeasible),
            Err(ResolutionError::Unbounded) => return Ok(LpStatus::Unbounded),
            Err(e) => return Err(SolveError(e.to_string())),
        };

        let status = match solution.status() {
            SolutionStatus::Optimal => LpStatus::Optimal,
            SolutionStatus::TimeLimit | SolutionStatus::GapLimit => LpStatus::Suboptimal,
        };

        let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
        let obj_value: f64 = values
            .iter()
            .zip(self.var_obj.iter())
            .map(|(v, c)| v * c)
            .sum();
        let dual_values = solution.compute_dual();
        let duals: Vec<f64> = refs.into_iter().map(|r| dual_values.dual(r)).collect();

        self.solution = Some(Solved {
            values,
            duals,
            obj_value,
        });
        Ok(status)
    }

    fn obj_value(&self) -> f64 {
        self.solution.as_ref().map_or(f64::NAN, |s| s.obj_value)
    }

    fn var_value(&self, VarId(v): VarId) -> f64 {
        self.solution.as_ref().map_or(0.0, |s| s.values[v])
    }

    fn dual(&self, ConstrId(c): ConstrId) -> f64 {
        self.solution.as_ref().map_or(0.0, |s| s.duals[c])
    }
}
