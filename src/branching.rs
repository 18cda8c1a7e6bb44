//! Branching rules (C2): fixings propagated from the branch-and-bound tree into both the
//! master (column filtering) and the pricing subproblem (variable fixing).

/// A single `(task, machine, assigned)` fixing.
///
/// `assigned = true` forces `x[machine][task] = 1`; `assigned = false` forbids it.
/// Rule lists are only ever extended by appending, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchingRule {
    pub task: usize,
    pub machine: usize,
    pub assigned: bool,
}

impl BranchingRule {
    pub fn new(task: usize, machine: usize, assigned: bool) -> Self {
        BranchingRule {
            task,
            machine,
            assigned,
        }
    }

    /// Whether a candidate `(machine, tasks)` schedule is legal under this rule.
    fn allows(&self, machine: usize, tasks: &[usize]) -> bool {
        let has_task = tasks.contains(&self.task);
        if self.assigned {
            if self.machine == machine {
                has_task
            } else {
                !has_task
            }
        } else if self.machine == machine {
            !has_task
        } else {
            true
        }
    }
}

/// Tests a candidate schedule against every rule in a root-to-leaf rule list.
pub fn schedule_satisfies_rules(rules: &[BranchingRule], machine: usize, tasks: &[usize]) -> bool {
    rules.iter().all(|rule| rule.allows(machine, tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_rule_excludes_other_machines() {
        let rule = BranchingRule::new(0, 1, true);
        assert!(!rule.allows(0, &[0, 2]));
        assert!(rule.allows(1, &[0, 2]));
        assert!(!rule.allows(1, &[2]));
    }

    #[test]
    fn forbid_rule_excludes_only_named_machine() {
        let rule = BranchingRule::new(0, 1, false);
        assert!(rule.allows(0, &[0, 2]));
        assert!(rule.allows(1, &[2]));
        assert!(!rule.allows(1, &[0, 2]));
    }

    #[test]
    fn schedule_filter_applies_all_rules() {
        let rules = vec![BranchingRule::new(0, 1, true), BranchingRule::new(3, 0, false)];
        assert!(schedule_satisfies_rules(&rules, 1, &[0, 2]));
        assert!(!schedule_satisfies_rules(&rules, 0, &[3]));
        assert!(schedule_satisfies_rules(&rules, 0, &[1]));
    }
}
