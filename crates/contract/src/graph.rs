//! Prerequisite graph over a group's test cases
//!
//! Edges run from a case to each of its prerequisites. The graph is
//! validated on construction (unique names, known prerequisites listed
//! once each, no cycles), so `execution_order` always yields every case.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::case::TestCase;
use crate::error::{ContractError, ContractResult};

#[derive(Debug)]
pub struct CaseGraph<'a> {
    cases: &'a [TestCase],
    index: HashMap<&'static str, usize>,
}

impl<'a> CaseGraph<'a> {
    pub fn build(cases: &'a [TestCase]) -> ContractResult<Self> {
        let mut index = HashMap::with_capacity(cases.len());
        for (i, case) in cases.iter().enumerate() {
            if index.insert(case.name, i).is_some() {
                return Err(ContractError::DuplicateCase(case.name.to_string()));
            }
        }

        for case in cases {
            let mut seen = HashSet::with_capacity(case.prerequisites.len());
            for prerequisite in &case.prerequisites {
                if !index.contains_key(prerequisite) {
                    return Err(ContractError::UnknownPrerequisite {
                        case: case.name.to_string(),
                        prerequisite: prerequisite.to_string(),
                    });
                }
                // Each edge is counted once in `execution_order`
                if !seen.insert(*prerequisite) {
                    return Err(ContractError::DuplicatePrerequisite {
                        case: case.name.to_string(),
                        prerequisite: prerequisite.to_string(),
                    });
                }
            }
        }

        let graph = Self { cases, index };
        graph.check_acyclic()?;
        Ok(graph)
    }

    pub fn case(&self, idx: usize) -> &'a TestCase {
        &self.cases[idx]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Indices of the direct prerequisites of `idx`
    pub fn dependencies(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.cases[idx]
            .prerequisites
            .iter()
            .filter_map(|name| self.index.get(name).copied())
    }

    /// Indices of the cases that list `idx` as a prerequisite
    pub fn dependents(&self, idx: usize) -> Vec<usize> {
        let name = self.cases[idx].name;
        self.cases
            .iter()
            .enumerate()
            .filter(|(_, c)| c.prerequisites.contains(&name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Topological order, prerequisites first. Among cases that are ready
    /// at the same time, the one declared first runs first.
    pub fn execution_order(&self) -> Vec<usize> {
        let mut pending: Vec<usize> = (0..self.cases.len())
            .map(|i| self.dependencies(i).count())
            .collect();
        let mut ready: BTreeSet<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, n)| **n == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.cases.len());
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for dependent in self.dependents(next) {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }
        debug_assert_eq!(order.len(), self.cases.len(), "case graph dropped a case");
        order
    }

    /// `name` and everything it transitively depends on
    pub fn with_ancestors(&self, name: &str) -> ContractResult<HashSet<usize>> {
        let start = self
            .position(name)
            .ok_or_else(|| ContractError::CaseNotFound(name.to_string()))?;

        let mut selected = HashSet::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if selected.insert(idx) {
                stack.extend(self.dependencies(idx));
            }
        }
        Ok(selected)
    }

    fn check_acyclic(&self) -> ContractResult<()> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for idx in 0..self.cases.len() {
            if !visited.contains(&idx) {
                self.dfs_cycle(idx, &mut visited, &mut rec_stack, &mut path)?;
            }
        }
        Ok(())
    }

    fn dfs_cycle(
        &self,
        node: usize,
        visited: &mut HashSet<usize>,
        rec_stack: &mut HashSet<usize>,
        path: &mut Vec<usize>,
    ) -> ContractResult<()> {
        visited.insert(node);
        rec_stack.insert(node);
        path.push(node);

        for next in self.dependencies(node) {
            if !visited.contains(&next) {
                self.dfs_cycle(next, visited, rec_stack, path)?;
            } else if rec_stack.contains(&next) {
                let cycle_start = path.iter().position(|n| *n == next).unwrap_or(0);
                let names: Vec<&str> = path[cycle_start..]
                    .iter()
                    .chain(std::iter::once(&next))
                    .map(|i| self.cases[*i].name)
                    .collect();
                return Err(ContractError::DependencyCycle(names.join(" → ")));
            }
        }

        path.pop();
        rec_stack.remove(&node);
        Ok(())
    }
}
