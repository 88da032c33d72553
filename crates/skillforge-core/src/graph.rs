//! Skill dependency graph and the correlation index derived from it.
//!
//! Each dependency record contributes one directed edge from the parent
//! skill to the child skill. Traversals use a visited set, so a cyclic
//! catalog degrades to a terminating (possibly incomplete) result instead
//! of recursing forever; topological ordering fails closed with a typed
//! error.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::model::{Skill, SkillDependency};

/// Correlation strength assigned to transitive prerequisites.
pub const PREREQUISITE_CORRELATION: f64 = 0.7;
/// Correlation strength assigned to transitive dependents.
pub const DEPENDENT_CORRELATION: f64 = 0.6;
/// Correlation strength assigned to same-category peers.
pub const CATEGORY_CORRELATION: f64 = 0.4;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A topological sort could not enumerate every vertex.
    #[error("skill graph contains a cycle ({ordered} of {total} vertices ordered)")]
    CycleDetected { ordered: usize, total: usize },
}

/// Directed graph over skill codes.
#[derive(Debug, Clone, Default)]
pub struct SkillGraph {
    /// Vertices in catalog iteration order.
    vertices: Vec<String>,
    outgoing: HashMap<String, Vec<String>>,
    incoming: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl SkillGraph {
    /// Build the graph from the skill catalog and its dependency records.
    /// Edges referencing unknown skills are skipped with a warning.
    pub fn build(skills: &[Skill], dependencies: &[SkillDependency]) -> Self {
        let mut graph = SkillGraph::default();
        let mut known = HashSet::new();

        for skill in skills {
            if known.insert(skill.code.clone()) {
                graph.vertices.push(skill.code.clone());
                graph.outgoing.insert(skill.code.clone(), Vec::new());
                graph.incoming.insert(skill.code.clone(), Vec::new());
            }
        }

        for dep in dependencies {
            if !known.contains(&dep.parent) || !known.contains(&dep.child) {
                tracing::warn!(
                    parent = %dep.parent,
                    child = %dep.child,
                    "dependency references unknown skill, skipping edge"
                );
                continue;
            }
            let out = graph.outgoing.get_mut(&dep.parent).expect("vertex present");
            if out.contains(&dep.child) {
                continue;
            }
            out.push(dep.child.clone());
            graph
                .incoming
                .get_mut(&dep.child)
                .expect("vertex present")
                .push(dep.parent.clone());
            graph.edge_count += 1;
        }

        tracing::debug!(
            vertices = graph.vertices.len(),
            edges = graph.edge_count,
            "skill graph built"
        );
        graph
    }

    pub fn contains(&self, code: &str) -> bool {
        self.outgoing.contains_key(code)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Transitive closure over incoming edges: every skill that must come
    /// before `code`.
    pub fn prerequisites_of(&self, code: &str) -> Vec<String> {
        self.closure(code, &self.incoming)
    }

    /// Transitive closure over outgoing edges: every skill that builds on
    /// `code`.
    pub fn dependents_of(&self, code: &str) -> Vec<String> {
        self.closure(code, &self.outgoing)
    }

    fn closure(&self, start: &str, edges: &HashMap<String, Vec<String>>) -> Vec<String> {
        let mut reached = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(start);
        let mut stack: Vec<&str> = vec![start];

        while let Some(current) = stack.pop() {
            for next in edges.get(current).into_iter().flatten() {
                if visited.insert(next) {
                    reached.push(next.clone());
                    stack.push(next);
                }
            }
        }
        reached
    }

    /// Structural level of a skill: distinct prerequisite count + 1.
    ///
    /// This is a coarse "how foundational" signal, not a longest-path
    /// depth; a skill with many shallow prerequisites outranks one with a
    /// single deep chain of the same length.
    pub fn level(&self, code: &str) -> Option<usize> {
        if !self.contains(code) {
            return None;
        }
        Some(self.prerequisites_of(code).len() + 1)
    }

    /// Kahn's algorithm. Fails closed when a cycle prevents enumerating
    /// every vertex.
    pub fn topological_order(&self) -> Result<Vec<String>, GraphError> {
        let mut in_degree: HashMap<&str, usize> = self
            .vertices
            .iter()
            .map(|v| (v.as_str(), self.incoming[v].len()))
            .collect();

        let mut queue: VecDeque<&str> = self
            .vertices
            .iter()
            .map(String::as_str)
            .filter(|v| in_degree[v] == 0)
            .collect();

        let mut ordered = Vec::new();
        while let Some(current) = queue.pop_front() {
            ordered.push(current.to_string());
            for next in self.outgoing.get(current).into_iter().flatten() {
                let degree = in_degree.get_mut(next.as_str()).expect("vertex present");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(next.as_str());
                }
            }
        }

        if ordered.len() != self.vertices.len() {
            return Err(GraphError::CycleDetected {
                ordered: ordered.len(),
                total: self.vertices.len(),
            });
        }
        Ok(ordered)
    }

    pub fn has_cycles(&self) -> bool {
        self.topological_order().is_err()
    }
}

/// Per-skill weighted map of correlated skills, derived once per graph
/// build and used to spread evidence.
#[derive(Debug, Clone, Default)]
pub struct CorrelationIndex {
    map: HashMap<String, HashMap<String, f64>>,
}

impl CorrelationIndex {
    /// Prerequisites correlate at 0.7, dependents at 0.6, and same-category
    /// peers at 0.4; a later entry overwrites an earlier one for the same
    /// skill pair.
    pub fn build(graph: &SkillGraph, skills: &[Skill]) -> Self {
        let mut map = HashMap::new();

        for skill in skills {
            let mut correlations: HashMap<String, f64> = HashMap::new();
            for prerequisite in graph.prerequisites_of(&skill.code) {
                correlations.insert(prerequisite, PREREQUISITE_CORRELATION);
            }
            for dependent in graph.dependents_of(&skill.code) {
                correlations.insert(dependent, DEPENDENT_CORRELATION);
            }
            for peer in skills {
                if peer.category == skill.category && peer.code != skill.code {
                    correlations.insert(peer.code.clone(), CATEGORY_CORRELATION);
                }
            }
            map.insert(skill.code.clone(), correlations);
        }

        CorrelationIndex { map }
    }

    pub fn correlated(&self, code: &str) -> Option<&HashMap<String, f64>> {
        self.map.get(code)
    }
}
