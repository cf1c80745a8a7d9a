//! BFS traversal over outgoing relationships.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::graph::KnowledgeGraph;

/// An edge reached during traversal, with the hop count of its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalStep {
    pub source: String,
    pub relation: String,
    pub target: String,
    pub depth: usize,
}

impl KnowledgeGraph {
    /// Traverse outgoing edges breadth-first.
    /// Returns the edges that discovered each new entity within `max_depth` hops,
    /// optionally restricted to the given relation labels.
    pub fn traverse(
        &self,
        start_entity: &str,
        max_depth: usize,
        relation_filter: Option<&[String]>,
    ) -> Vec<TraversalStep> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        if !self.contains_entity(start_entity) {
            return result;
        }

        queue.push_back((start_entity.to_string(), 0));
        visited.insert(start_entity.to_string());

        while let Some((entity, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            let allowed = |relation: &str| {
                relation_filter
                    .map(|types| types.iter().any(|t| t == relation))
                    .unwrap_or(true)
            };

            for (target, relation) in self.successors(&entity) {
                if !allowed(relation) || visited.contains(target) {
                    continue;
                }
                visited.insert(target.clone());
                queue.push_back((target.clone(), depth + 1));
                result.push(TraversalStep {
                    source: entity.clone(),
                    relation: relation.clone(),
                    target: target.clone(),
                    depth: depth + 1,
                });
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Attributes, KnowledgeGraph};
    use crate::search::VectorIndex;

    // a -> b -> c, a -> d
    fn sample_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new(VectorIndex::new(None));
        graph.add_relationship("a", "b", "provides", Attributes::new());
        graph.add_relationship("b", "c", "provides", Attributes::new());
        graph.add_relationship("a", "d", "generates", Attributes::new());
        graph
    }

    #[test]
    fn test_traverse_single_hop() {
        let graph = sample_graph();
        let steps = graph.traverse("a", 1, None);
        let targets: Vec<_> = steps.iter().map(|s| s.target.as_str()).collect();
        assert_eq!(targets, vec!["b", "d"]);
        assert!(steps.iter().all(|s| s.depth == 1));
    }

    #[test]
    fn test_traverse_multi_hop() {
        let graph = sample_graph();
        let steps = graph.traverse("a", 3, None);
        assert_eq!(steps.len(), 3);
        let c = steps.iter().find(|s| s.target == "c").unwrap();
        assert_eq!(c.source, "b");
        assert_eq!(c.depth, 2);
    }

    #[test]
    fn test_traverse_depth_zero() {
        let graph = sample_graph();
        assert!(graph.traverse("a", 0, None).is_empty());
    }

    #[test]
    fn test_traverse_relation_filter() {
        let graph = sample_graph();
        let filter = vec!["provides".to_string()];
        let steps = graph.traverse("a", 3, Some(&filter));
        let targets: Vec<_> = steps.iter().map(|s| s.target.as_str()).collect();
        assert_eq!(targets, vec!["b", "c"]);
    }

    #[test]
    fn test_traverse_unknown_entity() {
        let graph = sample_graph();
        assert!(graph.traverse("nonexistent", 2, None).is_empty());
    }

    #[test]
    fn test_traverse_cycle_terminates() {
        let mut graph = sample_graph();
        graph.add_relationship("c", "a", "provides", Attributes::new());
        let steps = graph.traverse("a", 10, None);
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|s| s.target != "a"));
    }
}
