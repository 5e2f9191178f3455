use extract::ExtractionRecord;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One labelled edge, `source --relation--> target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub source: String,
    pub relation: String,
    pub target: String,
}

/// Directed multigraph of subject -> object relations labelled by verb.
///
/// Edges between the same ordered pair coexist when their labels differ.
/// Adding an identical `(source, target, label)` edge again is a no-op.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    graph: DiGraph<String, String>,
    node_index: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every record into a fresh graph
    pub fn build(records: &[ExtractionRecord]) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_record(record);
        }
        graph
    }

    /// Full subject x verb x (object + indirect object) cross-product
    pub fn add_record(&mut self, record: &ExtractionRecord) {
        for subject in &record.subjects {
            for verb in &record.verbs {
                for object in &record.objects {
                    self.add_relation(subject, verb, object);
                }
                for indirect in &record.indirect_objects {
                    self.add_relation(subject, verb, indirect);
                }
            }
        }
    }

    /// Returns false when the exact edge already existed
    pub fn add_relation(&mut self, source: &str, label: &str, target: &str) -> bool {
        let source_idx = self.add_node(source);
        let target_idx = self.add_node(target);

        let exists = self
            .graph
            .edges_connecting(source_idx, target_idx)
            .any(|edge| edge.weight() == label);
        if exists {
            return false;
        }

        self.graph.add_edge(source_idx, target_idx, label.to_string());
        true
    }

    fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }

        let idx = self.graph.add_node(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    /// Targets reachable from `subject` over an edge labelled exactly `label`,
    /// in insertion order. Unknown subjects yield nothing.
    pub fn targets(&self, subject: &str, label: &str) -> Vec<String> {
        let Some(&idx) = self.node_index.get(subject) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|edge| edge.weight() == label)
            .collect();
        edges.sort_by_key(|edge| edge.id());

        edges
            .into_iter()
            .map(|edge| self.graph[edge.target()].clone())
            .collect()
    }

    /// Every outgoing relation of `subject`, in insertion order
    pub fn relations_from(&self, subject: &str) -> Vec<Relation> {
        self.relations()
            .into_iter()
            .filter(|relation| relation.source == subject)
            .collect()
    }

    pub fn relations(&self) -> Vec<Relation> {
        self.graph
            .edge_references()
            .map(|edge| Relation {
                source: self.graph[edge.source()].clone(),
                relation: edge.weight().clone(),
                target: self.graph[edge.target()].clone(),
            })
            .collect()
    }

    /// Node names in first-seen order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn inner(&self) -> &DiGraph<String, String> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        subjects: &[&str],
        verbs: &[&str],
        objects: &[&str],
        indirect: &[&str],
    ) -> ExtractionRecord {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        ExtractionRecord {
            subjects: owned(subjects),
            verbs: owned(verbs),
            objects: owned(objects),
            indirect_objects: owned(indirect),
        }
    }

    #[test]
    fn test_empty_build() {
        let graph = RelationGraph::build(&[]);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_cross_product() {
        let graph = RelationGraph::build(&[record(
            &["Alice", "Bob"],
            &["go", "see"],
            &["home"],
            &["Carol"],
        )]);

        // 2 subjects x 2 verbs x 2 targets
        assert_eq!(graph.edge_count(), 8);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.targets("Bob", "see"), vec!["home", "Carol"]);
    }

    #[test]
    fn test_parallel_labels_coexist() {
        let graph = RelationGraph::build(&[
            record(&["Alice"], &["go"], &["garden"], &[]),
            record(&["Alice"], &["see"], &["garden"], &[]),
        ]);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.targets("Alice", "go"), vec!["garden"]);
        assert_eq!(graph.targets("Alice", "see"), vec!["garden"]);
    }

    #[test]
    fn test_identical_edges_collapse() {
        let mut graph = RelationGraph::new();
        assert!(graph.add_relation("Alice", "go", "home"));
        assert!(!graph.add_relation("Alice", "go", "home"));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.targets("Alice", "go"), vec!["home"]);
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        let graph = RelationGraph::build(&[record(&["Alice"], &["go"], &["home"], &[])]);
        assert!(graph.targets("Alice", "Go").is_empty());
        assert!(graph.targets("alice", "go").is_empty());
    }

    #[test]
    fn test_relations_from() {
        let graph = RelationGraph::build(&[
            record(&["Alice"], &["go"], &["home"], &[]),
            record(&["Rabbit"], &["say"], &[], &["Alice"]),
        ]);

        let relations = graph.relations_from("Rabbit");
        assert_eq!(
            relations,
            vec![Relation {
                source: "Rabbit".into(),
                relation: "say".into(),
                target: "Alice".into(),
            }]
        );
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec!["Alice", "home", "Rabbit"]);
        assert!(graph.contains_node("home"));
    }
}
