//! In-memory supervision graph built with petgraph.
//!
//! Node indices follow insertion order and nodes are never removed, so
//! iterating the graph yields persons (and edges) in discovery order.

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use genealogy_core::{Edge, Person, Thesis};

use crate::snapshot::{GraphSnapshot, PersonMap, SnapshotMetadata};

/// Persons, theses and supervision edges accumulated by one traversal run.
pub struct GraphStore {
    graph: DiGraph<Person, ()>,
    node_index: HashMap<String, NodeIndex>,
    theses: Vec<Thesis>,
    requested_root: Option<String>,
    max_depth: u32,
}

impl GraphStore {
    pub fn new(max_depth: u32) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            theses: Vec::new(),
            requested_root: None,
            max_depth,
        }
    }

    /// Remember the identifier a run started from, for runs that discover nobody.
    pub(crate) fn set_requested_root(&mut self, person_id: &str) {
        self.requested_root = Some(person_id.to_string());
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn person(&self, person_id: &str) -> Option<&Person> {
        self.node_index
            .get(person_id)
            .map(|&idx| &self.graph[idx])
    }

    /// Persons in insertion order.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.graph.node_weights()
    }

    pub fn theses(&self) -> &[Thesis] {
        &self.theses
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|e| {
                Edge::new(
                    self.graph[e.source()].person_id.clone(),
                    self.graph[e.target()].person_id.clone(),
                )
            })
            .collect()
    }

    /// The first person inserted, which is the traversal root.
    pub fn root_person_id(&self) -> Option<&str> {
        self.graph
            .node_weights()
            .next()
            .map(|p| p.person_id.as_str())
            .or(self.requested_root.as_deref())
    }

    /// Register a person being expanded as a supervisor.
    ///
    /// A person first seen as a student is promoted. An already known name is
    /// kept unless it is empty.
    pub fn upsert_supervisor(&mut self, person_id: &str, name: &str) {
        match self.node_index.get(person_id) {
            Some(&idx) => {
                let person = &mut self.graph[idx];
                person.is_supervisor = true;
                if person.name.is_empty() {
                    person.name = name.to_string();
                }
            }
            None => {
                self.insert(Person::supervisor(person_id, name));
            }
        }
    }

    /// Register a thesis author. Existing persons are left untouched.
    pub fn add_student(&mut self, person_id: &str, name: &str) {
        if !self.node_index.contains_key(person_id) {
            self.insert(Person::student(person_id, name));
        }
    }

    /// Add a supervision edge between two known persons.
    ///
    /// Returns `false` when the pair is already present or either end is unknown.
    pub fn add_edge(&mut self, supervisor_id: &str, student_id: &str) -> bool {
        let (Some(&from), Some(&to)) = (
            self.node_index.get(supervisor_id),
            self.node_index.get(student_id),
        ) else {
            return false;
        };
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    pub fn extend_theses(&mut self, theses: impl IntoIterator<Item = Thesis>) {
        self.theses.extend(theses);
    }

    fn insert(&mut self, person: Person) -> NodeIndex {
        let id = person.person_id.clone();
        let idx = self.graph.add_node(person);
        self.node_index.insert(id, idx);
        idx
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            total_persons: self.graph.node_count(),
            total_theses: self.theses.len(),
            total_edges: self.graph.edge_count(),
            max_depth: self.max_depth,
        }
    }

    /// Flat, self-contained copy of the accumulated graph.
    pub fn export(&self) -> GraphSnapshot {
        GraphSnapshot {
            persons: PersonMap::from_persons(self.persons().cloned()),
            theses: self.theses.clone(),
            edges: self.edges(),
            metadata: SnapshotMetadata {
                root_person_id: self.root_person_id().map(String::from),
                max_depth: self.max_depth,
                total_persons: self.graph.node_count(),
                total_theses: self.theses.len(),
            },
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_persons: usize,
    pub total_theses: usize,
    pub total_edges: usize,
    pub max_depth: u32,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "ACADEMIC GENEALOGY SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Persons:                    {}", self.total_persons)?;
        writeln!(f, "Theses:                     {}", self.total_theses)?;
        writeln!(f, "Supervision relationships:  {}", self.total_edges)?;
        writeln!(f, "Max depth explored:         {}", self.max_depth)?;
        write!(f, "{}", rule)
    }
}
