//! Graph-to-tree projection.
//!
//! A person reachable through several supervisors is emitted once under each
//! of them, with its whole subtree repeated. A child that already appears on
//! the path from the root is emitted as a leaf so cyclic snapshots terminate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use genealogy_core::{Error, Result, Thesis};
use genealogy_graph::GraphSnapshot;

/// A person with their students nested below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Project the snapshot from its recorded root.
pub fn project_snapshot(snapshot: &GraphSnapshot) -> Result<TreeNode> {
    let root = snapshot
        .metadata
        .root_person_id
        .as_deref()
        .or_else(|| snapshot.persons.first().map(|p| p.person_id.as_str()))
        .ok_or_else(|| Error::NotFound("snapshot has no root person".into()))?;
    Ok(project(snapshot, root))
}

/// Build the nested tree rooted at `root_id`.
pub fn project(snapshot: &GraphSnapshot, root_id: &str) -> TreeNode {
    let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &snapshot.edges {
        children_of
            .entry(edge.supervisor_id())
            .or_default()
            .push(edge.student_id());
    }

    let mut thesis_of: HashMap<&str, &Thesis> = HashMap::new();
    for thesis in &snapshot.theses {
        if let Some(author) = thesis.author_id.as_deref() {
            thesis_of.entry(author).or_insert(thesis);
        }
    }

    let projector = Projector {
        snapshot,
        children_of,
        thesis_of,
    };
    let mut path = Vec::new();
    projector.node(root_id, &mut path)
}

struct Projector<'a> {
    snapshot: &'a GraphSnapshot,
    children_of: HashMap<&'a str, Vec<&'a str>>,
    thesis_of: HashMap<&'a str, &'a Thesis>,
}

impl<'a> Projector<'a> {
    fn node(&self, id: &'a str, path: &mut Vec<&'a str>) -> TreeNode {
        let mut node = self.bare(id);
        let Some(kids) = self.children_of.get(id) else {
            return node;
        };

        path.push(id);
        node.children = kids
            .iter()
            .map(|&kid| {
                if path.contains(&kid) {
                    warn!("Cycle through {} below {}; emitting it as a leaf", kid, id);
                    self.bare(kid)
                } else {
                    self.node(kid, path)
                }
            })
            .collect();
        path.pop();
        node
    }

    /// Node fields for `id`, without children.
    fn bare(&self, id: &str) -> TreeNode {
        let name = self
            .snapshot
            .persons
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string());
        let thesis = self.thesis_of.get(id);

        TreeNode {
            id: id.to_string(),
            name,
            defense_date: thesis.map(|t| t.defense_date.clone()),
            title: thesis.map(|t| t.title.clone()),
            children: Vec::new(),
        }
    }
}
