//! Serializable hand-off to the external graph renderer.
//!
//! The renderer decides layout, interactivity and file handling; the
//! document only carries vertices with their display attributes and the
//! directed edges between them.

use serde::{Deserialize, Serialize};

use crate::graph::DiGraph;

/// A vertex as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A directed dependency as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeDoc {
    pub source: String,
    pub target: String,
}

/// The complete graph document.
///
/// Node and edge lists are sorted by identifier so repeated exports of the
/// same graph serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageDocument {
    pub nodes: Vec<NodeDoc>,
    pub edges: Vec<EdgeDoc>,
}

impl LineageDocument {
    pub fn from_graph(graph: &DiGraph) -> Self {
        let mut nodes: Vec<NodeDoc> = graph
            .iter_nodes()
            .map(|id| NodeDoc {
                id: id.to_string(),
                title: graph.title(id).map(str::to_string),
                color: graph.color(id).map(str::to_string),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<EdgeDoc> = graph
            .iter_edges()
            .map(|(source, target)| EdgeDoc {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect();
        edges.sort();

        Self { nodes, edges }
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&NodeDoc> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
