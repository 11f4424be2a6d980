//! Adjacency-list directed graph of table dependencies.
//!
//! Vertices are normalized table identifiers; an edge `source -> target`
//! means the source table's data feeds the target. The graph is
//! multiplicity-free (adding an existing edge is a no-op) and self-loops are
//! legal and preserved.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Display attributes attached to a vertex.
///
/// The title is the last rendered detail for the table; both fields are
/// overwritten, never merged, by the most recent write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    pub title: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Adjacency {
    successors: BTreeSet<String>,
    predecessors: BTreeSet<String>,
}

/// A directed, multiplicity-free graph keyed by table identifier.
#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    nodes: HashMap<String, Adjacency>,
    attributes: HashMap<String, NodeAttributes>,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Node Operations
    // ------------------------------------------------------------------------

    /// Add a vertex with no edges. No-op when it already exists.
    pub fn add_node(&mut self, id: impl Into<String>) {
        self.nodes.entry(id.into()).or_default();
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Remove a vertex and all incident edges, both directions.
    ///
    /// Returns the vertex's former neighbors (successors and predecessors,
    /// the vertex itself excluded for self-loops) so the caller can prune
    /// freshly isolated ones. `None` when the vertex was absent.
    pub fn remove_node(&mut self, id: &str) -> Option<BTreeSet<String>> {
        let adj = self.nodes.remove(id)?;
        self.attributes.remove(id);

        let mut neighbors = adj.successors;
        neighbors.extend(adj.predecessors);
        neighbors.remove(id);

        for neighbor in &neighbors {
            if let Some(n) = self.nodes.get_mut(neighbor) {
                n.successors.remove(id);
                n.predecessors.remove(id);
            }
        }
        Some(neighbors)
    }

    /// Relabel a vertex in place, keeping incident edges and attributes.
    ///
    /// No-op when `old` is absent or the names are equal. When `new` already
    /// exists the two vertices merge: edge sets union, `old`'s attributes
    /// win, and edges between the pair survive as self-loops on the merged
    /// vertex.
    pub fn rename_node(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }
        let Some(adj) = self.nodes.remove(old) else {
            return;
        };

        // Rewrite the neighbors' view of the renamed vertex.
        for succ in &adj.successors {
            if let Some(n) = self.nodes.get_mut(succ) {
                n.predecessors.remove(old);
                n.predecessors.insert(new.to_string());
            }
        }
        for pred in &adj.predecessors {
            if let Some(n) = self.nodes.get_mut(pred) {
                n.successors.remove(old);
                n.successors.insert(new.to_string());
            }
        }

        let mut successors: BTreeSet<String> = adj
            .successors
            .into_iter()
            .map(|s| if s == old { new.to_string() } else { s })
            .collect();
        let mut predecessors: BTreeSet<String> = adj
            .predecessors
            .into_iter()
            .map(|p| if p == old { new.to_string() } else { p })
            .collect();

        let merged = self.nodes.entry(new.to_string()).or_default();
        merged.successors.append(&mut successors);
        merged.predecessors.append(&mut predecessors);

        if let Some(attrs) = self.attributes.remove(old) {
            self.attributes.insert(new.to_string(), attrs);
        }
    }

    // ------------------------------------------------------------------------
    // Edge Operations
    // ------------------------------------------------------------------------

    /// Add an edge, creating missing endpoints. Idempotent.
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let source = source.into();
        let target = target.into();
        self.nodes
            .entry(target.clone())
            .or_default()
            .predecessors
            .insert(source.clone());
        self.nodes.entry(source).or_default().successors.insert(target);
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.nodes
            .get(source)
            .is_some_and(|adj| adj.successors.contains(target))
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|adj| adj.successors.len()).sum()
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(|(id, adj)| {
            adj.successors
                .iter()
                .map(move |succ| (id.as_str(), succ.as_str()))
        })
    }

    // ------------------------------------------------------------------------
    // Attribute Operations
    // ------------------------------------------------------------------------

    pub fn attributes(&self, id: &str) -> Option<&NodeAttributes> {
        self.attributes.get(id)
    }

    pub fn title(&self, id: &str) -> Option<&str> {
        self.attributes.get(id).and_then(|a| a.title.as_deref())
    }

    pub fn color(&self, id: &str) -> Option<&str> {
        self.attributes.get(id).and_then(|a| a.color.as_deref())
    }

    /// Overwrite the vertex's display title. No-op for absent vertices.
    pub fn set_title(&mut self, id: &str, title: impl Into<String>) {
        if self.nodes.contains_key(id) {
            self.attributes.entry(id.to_string()).or_default().title = Some(title.into());
        }
    }

    /// Overwrite the vertex's highlight color. No-op for absent vertices.
    pub fn set_color(&mut self, id: &str, color: impl Into<String>) {
        if self.nodes.contains_key(id) {
            self.attributes.entry(id.to_string()).or_default().color = Some(color.into());
        }
    }

    // ------------------------------------------------------------------------
    // Traversal Operations
    // ------------------------------------------------------------------------

    /// Outgoing neighbors, in identifier order. Empty for absent vertices.
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|adj| adj.successors.iter().map(String::as_str))
    }

    /// Incoming neighbors, in identifier order. Empty for absent vertices.
    pub fn predecessors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|adj| adj.predecessors.iter().map(String::as_str))
    }

    /// Combined in- and out-degree. A self-loop counts on both sides.
    pub fn degree(&self, id: &str) -> usize {
        self.nodes
            .get(id)
            .map_or(0, |adj| adj.successors.len() + adj.predecessors.len())
    }

    /// An edge-reversed copy, attributes carried over.
    pub fn reversed(&self) -> DiGraph {
        let nodes = self
            .nodes
            .iter()
            .map(|(id, adj)| {
                (
                    id.clone(),
                    Adjacency {
                        successors: adj.predecessors.clone(),
                        predecessors: adj.successors.clone(),
                    },
                )
            })
            .collect();
        DiGraph {
            nodes,
            attributes: self.attributes.clone(),
        }
    }

    /// Vertex, edge and attribute union of two graphs.
    ///
    /// Where both graphs carry attributes for a vertex, `other`'s win.
    pub fn union(&self, other: &DiGraph) -> DiGraph {
        let mut merged = self.clone();
        for id in other.nodes.keys() {
            merged.add_node(id.clone());
        }
        for (source, target) in other.iter_edges() {
            merged.add_edge(source, target);
        }
        for (id, attrs) in &other.attributes {
            merged.attributes.insert(id.clone(), attrs.clone());
        }
        merged
    }

    /// Breadth-first spanning tree rooted at `root`, truncated at
    /// `depth_limit` hops (unbounded when `None`).
    ///
    /// The result contains tree edges only: a vertex keeps the edge it was
    /// discovered through, not every edge among retained vertices.
    /// Attributes of retained vertices are carried over. A root the graph
    /// does not know still yields a single-vertex result.
    pub fn bfs_tree(&self, root: &str, depth_limit: Option<usize>) -> DiGraph {
        let mut tree = DiGraph::new();
        tree.add_node(root);
        if let Some(attrs) = self.attributes.get(root) {
            tree.attributes.insert(root.to_string(), attrs.clone());
        }

        let mut visited: HashSet<String> = HashSet::from([root.to_string()]);
        let mut queue: VecDeque<(String, usize)> = VecDeque::from([(root.to_string(), 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if depth_limit.is_some_and(|limit| depth >= limit) {
                continue;
            }
            for succ in self.successors(&node) {
                if visited.contains(succ) {
                    continue;
                }
                visited.insert(succ.to_string());
                tree.add_edge(node.clone(), succ);
                if let Some(attrs) = self.attributes.get(succ) {
                    tree.attributes.insert(succ.to_string(), attrs.clone());
                }
                queue.push_back((succ.to_string(), depth + 1));
            }
        }
        tree
    }
}
