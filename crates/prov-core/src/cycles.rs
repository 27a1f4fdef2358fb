//! Provenance cycle detection
//!
//! Depth-first search from every node of the provenance graph. A cycle is a
//! target already on the *current* path; reconverging on a node reached
//! through another branch (a diamond) is not a cycle. Within one start a
//! node is expanded at most once, and the search from that start stops at
//! the first cycle, so each start costs O(V + E).

use crate::issue::{IssueKind, ValidationIssue};
use indexmap::IndexMap;
use prov_artifact::StructuralPath;
use std::collections::HashSet;

/// One provenance edge: target id and where the source body names it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceEdge {
    /// Target artifact id
    pub target: String,

    /// Path of the reference within the source body
    pub path: StructuralPath,
}

impl ProvenanceEdge {
    /// Create edge
    #[inline]
    #[must_use]
    pub fn new(target: impl Into<String>, path: StructuralPath) -> Self {
        Self {
            target: target.into(),
            path,
        }
    }
}

impl From<String> for ProvenanceEdge {
    fn from(target: String) -> Self {
        Self::new(target, StructuralPath::root())
    }
}

impl From<&str> for ProvenanceEdge {
    fn from(target: &str) -> Self {
        Self::new(target, StructuralPath::root())
    }
}

/// Provenance edges: source id → outgoing edges, in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceGraph {
    edges: IndexMap<String, Vec<ProvenanceEdge>>,
}

/// The cycle found from one starting node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCycle {
    /// Node the traversal started from
    pub start: String,

    /// Repeated node, the nodes in between, and the repeated node again
    pub path: Vec<String>,

    /// Path, within the start's body, of the first edge taken toward the cycle
    pub site: StructuralPath,
}

impl DetectedCycle {
    /// `a → b → c → a`
    #[must_use]
    pub fn chain(&self) -> String {
        self.path.join(" → ")
    }
}

/// Traversal state for one start node
struct Walk<'a> {
    nodes: Vec<&'a str>,
    edges: Vec<&'a ProvenanceEdge>,
    expanded: HashSet<&'a str>,
}

impl ProvenanceGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provenance edges of `source`, replacing earlier ones
    pub fn set_edges<E>(&mut self, source: impl Into<String>, edges: impl IntoIterator<Item = E>)
    where
        E: Into<ProvenanceEdge>,
    {
        self.edges
            .insert(source.into(), edges.into_iter().map(Into::into).collect());
    }

    /// Outgoing edges of `source`
    #[must_use]
    pub fn targets(&self, source: &str) -> &[ProvenanceEdge] {
        self.edges.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of source nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if graph has no source nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// First cycle reachable from each source node
    ///
    /// Starts are visited in scan order and yield at most one cycle each.
    #[must_use]
    pub fn detect_cycles(&self) -> Vec<DetectedCycle> {
        self.edges
            .keys()
            .filter_map(|start| {
                let mut walk = Walk {
                    nodes: Vec::new(),
                    edges: Vec::new(),
                    expanded: HashSet::new(),
                };
                self.visit(start, &mut walk)
            })
            .collect()
    }

    fn visit<'a>(&'a self, node: &'a str, walk: &mut Walk<'a>) -> Option<DetectedCycle> {
        if let Some(pos) = walk.nodes.iter().position(|n| *n == node) {
            let mut path: Vec<String> = walk.nodes[pos..].iter().map(|n| (*n).to_string()).collect();
            path.push(node.to_string());
            return Some(DetectedCycle {
                start: walk.nodes.first().map(|n| (*n).to_string()).unwrap_or_default(),
                path,
                site: walk.edges.first().map(|e| e.path.clone()).unwrap_or_default(),
            });
        }
        // fully explored without closing a cycle
        if !walk.expanded.insert(node) {
            return None;
        }

        walk.nodes.push(node);
        for edge in self.targets(node) {
            walk.edges.push(edge);
            if let Some(cycle) = self.visit(&edge.target, walk) {
                return Some(cycle);
            }
            walk.edges.pop();
        }
        walk.nodes.pop();
        None
    }

    /// Detect cycles and report each as a `circular-reference` issue
    #[must_use]
    pub fn cycle_issues(&self, provenance_field: &str) -> Vec<ValidationIssue> {
        self.detect_cycles()
            .into_iter()
            .map(|cycle| {
                let chain = cycle.chain();
                let repeated = cycle.path.first().cloned().unwrap_or_default();
                ValidationIssue::new(
                    IssueKind::CircularReference,
                    cycle.start,
                    cycle.site,
                    format!("Circular reference detected: {chain}"),
                )
                .with_referenced(repeated)
                .with_field(provenance_field)
            })
            .collect()
    }
}

impl<S, E> FromIterator<(S, Vec<E>)> for ProvenanceGraph
where
    S: Into<String>,
    E: Into<ProvenanceEdge>,
{
    fn from_iter<I: IntoIterator<Item = (S, Vec<E>)>>(iter: I) -> Self {
        let mut graph = Self::new();
        for (source, edges) in iter {
            graph.set_edges(source, edges);
        }
        graph
    }
}
