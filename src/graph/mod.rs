//! The editable node graph.
//!
//! A [`Graph`] owns its nodes, its edges and the [`IdAllocator`] that names its nodes.
//! Rendering code never mutates nodes directly; it sends [`GraphCommand`]s to
//! [`Graph::apply`], which keeps node data plain and serializable.

use crate::compiler::Compiler;
use crate::data::FlowSnapshot;
use crate::error::GraphError;
use crate::layout::{self, GraphLayout};
use crate::rule::{Rule, RuleIdentity};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

pub mod ids;
pub mod types;

pub use ids::*;
pub use types::*;

/// A command sent by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GraphCommand {
    AddNode {
        kind: NodeKind,
        position: Position,
    },
    UpdateField {
        node_id: NodeId,
        edit: FieldEdit,
    },
    Connect {
        source: NodeId,
        target: NodeId,
    },
}

/// What a command did to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    NodeAdded(NodeId),
    /// `false` when the edit was ignored (unknown node or a field the kind lacks).
    FieldUpdated(bool),
    Connected(String),
}

#[derive(Debug, Clone)]
pub struct Graph {
    ids: IdAllocator,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// A graph holding only the entry node at the layout anchor.
    pub fn new() -> Self {
        Self::with_allocator(IdAllocator::new())
    }

    pub fn with_allocator(mut ids: IdAllocator) -> Self {
        let start = Node {
            id: ids.next(),
            data: NodeData::Start(StartFields::new()),
            position: layout::ANCHOR,
        };
        Self {
            ids,
            nodes: vec![start],
            edges: Vec::new(),
        }
    }

    /// A graph with no nodes at all.
    pub fn empty() -> Self {
        Self {
            ids: IdAllocator::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn allocator_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// Appends a node of `kind` with default fields. Insertion order is the order
    /// in which the node's condition or action appears in the compiled rule.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> &Node {
        let node = Node {
            id: self.ids.next(),
            data: kind.default_data(),
            position,
        };
        tracing::debug!(node_id = %node.id, %kind, "node added");
        self.nodes.push(node);
        &self.nodes[self.nodes.len() - 1]
    }

    /// Overwrites a single field of one node. Returns `false` and leaves the graph
    /// untouched when no node has `node_id` or the node's kind lacks the field.
    pub fn update_field(&mut self, node_id: &str, edit: FieldEdit) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            return false;
        };

        let field = edit.name();
        match node.data.with_edit(edit) {
            Some(data) => {
                node.data = data;
                true
            }
            None => {
                tracing::warn!(
                    node_id,
                    field,
                    kind = %node.kind(),
                    "ignoring edit of a field this node kind does not carry"
                );
                false
            }
        }
    }

    /// Draws an edge between two existing nodes. Duplicate edges, cycles and
    /// backwards edges are all allowed; every edge still gets its own id.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<&Edge, GraphError> {
        for (endpoint, other) in [(source, target), (target, source)] {
            if self.node(endpoint).is_none() {
                return Err(GraphError::UnknownNode {
                    missing_node_id: endpoint.to_string(),
                    source_node_id: other.to_string(),
                });
            }
        }

        let id = self.unused_edge_id(source, target);
        self.edges.push(Edge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            style: EdgeStyle::Default,
        });
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// `e{source}-{target}`, suffixed with `-1`, `-2`, ... while that id is taken.
    fn unused_edge_id(&self, source: &str, target: &str) -> String {
        let base = format!("e{}-{}", source, target);
        let taken = |id: &str| self.edges.iter().any(|e| e.id == id);
        if !taken(&base) {
            return base;
        }
        let mut n = 1u64;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn apply(&mut self, command: GraphCommand) -> Result<CommandOutcome, GraphError> {
        match command {
            GraphCommand::AddNode { kind, position } => {
                let id = self.add_node(kind, position).id.clone();
                Ok(CommandOutcome::NodeAdded(id))
            }
            GraphCommand::UpdateField { node_id, edit } => Ok(CommandOutcome::FieldUpdated(
                self.update_field(&node_id, edit),
            )),
            GraphCommand::Connect { source, target } => {
                let id = self.connect(&source, &target)?.id.clone();
                Ok(CommandOutcome::Connected(id))
            }
        }
    }

    /// Replaces every node and edge at once with a layout from outside the graph.
    ///
    /// The layout is rejected, leaving the graph untouched, if two nodes share an id,
    /// an edge names a node that is not in it, or an id is out of the allocator's
    /// range. Otherwise the allocator is advanced past every incoming identifier it
    /// could have issued, so later nodes never collide.
    pub fn replace(&mut self, layout: GraphLayout) -> Result<(), GraphError> {
        check_integrity(&layout)?;
        self.ids
            .reserve_past(layout.nodes.iter().map(|n| n.id.as_str()))?;
        self.install(layout);
        Ok(())
    }

    /// Installs a layout whose identifiers were drawn from this graph's allocator.
    pub(crate) fn install(&mut self, layout: GraphLayout) {
        tracing::debug!(
            nodes = layout.nodes.len(),
            edges = layout.edges.len(),
            "graph replaced"
        );
        self.nodes = layout.nodes;
        self.edges = layout.edges;
    }

    /// Replaces the graph with the layout of `rule`, allocating fresh identities.
    pub fn load_rule(&mut self, rule: &Rule) {
        let layout = layout::layout(rule, &mut self.ids);
        self.install(layout);
    }

    /// Replaces the graph with a saved snapshot. See [`Graph::replace`].
    pub fn restore(&mut self, snapshot: FlowSnapshot) -> Result<(), GraphError> {
        self.replace(GraphLayout {
            nodes: snapshot.nodes,
            edges: snapshot.edges,
        })
    }

    pub fn compile(&self, identity: RuleIdentity) -> Rule {
        Compiler::builder(&self.nodes).identity(identity).build().compile()
    }

    /// The full graph plus its compiled rule, as persisted by a save.
    pub fn snapshot(&self, flow_id: &str) -> FlowSnapshot {
        FlowSnapshot {
            id: flow_id.to_string(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            generated_rule: self.compile(RuleIdentity::saved()),
        }
    }
}

fn check_integrity(layout: &GraphLayout) -> Result<(), GraphError> {
    let mut ids = AHashSet::with_capacity(layout.nodes.len());
    for node in &layout.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(GraphError::DuplicateNode {
                node_id: node.id.clone(),
            });
        }
    }

    for edge in &layout.edges {
        for (endpoint, other) in [(&edge.source, &edge.target), (&edge.target, &edge.source)] {
            if !ids.contains(endpoint.as_str()) {
                return Err(GraphError::UnknownNode {
                    missing_node_id: endpoint.clone(),
                    source_node_id: other.clone(),
                });
            }
        }
    }
    Ok(())
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
