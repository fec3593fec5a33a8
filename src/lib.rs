//! # flowrule - Node-Graph ⇄ Rule Translation
//!
//! **flowrule** lets a reward rule ("if these facts hold, credit this reward") be authored
//! as boxes on a canvas and converts that arrangement into, and back from, a flat rule
//! document that a rule service can evaluate.
//!
//! ## Core Workflow
//!
//! 1.  **Edit a Graph**: A [`graph::Graph`] holds Start, Condition and Action nodes. The
//!     rendering layer sends [`graph::GraphCommand`]s to it (add a node, edit a field,
//!     connect two nodes).
//! 2.  **Compile**: [`compiler::Compiler`] reduces the nodes to a [`rule::Rule`]. Conditions
//!     and actions appear in node insertion order; edges are cosmetic and ignored.
//! 3.  **Lay Out**: [`layout::layout`] turns a rule received from elsewhere back into a
//!     column of nodes joined by one chain of edges. Untrusted documents go through
//!     [`layout::GraphLayout::from_json`], which rejects malformed shapes up front.
//! 4.  **Talk to the Service**: [`session::Session`] saves, tests and generates rules
//!     through [`client::RuleServiceClient`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowrule::prelude::*;
//!
//! let mut graph = Graph::new();
//! let condition = graph
//!     .add_node(NodeKind::Condition, Position::new(250.0, 150.0))
//!     .id
//!     .clone();
//! graph.update_field(&condition, FieldEdit::Field(Some("referrer.status".to_string())));
//! graph.update_field(&condition, FieldEdit::Value(Some("paid".to_string())));
//!
//! let action = graph
//!     .add_node(NodeKind::Action, Position::new(250.0, 300.0))
//!     .id
//!     .clone();
//! let mut params = Params::new();
//! params.insert("amount".to_string(), serde_json::json!(500));
//! graph.update_field(&action, FieldEdit::Params(params));
//!
//! // The operator and action type were never set, so the defaults apply.
//! let rule = graph.compile(RuleIdentity::saved());
//! assert_eq!(rule.conditions[0].operator, ConditionOperator::Equals);
//! assert_eq!(rule.actions[0].action_type, ActionType::CreditReward);
//!
//! // And back again: a fresh column of nodes with new identities.
//! let mut ids = IdAllocator::new();
//! let layout = flowrule::layout::layout(&rule, &mut ids);
//! assert_eq!(layout.nodes.len(), 3);
//! assert_eq!(layout.edges.len(), 2);
//! ```

pub mod client;
pub mod compiler;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod layout;
pub mod prelude;
pub mod rule;
pub mod session;
