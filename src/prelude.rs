//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowrule crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowrule::prelude::*;
//!
//! # async fn run_example() -> Result<()> {
//! let config = ClientConfig::default().with_env_overrides()?;
//! let session = Session::new(RuleServiceClient::new(config)?);
//!
//! session.generate("If referrer is paid and referred subscribes, give 500 credit").await?;
//! let verdict = session.test(&FactContext::sample()).await?;
//! println!("Test Result: {}", verdict);
//! session.save().await?;
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    ActionFields, CommandOutcome, ConditionFields, Edge, EdgeStyle, FieldEdit, Graph,
    GraphCommand, IdAllocator, Node, NodeData, NodeId, NodeKind, Position, StartFields,
};

// Translation in both directions
pub use crate::compiler::Compiler;
pub use crate::layout::GraphLayout;

// Rule documents
pub use crate::rule::{
    Action, ActionType, Combinator, Condition, ConditionOperator, IntoRule, Params, Rule,
    RuleIdentity,
};

// Boundary
pub use crate::client::{RuleServiceClient, SaveReceipt};
pub use crate::config::ClientConfig;
pub use crate::data::{FactContext, FlowSnapshot};
pub use crate::session::{OperationKind, Session};

// Error types
pub use crate::error::{ClientError, ConfigError, GraphError, LayoutError, SessionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
