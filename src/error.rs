use crate::graph::NodeId;
use crate::session::OperationKind;
use thiserror::Error;

/// Errors raised while editing the node graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{missing_node_id}' not found, which is required by a connection from node '{source_node_id}'")]
    UnknownNode {
        missing_node_id: NodeId,
        source_node_id: NodeId,
    },

    #[error("Node id '{node_id}' appears more than once")]
    DuplicateNode { node_id: NodeId },

    #[error("Node id '{node_id}' is beyond the range this graph can allocate past")]
    IdSpaceExhausted { node_id: NodeId },
}

/// Errors raised when a rule document cannot be laid out as a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Malformed rule: {0}")]
    MalformedRule(String),
}

/// Errors raised by the boundary client talking to the rule service.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Could not build HTTP client: {0}")]
    Builder(String),

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Request to '{url}' failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request to '{url}' was rejected with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Response from '{url}' could not be decoded: {message}")]
    Decode { url: String, message: String },
}

/// Errors raised while loading client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config JSON: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Errors surfaced by a [`Session`](crate::session::Session) operation.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("{0:?} operation was superseded by a newer invocation; its result was discarded")]
    Superseded(OperationKind),

    #[error("{0:?} operation was cancelled")]
    Cancelled(OperationKind),
}

/// Errors that can occur when converting a custom user format into a flowrule `Rule`.
#[derive(Error, Debug, Clone)]
pub enum FlowConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
