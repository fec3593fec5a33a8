use crate::graph::{Node, NodeData};
use crate::rule::{Action, Combinator, Condition, Rule, RuleIdentity};
use itertools::{Either, Itertools};

mod lowering;

/// Reduces a node collection to a flat rule.
///
/// Only node kinds and fields matter: edges are never consulted, and a condition box
/// that is connected to nothing still contributes a condition.
pub struct Compiler<'a> {
    nodes: &'a [Node],
    identity: RuleIdentity,
}

pub struct CompilerBuilder<'a> {
    nodes: &'a [Node],
    identity: RuleIdentity,
}

impl<'a> CompilerBuilder<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            nodes,
            identity: RuleIdentity::saved(),
        }
    }

    pub fn identity(mut self, identity: RuleIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn build(self) -> Compiler<'a> {
        Compiler {
            nodes: self.nodes,
            identity: self.identity,
        }
    }
}

impl<'a> Compiler<'a> {
    pub fn builder(nodes: &'a [Node]) -> CompilerBuilder<'a> {
        CompilerBuilder::new(nodes)
    }

    pub fn compile(&self) -> Rule {
        // One pass; each partition keeps the nodes' insertion order.
        let (conditions, actions): (Vec<Condition>, Vec<Action>) = self
            .nodes
            .iter()
            .filter_map(|node| match &node.data {
                NodeData::Condition(fields) => Some(Either::Left(Condition::from(fields))),
                NodeData::Action(fields) => Some(Either::Right(Action::from(fields))),
                NodeData::Start(_) => None,
            })
            .partition_map(|lowered| lowered);

        tracing::debug!(
            rule_id = %self.identity.id,
            conditions = conditions.len(),
            actions = actions.len(),
            "compiled rule"
        );

        Rule {
            id: self.identity.id.clone(),
            name: self.identity.name.clone(),
            operator: Combinator::And,
            conditions,
            actions,
        }
    }
}

/// Compiles `nodes` under the given identity.
pub fn compile(nodes: &[Node], identity: RuleIdentity) -> Rule {
    Compiler::builder(nodes).identity(identity).build().compile()
}
