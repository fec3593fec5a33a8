//! Tests for the graph model: allocation, field edits, connections and commands.
mod common;
use common::*;
use flowrule::prelude::*;
use serde_json::json;

#[test]
fn test_new_graph_holds_only_start_node() {
    let graph = Graph::new();

    assert_eq!(graph.nodes().len(), 1);
    assert_eq!(graph.nodes()[0].kind(), NodeKind::Start);
    assert_eq!(graph.nodes()[0].data.label(), "Start Flow");
    assert!(graph.edges().is_empty());
}

#[test]
fn test_add_node_appends_with_default_fields() {
    let mut graph = Graph::new();

    let node = graph
        .add_node(NodeKind::Condition, Position::new(120.0, 80.0))
        .clone();

    assert_eq!(node.id, "dndnode_1");
    assert_eq!(node.position, Position::new(120.0, 80.0));
    assert_eq!(
        node.data,
        NodeData::Condition(ConditionFields {
            label: "condition node".to_string(),
            ..ConditionFields::default()
        })
    );
    assert_eq!(graph.nodes().last(), Some(&node));
}

#[test]
fn test_update_field_touches_only_target_node() {
    let mut graph = Graph::new();
    let first = graph
        .add_node(NodeKind::Condition, Position::default())
        .id
        .clone();
    let second = graph
        .add_node(NodeKind::Condition, Position::default())
        .id
        .clone();
    let before_second = graph.node(&second).cloned();

    let applied = graph.update_field(&first, FieldEdit::Value(Some("paid".to_string())));

    assert!(applied);
    match &graph.node(&first).unwrap().data {
        NodeData::Condition(fields) => assert_eq!(fields.value.as_deref(), Some("paid")),
        other => panic!("Expected a condition node, found {:?}", other),
    }
    assert_eq!(graph.node(&second).cloned(), before_second);
    let order: Vec<_> = graph.nodes().iter().map(|n| n.id.clone()).collect();
    assert_eq!(order, vec!["dndnode_0".to_string(), first, second]);
}

#[test]
fn test_update_field_on_missing_node_is_a_no_op() {
    let mut graph = Graph::new();
    graph.add_node(NodeKind::Action, Position::default());
    let before = graph.nodes().to_vec();

    let applied = graph.update_field("nope", FieldEdit::ActionType(ActionType::SendEmail));

    assert!(!applied);
    assert_eq!(graph.nodes(), before.as_slice());
}

#[test]
fn test_update_field_ignores_fields_of_other_kinds() {
    let mut graph = Graph::new();
    let action = graph
        .add_node(NodeKind::Action, Position::default())
        .id
        .clone();
    let before = graph.nodes().to_vec();

    assert!(!graph.update_field(&action, FieldEdit::Operator(ConditionOperator::Contains)));
    assert_eq!(graph.nodes(), before.as_slice());
}

#[test]
fn test_label_edits_apply_to_every_kind() {
    let mut graph = Graph::new();
    let start = graph.nodes()[0].id.clone();

    assert!(graph.update_field(&start, FieldEdit::Label("Begin".to_string())));
    assert_eq!(graph.node(&start).unwrap().data.label(), "Begin");
}

#[test]
fn test_connect_allows_duplicates_and_cycles() {
    let mut graph = Graph::new();
    let start = graph.nodes()[0].id.clone();
    let condition = graph
        .add_node(NodeKind::Condition, Position::default())
        .id
        .clone();

    graph.connect(&start, &condition).unwrap();
    graph.connect(&start, &condition).unwrap();
    graph.connect(&condition, &start).unwrap();

    assert_eq!(graph.edges().len(), 3);
    assert_eq!(graph.edges()[2].source, condition);
    assert_eq!(graph.edges()[2].target, start);
}

#[test]
fn test_connect_rejects_unknown_endpoints() {
    let mut graph = Graph::new();
    let start = graph.nodes()[0].id.clone();

    let err = graph.connect(&start, "ghost").unwrap_err();

    assert_eq!(
        err,
        GraphError::UnknownNode {
            missing_node_id: "ghost".to_string(),
            source_node_id: start,
        }
    );
    assert!(graph.edges().is_empty());
}

#[test]
fn test_repeated_connections_get_distinct_edge_ids() {
    let mut graph = Graph::new();
    let start = graph.nodes()[0].id.clone();
    let action = graph
        .add_node(NodeKind::Action, Position::default())
        .id
        .clone();

    for _ in 0..3 {
        graph.connect(&start, &action).unwrap();
    }

    let ids: Vec<_> = graph.edges().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "edndnode_0-dndnode_1",
            "edndnode_0-dndnode_1-1",
            "edndnode_0-dndnode_1-2"
        ]
    );
}

#[test]
fn test_commands_decode_from_renderer_json() {
    let mut graph = Graph::new();

    let added: GraphCommand = serde_json::from_value(json!({
        "command": "add_node",
        "kind": "condition",
        "position": {"x": 10.0, "y": 20.0}
    }))
    .unwrap();
    let CommandOutcome::NodeAdded(id) = graph.apply(added).unwrap() else {
        panic!("Expected NodeAdded");
    };

    let edits = [
        json!({"field": "field", "value": "referred.action"}),
        json!({"field": "operator", "value": "contains"}),
        json!({"field": "value", "value": "subscribe"}),
    ];
    for edit in edits {
        let command: GraphCommand = serde_json::from_value(json!({
            "command": "update_field",
            "node_id": id,
            "edit": edit,
        }))
        .unwrap();
        assert_eq!(
            graph.apply(command).unwrap(),
            CommandOutcome::FieldUpdated(true)
        );
    }

    let connect: GraphCommand = serde_json::from_value(json!({
        "command": "connect",
        "source": "dndnode_0",
        "target": id,
    }))
    .unwrap();
    assert!(matches!(
        graph.apply(connect).unwrap(),
        CommandOutcome::Connected(_)
    ));

    let rule = graph.compile(RuleIdentity::saved());
    assert_eq!(
        rule.conditions,
        vec![condition(
            "referred.action",
            ConditionOperator::Contains,
            "subscribe"
        )]
    );
}

#[test]
fn test_action_params_edit_replaces_whole_map() {
    let mut graph = Graph::new();
    let action = graph
        .add_node(NodeKind::Action, Position::default())
        .id
        .clone();

    graph.update_field(&action, FieldEdit::Params(amount(100)));
    graph.update_field(&action, FieldEdit::Params(amount(250)));

    let rule = graph.compile(RuleIdentity::saved());
    assert_eq!(rule.actions[0].params, amount(250));
}

#[test]
fn test_node_wire_format() {
    let node = condition_node(
        "dndnode_3",
        Some("referrer.status"),
        None,
        Some("paid"),
    );

    assert_eq!(
        serde_json::to_value(&node).unwrap(),
        json!({
            "id": "dndnode_3",
            "type": "condition",
            "data": {"label": "condition node", "field": "referrer.status", "value": "paid"},
            "position": {"x": 0.0, "y": 0.0}
        })
    );

    let action = action_node("dndnode_4", Some(ActionType::CreditReward), Some(amount(5)));
    let wire = serde_json::to_value(&action).unwrap();
    assert_eq!(wire["type"], "action");
    assert_eq!(wire["data"]["actionType"], "credit_reward");
    assert_eq!(wire["data"]["params"]["amount"], 5);
}

#[test]
fn test_start_node_decodes_from_canvas_json() {
    let node: Node = serde_json::from_value(json!({
        "id": "1",
        "type": "input",
        "data": {"label": "Start Flow"},
        "position": {"x": 250, "y": 5},
        "className": "glass-panel"
    }))
    .unwrap();

    assert_eq!(node.kind(), NodeKind::Start);
    assert_eq!(node.position, Position::new(250.0, 5.0));
}

#[test]
fn test_replace_advances_allocator_past_incoming_ids() {
    let mut graph = Graph::new();
    graph
        .replace(GraphLayout {
            nodes: vec![start_node("dndnode_7"), condition_node("custom", None, None, None)],
            edges: vec![],
        })
        .unwrap();

    let added = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    assert_eq!(added, "dndnode_8");
}

#[test]
fn test_snapshot_carries_graph_and_saved_rule() {
    let mut graph = Graph::new();
    let start = graph.nodes()[0].id.clone();
    let action = graph
        .add_node(NodeKind::Action, Position::default())
        .id
        .clone();
    graph.connect(&start, &action).unwrap();

    let snapshot = graph.snapshot("latest_flow");

    assert_eq!(snapshot.id, "latest_flow");
    assert_eq!(snapshot.nodes.len(), 2);
    assert_eq!(snapshot.edges.len(), 1);
    assert_eq!(snapshot.generated_rule.id, "generated_rule");
    assert_eq!(snapshot.generated_rule.actions.len(), 1);
}

#[test]
fn test_replace_rejects_ids_beyond_allocator_range() {
    let mut graph = Graph::new();
    let too_high = format!("dndnode_{}", u64::MAX);
    let before = graph.nodes().to_vec();

    let err = graph
        .replace(GraphLayout {
            nodes: vec![start_node(&too_high)],
            edges: vec![],
        })
        .unwrap_err();

    assert_eq!(err, GraphError::IdSpaceExhausted { node_id: too_high });
    assert_eq!(graph.nodes(), before.as_slice());
    let added = graph.add_node(NodeKind::Action, Position::default()).id.clone();
    assert_eq!(added, "dndnode_1");
}

#[test]
fn test_replace_rejects_dangling_edges() {
    let mut graph = Graph::new();
    let before = graph.nodes().to_vec();

    let err = graph
        .replace(GraphLayout {
            nodes: vec![start_node("a")],
            edges: vec![Edge {
                id: "e".to_string(),
                source: "a".to_string(),
                target: "b".to_string(),
                style: EdgeStyle::Default,
            }],
        })
        .unwrap_err();

    assert_eq!(
        err,
        GraphError::UnknownNode {
            missing_node_id: "b".to_string(),
            source_node_id: "a".to_string(),
        }
    );
    assert_eq!(graph.nodes(), before.as_slice());
    assert!(graph.edges().is_empty());
}

#[test]
fn test_replace_rejects_duplicate_node_ids() {
    let mut graph = Graph::new();

    let err = graph
        .replace(GraphLayout {
            nodes: vec![
                start_node("dndnode_3"),
                action_node("dndnode_3", None, None),
            ],
            edges: vec![],
        })
        .unwrap_err();

    assert_eq!(
        err,
        GraphError::DuplicateNode {
            node_id: "dndnode_3".to_string()
        }
    );
    assert_eq!(graph.allocator().issued(), 1);
}
