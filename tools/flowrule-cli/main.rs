use clap::{Parser, Subcommand};
use flowrule::prelude::*;
use flowrule::session::join_operation;
use serde::Serialize;
use std::fs;
use std::time::Instant;

/// Compile node-graph flows into rules, lay rules out as graphs, and talk to the rule service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON client config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the rule service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a flow JSON file (`{"nodes": [...], "edges": [...]}`) into a rule
    Compile {
        flow_path: String,
        /// Use the transient test identity instead of the saved one
        #[arg(long)]
        transient: bool,
    },
    /// Lay out a rule JSON file as a graph
    Layout { rule_path: String },
    /// Save a flow JSON file to the rule service
    Save { flow_path: String },
    /// Evaluate a flow's rule against a fact context (the mock context by default)
    Test {
        flow_path: String,
        #[arg(long)]
        context: Option<String>,
    },
    /// Generate a rule from a description and print its layout
    Generate { prompt: String },
    /// Fetch a saved flow
    Load {
        #[arg(long)]
        flow_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Command::Compile {
            flow_path,
            transient,
        } => {
            let identity = if transient {
                RuleIdentity::transient()
            } else {
                RuleIdentity::saved()
            };
            let flow = read_flow(&flow_path);
            let rule = Compiler::builder(&flow.nodes)
                .identity(identity)
                .build()
                .compile();
            print_json(&rule);
        }
        Command::Layout { rule_path } => {
            let document = read_json(&rule_path);
            let mut ids = IdAllocator::new();
            let layout = GraphLayout::from_json(&document, &mut ids)
                .unwrap_or_else(|e| exit_with_error(&format!("Layout failed: {}", e)));
            print_json(&layout);
        }
        Command::Save { flow_path } => {
            let session = open_session(&cli.config, &cli.base_url, Some(&flow_path));
            let receipt = session
                .save()
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Error saving flow: {}", e)));
            println!(
                "Flow saved! (status: {}, id: {})",
                receipt.status.as_deref().unwrap_or("unknown"),
                receipt
                    .id
                    .as_deref()
                    .unwrap_or(&session.client().config().flow_id)
            );
        }
        Command::Test { flow_path, context } => {
            let facts = match context {
                Some(path) => FactContext::from_file(&path).unwrap_or_else(|e| {
                    exit_with_error(&format!("Failed to load context from '{}': {}", path, e))
                }),
                None => {
                    println!("No context file provided. Using the mock context.");
                    FactContext::sample()
                }
            };
            let session = std::sync::Arc::new(open_session(
                &cli.config,
                &cli.base_url,
                Some(&flow_path),
            ));
            let verdict = join_operation(OperationKind::Evaluate, session.spawn_test(facts))
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Error testing rule: {}", e)));
            println!("Test Result:");
            print_json(&verdict);
        }
        Command::Generate { prompt } => {
            let session = open_session(&cli.config, &cli.base_url, None);
            let rule = session.generate(&prompt).await.unwrap_or_else(|e| {
                exit_with_error(&format!("Error generating rule from AI: {}", e))
            });
            println!(
                "Generated '{}' with {} conditions and {} actions",
                rule.name,
                rule.conditions.len(),
                rule.actions.len()
            );
            let graph = session.graph();
            print_json(&GraphLayout {
                nodes: graph.nodes().to_vec(),
                edges: graph.edges().to_vec(),
            });
        }
        Command::Load { flow_id } => {
            let session = open_session(&cli.config, &cli.base_url, None);
            let restored = session
                .restore(flow_id.as_deref())
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Error loading flow: {}", e)));
            if !restored {
                println!("No saved flow found.");
                return;
            }
            print_json(&session.graph().snapshot(&session.client().config().flow_id));
        }
    }

    tracing::debug!(elapsed = ?start.elapsed(), "done");
}

fn open_session(
    config_path: &Option<String>,
    base_url: &Option<String>,
    flow_path: Option<&str>,
) -> Session {
    let mut config = match config_path {
        Some(path) => ClientConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => ClientConfig::default(),
    }
    .with_env_overrides()
    .unwrap_or_else(|e| exit_with_error(&format!("Invalid environment: {}", e)));
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url.clone());
    }

    let client = RuleServiceClient::new(config)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to create client: {}", e)));
    let session = Session::new(client);
    if let Some(path) = flow_path {
        session
            .graph()
            .replace(read_flow(path))
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid flow '{}': {}", path, e)));
    }
    session
}

fn read_json(path: &str) -> serde_json::Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse JSON in '{}': {}", path, e)))
}

fn read_flow(path: &str) -> GraphLayout {
    serde_json::from_value(read_json(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow '{}': {}", path, e)))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to print JSON: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
