//! An editing session: one graph, one rule-service client, and the bookkeeping that
//! lets a newer boundary operation supersede an older one of the same kind.
//!
//! Every boundary operation takes a [`Ticket`] before it leaves the process. When its
//! response arrives, it only touches the graph if its ticket is still the latest of
//! its kind; otherwise it resolves to [`SessionError::Superseded`]. Operations started
//! through the `spawn_*` methods are additionally aborted when superseded.

use crate::client::{RuleServiceClient, SaveReceipt};
use crate::data::FactContext;
use crate::error::{GraphError, SessionError};
use crate::graph::{CommandOutcome, Graph, GraphCommand};
use crate::layout::{self, GraphLayout};
use crate::rule::{Rule, RuleIdentity};
use ahash::AHashMap;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinError, JoinHandle};

/// The boundary operations a session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Save,
    Evaluate,
    Generate,
    Load,
}

/// Proof that an operation was the latest of its kind when it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    kind: OperationKind,
    generation: u64,
}

impl Ticket {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

#[derive(Default)]
struct InFlight {
    generations: AHashMap<OperationKind, u64>,
    tasks: AHashMap<OperationKind, AbortHandle>,
}

/// Tracks the latest invocation of every operation kind.
#[derive(Default)]
pub struct OperationRegistry {
    inner: Mutex<InFlight>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new invocation of `kind`, invalidating the previous one and aborting
    /// its task if one was tracked.
    pub fn begin(&self, kind: OperationKind) -> Ticket {
        let mut inner = self.inner.lock();
        let generation = inner
            .generations
            .entry(kind)
            .and_modify(|g| *g += 1)
            .or_insert(0);
        let ticket = Ticket {
            kind,
            generation: *generation,
        };
        if let Some(task) = inner.tasks.remove(&kind) {
            tracing::debug!(?kind, "aborting superseded task");
            task.abort();
        }
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.inner.lock().generations.get(&ticket.kind) == Some(&ticket.generation)
    }

    /// Remembers the task running `ticket` so a later `begin` can abort it.
    fn track(&self, ticket: Ticket, task: AbortHandle) {
        let mut inner = self.inner.lock();
        if inner.generations.get(&ticket.kind) == Some(&ticket.generation) {
            inner.tasks.insert(ticket.kind, task);
        } else {
            task.abort();
        }
    }

    fn settle(&self, ticket: Ticket) {
        let mut inner = self.inner.lock();
        if inner.generations.get(&ticket.kind) == Some(&ticket.generation) {
            inner.tasks.remove(&ticket.kind);
        }
    }

    fn check(&self, ticket: Ticket) -> Result<(), SessionError> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            tracing::warn!(kind = ?ticket.kind, "discarding result of superseded operation");
            Err(SessionError::Superseded(ticket.kind))
        }
    }
}

pub struct Session {
    graph: Mutex<Graph>,
    client: RuleServiceClient,
    operations: OperationRegistry,
}

impl Session {
    pub fn new(client: RuleServiceClient) -> Self {
        Self::with_graph(Graph::new(), client)
    }

    pub fn with_graph(graph: Graph, client: RuleServiceClient) -> Self {
        Self {
            graph: Mutex::new(graph),
            client,
            operations: OperationRegistry::new(),
        }
    }

    /// Locks the graph. Never hold the guard across an `.await`.
    pub fn graph(&self) -> MutexGuard<'_, Graph> {
        self.graph.lock()
    }

    pub fn client(&self) -> &RuleServiceClient {
        &self.client
    }

    pub fn operations(&self) -> &OperationRegistry {
        &self.operations
    }

    pub fn apply(&self, command: GraphCommand) -> Result<CommandOutcome, GraphError> {
        self.graph.lock().apply(command)
    }

    pub fn compile(&self, identity: RuleIdentity) -> Rule {
        self.graph.lock().compile(identity)
    }

    /// Persists the current graph and its compiled rule.
    pub async fn save(&self) -> Result<SaveReceipt, SessionError> {
        let ticket = self.operations.begin(OperationKind::Save);
        self.run_save(ticket).await
    }

    /// Evaluates the current graph's rule against `context` and returns the
    /// service's answer verbatim.
    pub async fn test(&self, context: &FactContext) -> Result<Value, SessionError> {
        let ticket = self.operations.begin(OperationKind::Evaluate);
        self.run_test(ticket, context).await
    }

    /// Generates a rule from `prompt` and replaces the graph with its layout.
    ///
    /// A malformed response is rejected before the graph is touched.
    pub async fn generate(&self, prompt: &str) -> Result<Rule, SessionError> {
        let ticket = self.operations.begin(OperationKind::Generate);
        self.run_generate(ticket, prompt).await
    }

    /// Replaces the graph with the flow saved under `flow_id` (the configured flow
    /// when `None`). Returns `false`, leaving the graph alone, if nothing was saved.
    /// A snapshot with dangling edges or repeated node ids is rejected with
    /// [`SessionError::Graph`] and the graph is left alone as well.
    pub async fn restore(&self, flow_id: Option<&str>) -> Result<bool, SessionError> {
        let ticket = self.operations.begin(OperationKind::Load);
        let flow_id = flow_id.unwrap_or(&self.client.config().flow_id).to_string();
        let snapshot = self.finish(ticket, self.client.load(&flow_id)).await?;

        let Some(snapshot) = snapshot else {
            return Ok(false);
        };
        let mut graph = self.graph.lock();
        self.operations.check(ticket)?;
        graph.restore(snapshot)?;
        Ok(true)
    }

    /// Like [`Session::generate`], on a spawned task that a newer generation aborts.
    pub fn spawn_generate(
        self: &Arc<Self>,
        prompt: impl Into<String>,
    ) -> JoinHandle<Result<Rule, SessionError>> {
        let prompt = prompt.into();
        self.spawn_tracked(OperationKind::Generate, move |session, ticket| async move {
            session.run_generate(ticket, &prompt).await
        })
    }

    /// Like [`Session::test`], on a spawned task that a newer test aborts.
    pub fn spawn_test(
        self: &Arc<Self>,
        context: FactContext,
    ) -> JoinHandle<Result<Value, SessionError>> {
        self.spawn_tracked(OperationKind::Evaluate, move |session, ticket| async move {
            session.run_test(ticket, &context).await
        })
    }

    fn spawn_tracked<T, F, Fut>(
        self: &Arc<Self>,
        kind: OperationKind,
        run: F,
    ) -> JoinHandle<Result<T, SessionError>>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Self>, Ticket) -> Fut,
        Fut: Future<Output = Result<T, SessionError>> + Send + 'static,
    {
        let ticket = self.operations.begin(kind);
        let handle = tokio::spawn(run(Arc::clone(self), ticket));
        self.operations.track(ticket, handle.abort_handle());
        handle
    }

    async fn run_save(&self, ticket: Ticket) -> Result<SaveReceipt, SessionError> {
        let snapshot = self.graph.lock().snapshot(&self.client.config().flow_id);
        self.finish(ticket, self.client.save(&snapshot)).await
    }

    async fn run_test(&self, ticket: Ticket, context: &FactContext) -> Result<Value, SessionError> {
        let rule = self.compile(RuleIdentity::transient());
        self.finish(ticket, self.client.evaluate(context, std::slice::from_ref(&rule)))
            .await
    }

    async fn run_generate(&self, ticket: Ticket, prompt: &str) -> Result<Rule, SessionError> {
        let document = self.finish(ticket, self.client.generate(prompt)).await?;
        let rule = layout::parse_rule(&document)?;

        let mut graph = self.graph.lock();
        self.operations.check(ticket)?;
        let laid_out: GraphLayout = layout::layout(&rule, graph.allocator_mut());
        graph.install(laid_out);
        Ok(rule)
    }

    /// Awaits a boundary request and rejects its outcome if `ticket` went stale.
    async fn finish<T, E>(
        &self,
        ticket: Ticket,
        request: impl Future<Output = Result<T, E>>,
    ) -> Result<T, SessionError>
    where
        SessionError: From<E>,
    {
        let outcome = request.await;
        self.operations.check(ticket)?;
        self.operations.settle(ticket);
        Ok(outcome?)
    }
}

/// Awaits a task started by a `spawn_*` method, reporting an abort as
/// [`SessionError::Cancelled`].
pub async fn join_operation<T>(
    kind: OperationKind,
    handle: JoinHandle<Result<T, SessionError>>,
) -> Result<T, SessionError> {
    handle.await.unwrap_or_else(|e: JoinError| {
        if e.is_cancelled() {
            Err(SessionError::Cancelled(kind))
        } else {
            std::panic::resume_unwind(e.into_panic())
        }
    })
}
