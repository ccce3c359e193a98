//! One automation run: inject a game record and trigger analysis.
//!
//! # Flow (for beginners)
//!
//! ```text
//! 1. LocatingInput   wait until the document is interactive
//!                    (+ post_ready_delay if we actually had to wait),
//!                    then try the input chain in order
//! 2. Injected        the record text was written into the input
//! 3. AwaitingTrigger sleep settle_delay so the page's own scripts can react,
//!                    then try the trigger chain in order
//! 4. Submitted       the trigger was clicked
//! ```
//!
//! After every wait the run checks that the document is still alive.  If it
//! is not, the run ends in `Abandoned` without touching the page again.
//!
//! The settle delay is a fixed sleep, not an observation of the page.  On a
//! slow machine the trigger can be pressed before the page has processed the
//! injected value; raise `settle_delay` in the config if that happens.

use std::time::Duration;

use chess_analyzer_core::{GameRecord, Provenance};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::document::{Document, DocumentError};
use crate::domain::{FailureReason, RunState, SelectorChain, SelectorStrategy};

// ── Settings ──────────────────────────────────────────────────────────────────

/// Tunables shared by every run of one controller.
#[derive(Debug, Clone)]
pub struct AutomationSettings {
    pub input_chain: SelectorChain,
    pub trigger_chain: SelectorChain,
    /// Pause between injecting the record and looking for the trigger.
    pub settle_delay: Duration,
    /// Extra pause after the document *became* interactive during the run.
    pub post_ready_delay: Duration,
    /// Upper bound on waiting for the document to become interactive.
    pub readiness_timeout: Duration,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            input_chain: SelectorChain::record_input(),
            trigger_chain: SelectorChain::analyze_trigger(),
            settle_delay: Duration::from_millis(2000),
            post_ready_delay: Duration::from_millis(1000),
            readiness_timeout: Duration::from_secs(30),
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// What happened during a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub id: Uuid,
    pub provenance: Provenance,
    pub record_len: usize,
    /// Every state the run entered, starting with `Idle`.
    pub history: Vec<RunState>,
    /// Name of the input strategy that matched, if any.
    pub input_strategy: Option<String>,
    /// Name of the trigger strategy that matched, if any.
    pub trigger_strategy: Option<String>,
}

impl RunReport {
    /// The terminal state of the run.
    pub fn outcome(&self) -> &RunState {
        self.history.last().unwrap_or(&RunState::Idle)
    }

    pub fn is_submitted(&self) -> bool {
        *self.outcome() == RunState::Submitted
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// State machine for a single delivered record.
///
/// A run is consumed by [`drive`](Self::drive); it cannot be restarted.
#[derive(Debug)]
pub struct AutomationRun {
    id: Uuid,
    record: GameRecord,
    history: Vec<RunState>,
    input_strategy: Option<String>,
    trigger_strategy: Option<String>,
}

impl AutomationRun {
    pub fn new(record: GameRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            history: vec![RunState::Idle],
            input_strategy: None,
            trigger_strategy: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &RunState {
        self.history.last().unwrap_or(&RunState::Idle)
    }

    /// Runs the state machine to a terminal state against `document`.
    pub async fn drive(
        mut self,
        document: &dyn Document,
        settings: &AutomationSettings,
    ) -> RunReport {
        info!(
            "run {}: starting ({} bytes, {})",
            self.id,
            self.record.len(),
            self.record.provenance()
        );

        let terminal = match self.steps(document, settings).await {
            Ok(()) => RunState::Submitted,
            Err(terminal) => terminal,
        };
        self.transition(terminal);

        match self.state() {
            RunState::Submitted => info!("run {}: analysis triggered", self.id),
            RunState::Abandoned => info!("run {}: view went away; abandoned", self.id),
            other => warn!("run {}: {other}; record left un-analysed", self.id),
        }

        RunReport {
            id: self.id,
            provenance: self.record.provenance(),
            record_len: self.record.len(),
            history: self.history,
            input_strategy: self.input_strategy,
            trigger_strategy: self.trigger_strategy,
        }
    }

    /// Runs every step up to (not including) `Submitted`.
    ///
    /// `Err` carries the terminal state the run should end in.
    async fn steps(
        &mut self,
        document: &dyn Document,
        settings: &AutomationSettings,
    ) -> Result<(), RunState> {
        self.transition(RunState::LocatingInput);
        self.await_readiness(document, settings).await?;

        let input = self
            .locate(document, &settings.input_chain, "input")
            .await
            .map_err(terminal_for)?
            .ok_or(RunState::Failed(FailureReason::InputNotFound))?;
        self.input_strategy = Some(input.name.clone());

        document
            .set_value(&input.css, self.record.text())
            .await
            .map_err(terminal_for)?;
        self.transition(RunState::Injected);

        self.transition(RunState::AwaitingTrigger);
        sleep(settings.settle_delay).await;
        ensure_alive(document)?;

        let trigger = self
            .locate(document, &settings.trigger_chain, "trigger")
            .await
            .map_err(terminal_for)?
            .ok_or(RunState::Failed(FailureReason::TriggerNotFound))?;
        self.trigger_strategy = Some(trigger.name.clone());

        document.click(&trigger.css).await.map_err(terminal_for)
    }

    async fn await_readiness(
        &self,
        document: &dyn Document,
        settings: &AutomationSettings,
    ) -> Result<(), RunState> {
        ensure_alive(document)?;
        if document.ready_state().is_interactive() {
            return Ok(());
        }

        debug!("run {}: document still loading; waiting", self.id);
        match timeout(settings.readiness_timeout, document.wait_interactive()).await {
            Err(_) => return Err(RunState::Failed(FailureReason::ReadinessTimeout)),
            Ok(Err(e)) => return Err(terminal_for(e)),
            Ok(Ok(())) => {}
        }

        sleep(settings.post_ready_delay).await;
        ensure_alive(document)
    }

    /// Tries each strategy of `chain` in order; returns the first that matches.
    async fn locate<'c>(
        &self,
        document: &dyn Document,
        chain: &'c SelectorChain,
        role: &str,
    ) -> Result<Option<&'c SelectorStrategy>, DocumentError> {
        for strategy in chain.iter() {
            if !document.is_alive() {
                return Err(DocumentError::Destroyed);
            }
            let found = document.exists(&strategy.css).await?;
            debug!(
                "run {}: {role} strategy '{}' ({}) matched={found}",
                self.id, strategy.name, strategy.css
            );
            if found {
                return Ok(Some(strategy));
            }
        }
        Ok(None)
    }

    fn transition(&mut self, next: RunState) {
        debug!("run {}: {} -> {}", self.id, self.state().name(), next.name());
        self.history.push(next);
    }
}

fn ensure_alive(document: &dyn Document) -> Result<(), RunState> {
    if document.is_alive() {
        Ok(())
    } else {
        Err(RunState::Abandoned)
    }
}

fn terminal_for(err: DocumentError) -> RunState {
    match err {
        DocumentError::Destroyed => RunState::Abandoned,
        other => RunState::Failed(FailureReason::Document(other.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
