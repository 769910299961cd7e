//! Scan execution.

use super::cancel::CancellationToken;
use super::config::{EngineConfig, ScanRequest};
use super::result::ScanResult;
use super::state::ScanState;
use crate::core::comparator::DuplicateIndex;
use crate::core::hasher::{Fingerprint, FingerprintStrategy, StrategyConfig};
use crate::core::relocate::{RelocationExecutor, RelocationPolicy};
use crate::core::scanner::{DirectoryEnumerator, FileEnumerator};
use crate::error::{DedupError, FingerprintError};
use crate::events::{
    null_sender, ErrorEvent, Event, EventSender, FingerprintEvent, FingerprintProgress,
    PipelineEvent, ScanEvent,
};
use chrono::Utc;
use crossbeam_channel::Receiver;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

/// Builder for the scan engine
pub struct ScanEngineBuilder {
    config: EngineConfig,
    enumerator: Option<Arc<dyn FileEnumerator>>,
    strategy: Option<Arc<dyn FingerprintStrategy>>,
}

impl ScanEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            enumerator: None,
            strategy: None,
        }
    }

    /// Set the relocation policy
    pub fn policy(mut self, policy: RelocationPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Cap the number of fingerprinting workers
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = Some(threads);
        self
    }

    /// Grid size for the perceptual strategies
    pub fn hash_size(mut self, size: u32) -> Self {
        self.config.hash_size = size;
        self
    }

    /// Replace the directory enumerator
    pub fn enumerator(mut self, enumerator: Arc<dyn FileEnumerator>) -> Self {
        self.enumerator = Some(enumerator);
        self
    }

    /// Use `strategy` instead of building the one each request names
    pub fn strategy(mut self, strategy: Arc<dyn FingerprintStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn build(self) -> ScanEngine {
        ScanEngine {
            config: self.config,
            enumerator: self
                .enumerator
                .unwrap_or_else(|| Arc::new(DirectoryEnumerator::new())),
            strategy: self.strategy,
        }
    }
}

impl Default for ScanEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs scans. Holds no per-scan state; every run builds a fresh context.
pub struct ScanEngine {
    config: EngineConfig,
    enumerator: Arc<dyn FileEnumerator>,
    strategy: Option<Arc<dyn FingerprintStrategy>>,
}

impl ScanEngine {
    pub fn builder() -> ScanEngineBuilder {
        ScanEngineBuilder::new()
    }

    /// Run a scan to completion without events
    pub fn run(&self, request: &ScanRequest) -> Result<ScanResult, DedupError> {
        self.run_with_events(request, &null_sender(), &CancellationToken::new())
    }

    /// Run a scan on the calling thread, reporting through `events`
    pub fn run_with_events(
        &self,
        request: &ScanRequest,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<ScanResult, DedupError> {
        ScanRun {
            id: Uuid::new_v4(),
            engine: self,
            request,
            events,
            cancel,
            state: ScanState::Idle,
        }
        .execute()
    }
}

/// Scan-scoped context, discarded when the run ends
struct ScanRun<'a> {
    id: Uuid,
    engine: &'a ScanEngine,
    request: &'a ScanRequest,
    events: &'a EventSender,
    cancel: &'a CancellationToken,
    state: ScanState,
}

/// Fingerprinting output handed to relocation
struct FingerprintPass {
    index: DuplicateIndex,
    skipped: usize,
}

/// What a worker reports for one file
enum WorkerOutcome {
    Fingerprinted(Fingerprint),
    Failed(FingerprintError),
    Cancelled,
    Panicked(String),
}

impl ScanRun<'_> {
    fn execute(mut self) -> Result<ScanResult, DedupError> {
        let span = info_span!("scan", id = %self.id, strategy = %self.request.strategy);
        let _enter = span.enter();

        // Invalid requests never leave Idle
        if let Err(e) = self.request.validate() {
            warn!(error = %e, "Rejected scan request");
            self.events
                .send(Event::Error(ErrorEvent::fatal(e.kind(), e.to_string())));
            return Err(e);
        }

        self.events
            .send(Event::Pipeline(PipelineEvent::Started { scan_id: self.id }));
        info!(
            source = %self.request.source.display(),
            destination = %self.request.destination.display(),
            "Scan started"
        );

        let result = self.run_phases();

        if let Err(e) = &result {
            let _ = self.transition(ScanState::Aborted);
            match e {
                DedupError::Cancelled => info!("Scan cancelled, nothing was moved"),
                other => error!(error = %other, "Scan aborted"),
            }
            self.events
                .send(Event::Error(ErrorEvent::fatal(e.kind(), e.to_string())));
            self.events.send(Event::Pipeline(PipelineEvent::Aborted {
                reason: e.to_string(),
            }));
        }

        result
    }

    fn run_phases(&mut self) -> Result<ScanResult, DedupError> {
        let started_at = Utc::now();
        let start = Instant::now();
        let scan_id = self.id;
        let strategy_kind = self.request.strategy;
        let policy = self.engine.config.policy;

        // Phase 1: Enumerating
        self.transition(ScanState::Enumerating)?;
        self.events.send(Event::Scan(ScanEvent::Started {
            directory: self.request.source.clone(),
        }));

        let files = self.engine.enumerator.enumerate(&self.request.source)?;
        let total_files = files.len();

        self.events
            .send(Event::Scan(ScanEvent::Completed { total_files }));
        info!(files = total_files, "Enumerated source folder");

        let empty_result = move |elapsed| ScanResult {
            scan_id,
            strategy: strategy_kind,
            policy,
            total_files_scanned: 0,
            duplicate_groups_found: 0,
            files_moved: 0,
            files_skipped: 0,
            relocation_failures: 0,
            moved: Vec::new(),
            started_at,
            elapsed,
        };

        if files.is_empty() {
            let result = empty_result(start.elapsed());
            return self.complete(result);
        }

        // Phase 2: Fingerprinting
        self.transition(ScanState::Fingerprinting)?;

        let strategy: Arc<dyn FingerprintStrategy> = match &self.engine.strategy {
            Some(strategy) => strategy.clone(),
            None => Arc::from(
                StrategyConfig::new()
                    .kind(strategy_kind)
                    .hash_size(self.engine.config.hash_size)
                    .build(),
            ),
        };

        let pass = self.fingerprint_all(&files, strategy.as_ref())?;

        // A cancel that lands after the last file is still honoured here
        if self.cancel.is_cancelled() {
            return Err(DedupError::Cancelled);
        }

        // Phase 3: Relocating
        self.transition(ScanState::Relocating)?;

        let summary = RelocationExecutor::new(policy).relocate(
            &pass.index,
            &self.request.destination,
            self.events,
        );

        let result = ScanResult {
            total_files_scanned: total_files,
            duplicate_groups_found: summary.duplicate_groups_found,
            files_moved: summary.files_moved,
            files_skipped: pass.skipped,
            relocation_failures: summary.failures.len(),
            moved: summary.moved,
            ..empty_result(start.elapsed())
        };

        self.complete(result)
    }

    fn complete(&mut self, result: ScanResult) -> Result<ScanResult, DedupError> {
        self.transition(ScanState::Completed)?;
        info!(
            files = result.total_files_scanned,
            groups = result.duplicate_groups_found,
            moved = result.files_moved,
            elapsed = %result.elapsed_display(),
            "{}",
            result.outcome()
        );
        self.events.send(Event::Pipeline(PipelineEvent::Completed {
            result: result.clone(),
        }));
        Ok(result)
    }

    fn transition(&mut self, next: ScanState) -> Result<(), DedupError> {
        if !self.state.can_transition_to(next) {
            return Err(DedupError::Internal(format!(
                "illegal state transition {} -> {}",
                self.state, next
            )));
        }
        debug!(from = %self.state, to = %next, "State changed");
        self.state = next;
        self.events
            .send(Event::Pipeline(PipelineEvent::PhaseChanged { phase: next }));
        Ok(())
    }

    /// Fingerprint every file on a bounded worker pool.
    ///
    /// Workers only compute; this thread is the single writer of the index
    /// and inserts in enumeration order through a reorder buffer.
    fn fingerprint_all(
        &self,
        files: &[PathBuf],
        strategy: &dyn FingerprintStrategy,
    ) -> Result<FingerprintPass, DedupError> {
        let threads = self.engine.config.effective_threads();

        self.events.send(Event::Fingerprint(FingerprintEvent::Started {
            total_files: files.len(),
            strategy: strategy.kind(),
        }));
        debug!(threads, "Starting fingerprint workers");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fingerprint-{}", i))
            .build()
            .map_err(|e| DedupError::Internal(format!("failed to start workers: {}", e)))?;

        let cancel = self.cancel;
        let halt = AtomicBool::new(false);
        let halt = &halt;
        let (tx, rx) = crossbeam_channel::unbounded::<(usize, WorkerOutcome)>();

        let pass = pool.in_place_scope(|scope| {
            for (position, path) in files.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = fingerprint_one(strategy, path, cancel, halt);
                    let _ = tx.send((position, outcome));
                });
            }
            // The receiver drains until the last worker drops its sender
            drop(tx);
            self.collect(files, &rx, halt)
        })?;

        self.events.send(Event::Fingerprint(FingerprintEvent::Completed {
            fingerprinted: pass.index.len(),
            skipped: pass.skipped,
        }));

        Ok(pass)
    }

    fn collect(
        &self,
        files: &[PathBuf],
        rx: &Receiver<(usize, WorkerOutcome)>,
        halt: &AtomicBool,
    ) -> Result<FingerprintPass, DedupError> {
        let total = files.len();
        let mut index = DuplicateIndex::new();
        let mut pending: BTreeMap<usize, Option<Fingerprint>> = BTreeMap::new();
        let mut next_position = 0;
        let mut completed = 0;
        let mut skipped = 0;
        let mut cancelled = 0;
        let mut internal_failure: Option<String> = None;

        for (position, outcome) in rx.iter() {
            let path = &files[position];

            let fingerprint = match outcome {
                WorkerOutcome::Fingerprinted(fingerprint) => {
                    debug!(path = %path.display(), %fingerprint, "Fingerprinted");
                    Some(fingerprint)
                }
                WorkerOutcome::Failed(e) => {
                    skipped += 1;
                    warn!(path = %path.display(), error = %e, "Skipping file");
                    self.events.send(Event::Error(ErrorEvent::for_file(
                        path.clone(),
                        e.kind(),
                        e.to_string(),
                    )));
                    None
                }
                WorkerOutcome::Cancelled => {
                    cancelled += 1;
                    continue;
                }
                WorkerOutcome::Panicked(message) => {
                    if internal_failure.is_none() {
                        internal_failure = Some(format!(
                            "fingerprinting {} panicked: {}",
                            path.display(),
                            message
                        ));
                        halt.store(true, Ordering::SeqCst);
                    }
                    None
                }
            };

            completed += 1;
            pending.insert(position, fingerprint);

            while let Some(entry) = pending.remove(&next_position) {
                if let Some(fingerprint) = entry {
                    index.insert(fingerprint, files[next_position].clone());
                }
                next_position += 1;
            }

            self.events
                .send(Event::Fingerprint(FingerprintEvent::Progress(
                    FingerprintProgress::new(completed, total, path.clone()),
                )));
        }

        if let Some(message) = internal_failure {
            return Err(DedupError::Internal(message));
        }
        if cancelled > 0 {
            return Err(DedupError::Cancelled);
        }
        if completed != total || next_position != total {
            return Err(DedupError::Internal(format!(
                "only {} of {} files reported back from workers",
                completed, total
            )));
        }

        Ok(FingerprintPass { index, skipped })
    }
}

fn fingerprint_one(
    strategy: &dyn FingerprintStrategy,
    path: &Path,
    cancel: &CancellationToken,
    halt: &AtomicBool,
) -> WorkerOutcome {
    if cancel.is_cancelled() || halt.load(Ordering::SeqCst) {
        return WorkerOutcome::Cancelled;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| strategy.fingerprint(path))) {
        Ok(Ok(fingerprint)) => WorkerOutcome::Fingerprinted(fingerprint),
        Ok(Err(e)) => WorkerOutcome::Failed(e),
        Err(payload) => WorkerOutcome::Panicked(panic_message(payload.as_ref())),
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
