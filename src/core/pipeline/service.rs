//! Single-flight background scans.

use super::cancel::CancellationToken;
use super::config::ScanRequest;
use super::executor::{panic_message, ScanEngine};
use super::result::ScanResult;
use crate::error::DedupError;
use crate::events::EventSender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Runs at most one scan at a time on a background thread.
///
/// A request submitted while another scan is active is rejected with
/// [`DedupError::ScanInProgress`]; it is never queued.
pub struct ScanService {
    engine: Arc<ScanEngine>,
    busy: Arc<AtomicBool>,
    last_result: Arc<Mutex<Option<ScanResult>>>,
}

impl ScanService {
    pub fn new(engine: ScanEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            busy: Arc::new(AtomicBool::new(false)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a scan is currently running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Result of the most recent completed scan
    pub fn last_result(&self) -> Option<ScanResult> {
        self.last_result.lock().ok().and_then(|last| last.clone())
    }

    /// Start a scan in the background
    pub fn submit(
        &self,
        request: ScanRequest,
        events: EventSender,
    ) -> Result<ScanHandle, DedupError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(source = %request.source.display(), "Rejected scan, another one is running");
            return Err(DedupError::ScanInProgress);
        }

        let guard = BusyGuard(self.busy.clone());
        let engine = self.engine.clone();
        let last_result = self.last_result.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let thread = thread::Builder::new()
            .name("scan".to_string())
            .spawn(move || {
                let _guard = guard;
                let result = engine.run_with_events(&request, &events, &token);
                if let (Ok(result), Ok(mut last)) = (&result, last_result.lock()) {
                    *last = Some(result.clone());
                }
                result
            })
            .map_err(|e| DedupError::Internal(format!("failed to start scan thread: {}", e)))?;

        info!("Scan submitted");
        Ok(ScanHandle { cancel, thread })
    }
}

/// Clears the busy flag when the scan thread ends, however it ends
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a running scan
pub struct ScanHandle {
    cancel: CancellationToken,
    thread: JoinHandle<Result<ScanResult, DedupError>>,
}

impl ScanHandle {
    /// Request cancellation; the scan aborts at its next check
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the scan to end
    pub fn join(self) -> Result<ScanResult, DedupError> {
        self.thread
            .join()
            .map_err(|payload| DedupError::Internal(panic_message(payload.as_ref())))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::StrategyKind;
    use crate::core::scanner::FileEnumerator;
    use crate::error::ScanError;
    use crate::events::null_sender;
    use crossbeam_channel::{bounded, Receiver};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Enumerator that waits for a signal before listing nothing
    struct GatedEnumerator(Receiver<()>);

    impl FileEnumerator for GatedEnumerator {
        fn enumerate(&self, _directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
            let _ = self.0.recv();
            Ok(Vec::new())
        }
    }

    #[test]
    fn second_submission_is_rejected_while_busy() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let (release, gate) = bounded(1);

        let engine = ScanEngine::builder()
            .enumerator(Arc::new(GatedEnumerator(gate)))
            .build();
        let service = ScanService::new(engine);
        let request = ScanRequest::new(src.path(), dest.path(), StrategyKind::Exact);

        let handle = service.submit(request.clone(), null_sender()).unwrap();
        assert!(service.is_busy());

        let second = service.submit(request.clone(), null_sender());
        assert!(matches!(second, Err(DedupError::ScanInProgress)));

        release.send(()).unwrap();
        let result = handle.join().unwrap();
        assert_eq!(result.total_files_scanned, 0);
        assert!(!service.is_busy());

        // Free again once the first scan has ended
        release.send(()).unwrap();
        let third = service.submit(request, null_sender()).unwrap();
        assert!(third.join().is_ok());
    }

    #[test]
    fn cancelled_background_scan_leaves_files() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(src.path().join("a.png"), b"same").unwrap();
        fs::write(src.path().join("b.png"), b"same").unwrap();
        let (release, gate) = bounded::<()>(1);

        struct GatedListing(Receiver<()>, Vec<PathBuf>);
        impl FileEnumerator for GatedListing {
            fn enumerate(&self, _directory: &Path) -> Result<Vec<PathBuf>, ScanError> {
                let _ = self.0.recv();
                Ok(self.1.clone())
            }
        }

        let files = vec![src.path().join("a.png"), src.path().join("b.png")];
        let engine = ScanEngine::builder()
            .enumerator(Arc::new(GatedListing(gate, files)))
            .build();
        let service = ScanService::new(engine);
        let handle = service
            .submit(
                ScanRequest::new(src.path(), dest.path(), StrategyKind::Exact),
                null_sender(),
            )
            .unwrap();

        handle.cancel();
        release.send(()).unwrap();

        assert!(matches!(handle.join(), Err(DedupError::Cancelled)));
        assert!(src.path().join("a.png").exists());
        assert!(src.path().join("b.png").exists());
        assert!(service.last_result().is_none());
    }

    #[test]
    fn completed_scan_is_remembered() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let service = ScanService::new(ScanEngine::builder().build());

        let handle = service
            .submit(
                ScanRequest::new(src.path(), dest.path(), StrategyKind::Exact),
                null_sender(),
            )
            .unwrap();
        let result = handle.join().unwrap();

        assert_eq!(service.last_result().map(|r| r.scan_id), Some(result.scan_id));
    }
}
