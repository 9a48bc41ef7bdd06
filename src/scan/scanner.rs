use crate::config::effective_workers;
use crate::error::{Result, SearchError};
use crate::query::ValidatedQuery;
use crate::scan::WordMatcher;
use crate::store::{FileRef, FileStore};
use crate::utils::TextFilter;
use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Capacity of the queue feeding paths to the workers
const WORK_QUEUE_CAPACITY: usize = 2;

/// Result of checking one dispatched file
#[derive(Debug)]
pub struct ScanOutcome {
    pub file: FileRef,
    pub found: bool,
    pub error: Option<SearchError>,
}

/// Brute-force full-text scanner backed by a fixed worker pool.
///
/// The pool is created once and reused for every scan. Each scan starts one
/// long-lived loop per worker thread that pulls paths from a bounded queue.
/// The first file error raises a cancellation flag: dispatch stops, idle
/// workers skip what is left in the queue, and `scan` returns that error once
/// the in-flight files are done.
pub struct Scanner {
    pool: ThreadPool,
    workers: usize,
    filter: TextFilter,
}

impl Scanner {
    /// `workers == 0` uses one worker per CPU core
    pub fn new(workers: usize, filter: TextFilter) -> Result<Self> {
        let workers = effective_workers(workers);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("scan-worker-{i}"))
            .build()?;
        Ok(Self {
            pool,
            workers,
            filter,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn filter(&self) -> &TextFilter {
        &self.filter
    }

    /// Refs of every file in `files` containing `query` as a whole word.
    /// Order follows worker completion and is not stable.
    pub fn scan(
        &self,
        store: &dyn FileStore,
        query: &ValidatedQuery,
        files: &[String],
    ) -> Result<Vec<FileRef>> {
        let matcher = WordMatcher::new(query)?;
        let filter = &self.filter;
        let cancelled = AtomicBool::new(false);

        let (work_tx, work_rx) = bounded::<&str>(WORK_QUEUE_CAPACITY);
        let (out_tx, out_rx) = bounded::<ScanOutcome>(files.len().max(1));

        self.pool.in_place_scope(|s| {
            for _ in 0..self.workers {
                let work_rx = work_rx.clone();
                let out_tx = out_tx.clone();
                let matcher = &matcher;
                let cancelled = &cancelled;
                s.spawn(move |_| run_worker(store, matcher, filter, work_rx, out_tx, cancelled));
            }
            drop(work_rx);
            drop(out_tx);

            let mut dispatched = 0;
            for path in files {
                if cancelled.load(Ordering::Relaxed) || work_tx.send(path.as_str()).is_err() {
                    break;
                }
                dispatched += 1;
            }
            drop(work_tx);

            debug!(query = %query, dispatched, workers = self.workers, "scan dispatched");
            collect(&out_rx, dispatched, &cancelled)
        })
    }
}

fn run_worker(
    store: &dyn FileStore,
    matcher: &WordMatcher,
    filter: &TextFilter,
    work: Receiver<&str>,
    out: Sender<ScanOutcome>,
    cancelled: &AtomicBool,
) {
    for path in work.iter() {
        if cancelled.load(Ordering::Relaxed) {
            continue;
        }

        let file = FileRef::from_path(path);
        let outcome = match check_file(store, matcher, filter, path) {
            Ok(found) => ScanOutcome {
                file,
                found,
                error: None,
            },
            Err(e) => {
                cancelled.store(true, Ordering::Relaxed);
                ScanOutcome {
                    file,
                    found: false,
                    error: Some(SearchError::io(path, e)),
                }
            }
        };

        if out.send(outcome).is_err() {
            break;
        }
    }
}

fn check_file(
    store: &dyn FileStore,
    matcher: &WordMatcher,
    filter: &TextFilter,
    path: &str,
) -> io::Result<bool> {
    let reader = store.open(path)?;
    matcher.matches_reader(reader, filter)
}

/// Drain `expected` outcomes, returning the first error seen.
///
/// Files are only skipped after an error outcome has been queued, so the
/// error is always reached before the channel runs dry.
fn collect(
    out: &Receiver<ScanOutcome>,
    expected: usize,
    cancelled: &AtomicBool,
) -> Result<Vec<FileRef>> {
    let mut files = Vec::new();
    for _ in 0..expected {
        let Ok(outcome) = out.recv() else {
            break;
        };
        if let Some(err) = outcome.error {
            cancelled.store(true, Ordering::Relaxed);
            return Err(err);
        }
        if outcome.found {
            files.push(outcome.file);
        }
    }
    Ok(files)
}
