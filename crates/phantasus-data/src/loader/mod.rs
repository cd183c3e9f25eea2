//! Asynchronous GEO dataset loader.
//!
//! ```text
//!  identifier ──► Accession ──► DatasetSource::fetch ──► Vec<SeriesFile>
//!                                   (Fetching)               │
//!                                                            ▼
//!  callback ◄── Vec<Matrix> ◄── assemble ◄── parse_series_matrix
//!  (Completed | Failed)              (Parsing, blocking pool)
//! ```
//!
//! `GeoReader::load` is the future-returning form. `GeoReader::read` spawns
//! the same work on the Tokio runtime and reports through a callback that
//! runs exactly once, unless the returned handle was cancelled first.
//! Nothing is retried.
pub mod accession;
pub mod assemble;
pub mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

pub use accession::Accession;
pub use assemble::assemble;
pub use source::{DatasetSource, HttpSource, SeriesFile};

use crate::config::LoaderConfig;
use crate::error::{FetchError, LoadError};
use crate::io::parse_series_matrix;
use crate::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Fetching,
    Parsing,
    Completed,
    Failed,
}

impl LoadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Completed | LoadState::Failed)
    }
}

pub struct GeoReader<S = HttpSource> {
    source: Arc<S>,
}

impl GeoReader<HttpSource> {
    pub fn new(config: &LoaderConfig) -> Result<Self, FetchError> {
        Ok(Self::with_source(HttpSource::new(config)?))
    }
}

impl<S> GeoReader<S>
where
    S: DatasetSource + 'static,
{
    pub fn with_source(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn load(&self, identifier: &str) -> Result<Vec<Matrix>, LoadError> {
        let result = run_stages(self.source.as_ref(), identifier, None).await;
        finish(identifier, &result);
        result
    }

    /// Start loading `identifier` in the background and hand the outcome to
    /// `callback`. Must be called from within a Tokio runtime.
    pub fn read<F>(&self, identifier: impl Into<String>, callback: F) -> ReadHandle
    where
        F: FnOnce(Result<Vec<Matrix>, LoadError>) + Send + 'static,
    {
        let identifier = identifier.into();
        let source = Arc::clone(&self.source);
        let (state_tx, state_rx) = watch::channel(LoadState::Idle);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            let result = run_stages(source.as_ref(), &identifier, Some(&state_tx)).await;
            state_tx.send_replace(finish(&identifier, &result));
            // a cancel racing with completion may land on either side of this load
            if flag.load(Ordering::Acquire) {
                debug!("{identifier}: read cancelled, dropping result");
            } else {
                callback(result);
            }
        });

        ReadHandle {
            state: state_rx,
            cancelled,
            task,
        }
    }
}

/// Handle to a background `read`.
pub struct ReadHandle {
    state: watch::Receiver<LoadState>,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ReadHandle {
    pub fn state(&self) -> LoadState {
        *self.state.borrow()
    }

    /// Ask for the callback to be dropped. It is honoured when it lands
    /// before the task checks for it, right after the terminal state is
    /// published and before the callback would run. In-flight network I/O
    /// is left to complete.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Wait until the load reaches `Completed` or `Failed`.
    pub async fn finished(&mut self) -> LoadState {
        match self.state.wait_for(|s| s.is_terminal()).await {
            Ok(state) => *state,
            // sender gone without a terminal state: the task panicked
            Err(_) => LoadState::Failed,
        }
    }

    /// Wait for the background task, including the callback, to return.
    pub async fn join(self) -> Result<(), JoinError> {
        self.task.await
    }
}

async fn run_stages<S>(
    source: &S,
    identifier: &str,
    state: Option<&watch::Sender<LoadState>>,
) -> Result<Vec<Matrix>, LoadError>
where
    S: DatasetSource + ?Sized,
{
    let publish = |next: LoadState| {
        if let Some(tx) = state {
            tx.send_replace(next);
        }
    };

    publish(LoadState::Fetching);
    debug!("{identifier}: fetching");
    let accession: Accession = identifier.parse()?;
    let files = source.fetch(&accession).await?;

    publish(LoadState::Parsing);
    debug!("{identifier}: parsing {} file(s)", files.len());
    let mut matrices = tokio::task::spawn_blocking(move || build_matrices(files)).await??;
    matrices.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(matrices)
}

fn build_matrices(files: Vec<SeriesFile>) -> Result<Vec<Matrix>, LoadError> {
    files
        .into_iter()
        .map(|file| {
            let table = parse_series_matrix(&file.name, &file.bytes)?;
            assemble(table).map_err(|source| LoadError::Assemble {
                name: file.name,
                source,
            })
        })
        .collect()
}

/// Log the outcome and return the matching terminal state.
fn finish(identifier: &str, result: &Result<Vec<Matrix>, LoadError>) -> LoadState {
    match result {
        Ok(matrices) => {
            for m in matrices {
                info!(
                    "{identifier}: loaded {} ({} rows x {} columns)",
                    m.name(),
                    m.row_count(),
                    m.column_count()
                );
            }
            LoadState::Completed
        }
        Err(e) => {
            warn!("{identifier}: {} stage failed: {e}", e.stage());
            LoadState::Failed
        }
    }
}
