//! The model loading state machine.
//!
//! `ModelLoader` owns a background tokio runtime and dispatches the
//! fetch/retry/parse pipeline onto it; the render loop calls `poll()`
//! once per frame to pick up the result without blocking. No more than
//! one request is ever in flight.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use asset::mesh::MeshData;
use asset::{normalize, obj, primitive};

use crate::error::LoadError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::retry::{RetryPolicy, fetch_with_retry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

/// Where the delivered mesh came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelSource {
    Remote,
    Fallback,
}

#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub mesh: MeshData,
    pub source: ModelSource,
}

pub struct ModelLoader {
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<dyn Fetch>,
    policy: RetryPolicy,
    state: LoadState,
    pending: Option<Receiver<Result<MeshData, LoadError>>>,
}

impl ModelLoader {
    pub fn new() -> Result<Self, LoadError> {
        Self::with_fetcher(Arc::new(HttpFetcher::new()?), RetryPolicy::default())
    }

    /// Build a loader over an arbitrary fetch capability; how tests drive
    /// the state machine without a network.
    pub fn with_fetcher(fetcher: Arc<dyn Fetch>, policy: RetryPolicy) -> Result<Self, LoadError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| LoadError::Network(format!("failed to create runtime: {e}")))?;
        Ok(Self {
            runtime,
            fetcher,
            policy,
            state: LoadState::Idle,
            pending: None,
        })
    }

    #[inline]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Start loading `url`. A call while a request is in flight is a
    /// no-op; calls after success or failure start a fresh request.
    pub fn load(&mut self, url: &str) {
        if self.state == LoadState::Requesting {
            log::debug!("load already in flight; ignoring request for {url}");
            return;
        }
        log::info!("loading model from {url}");

        let (tx, rx) = mpsc::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let policy = self.policy.clone();
        let url = url.to_owned();
        self.runtime.spawn(async move {
            let result = fetch_and_prepare(&*fetcher, &url, &policy).await;
            let _ = tx.send(result);
        });

        self.state = LoadState::Requesting;
        self.pending = Some(rx);
    }

    /// Non-blocking completion check, called once per frame. Returns a
    /// displayable model exactly once per load: the remote mesh on
    /// success, the fallback cube on failure.
    pub fn poll(&mut self) -> Option<LoadedModel> {
        let rx = self.pending.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Err(LoadError::Network("load task dropped its channel".into()))
            }
        };
        self.pending = None;

        match outcome {
            Ok(mesh) => {
                log::info!("model loaded: {} triangles", mesh.triangle_count());
                self.state = LoadState::Succeeded;
                Some(LoadedModel {
                    mesh,
                    source: ModelSource::Remote,
                })
            }
            Err(err) => {
                log::warn!("model load failed ({err}); delivering fallback cube");
                self.state = LoadState::Failed;
                Some(LoadedModel {
                    mesh: primitive::fallback_cube(),
                    source: ModelSource::Fallback,
                })
            }
        }
    }
}

async fn fetch_and_prepare(
    fetcher: &dyn Fetch,
    url: &str,
    policy: &RetryPolicy,
) -> Result<MeshData, LoadError> {
    let body = fetch_with_retry(fetcher, url, policy).await?;
    let mut mesh = obj::parse_str(&body)?;
    normalize::normalize(&mut mesh);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::fetch::{FetchFuture, FetchResponse};

    struct ScriptedFetch {
        outcomes: Mutex<VecDeque<Result<FetchResponse, LoadError>>>,
        calls: AtomicU32,
        stall: Option<Duration>,
    }

    impl ScriptedFetch {
        fn new(outcomes: Vec<Result<FetchResponse, LoadError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicU32::new(0),
                stall: None,
            })
        }

        /// A fetch that never completes within the test: for checking the
        /// single-in-flight guarantee.
        fn stalled() -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(VecDeque::new()),
                calls: AtomicU32::new(0),
                stall: Some(Duration::from_secs(3600)),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetch for ScriptedFetch {
        fn get(&self, _url: &str) -> FetchFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let stall = self.stall;
            let next = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LoadError::Offline));
            Box::pin(async move {
                if let Some(d) = stall {
                    tokio::time::sleep(d).await;
                }
                next
            })
        }
    }

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    fn ok(status: u16, body: &str) -> Result<FetchResponse, LoadError> {
        Ok(FetchResponse {
            status,
            body: body.to_owned(),
        })
    }

    /// Poll until the loader settles, with a generous deadline.
    fn drain(loader: &mut ModelLoader) -> LoadedModel {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(model) = loader.poll() {
                return model;
            }
            assert!(Instant::now() < deadline, "loader never completed");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn successful_load_delivers_normalized_remote_mesh() {
        let fetch = ScriptedFetch::new(vec![ok(200, TRIANGLE_OBJ)]);
        let mut loader = ModelLoader::with_fetcher(fetch.clone(), instant_policy()).unwrap();
        assert_eq!(loader.state(), LoadState::Idle);

        loader.load("http://example/model.obj");
        assert_eq!(loader.state(), LoadState::Requesting);

        let model = drain(&mut loader);
        assert_eq!(loader.state(), LoadState::Succeeded);
        assert_eq!(model.source, ModelSource::Remote);
        assert_eq!(model.mesh.triangle_count(), 1);
        // Normalization ran: longest axis equals the reference size.
        let (min, max) = model.mesh.bounds().unwrap();
        let extent = (max[0] - min[0]).max(max[1] - min[1]).max(max[2] - min[2]);
        assert!((extent - asset::normalize::REFERENCE_SIZE).abs() < 1e-5);
        assert!(model.mesh.normals.is_some());
    }

    #[test]
    fn three_transport_failures_fail_once_with_one_fallback() {
        let fetch = ScriptedFetch::new(vec![
            Err(LoadError::Timeout),
            Err(LoadError::Offline),
            Err(LoadError::Timeout),
        ]);
        let mut loader = ModelLoader::with_fetcher(fetch.clone(), instant_policy()).unwrap();
        loader.load("http://example/model.obj");

        let model = drain(&mut loader);
        assert_eq!(loader.state(), LoadState::Failed);
        assert_eq!(model.source, ModelSource::Fallback);
        assert_eq!(fetch.calls(), 3);
        // Exactly one fallback delivery; the loader then stays settled.
        assert!(loader.poll().is_none());
        assert_eq!(loader.state(), LoadState::Failed);
    }

    #[test]
    fn http_404_fails_without_retrying() {
        let fetch = ScriptedFetch::new(vec![ok(404, "")]);
        let mut loader = ModelLoader::with_fetcher(fetch.clone(), instant_policy()).unwrap();
        loader.load("http://example/missing.obj");

        let model = drain(&mut loader);
        assert_eq!(loader.state(), LoadState::Failed);
        assert_eq!(model.source, ModelSource::Fallback);
        assert_eq!(fetch.calls(), 1);
    }

    #[test]
    fn empty_mesh_body_falls_back() {
        let fetch = ScriptedFetch::new(vec![ok(200, "# nothing here\n")]);
        let mut loader = ModelLoader::with_fetcher(fetch.clone(), instant_policy()).unwrap();
        loader.load("http://example/empty.obj");

        let model = drain(&mut loader);
        assert_eq!(loader.state(), LoadState::Failed);
        assert_eq!(model.source, ModelSource::Fallback);
        assert!(model.mesh.is_valid());
    }

    #[test]
    fn load_while_requesting_makes_no_additional_network_calls() {
        let fetch = ScriptedFetch::stalled();
        let mut loader = ModelLoader::with_fetcher(fetch.clone(), instant_policy()).unwrap();

        loader.load("http://example/model.obj");
        std::thread::sleep(Duration::from_millis(20));
        loader.load("http://example/model.obj");
        loader.load("http://example/other.obj");
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(fetch.calls(), 1);
        assert_eq!(loader.state(), LoadState::Requesting);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn reload_after_failure_starts_a_fresh_request() {
        let fetch = ScriptedFetch::new(vec![ok(500, ""), ok(200, TRIANGLE_OBJ)]);
        let mut loader = ModelLoader::with_fetcher(fetch.clone(), instant_policy()).unwrap();

        loader.load("http://example/model.obj");
        let first = drain(&mut loader);
        assert_eq!(first.source, ModelSource::Fallback);

        loader.load("http://example/model.obj");
        assert_eq!(loader.state(), LoadState::Requesting);
        let second = drain(&mut loader);
        assert_eq!(second.source, ModelSource::Remote);
        assert_eq!(loader.state(), LoadState::Succeeded);
        assert_eq!(fetch.calls(), 2);
    }
}
