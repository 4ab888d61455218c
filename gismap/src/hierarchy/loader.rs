use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Hierarchy, HierarchyClient};
use crate::async_runtime;

/// State of the hierarchy loading.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Request is in progress.
    Loading,
    /// Hierarchy is loaded.
    Loaded(Arc<Hierarchy>),
    /// Request failed with the given message.
    Failed(String),
}

/// Receives a notification when the hierarchy loading is finished.
///
/// Implemented for closures, so an UI can pass something like
/// `move || ctx.request_repaint()`.
pub trait UpdateNotifier: Send + Sync {
    /// Called after the load state changed.
    fn notify(&self);
}

impl<T: Fn() + Send + Sync> UpdateNotifier for T {
    fn notify(&self) {
        self()
    }
}

/// Loads the hierarchy in the background.
///
/// The request is spawned on the async runtime, the result is stored in a shared [`LoadState`]
/// that the UI can poll every frame. Only the result of the latest request is stored: a response
/// to a request started before the last [`HierarchyLoader::start`] call is dropped.
pub struct HierarchyLoader {
    client: HierarchyClient,
    state: Arc<Mutex<LoadState>>,
    generation: Arc<AtomicU64>,
    notifier: Arc<dyn UpdateNotifier>,
}

impl HierarchyLoader {
    /// Creates a loader. Nothing is requested until [`HierarchyLoader::start`] is called.
    pub fn new(client: HierarchyClient, notifier: impl UpdateNotifier + 'static) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(LoadState::Loading)),
            generation: Arc::new(AtomicU64::new(0)),
            notifier: Arc::new(notifier),
        }
    }

    /// Starts loading the hierarchy.
    pub fn start(&self) {
        let generation = {
            let mut state = self.state.lock();
            *state = LoadState::Loading;
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };

        let client = self.client.clone();
        let state = self.state.clone();
        let current_generation = self.generation.clone();
        let notifier = self.notifier.clone();

        async_runtime::spawn(async move {
            let new_state = match client.fetch().await {
                Ok(response) => LoadState::Loaded(Arc::new(Hierarchy::new(response))),
                Err(err) => {
                    log::error!("Error fetching hierarchy data: {err}");
                    LoadState::Failed(err.to_string())
                }
            };

            {
                let mut state = state.lock();
                if current_generation.load(Ordering::Acquire) != generation {
                    log::debug!("Dropping hierarchy response of an outdated request");
                    return;
                }
                *state = new_state;
            }

            notifier.notify();
        });
    }

    /// Starts loading again, discarding the previous result.
    pub fn retry(&self) {
        log::info!("Retrying hierarchy request");
        self.start();
    }

    /// Current load state.
    pub fn state(&self) -> LoadState {
        self.state.lock().clone()
    }

    /// Loaded hierarchy, if available.
    pub fn hierarchy(&self) -> Option<Arc<Hierarchy>> {
        match &*self.state.lock() {
            LoadState::Loaded(hierarchy) => Some(hierarchy.clone()),
            _ => None,
        }
    }

    /// Returns true while the request is in progress.
    pub fn is_loading(&self) -> bool {
        matches!(*self.state.lock(), LoadState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::hierarchy::tests::{refused_url, CannedResponse, TestServer, DOCUMENT};

    fn loader_with_channel(url: &str) -> (HierarchyLoader, mpsc::Receiver<()>) {
        let client = HierarchyClient::with_url(url).expect("failed to create client");
        let (sender, receiver) = mpsc::channel();
        let sender = Mutex::new(sender);
        let loader = HierarchyLoader::new(client, move || {
            let _ = sender.lock().send(());
        });

        (loader, receiver)
    }

    #[test]
    fn loads_hierarchy_and_notifies() {
        let server = TestServer::start(vec![CannedResponse::new(200, DOCUMENT)]);
        let (loader, notifications) = loader_with_channel(server.url());

        loader.start();
        notifications
            .recv_timeout(Duration::from_secs(10))
            .expect("loader did not finish");

        assert_matches!(
            loader.state(),
            LoadState::Loaded(hierarchy) if hierarchy.states().len() == 2
        );
        let hierarchy = loader.hierarchy().expect("hierarchy is not loaded");
        assert!(hierarchy.find_state("telangana").is_some());
        assert!(!loader.is_loading());
    }

    #[test]
    fn failed_request_reports_error_and_notifies() {
        let (loader, notifications) = loader_with_channel(&refused_url());

        assert!(loader.is_loading());
        loader.start();

        notifications
            .recv_timeout(Duration::from_secs(10))
            .expect("loader did not finish");
        assert_matches!(loader.state(), LoadState::Failed(_));
        assert!(loader.hierarchy().is_none());
        assert!(!loader.is_loading());
    }

    #[test]
    fn retry_after_server_error_loads_hierarchy() {
        let server = TestServer::start(vec![
            CannedResponse::new(503, "{}"),
            CannedResponse::new(200, DOCUMENT),
        ]);
        let (loader, notifications) = loader_with_channel(server.url());

        loader.start();
        notifications
            .recv_timeout(Duration::from_secs(10))
            .expect("loader did not finish");
        assert_matches!(loader.state(), LoadState::Failed(message) if message.contains("503"));

        loader.retry();
        notifications
            .recv_timeout(Duration::from_secs(10))
            .expect("loader did not finish");
        assert_matches!(loader.state(), LoadState::Loaded(_));
    }

    #[test]
    fn outdated_response_does_not_overwrite_newer_one() {
        let server = TestServer::start(vec![
            CannedResponse::new(500, "{}").delayed(Duration::from_millis(500)),
            CannedResponse::new(200, DOCUMENT),
        ]);
        let (loader, notifications) = loader_with_channel(server.url());

        loader.start();
        assert_eq!(server.wait_for_request(), 0);
        loader.start();

        notifications
            .recv_timeout(Duration::from_secs(10))
            .expect("loader did not finish");
        assert_matches!(loader.state(), LoadState::Loaded(_));

        // The slow first response arrives after the second one and must be dropped.
        assert!(notifications.recv_timeout(Duration::from_secs(2)).is_err());
        assert_matches!(loader.state(), LoadState::Loaded(_));
    }
}
