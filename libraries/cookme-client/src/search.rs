//! Debounced search.
//!
//! Every keystroke or filter change cancels the pending search and schedules
//! a new one with the latest query. Only a query left untouched for the
//! debounce delay reaches the server.

use crate::error::Result;
use crate::lists::{ListCaches, SearchQuery};
use cookme_core::Category;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// A spawned task that can be cancelled. Dropping it cancels it too.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `task` after `delay`. Must be called inside a tokio runtime.
    pub fn after<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Runs an action with the latest value once calls stop for `delay`.
///
/// A new call aborts the previous one whether it is still waiting or
/// already running.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Mutex<Option<ScheduledTask>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(move |value| -> BoxFuture<'static, ()> { Box::pin(action(value)) }),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the action with `value`, replacing any pending run.
    pub fn call(&self, value: T) {
        let action = Arc::clone(&self.action);
        let task = ScheduledTask::after(self.delay, async move { action(value).await });

        if let Some(previous) = self.lock().replace(task) {
            previous.cancel();
        }
    }

    /// Drop the pending run, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<ScheduledTask>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Search box state wired to the search list.
pub struct SearchController {
    lists: Arc<ListCaches>,
    query: Mutex<SearchQuery>,
    debouncer: Debouncer<SearchQuery>,
}

impl SearchController {
    pub fn new(lists: Arc<ListCaches>, delay: Duration) -> Self {
        let target = Arc::clone(&lists);
        let debouncer = Debouncer::new(delay, move |query: SearchQuery| {
            let lists = Arc::clone(&target);
            async move {
                debug!(text = %query.text, categories = query.categories().len(), "Debounced search");
                if let Err(e) = lists.search(query).await {
                    warn!(error = %e, "Search failed");
                }
            }
        });

        Self {
            lists,
            query: Mutex::new(SearchQuery::default()),
            debouncer,
        }
    }

    /// Current query (what the user has typed, not necessarily fetched).
    pub fn query(&self) -> SearchQuery {
        self.lock().clone()
    }

    /// Replace the search text and schedule a search.
    pub fn set_text(&self, text: impl Into<String>) {
        let query = {
            let mut query = self.lock();
            query.text = text.into();
            query.clone()
        };
        self.debouncer.call(query);
    }

    /// Toggle a category filter and schedule a search if the filters changed.
    pub fn toggle_category(&self, category: Category) -> bool {
        let changed = {
            let mut query = self.lock();
            query.toggle_category(category).then(|| query.clone())
        };

        match changed {
            Some(query) => {
                self.debouncer.call(query);
                true
            }
            None => false,
        }
    }

    /// Skip the delay: cancel the pending search and run the query now.
    pub async fn search_now(&self) -> Result<usize> {
        self.debouncer.cancel();
        self.lists.search(self.query()).await
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn lock(&self) -> MutexGuard<'_, SearchQuery> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
