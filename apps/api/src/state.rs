use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::DocumentStore;
use crate::dispatch::protocol::Dispatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// MongoDB in production; pooled by the driver.
    pub store: Arc<dyn DocumentStore>,
    pub dispatcher: Dispatcher,
    pub tokens: TokenIssuer,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(
        store: Arc<crate::db::memory::MemoryStore>,
        queue: Arc<crate::queue::memory::MemoryQueue>,
    ) -> Self {
        Self::for_tests_with(store, queue, Config::for_tests())
    }

    pub fn for_tests_with(
        store: Arc<crate::db::memory::MemoryStore>,
        queue: Arc<crate::queue::memory::MemoryQueue>,
        config: Config,
    ) -> Self {
        let dispatcher = Dispatcher::new(
            queue,
            config.generation_queue.clone(),
            config.delivery_queue.clone(),
        );
        Self {
            store,
            dispatcher,
            tokens: TokenIssuer::new(&config.jwt_secret),
            config,
        }
    }
}
