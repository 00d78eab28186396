use std::{
    sync::{
        mpsc,
        Arc,
    },
    time::Duration,
};

use tokio::runtime::{
    Builder,
    Runtime,
};
use tracing::debug;

use super::{
    types::PageResult,
    RelatedScope,
    TaskResult,
};
use crate::{
    api::{
        client::ApiClient,
        types::{
            Character,
            Resource,
        },
    },
    core::{
        query::QueryKey,
        resolver::{
            fan_out,
            ResolveTicket,
        },
        FinderError,
    },
};

/// Runs network work on a background runtime and hands results back to the UI loop.
///
/// Nothing spawned here touches shared state: every outcome is sent over the channel and
/// applied by whoever drains [`TaskManager::poll_results`], so the caches have one writer.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    api: ApiClient,
    fan_out_limit: Option<usize>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new(api: ApiClient, fan_out_limit: Option<usize>) -> Result<Self, FinderError> {
        let runtime = Arc::new(
            Builder::new_multi_thread()
                .worker_threads(2)
                .thread_name("portal-finder-io")
                .enable_all()
                .build()?,
        );

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, api, fan_out_limit, receiver, sender })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    /// Blocks until one result arrives or `timeout` passes.
    pub fn wait_result(&mut self, timeout: Duration) -> Option<TaskResult> {
        self.receiver.recv_timeout(timeout).ok()
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, ApiClient) {
        (self.sender.clone(), self.api.clone())
    }

    pub fn fetch_page<T: Resource>(
        &self,
        key: QueryKey,
        wrap: fn(QueryKey, PageResult<T>) -> TaskResult,
    ) {
        let (sender, api) = self.task_context();
        debug!(?key, "spawning page fetch");

        self.runtime.spawn(async move {
            let result = api.fetch_collection::<T>(&key).await;
            let _ = sender.send(wrap(key, result));
        });
    }

    pub fn resolve_related(&self, scope: RelatedScope, ticket: ResolveTicket) {
        let (sender, api) = self.task_context();
        let limit = self.fan_out_limit;
        debug!(?scope, parent_id = ticket.parent_id(), urls = ticket.urls().len(), "spawning fan-out");

        self.runtime.spawn(async move {
            let result = fan_out::<Character>(&api, ticket.urls(), limit).await;
            let _ = sender.send(TaskResult::Related { scope, ticket, result });
        });
    }
}
