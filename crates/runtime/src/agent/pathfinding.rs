//! Background path searches and their completions.
//!
//! Searches run on tokio's blocking pool. Results come back over an unbounded
//! channel and are drained by the agent at the start of the next tick, so
//! entity state is only ever touched from the tick thread.
use std::sync::Arc;

use game_core::{EntityId, FogFilter, Path, PathSearch, Position};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::trace;

use crate::api::{Result, RuntimeError};

/// What the requesting state will do with the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathPurpose {
    /// Walk to a target (resource, exploration goal, structure).
    Traverse,
    /// Carry a gathered unit home.
    Deliver,
}

/// A search queued by a state hook, sent once the hook returns.
#[derive(Clone, Debug)]
pub(crate) struct PathRequest {
    pub(crate) entity: EntityId,
    pub(crate) start: Position,
    pub(crate) goal: Position,
    pub(crate) purpose: PathPurpose,
    pub(crate) filter: Option<FogFilter>,
}

/// Result of one search, tagged with the activation that asked for it.
#[derive(Clone, Debug)]
pub struct PathCompletion {
    pub entity: EntityId,
    /// Machine generation at request time.
    pub generation: u64,
    pub purpose: PathPurpose,
    pub path: Option<Path>,
}

/// Launches searches off the tick thread and collects their results.
pub struct PathfindingBridge {
    runtime: Handle,
    search: Arc<dyn PathSearch>,
    tx: mpsc::UnboundedSender<PathCompletion>,
    rx: mpsc::UnboundedReceiver<PathCompletion>,
    in_flight: usize,
}

impl PathfindingBridge {
    /// Binds to the tokio runtime the caller is running on.
    pub fn new(search: Arc<dyn PathSearch>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(RuntimeError::NoAsyncRuntime)?;
        Ok(Self::with_handle(runtime, search))
    }

    pub fn with_handle(runtime: Handle, search: Arc<dyn PathSearch>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runtime,
            search,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Starts a search and returns immediately.
    pub(crate) fn find_path(&mut self, request: PathRequest, generation: u64) {
        let PathRequest {
            entity,
            start,
            goal,
            purpose,
            filter,
        } = request;
        let search = Arc::clone(&self.search);
        let tx = self.tx.clone();
        self.in_flight += 1;

        trace!(%entity, %start, %goal, ?purpose, fog = filter.is_some(), "path search started");
        self.runtime.spawn_blocking(move || {
            let path = search.search(start, goal, filter.as_ref());
            let completion = PathCompletion {
                entity,
                generation,
                purpose,
                path,
            };
            if tx.send(completion).is_err() {
                trace!(%entity, "path completion dropped: agent is gone");
            }
        });
    }

    /// Completions that already arrived.
    pub fn drain(&mut self) -> Vec<PathCompletion> {
        let mut completions = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            completions.push(completion);
        }
        completions
    }

    /// Waits until every launched search has completed.
    pub async fn settle(&mut self) -> Vec<PathCompletion> {
        let mut completions = self.drain();
        while self.in_flight > 0 {
            match self.rx.recv().await {
                Some(completion) => {
                    self.in_flight -= 1;
                    completions.push(completion);
                }
                None => break,
            }
        }
        completions
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{AStarSearch, MapOracleImpl};

    fn bridge() -> PathfindingBridge {
        let search = AStarSearch::new(Arc::new(MapOracleImpl::test_map(8, 8)));
        PathfindingBridge::new(Arc::new(search)).expect("inside tokio")
    }

    fn request(goal: Position) -> PathRequest {
        PathRequest {
            entity: EntityId(3),
            start: Position::new(0, 0),
            goal,
            purpose: PathPurpose::Traverse,
            filter: None,
        }
    }

    #[tokio::test]
    async fn completions_carry_the_request_generation() {
        let mut bridge = bridge();
        bridge.find_path(request(Position::new(2, 0)), 7);
        assert_eq!(bridge.in_flight(), 1);

        let completions = bridge.settle().await;

        assert_eq!(bridge.in_flight(), 0);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].entity, EntityId(3));
        assert_eq!(completions[0].generation, 7);
        assert_eq!(completions[0].path.as_ref().map(Path::len), Some(2));
    }

    #[tokio::test]
    async fn failed_searches_still_complete() {
        let mut bridge = bridge();
        bridge.find_path(request(Position::new(40, 40)), 0);

        let completions = bridge.settle().await;
        assert!(completions[0].path.is_none());
    }

    #[test]
    fn needs_a_tokio_runtime() {
        let search = AStarSearch::new(Arc::new(MapOracleImpl::test_map(2, 2)));
        assert!(matches!(
            PathfindingBridge::new(Arc::new(search)),
            Err(RuntimeError::NoAsyncRuntime(_))
        ));
    }
}
