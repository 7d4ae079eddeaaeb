//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading, and the async
//! runtime so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("path searches need a tokio runtime")]
    NoAsyncRuntime(#[source] tokio::runtime::TryCurrentError),

    #[error("start position {0} is outside the map or impassable")]
    StartOutOfBounds(game_core::Position),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}
