use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::{JoinError, JoinHandle};

use crate::error::ApiError;

/// Eventual result of one client call. Resolves exactly once.
///
/// Dropping it abandons interest in the result; the request still runs to
/// completion on the client's runtime.
#[must_use = "an ApiFuture does nothing unless awaited"]
pub struct ApiFuture<T> {
    state: State<T>,
}

enum State<T> {
    Ready(Option<Result<T, ApiError>>),
    Spawned(JoinHandle<Result<T, ApiError>>),
}

impl<T> ApiFuture<T> {
    pub(crate) fn ready(result: Result<T, ApiError>) -> Self { Self { state: State::Ready(Some(result)) } }

    pub(crate) fn spawned(handle: JoinHandle<Result<T, ApiError>>) -> Self { Self { state: State::Spawned(handle) } }

    /// True when the result was settled without submitting anything.
    pub fn is_immediate(&self) -> bool { matches!(self.state, State::Ready(_)) }
}

// `T` is never pinned in place.
impl<T> Unpin for ApiFuture<T> {}

impl<T> Future for ApiFuture<T> {
    type Output = Result<T, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            State::Ready(slot) => Poll::Ready(
                slot.take().unwrap_or_else(|| Err(ApiError::unknown(None, "ApiFuture polled after completion"))),
            ),
            State::Spawned(handle) => Pin::new(handle).poll(cx).map(|joined| joined.unwrap_or_else(|e| Err(join_error(e)))),
        }
    }
}

fn join_error(e: JoinError) -> ApiError {
    if e.is_cancelled() {
        ApiError::Closed
    } else {
        tracing::error!(error = %e, "request task panicked");
        ApiError::unknown(None, "request task panicked")
    }
}

impl<T> std::fmt::Debug for ApiFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            State::Ready(_) => "ready",
            State::Spawned(_) => "spawned",
        };
        f.debug_struct("ApiFuture").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_resolves() {
        let fut = ApiFuture::ready(Ok(3));
        assert!(fut.is_immediate());
        assert_eq!(fut.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_spawned_resolves() {
        let fut = ApiFuture::spawned(tokio::spawn(async { Ok::<_, ApiError>("done") }));
        assert!(!fut.is_immediate());
        assert_eq!(fut.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_panicking_task_is_unknown() {
        let fut: ApiFuture<()> = ApiFuture::spawned(tokio::spawn(async { panic!("boom") }));
        assert_eq!(fut.await.unwrap_err().code(), crate::error::UNKNOWN);
    }

    #[tokio::test]
    async fn test_aborted_task_is_closed() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok::<(), ApiError>(())
        });
        handle.abort();
        let err = ApiFuture::spawned(handle).await.unwrap_err();
        assert_eq!(err.code(), crate::error::CLOSED);
    }
}
