use super::ClientError;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifetime of one mounted view.
///
/// Work started through the scope stops when the scope is cancelled or dropped; its
/// result is discarded instead of being applied to a view that no longer exists.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A nested scope, cancelled together with this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token() }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Awaits `fut` unless the scope is cancelled first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        guarded(self.token.clone(), fut).await
    }

    /// Spawns `fut` on the runtime, bound to this scope.
    pub fn spawn<F, T>(&self, fut: F) -> JoinHandle<Result<T, ClientError>>
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(guarded(self.token.clone(), fut))
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn guarded<F, T>(token: CancellationToken, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(ClientError::cancelled()),
        result = fut => {
            if token.is_cancelled() { Err(ClientError::cancelled()) } else { result }
        },
    }
}
