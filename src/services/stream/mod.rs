//! Resumable event streams.
//!
//! [`EventStream`] keeps one subscription alive until shut down. Each decoded
//! payload is handed to the caller together with its event id, and the id
//! becomes the cursor the next connection resumes from. Lost connections are
//! retried after the server's `retry:` delay.

mod sse;
pub use sse::*;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::services::provider::{EventByteStream, HorizonProviderTrait, ProviderError};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Stream closed by server")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StreamState {
    Connecting,
    Streaming,
    Backoff,
    Stopped,
}

/// Delay source of the reconnect loop.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

enum Outcome {
    Disconnected(StreamError),
    Shutdown,
}

pub struct EventStream<P, S = TokioSleeper>
where
    P: HorizonProviderTrait,
    S: Sleeper,
{
    provider: Arc<P>,
    sleeper: S,
    path: String,
    cursor: String,
    retry: Duration,
    state: StreamState,
    decoder: SseDecoder,
}

impl<P> EventStream<P, TokioSleeper>
where
    P: HorizonProviderTrait,
{
    pub fn new(provider: Arc<P>, path: &str, cursor: &str, retry: Duration) -> Self {
        Self::with_sleeper(provider, TokioSleeper, path, cursor, retry)
    }
}

impl<P, S> EventStream<P, S>
where
    P: HorizonProviderTrait,
    S: Sleeper,
{
    pub fn with_sleeper(
        provider: Arc<P>,
        sleeper: S,
        path: &str,
        cursor: &str,
        retry: Duration,
    ) -> Self {
        Self {
            provider,
            sleeper,
            path: path.to_string(),
            cursor: cursor.to_string(),
            retry,
            state: StreamState::Connecting,
            decoder: SseDecoder::new(),
        }
    }

    /// Id of the last delivered event, or the starting cursor.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn retry(&self) -> Duration {
        self.retry
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Runs until `shutdown` turns true or its sender is dropped.
    ///
    /// `handler` receives the event id and the decoded payload. Payloads that
    /// do not decode as `T` are logged and skipped.
    pub async fn run<T, F>(&mut self, mut shutdown: watch::Receiver<bool>, mut handler: F)
    where
        T: DeserializeOwned,
        F: FnMut(&str, T) + Send,
    {
        loop {
            if *shutdown.borrow() {
                break;
            }

            self.state = StreamState::Connecting;
            debug!(path = %self.path, cursor = %self.cursor, "connecting event stream");
            let outcome = match self.provider.open_stream(&self.path, &self.cursor).await {
                Ok(body) => {
                    self.state = StreamState::Streaming;
                    info!(path = %self.path, cursor = %self.cursor, "event stream open");
                    self.consume(body, &mut shutdown, &mut handler).await
                }
                Err(e) => Outcome::Disconnected(e.into()),
            };

            match outcome {
                Outcome::Shutdown => break,
                Outcome::Disconnected(error) => {
                    warn!(
                        path = %self.path,
                        error = %error,
                        retry_ms = self.retry.as_millis() as u64,
                        "event stream disconnected"
                    );
                }
            }

            self.state = StreamState::Backoff;
            if self.back_off(&mut shutdown).await {
                break;
            }
        }

        self.state = StreamState::Stopped;
        info!(path = %self.path, cursor = %self.cursor, "event stream stopped");
    }

    /// Waits out the retry delay. Returns true when shutdown was requested;
    /// other changes of the shutdown value keep waiting.
    async fn back_off(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        if *shutdown.borrow() {
            return true;
        }
        let mut sleep = self.sleeper.sleep(self.retry);
        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return true;
                    }
                }
            }
        }
    }

    async fn consume<T, F>(
        &mut self,
        mut body: EventByteStream,
        shutdown: &mut watch::Receiver<bool>,
        handler: &mut F,
    ) -> Outcome
    where
        T: DeserializeOwned,
        F: FnMut(&str, T) + Send,
    {
        self.decoder.reset();
        // id of the event whose data has not arrived yet
        let mut pending_id: Option<String> = None;
        loop {
            let chunk = tokio::select! {
                chunk = body.next() => chunk,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Outcome::Shutdown;
                    }
                    continue;
                }
            };

            let bytes = match chunk {
                Some(Ok(bytes)) => bytes,
                Some(Err(e)) => return Outcome::Disconnected(e.into()),
                None => return Outcome::Disconnected(StreamError::Closed),
            };

            for line in self.decoder.push(&bytes) {
                match line {
                    SseLine::Retry(retry) => self.retry = retry,
                    SseLine::Id(id) => pending_id = Some(id),
                    SseLine::Hello | SseLine::Byebye => {}
                    SseLine::Data(payload) => {
                        if let Some(id) = pending_id.take() {
                            self.cursor = id;
                        }
                        match serde_json::from_str::<T>(&payload) {
                            Ok(event) => handler(&self.cursor, event),
                            Err(e) => {
                                warn!(cursor = %self.cursor, error = %e, "skipping undecodable event")
                            }
                        }
                    }
                }
            }
        }
    }
}
