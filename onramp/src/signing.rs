//! Remote URL signing: trait seam, versioned state machine, and the
//! asynchronous coordinator driving it.
//!
//! Moonpay purchase links must be endorsed by a trusted server before
//! they can be opened. Whenever the unsigned moonpay URL changes, the
//! coordinator submits it to a [`UrlSigner`] and exposes the latest signed
//! URL plus a loading flag. Inputs are versioned: a new submission
//! supersedes any in-flight request, and a late response for a superseded
//! input is discarded rather than overwriting newer state
//! (last-input-wins). There is no cancellation primitive — superseded
//! requests simply run to completion and lose the version check.
//!
//! A failed call is retried a bounded number of times with exponential
//! backoff, then parked in a terminal `Failed` state whose snapshot reports
//! no signed URL and no loading, so the consumer degrades to "no link"
//! instead of spinning forever.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SignError;

/// Boxed future alias used by async trait seams in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Signs an unsigned purchase URL through a remote service.
///
/// The primary implementation (`onramp-http::HttpUrlSigner`) performs
/// network I/O, hence the [`BoxFuture`] return.
pub trait UrlSigner: Send + Sync {
    /// Returns the signed form of `unsigned_url`.
    fn sign<'a>(&'a self, unsigned_url: &'a str) -> BoxFuture<'a, Result<String, SignError>>;
}

impl<T: UrlSigner + ?Sized> UrlSigner for Arc<T> {
    fn sign<'a>(&'a self, unsigned_url: &'a str) -> BoxFuture<'a, Result<String, SignError>> {
        (**self).sign(unsigned_url)
    }
}

/// Bounded retry policy for signing calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt before giving up.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Returns the backoff delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2_u32.saturating_pow(attempt)
    }
}

/// Claim on one signing round, tied to the input version that opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    version: u64,
    url: String,
}

impl Ticket {
    /// The unsigned URL this ticket was issued for.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The input version this ticket belongs to.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Loading,
    Ready(String),
    Failed,
}

/// What the consumer sees of the signing round: the latest signed URL (if
/// any) and whether a round is still in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningSnapshot {
    /// Signed URL of the most recent completed round, if any.
    pub signed_url: Option<String>,
    /// `true` while a signing round is in flight.
    pub is_loading: bool,
}

/// Pure, versioned signing state machine.
///
/// States: `Idle`, `Loading`, `Ready(signed)`, `Failed`. Every accepted
/// input bumps the version; results are applied only when their ticket's
/// version is still current, which makes stale overwrites impossible.
#[derive(Debug)]
pub struct SigningState {
    phase: Phase,
    version: u64,
    last_input: Option<String>,
}

impl Default for SigningState {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningState {
    /// Creates an idle state machine.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            version: 0,
            last_input: None,
        }
    }

    /// Submits the current unsigned URL.
    ///
    /// - A new non-empty URL starts a round: the state moves to `Loading`
    ///   and a [`Ticket`] for the new version is returned.
    /// - The same URL as the previous submission is a no-op.
    /// - `None` (or an empty string) resets to `Idle`, superseding any
    ///   in-flight round.
    pub fn submit(&mut self, unsigned_url: Option<&str>) -> Option<Ticket> {
        let unsigned_url = unsigned_url.filter(|url| !url.is_empty());
        match unsigned_url {
            Some(url) => {
                if self.last_input.as_deref() == Some(url) {
                    return None;
                }
                self.version += 1;
                self.last_input = Some(url.to_owned());
                self.phase = Phase::Loading;
                debug!(version = self.version, "signing round started");
                Some(Ticket {
                    version: self.version,
                    url: url.to_owned(),
                })
            }
            None => {
                if self.last_input.is_some() || self.phase != Phase::Idle {
                    self.version += 1;
                    self.last_input = None;
                    self.phase = Phase::Idle;
                    debug!(version = self.version, "signing input cleared");
                }
                None
            }
        }
    }

    /// Applies a successful result for the given ticket version.
    ///
    /// Returns `false` (and changes nothing) when the version has been
    /// superseded.
    pub fn complete(&mut self, version: u64, signed_url: String) -> bool {
        if version != self.version {
            debug!(version, current = self.version, "discarding stale signed URL");
            return false;
        }
        self.phase = Phase::Ready(signed_url);
        true
    }

    /// Marks the round for the given ticket version as failed.
    ///
    /// Returns `false` when the version has been superseded.
    pub fn fail(&mut self, version: u64) -> bool {
        if version != self.version {
            return false;
        }
        self.phase = Phase::Failed;
        true
    }

    /// Returns `true` if the given ticket version is still the live input.
    #[must_use]
    pub fn is_current(&self, version: u64) -> bool {
        version == self.version
    }

    /// Returns the consumer-facing view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SigningSnapshot {
        match &self.phase {
            Phase::Ready(signed_url) => SigningSnapshot {
                signed_url: Some(signed_url.clone()),
                is_loading: false,
            },
            Phase::Loading => SigningSnapshot {
                signed_url: None,
                is_loading: true,
            },
            Phase::Idle | Phase::Failed => SigningSnapshot::default(),
        }
    }
}

/// Drives [`SigningState`] with an actual [`UrlSigner`].
///
/// [`update`](Self::update) spawns at most one signing task per accepted
/// input; each task retries per the [`RetryPolicy`] and applies its result
/// through the versioned state machine, so only the latest input's result
/// ever lands. Requires a tokio runtime.
pub struct SigningCoordinator<S> {
    signer: Arc<S>,
    state: Arc<Mutex<SigningState>>,
    policy: RetryPolicy,
}

impl<S> std::fmt::Debug for SigningCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCoordinator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S> Clone for SigningCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            signer: Arc::clone(&self.signer),
            state: Arc::clone(&self.state),
            policy: self.policy,
        }
    }
}

impl<S: UrlSigner + 'static> SigningCoordinator<S> {
    /// Creates a coordinator with the default retry policy.
    pub fn new(signer: S) -> Self {
        Self::with_policy(signer, RetryPolicy::default())
    }

    /// Creates a coordinator with an explicit retry policy.
    pub fn with_policy(signer: S, policy: RetryPolicy) -> Self {
        Self {
            signer: Arc::new(signer),
            state: Arc::new(Mutex::new(SigningState::new())),
            policy,
        }
    }

    /// Feeds the current unsigned URL into the state machine, spawning a
    /// signing task when it opens a new round.
    pub fn update(&self, unsigned_url: Option<&str>) {
        let ticket = {
            let mut state = self.state.lock().expect("signing state lock poisoned");
            state.submit(unsigned_url)
        };
        let Some(ticket) = ticket else { return };

        let signer = Arc::clone(&self.signer);
        let state = Arc::clone(&self.state);
        let policy = self.policy;
        tokio::spawn(async move {
            let mut attempt = 0;
            loop {
                match signer.sign(ticket.url()).await {
                    Ok(signed_url) => {
                        let mut state = state.lock().expect("signing state lock poisoned");
                        state.complete(ticket.version(), signed_url);
                        return;
                    }
                    Err(err) => {
                        {
                            let state = state.lock().expect("signing state lock poisoned");
                            if !state.is_current(ticket.version()) {
                                debug!(%err, "signing failed for superseded input, dropping");
                                return;
                            }
                        }
                        if attempt >= policy.max_retries {
                            warn!(%err, attempts = attempt + 1, "signing failed, giving up");
                            let mut state = state.lock().expect("signing state lock poisoned");
                            state.fail(ticket.version());
                            return;
                        }
                        warn!(%err, attempt, "signing failed, retrying");
                        tokio::time::sleep(policy.delay(attempt)).await;
                        attempt += 1;
                    }
                }
            }
        });
    }

    /// Returns the consumer-facing view of the current signing state.
    #[must_use]
    pub fn snapshot(&self) -> SigningSnapshot {
        self.state
            .lock()
            .expect("signing state lock poisoned")
            .snapshot()
    }
}
