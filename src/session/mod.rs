//! Session state machine and the transition component that applies
//! authentication outcomes. The controller owns the state; screens and
//! navigation live behind the [`Presenter`] trait and only ever receive
//! signals, mirroring the split between deciding and displaying.

use crate::auth::Outcome;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

/// Whether the user currently has access to the protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// The presentation layer, consumed as an external collaborator. On failure
/// the reason must be acknowledged by the user before further interaction;
/// how that blocking notice looks is entirely the presenter's business.
pub trait Presenter: Send + Sync {
    /// Advance to the protected view.
    fn on_authenticated(&self);

    /// Stay on the login view and surface `reason`.
    fn on_auth_failed(&self, reason: &str);

    /// Return to the unauthenticated view.
    fn on_signed_out(&self);
}

impl<P: Presenter + ?Sized> Presenter for std::sync::Arc<P> {
    fn on_authenticated(&self) {
        (**self).on_authenticated();
    }

    fn on_auth_failed(&self, reason: &str) {
        (**self).on_auth_failed(reason);
    }

    fn on_signed_out(&self) {
        (**self).on_signed_out();
    }
}

/// A sign-in attempt could not start.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// Another attempt is still in flight; this one was rejected without
    /// invoking any authenticator and without touching session state.
    #[error("an authentication attempt is already in flight")]
    InFlight,
}

/// Owns the [`SessionState`] and applies authentication outcomes to it.
/// Initial state is always `Unauthenticated`.
pub struct SessionController<P> {
    state: Mutex<SessionState>,
    presenter: P,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the attempt resolves, including when the
/// driving task is cancelled mid-await.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P: Presenter> SessionController<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            state: Mutex::new(SessionState::Unauthenticated),
            presenter,
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.lock()
    }

    /// Drive one authentication attempt to completion and apply its
    /// outcome. At most one attempt runs at a time per controller; a second
    /// call while one is pending returns [`AttemptError::InFlight`] and the
    /// rejected attempt future is dropped unpolled.
    ///
    /// # Errors
    ///
    /// Returns [`AttemptError::InFlight`] when an attempt is already
    /// pending.
    pub async fn sign_in<F>(&self, attempt: F) -> Result<Outcome, AttemptError>
    where
        F: Future<Output = Outcome>,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("attempt rejected: another attempt is pending");
            return Err(AttemptError::InFlight);
        }

        let _guard = InFlightGuard(&self.in_flight);

        let outcome = attempt.await;
        self.apply(&outcome);

        Ok(outcome)
    }

    /// Transition on a completed outcome: `Success` enters `Authenticated`,
    /// any failure leaves the state untouched and surfaces the reason.
    /// Returns the state after the transition.
    pub fn apply(&self, outcome: &Outcome) -> SessionState {
        match outcome {
            Outcome::Success => {
                *self.lock() = SessionState::Authenticated;
                info!("authenticated, advancing to protected view");
                self.presenter.on_authenticated();
            }
            Outcome::Failure { reason } => {
                debug!("authentication failed: {reason}");
                self.presenter.on_auth_failed(&reason.to_string());
            }
        }

        self.state()
    }

    /// Unconditionally return to `Unauthenticated`. Always succeeds and
    /// never consults an authenticator.
    pub fn sign_out(&self) {
        *self.lock() = SessionState::Unauthenticated;
        info!("signed out");
        self.presenter.on_signed_out();
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
