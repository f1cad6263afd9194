//! Session change events.

use tokio::sync::mpsc;

use sentra_identity::RawSession;

/// Kind of change the provider is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEventKind {
    /// A user signed in.
    SignedIn,
    /// The user signed out.
    SignedOut,
    /// The session token was refreshed.
    TokenRefreshed,
    /// User attributes (claims) changed.
    UserUpdated,
}

impl std::fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionEventKind::SignedIn => "signed_in",
            SessionEventKind::SignedOut => "signed_out",
            SessionEventKind::TokenRefreshed => "token_refreshed",
            SessionEventKind::UserUpdated => "user_updated",
        };
        f.write_str(name)
    }
}

/// A provider-pushed session change.
///
/// The engine routes `session` through the same resolution pipeline as the
/// initial fetch regardless of `kind`; the kind is only logged.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// What changed.
    pub kind: SessionEventKind,
    /// The session as of this event, `None` after sign-out.
    pub session: Option<RawSession>,
}

/// Stream of [`SessionEvent`]s for one subscription.
///
/// Dropping the stream unsubscribes: the provider's send side starts
/// failing and can prune the subscription.
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    /// Creates a connected sender/stream pair.
    ///
    /// Provider implementations keep the sender and hand the stream to the
    /// subscriber.
    pub fn channel() -> (mpsc::UnboundedSender<SessionEvent>, SessionEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, SessionEvents { rx })
    }

    /// Waits for the next event. Returns `None` once the provider side has
    /// gone away.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }
}
