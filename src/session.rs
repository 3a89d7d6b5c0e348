use crate::{invitation::invitee_display_name, r#trait::Expired};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

///Upper bound on a session lifetime, 30 days.
pub const MAX_SESSION_LIFETIME_SECONDS: i64 = 30 * 24 * 60 * 60;

fn expiry_from_now(lifetime: Duration) -> DateTime<Utc> {
    Utc::now()
        .checked_add_signed(lifetime)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Initial,
    AwaitingContactDetails,
    DeclinedSubmitted,
    AcceptedSubmitted,
}

impl RegistrationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DeclinedSubmitted | Self::AcceptedSubmitted)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    invitee: String,
    state: RegistrationState,
    expiry: DateTime<Utc>,
}

impl Session {
    pub fn new(invitee: String, lifetime: Duration) -> Self {
        Self {
            invitee,
            state: RegistrationState::Initial,
            expiry: expiry_from_now(lifetime),
        }
    }
    pub(crate) fn with_state(mut self, state: RegistrationState) -> Self {
        self.state = state;
        self
    }
    pub fn get_invitee(&self) -> &String {
        &self.invitee
    }
    pub fn get_state(&self) -> RegistrationState {
        self.state
    }
    pub fn expired(&self) -> bool {
        self.expiry.expired()
    }
}

/// Result of [`SessionStore::set_state`].
#[derive(Debug)]
pub enum StateChange {
    Applied(Session),
    ///Another request moved the session first; carries the session as it is now.
    Superseded(Session),
    Missing,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    lifetime: Duration,
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            lifetime,
        }
    }

    pub fn get_lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Resolves the session for a page view, opening a fresh one when the
    /// cookie is missing, unknown or expired.
    ///
    /// The invitee name follows the `invite` parameter only while nothing has
    /// been submitted yet. Every view pushes the expiry out by one lifetime,
    /// matching the refreshed cookie.
    pub fn open(&self, session_id: Option<Uuid>, invite: Option<&str>) -> (Uuid, Session) {
        let mut sessions = self.sessions.write();
        if let Some(session_id) = session_id {
            if let Some(session) = sessions.get_mut(&session_id) {
                if !session.expired() {
                    if session.state == RegistrationState::Initial {
                        session.invitee = invitee_display_name(invite);
                    }
                    session.expiry = expiry_from_now(self.lifetime);
                    return (session_id, session.to_owned());
                }
            }
        }
        let session_id = Uuid::new_v4();
        let session = Session::new(invitee_display_name(invite), self.lifetime);
        let _ = sessions.insert(session_id, session.to_owned());
        (session_id, session)
    }

    ///A live session by id; expired sessions are treated as absent.
    pub fn get(&self, session_id: &Uuid) -> Option<Session> {
        self.sessions
            .read()
            .get(session_id)
            .filter(|session| !session.expired())
            .cloned()
    }

    ///Moves the session to `state` only if it is still in `expected`.
    pub fn set_state(
        &self,
        session_id: &Uuid,
        expected: RegistrationState,
        state: RegistrationState,
    ) -> StateChange {
        match self.sessions.write().get_mut(session_id) {
            Some(session) if session.state == expected => {
                session.state = state;
                StateChange::Applied(session.to_owned())
            }
            Some(session) => StateChange::Superseded(session.to_owned()),
            None => StateChange::Missing,
        }
    }

    pub fn remove_expired_sessions(&self) -> usize {
        let mut keys = Vec::new();
        {
            for (key, session) in self.sessions.read().iter() {
                if session.expired() {
                    keys.push(key.to_owned());
                }
            }
        }
        let mut sessions_write_lock = self.sessions.write();
        for key in keys.iter() {
            let _ = sessions_write_lock.remove(key);
        }
        keys.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_initial_with_invitee() {
        let store = SessionStore::new(Duration::minutes(5));
        let (_, session) = store.open(None, Some("Alice"));
        assert_eq!(session.get_state(), RegistrationState::Initial);
        assert_eq!(session.get_invitee(), "Alice");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_cookie_opens_a_new_session() {
        let store = SessionStore::new(Duration::minutes(5));
        let stale = Uuid::new_v4();
        let (session_id, session) = store.open(Some(stale), None);
        assert_ne!(session_id, stale);
        assert_eq!(session.get_invitee(), "Guest");
    }

    #[test]
    fn invitee_is_fixed_once_the_visitor_acted() {
        let store = SessionStore::new(Duration::minutes(5));
        let (session_id, _) = store.open(None, Some("Alice"));
        let (same_id, session) = store.open(Some(session_id), Some("Bob"));
        assert_eq!(same_id, session_id);
        assert_eq!(session.get_invitee(), "Bob");

        assert!(matches!(
            store.set_state(
                &session_id,
                RegistrationState::Initial,
                RegistrationState::AwaitingContactDetails
            ),
            StateChange::Applied(_)
        ));
        let (_, session) = store.open(Some(session_id), Some("Carol"));
        assert_eq!(session.get_invitee(), "Bob");
        assert_eq!(session.get_state(), RegistrationState::AwaitingContactDetails);
    }

    #[test]
    fn expired_sessions_are_hidden_and_swept() {
        let store = SessionStore::new(Duration::seconds(-1));
        let (session_id, _) = store.open(None, None);
        assert!(store.get(&session_id).is_none());
        assert_eq!(store.remove_expired_sessions(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn stale_transition_cannot_reopen_a_finished_session() {
        let store = SessionStore::new(Duration::minutes(5));
        let (session_id, _) = store.open(None, None);
        assert!(matches!(
            store.set_state(
                &session_id,
                RegistrationState::Initial,
                RegistrationState::DeclinedSubmitted
            ),
            StateChange::Applied(_)
        ));

        match store.set_state(
            &session_id,
            RegistrationState::Initial,
            RegistrationState::AwaitingContactDetails,
        ) {
            StateChange::Superseded(session) => {
                assert_eq!(session.get_state(), RegistrationState::DeclinedSubmitted)
            }
            other => panic!("expected Superseded, got {:?}", other),
        }
        assert_eq!(
            store.get(&session_id).unwrap().get_state(),
            RegistrationState::DeclinedSubmitted
        );
    }

    #[test]
    fn set_state_on_unknown_session_is_missing() {
        let store = SessionStore::new(Duration::minutes(5));
        assert!(matches!(
            store.set_state(
                &Uuid::new_v4(),
                RegistrationState::Initial,
                RegistrationState::AwaitingContactDetails
            ),
            StateChange::Missing
        ));
    }

    #[test]
    fn viewing_extends_the_expiry() {
        let store = SessionStore::new(Duration::minutes(5));
        let (session_id, _) = store.open(None, None);
        let nearly_expired = Utc::now() + Duration::seconds(30);
        store.sessions.write().get_mut(&session_id).unwrap().expiry = nearly_expired;

        let (same_id, session) = store.open(Some(session_id), None);
        assert_eq!(same_id, session_id);
        assert!(session.expiry > Utc::now() + Duration::minutes(4));
    }

    #[test]
    fn oversized_lifetime_saturates_instead_of_overflowing() {
        let store = SessionStore::new(Duration::seconds(100_000_000_000_000));
        let (session_id, session) = store.open(None, Some("Alice"));
        assert!(!session.expired());
        assert!(store.get(&session_id).is_some());
    }

    #[test]
    fn terminal_states() {
        assert!(!RegistrationState::Initial.is_terminal());
        assert!(!RegistrationState::AwaitingContactDetails.is_terminal());
        assert!(RegistrationState::DeclinedSubmitted.is_terminal());
        assert!(RegistrationState::AcceptedSubmitted.is_terminal());
    }
}
