use crate::{
    config::{Config, ProjectContent, StorageMode},
    error::{Error, RegistrationError},
    flows::registration::{apply, Action, Outcome},
    gateway::{MemoryGateway, SqliteGateway},
    r#trait::InvitationGateway,
    session::{Session, SessionStore, StateChange},
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct CookieConfig {
    name: String,
    secure: bool,
}

impl CookieConfig {
    pub fn new(name: String, secure: bool) -> Self {
        Self { name, secure }
    }
    pub fn get_name(&self) -> &str {
        &self.name
    }
    pub fn is_secure(&self) -> bool {
        self.secure
    }
}

pub struct RegistrationManager {
    sessions: SessionStore,
    gateway: Arc<dyn InvitationGateway>,
    pub cookie: CookieConfig,
    pub project: ProjectContent,
}

impl RegistrationManager {
    pub fn new(
        gateway: Arc<dyn InvitationGateway>,
        cookie: CookieConfig,
        project: ProjectContent,
        session_lifetime: Duration,
    ) -> Self {
        Self {
            sessions: SessionStore::new(session_lifetime),
            gateway,
            cookie,
            project,
        }
    }

    ///Builds the gateway named by the storage section of `config`.
    pub fn gateway_from_config(config: &Config) -> Result<Arc<dyn InvitationGateway>, Error> {
        match config.storage.mode {
            StorageMode::Sqlite => Ok(Arc::new(SqliteGateway::connect(
                &config.storage.database_url,
                config.storage.max_connections,
            )?)),
            StorageMode::Memory => {
                info!("Invitation store running in memory mode, records will not survive a restart");
                Ok(Arc::new(MemoryGateway::default()))
            }
        }
    }

    pub fn get_session_lifetime(&self) -> Duration {
        self.sessions.get_lifetime()
    }

    pub fn view(&self, session_id: Option<Uuid>, invite: Option<&str>) -> (Uuid, Session) {
        self.sessions.open(session_id, invite)
    }

    pub fn session(&self, session_id: &Uuid) -> Option<Session> {
        self.sessions.get(session_id)
    }

    /// Runs one action against a session.
    ///
    /// The session lock is released before the gateway is called, so a slow
    /// insert does not hold up other visitors. Blocks on the gateway.
    ///
    /// The new state is only written if the session is still in the state the
    /// action started from. Once the record is saved the outcome stands, even
    /// if the session expired or was swept during the insert.
    pub fn perform(&self, session_id: &Uuid, action: Action) -> Result<(Session, Outcome), Error> {
        let session: Session = match self.sessions.get(session_id) {
            Some(session) => session,
            None => return Err(Error::Registration(RegistrationError::SessionNotFound)),
        };
        let action_name = action.name();
        let current_state = session.get_state();
        let (next_state, outcome) = apply(
            current_state,
            session.get_invitee(),
            action,
            self.gateway.as_ref(),
            Utc::now(),
        )?;
        if next_state == current_state {
            return Ok((session, outcome));
        }
        match self.sessions.set_state(session_id, current_state, next_state) {
            StateChange::Applied(session) => {
                debug!(
                    "Session {} moved from {:?} to {:?}",
                    session_id, current_state, next_state
                );
                Ok((session, outcome))
            }
            StateChange::Superseded(session) => {
                warn!(
                    "Session {} left {:?} while {} was running, now {:?}",
                    session_id,
                    current_state,
                    action_name,
                    session.get_state()
                );
                Err(Error::Registration(RegistrationError::ActionNotAvailable {
                    action: action_name,
                    state: session.get_state(),
                }))
            }
            StateChange::Missing => {
                debug!("Session {} was swept while {} was running", session_id, action_name);
                Ok((session.with_state(next_state), outcome))
            }
        }
    }

    pub fn remove_expired_sessions(&self) -> usize {
        self.sessions.remove_expired_sessions()
    }
}
