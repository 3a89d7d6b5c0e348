use crate::{
    database::{
        establish_pool, get_connection, run_migrations, save_invitation, SqlitePool,
        INVITATION_MIGRATIONS,
    },
    error::{DatabaseError, Error},
    invitation::InvitationRecord,
    r#trait::InvitationGateway,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub struct SqliteGateway {
    pool: SqlitePool,
}

impl SqliteGateway {
    ///Opens the pool and brings the `invitations` table up to date.
    pub fn connect(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = establish_pool(database_url, max_connections)?;
        run_migrations(&mut *get_connection(&pool)?, INVITATION_MIGRATIONS)?;
        info!("Invitation store ready at {}", database_url);
        Ok(Self { pool })
    }
}

impl InvitationGateway for SqliteGateway {
    fn insert(&self, record: &InvitationRecord) -> Result<usize, Error> {
        save_invitation(&mut *get_connection(&self.pool)?, record)
    }
}

#[derive(Default)]
pub struct MemoryGateway {
    records: RwLock<Vec<InvitationRecord>>,
    unavailable: AtomicBool,
}

impl MemoryGateway {
    pub fn records(&self) -> Vec<InvitationRecord> {
        self.records.read().to_owned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    ///While set, every insert fails as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl InvitationGateway for MemoryGateway {
    fn insert(&self, record: &InvitationRecord) -> Result<usize, Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::GatewayUnavailable));
        }
        self.records.write().push(record.to_owned());
        Ok(1)
    }
}
