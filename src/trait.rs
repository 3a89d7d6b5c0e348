use chrono::{DateTime, Utc};

use crate::{error::Error, invitation::InvitationRecord};

/// Write-only seam to the backing store of invitation records.
///
/// `insert` blocks until the store has accepted or refused the record; callers
/// on the async runtime run it through `spawn_blocking`.
pub trait InvitationGateway: Send + Sync + 'static {
    fn insert(&self, record: &InvitationRecord) -> Result<usize, Error>;
}

pub trait Expired {
    fn expired(&self) -> bool;
}

impl Expired for DateTime<Utc> {
    fn expired(&self) -> bool {
        (self.timestamp() - Utc::now().timestamp()).is_negative()
    }
}
