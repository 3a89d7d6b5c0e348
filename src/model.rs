use diesel::{Insertable, Queryable};

use crate::schema::invitations;

#[derive(Insertable, Queryable, Debug)]
#[diesel(table_name = invitations)]
pub struct InvitationModel {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub submitted_at: String,
}

impl InvitationModel {
    pub fn new(
        id: String,
        name: String,
        email: String,
        phone: String,
        message: String,
        status: String,
        submitted_at: String,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            message,
            status,
            submitted_at,
        }
    }
}
