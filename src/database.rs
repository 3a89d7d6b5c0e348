use crate::error::{DatabaseError, DieselResultError, Error, R2d2Error};
use crate::invitation::InvitationRecord;
use crate::schema::invitations as invitation_table;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::{sqlite::Sqlite, RunQueryDsl, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

pub const INVITATION_MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

pub fn establish_pool(database_url: &str, max_size: u32) -> Result<SqlitePool, Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    match Pool::builder().max_size(max_size).build(manager) {
        Ok(pool) => Ok(pool),
        Err(err) => Err(Error::Database(DatabaseError::BuildConnectionPool(
            R2d2Error(err),
        ))),
    }
}

pub fn get_connection(
    pool: &SqlitePool,
) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, Error> {
    match pool.get() {
        Ok(connection) => Ok(connection),
        Err(err) => Err(Error::Database(DatabaseError::GetPooledConnection(
            R2d2Error(err),
        ))),
    }
}

pub fn run_migrations(
    connection: &mut impl MigrationHarness<Sqlite>,
    embedded_migrations: EmbeddedMigrations,
) -> Result<(), Error> {
    match connection.run_pending_migrations(embedded_migrations) {
        Ok(applied) => {
            for version in applied {
                info!("Applied migration {}", version);
            }
            Ok(())
        }
        Err(err) => Err(Error::Database(DatabaseError::RunMigrations(
            err.to_string(),
        ))),
    }
}

pub fn save_invitation(
    connection: &mut SqliteConnection,
    invitation: &InvitationRecord,
) -> Result<usize, Error> {
    match diesel::insert_into(invitation_table::table)
        .values(invitation.to_model())
        .execute(connection)
    {
        Ok(rows_affected) => {
            debug!("Inserted invitation {}", invitation.get_id());
            Ok(rows_affected)
        }
        Err(err) => Err(Error::Database(DatabaseError::DatabaseInsertInvitation(
            DieselResultError(err),
        ))),
    }
}
