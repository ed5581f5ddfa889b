use sqlx::{FromRow, PgPool};
use thiserror::Error;
use time::Date;
use uuid::Uuid;

/// Full user row. Only `find_by_login` materializes this, for password
/// verification during login; the hash never leaves the crate.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub login: String,
    pub password_hash: String,
}

/// Non-secret fields exposed through the profile view.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub login: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub date_of_birth: Date,
    pub phone_number: String,
}

/// Fields accepted by `User::create`. All validated upstream.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub login: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
    pub date_of_birth: Date,
    pub phone_number: &'a str,
}

/// The mutable field set for `User::update_profile`. Login and the password
/// hash are deliberately absent.
#[derive(Debug)]
pub struct ProfileChanges<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
    pub date_of_birth: Date,
    pub phone_number: &'a str,
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("login already taken")]
    DuplicateLogin,
    #[error("email already taken")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum UpdateProfileError {
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl User {
    /// Insert a new user in a single statement. Uniqueness of login and email
    /// is enforced by the database constraints alone; a concurrent duplicate
    /// registration surfaces here as a unique violation, never as a lost
    /// update. `created_at` and `updated_at` start equal.
    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> Result<Uuid, CreateUserError> {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO users (login, email, password_hash, name, surname,
                               date_of_birth, phone_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
            RETURNING user_id
            "#,
        )
        .bind(new.login)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.name)
        .bind(new.surname)
        .bind(new.date_of_birth)
        .bind(new.phone_number)
        .fetch_one(db)
        .await
        .map_err(map_unique_violation)?;
        Ok(row.0)
    }

    /// Find a user by login for credential verification.
    pub async fn find_by_login(db: &PgPool, login: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, login, password_hash
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Fetch the profile view. Excludes the password hash by construction.
    pub async fn get_profile(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT login, email, name, surname, date_of_birth, phone_number
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Replace the mutable profile fields in one statement so concurrent
    /// updates to the same row serialize on the row lock and never interleave
    /// partial writes. `updated_at` must strictly advance even when two
    /// commits land within one clock tick, hence the GREATEST guard.
    /// `created_at` and `login` are untouched.
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        changes: &ProfileChanges<'_>,
    ) -> Result<(), UpdateProfileError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $1, name = $2, surname = $3, date_of_birth = $4,
                phone_number = $5,
                updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond')
            WHERE user_id = $6
            "#,
        )
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.surname)
        .bind(changes.date_of_birth)
        .bind(changes.phone_number)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(UpdateProfileError::NotFound);
        }
        Ok(())
    }
}

fn map_unique_violation(e: sqlx::Error) -> CreateUserError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some("users_login_key") => CreateUserError::DuplicateLogin,
                _ => CreateUserError::DuplicateEmail,
            };
        }
    }
    CreateUserError::Database(e)
}
