use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::{eyre::OptionExt, Result};
use libsql::params;
use ulid::Ulid;

use super::helpers::{query_count, query_optional};
use super::models::AuthUser;
use super::Db;

impl Db {
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<i64> {
        let password_hash = hash_password(password)?;
        let conn = self.connect().await?;

        let user_id = query_count(
            &conn,
            "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?) RETURNING id",
            params![name, email, password_hash, role],
        )
        .await?;

        tracing::info!("new user created: id={user_id}, email={email}, role={role}");
        Ok(user_id)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            "SELECT id, name, email, role, profile_pic FROM users WHERE email = ?",
            params![email],
        )
        .await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.connect().await?;
        let exists = query_count(
            &conn,
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)",
            params![email],
        )
        .await?;
        Ok(exists > 0)
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                "SELECT password_hash FROM users WHERE email = ?",
                params![email],
            )
            .await?
            .next()
            .await?;

        match row {
            Some(row) => {
                let stored_hash = row.get::<String>(0)?;
                Ok(verify_password(password, &stored_hash))
            }
            None => Ok(false),
        }
    }

    pub async fn create_user_session(&self, user_id: i64) -> Result<String> {
        let session = Ulid::new().to_string();
        let conn = self.connect().await?;

        conn.execute(
            "INSERT INTO user_sessions (id, user_id) VALUES (?, ?)",
            params![session.clone(), user_id],
        )
        .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            r#"
            SELECT u.id, u.name, u.email, u.role, u.profile_pic
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            "#,
            params![session_id],
        )
        .await
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        let conn = self.connect().await?;
        conn.execute(
            "DELETE FROM user_sessions WHERE id = ?",
            params![session_id],
        )
        .await?;
        Ok(())
    }

    /// Change password for an authenticated user. Verifies the current
    /// password first.
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        let conn = self.connect().await?;
        let row = conn
            .query(
                "SELECT password_hash FROM users WHERE id = ?",
                params![user_id],
            )
            .await?
            .next()
            .await?;

        let stored_hash = match row {
            Some(row) => row.get::<String>(0)?,
            None => return Ok(false),
        };

        if !verify_password(current_password, &stored_hash) {
            return Ok(false);
        }

        let new_hash = hash_password(new_password)?;
        conn.execute(
            "UPDATE users SET password_hash = ? WHERE id = ?",
            params![new_hash, user_id],
        )
        .await?;

        Ok(true)
    }

    pub async fn update_user_name(&self, user_id: i64, name: &str) -> Result<AuthUser> {
        let conn = self.connect().await?;
        conn.execute(
            "UPDATE users SET name = ? WHERE id = ?",
            params![name, user_id],
        )
        .await?;

        query_optional(
            &conn,
            "SELECT id, name, email, role, profile_pic FROM users WHERE id = ?",
            params![user_id],
        )
        .await?
        .ok_or_eyre("user not found after update")
    }

    pub async fn update_profile_pic(&self, user_id: i64, profile_pic: &str) -> Result<()> {
        let conn = self.connect().await?;
        conn.execute(
            "UPDATE users SET profile_pic = ? WHERE id = ?",
            params![profile_pic, user_id],
        )
        .await?;
        Ok(())
    }
}

/// Run argon2 hashing on a dedicated thread with a large stack to avoid
/// stack overflow in debug builds.
fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024) // 4 MB stack
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("hash thread panicked"))?
}

fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024)
        .spawn(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(h) => h,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}
