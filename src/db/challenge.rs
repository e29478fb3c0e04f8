use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_one, query_optional};
use super::models::Challenge;
use super::Db;
use crate::models::{ChallengeUpdate, ChallengeUpload};

const CHALLENGE_COLUMNS: &str =
    "id, course_id, title, description, starter_code, expected_output, difficulty, created_at";

impl Db {
    pub async fn create_challenge(&self, upload: &ChallengeUpload) -> Result<Challenge> {
        let conn = self.connect().await?;
        let challenge: Challenge = query_one(
            &conn,
            &format!(
                r#"
                INSERT INTO challenges (course_id, title, description, starter_code, expected_output, difficulty)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING {CHALLENGE_COLUMNS}
                "#
            ),
            params![
                upload.course_id,
                upload.title.clone(),
                upload.description.clone(),
                upload.starter_code.clone(),
                upload.expected_output.clone(),
                upload.difficulty.clone()
            ],
        )
        .await?;

        tracing::info!(
            "new challenge created: id={}, course_id={}",
            challenge.id,
            challenge.course_id
        );
        Ok(challenge)
    }

    pub async fn challenge(&self, challenge_id: i64) -> Result<Option<Challenge>> {
        let conn = self.connect().await?;
        query_optional(
            &conn,
            &format!("SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE id = ?"),
            params![challenge_id],
        )
        .await
    }

    pub async fn challenges_for_course(&self, course_id: i64) -> Result<Vec<Challenge>> {
        let conn = self.connect().await?;
        query_all(
            &conn,
            &format!(
                "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE course_id = ? ORDER BY id DESC"
            ),
            params![course_id],
        )
        .await
    }

    pub async fn update_challenge(
        &self,
        challenge_id: i64,
        update: &ChallengeUpdate,
    ) -> Result<Option<Challenge>> {
        let conn = self.connect().await?;
        let updated: Option<Challenge> = query_optional(
            &conn,
            &format!(
                r#"
                UPDATE challenges
                SET title = ?, description = ?, starter_code = ?, expected_output = ?, difficulty = ?
                WHERE id = ?
                RETURNING {CHALLENGE_COLUMNS}
                "#
            ),
            params![
                update.title.clone(),
                update.description.clone(),
                update.starter_code.clone(),
                update.expected_output.clone(),
                update.difficulty.clone(),
                challenge_id
            ],
        )
        .await?;

        if updated.is_some() {
            tracing::info!("challenge updated: id={challenge_id}");
        }
        Ok(updated)
    }

    pub async fn delete_challenge(&self, challenge_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let affected = conn
            .execute(
                "DELETE FROM challenges WHERE id = ?",
                params![challenge_id],
            )
            .await?;

        if affected > 0 {
            tracing::info!("challenge deleted: id={challenge_id}");
        }
        Ok(affected > 0)
    }
}
