use color_eyre::Result;
use libsql::params;

use super::helpers::{query_all, query_count, query_one, query_optional};
use super::models::{CommentRow, PostRow, PostView};
use super::Db;
use crate::names;

impl Db {
    pub async fn create_post(&self, user_id: i64, title: &str, content: &str) -> Result<PostRow> {
        let conn = self.connect().await?;
        let post_id = query_count(
            &conn,
            "INSERT INTO community_posts (user_id, title, content) VALUES (?, ?, ?) RETURNING id",
            params![user_id, title, content],
        )
        .await?;

        tracing::info!("new post created: id={post_id}, user_id={user_id}");

        query_one(
            &conn,
            r#"
            SELECT p.id, p.user_id, u.name AS author_name, p.title, p.content,
                   0 AS likes, p.created_at
            FROM community_posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = ?
            "#,
            params![post_id],
        )
        .await
    }

    pub async fn post_exists(&self, post_id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let exists = query_count(
            &conn,
            "SELECT EXISTS(SELECT 1 FROM community_posts WHERE id = ?)",
            params![post_id],
        )
        .await?;
        Ok(exists > 0)
    }

    /// Latest posts with their comments, newest first.
    pub async fn posts(&self) -> Result<Vec<PostView>> {
        let conn = self.connect().await?;

        let posts: Vec<PostRow> = query_all(
            &conn,
            r#"
            SELECT p.id, p.user_id, u.name AS author_name, p.title, p.content,
                   (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS likes,
                   p.created_at
            FROM community_posts p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.id DESC
            LIMIT ?
            "#,
            params![names::COMMUNITY_FEED_LIMIT],
        )
        .await?;

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let comments: Vec<CommentRow> = query_all(
                &conn,
                r#"
                SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.text, c.created_at
                FROM post_comments c
                JOIN users u ON u.id = c.user_id
                WHERE c.post_id = ?
                ORDER BY c.id
                "#,
                params![post.id],
            )
            .await?;
            views.push(PostView { post, comments });
        }
        Ok(views)
    }

    pub async fn add_comment(
        &self,
        post_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<Option<CommentRow>> {
        let conn = self.connect().await?;

        if !self.post_exists(post_id).await? {
            return Ok(None);
        }

        let comment_id = query_count(
            &conn,
            "INSERT INTO post_comments (post_id, user_id, text) VALUES (?, ?, ?) RETURNING id",
            params![post_id, user_id, text],
        )
        .await?;

        tracing::info!("comment added: id={comment_id}, post_id={post_id}");

        query_optional(
            &conn,
            r#"
            SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.text, c.created_at
            FROM post_comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = ?
            "#,
            params![comment_id],
        )
        .await
    }

    /// Toggle the student's like on a post. Returns the new like count, or
    /// None when the post does not exist.
    pub async fn toggle_like(&self, post_id: i64, user_id: i64) -> Result<Option<i64>> {
        let conn = self.connect().await?;

        if !self.post_exists(post_id).await? {
            return Ok(None);
        }

        let removed = conn
            .execute(
                "DELETE FROM post_likes WHERE post_id = ? AND user_id = ?",
                params![post_id, user_id],
            )
            .await?;

        if removed == 0 {
            conn.execute(
                "INSERT OR IGNORE INTO post_likes (post_id, user_id) VALUES (?, ?)",
                params![post_id, user_id],
            )
            .await?;
        }

        let likes = query_count(
            &conn,
            "SELECT COUNT(*) FROM post_likes WHERE post_id = ?",
            params![post_id],
        )
        .await?;

        Ok(Some(likes))
    }
}
