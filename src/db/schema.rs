// Schema initialization, run once at startup.

use color_eyre::Result;

pub async fn create_schema(conn: &libsql::Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'student',
            profile_pic TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS user_sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            category TEXT NOT NULL,
            thumbnail TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            id INTEGER PRIMARY KEY,
            course_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            video_url TEXT,
            position INTEGER NOT NULL,
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_lessons_course_position
        ON lessons(course_id, position)
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS quizzes (
            id INTEGER PRIMARY KEY,
            lesson_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(lesson_id) REFERENCES lessons(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    // One quiz per lesson; the original platform assumed this everywhere
    // but never enforced it.
    conn.execute(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_quizzes_unique_lesson
        ON quizzes(lesson_id)
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_questions (
            id INTEGER PRIMARY KEY,
            quiz_id INTEGER NOT NULL,
            question TEXT NOT NULL,
            correct_answer TEXT NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY(quiz_id) REFERENCES quizzes(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_options (
            id INTEGER PRIMARY KEY,
            question_id INTEGER NOT NULL,
            option TEXT NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY(question_id) REFERENCES quiz_questions(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    // Single source of truth for student progress. One row per
    // (user, course); the per-user embedded mirror the original kept is
    // replaced by read-side joins.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS progress (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            course_id INTEGER NOT NULL,
            completion_percentage REAL NOT NULL DEFAULT 0,
            is_course_completed BOOLEAN NOT NULL DEFAULT 0,
            date_last_accessed TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_progress_unique_user_course
        ON progress(user_id, course_id)
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS progress_lessons (
            progress_id INTEGER NOT NULL,
            lesson_id INTEGER NOT NULL,
            FOREIGN KEY(progress_id) REFERENCES progress(id) ON DELETE CASCADE,
            FOREIGN KEY(lesson_id) REFERENCES lessons(id) ON DELETE CASCADE,
            UNIQUE(progress_id, lesson_id)
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS progress_quizzes (
            progress_id INTEGER NOT NULL,
            quiz_id INTEGER NOT NULL,
            score REAL NOT NULL DEFAULT 0,
            FOREIGN KEY(progress_id) REFERENCES progress(id) ON DELETE CASCADE,
            FOREIGN KEY(quiz_id) REFERENCES quizzes(id) ON DELETE CASCADE,
            UNIQUE(progress_id, quiz_id)
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS certificate_policies (
            id INTEGER PRIMARY KEY,
            course_id INTEGER NOT NULL UNIQUE,
            min_lectures_required INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS course_feedback (
            id INTEGER PRIMARY KEY,
            course_id INTEGER NOT NULL,
            student_id INTEGER NOT NULL,
            rating INTEGER NOT NULL,
            comment TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE CASCADE,
            FOREIGN KEY(student_id) REFERENCES users(id) ON DELETE CASCADE,
            UNIQUE(course_id, student_id)
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS community_posts (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS post_comments (
            id INTEGER PRIMARY KEY,
            post_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            text TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(post_id) REFERENCES community_posts(id) ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS post_likes (
            post_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(post_id) REFERENCES community_posts(id) ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
            UNIQUE(post_id, user_id)
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS challenges (
            id INTEGER PRIMARY KEY,
            course_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            starter_code TEXT NOT NULL,
            expected_output TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    Ok(())
}
