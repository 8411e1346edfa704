use crate::auth::repo_types::{NewUser, User};
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence seam for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return its assigned id.
    async fn create(&self, user: &NewUser) -> anyhow::Result<i64>;

    /// Number of records carrying this student number.
    async fn count_by_student_no(&self, student_no: &str) -> anyhow::Result<i64>;

    /// Look up a user by student number and password digest.
    async fn find_by_student_no_and_hash(
        &self,
        student_no: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &NewUser) -> anyhow::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (student_no, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.student_no)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn count_by_student_no(&self, student_no: &str) -> anyhow::Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM users WHERE student_no = $1"#)
                .bind(student_no)
                .fetch_one(&self.db)
                .await?;
        Ok(count)
    }

    async fn find_by_student_no_and_hash(
        &self,
        student_no: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, student_no, username, password_hash,
                   gender, class_no, phone, user_role, created_at
            FROM users
            WHERE student_no = $1 AND password_hash = $2
            "#,
        )
        .bind(student_no)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
