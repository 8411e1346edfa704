use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                   // assigned by the store on insert
    pub student_no: String,        // 10-char account handle, unique
    pub username: String,          // display name
    #[serde(skip_serializing)]
    pub password_hash: String,     // salted MD5 hex, not exposed in JSON
    pub gender: Option<i16>,
    pub class_no: Option<String>,
    pub phone: Option<String>,
    pub user_role: i16,
    pub created_at: OffsetDateTime,
}

/// Fields supplied when inserting a new user; everything else is defaulted
/// by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub student_no: String,
    pub username: String,
    pub password_hash: String,
}

/// Copy of a user record with the password hash removed, safe to hand to
/// callers and to park in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: i64,
    pub username: String,
    pub student_no: String,
    pub gender: Option<i16>,
    pub class_no: Option<String>,
    pub phone: Option<String>,
    pub user_role: i16,
    pub created_at: OffsetDateTime,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            student_no: user.student_no.clone(),
            gender: user.gender,
            class_no: user.class_no.clone(),
            phone: user.phone.clone(),
            user_role: user.user_role,
            created_at: user.created_at,
        }
    }
}
