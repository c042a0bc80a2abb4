use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::room::normalize_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Staff,
    Unspecified,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Unspecified => "user",
        }
    }

    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            _ => Role::Unspecified,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub tg_id: i64,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_stored(&self.role)
    }

    pub async fn find(pool: &sqlx::SqlitePool, tg_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT tg_id, name, role, created_at FROM users WHERE tg_id = ?",
        )
        .bind(tg_id)
        .fetch_optional(pool)
        .await
    }

    /// Creates the user on first contact. Existing rows only change the
    /// fields that are given.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        tg_id: i64,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<Self, sqlx::Error> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        sqlx::query(
            r#"
            INSERT INTO users (tg_id, name, role, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (tg_id) DO UPDATE SET
                name = COALESCE(excluded.name, users.name),
                role = CASE WHEN ? THEN excluded.role ELSE users.role END
            "#,
        )
        .bind(tg_id)
        .bind(name)
        .bind(role.unwrap_or(Role::Unspecified).as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(role.is_some())
        .execute(pool)
        .await?;

        Self::find(pool, tg_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Users that registered a display name.
    pub async fn find_named(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT tg_id, name, role, created_at FROM users WHERE name IS NOT NULL AND name != '' ORDER BY tg_id",
        )
        .fetch_all(pool)
        .await
    }

    pub fn matches_name(&self, staff_name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| normalize_name(name) == normalize_name(staff_name))
    }
}
