use crate::models::{DbFile, DbUser};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_user(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    provider: bool,
    avatar_id: Option<i64>,
) -> Result<DbUser> {
    let now = Utc::now();

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (name, email, provider, avatar_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, name, email, provider, avatar_id, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(provider)
    .bind(avatar_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, provider, avatar_id, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_provider_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbUser>> {
    let provider = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, provider, avatar_id, created_at, updated_at
        FROM users
        WHERE id = $1 AND provider = TRUE
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(provider)
}

pub async fn create_file(pool: &Pool<Postgres>, name: &str, path: &str) -> Result<DbFile> {
    let file = sqlx::query_as::<_, DbFile>(
        r#"
        INSERT INTO files (name, path)
        VALUES ($1, $2)
        RETURNING id, name, path, created_at
        "#,
    )
    .bind(name)
    .bind(path)
    .fetch_one(pool)
    .await?;

    Ok(file)
}
