use crate::models::DbNotification;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_notification(
    pool: &Pool<Postgres>,
    content: &str,
    user_id: i64,
) -> Result<DbNotification> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let notification = sqlx::query_as::<_, DbNotification>(
        r#"
        INSERT INTO notifications (id, content, user_id, read, created_at, updated_at)
        VALUES ($1, $2, $3, FALSE, $4, $4)
        RETURNING id, content, user_id, read, created_at
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(notification)
}
