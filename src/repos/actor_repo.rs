/*
 * Responsibility
 * - actors テーブル向け SQLx 操作
 * - 出演作 (actor_movies 経由) のタイトルを一緒に返す
 * - DB エラーは RepoError として返す (HTTP への変換は error.rs)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ActorRow {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub movies: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

#[async_trait]
pub trait ActorRepo: Send + Sync {
    /// Most recent first (id DESC).
    async fn list(&self, limit: i64) -> Result<Vec<ActorRow>, RepoError>;
    async fn get(&self, id: i32) -> Result<Option<ActorRow>, RepoError>;
    async fn insert(&self, actor: NewActor) -> Result<ActorRow, RepoError>;
    async fn update(&self, actor: &ActorRow) -> Result<(), RepoError>;
    /// Returns false when no row matched.
    async fn delete(&self, id: i32) -> Result<bool, RepoError>;
}

const SELECT_ACTORS: &str = r#"
    SELECT
        a.id, a.name, a.age, a.gender,
        COALESCE(
            array_agg(m.title ORDER BY m.id) FILTER (WHERE m.id IS NOT NULL),
            '{}'
        )::text[] AS movies
    FROM actors a
    LEFT JOIN actor_movies am ON am.actor_id = a.id
    LEFT JOIN movies m ON m.id = am.movie_id
"#;

#[derive(Clone, Debug)]
pub struct PgActorRepo {
    db: PgPool,
}

impl PgActorRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActorRepo for PgActorRepo {
    async fn list(&self, limit: i64) -> Result<Vec<ActorRow>, RepoError> {
        let sql = format!("{SELECT_ACTORS} GROUP BY a.id ORDER BY a.id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ActorRow>(&sql)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<ActorRow>, RepoError> {
        let sql = format!("{SELECT_ACTORS} WHERE a.id = $1 GROUP BY a.id");
        let row = sqlx::query_as::<_, ActorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    async fn insert(&self, actor: NewActor) -> Result<ActorRow, RepoError> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            INSERT INTO actors (name, age, gender)
            VALUES ($1, $2, $3)
            RETURNING id, name, age, gender, '{}'::text[] AS movies
            "#,
        )
        .bind(&actor.name)
        .bind(actor.age)
        .bind(&actor.gender)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, actor: &ActorRow) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE actors
            SET name = $2, age = $3, gender = $4
            WHERE id = $1
            "#,
        )
        .bind(actor.id)
        .bind(&actor.name)
        .bind(actor.age)
        .bind(&actor.gender)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            WITH unlinked AS (
                DELETE FROM actor_movies WHERE actor_id = $1
            )
            DELETE FROM actors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
