/*
 * Responsibility
 * - movies テーブル向け SQLx 操作
 * - 出演者 (actor_movies 経由) の名前を一緒に返す
 */
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub release_date: NaiveDateTime,
    pub actors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDateTime,
}

#[async_trait]
pub trait MovieRepo: Send + Sync {
    /// Most recent first (id DESC).
    async fn list(&self, limit: i64) -> Result<Vec<MovieRow>, RepoError>;
    async fn get(&self, id: i32) -> Result<Option<MovieRow>, RepoError>;
    async fn insert(&self, movie: NewMovie) -> Result<MovieRow, RepoError>;
    async fn update(&self, movie: &MovieRow) -> Result<(), RepoError>;
    async fn delete(&self, id: i32) -> Result<bool, RepoError>;
}

const SELECT_MOVIES: &str = r#"
    SELECT
        m.id, m.title, m.release_date,
        COALESCE(
            array_agg(a.name ORDER BY a.id) FILTER (WHERE a.id IS NOT NULL),
            '{}'
        )::text[] AS actors
    FROM movies m
    LEFT JOIN actor_movies am ON am.movie_id = m.id
    LEFT JOIN actors a ON a.id = am.actor_id
"#;

#[derive(Clone, Debug)]
pub struct PgMovieRepo {
    db: PgPool,
}

impl PgMovieRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepo for PgMovieRepo {
    async fn list(&self, limit: i64) -> Result<Vec<MovieRow>, RepoError> {
        let sql = format!("{SELECT_MOVIES} GROUP BY m.id ORDER BY m.id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<MovieRow>, RepoError> {
        let sql = format!("{SELECT_MOVIES} WHERE m.id = $1 GROUP BY m.id");
        let row = sqlx::query_as::<_, MovieRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    async fn insert(&self, movie: NewMovie) -> Result<MovieRow, RepoError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (title, release_date)
            VALUES ($1, $2)
            RETURNING id, title, release_date, '{}'::text[] AS actors
            "#,
        )
        .bind(&movie.title)
        .bind(movie.release_date)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn update(&self, movie: &MovieRow) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE movies
            SET title = $2, release_date = $3
            WHERE id = $1
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(movie.release_date)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            WITH unlinked AS (
                DELETE FROM actor_movies WHERE movie_id = $1
            )
            DELETE FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
