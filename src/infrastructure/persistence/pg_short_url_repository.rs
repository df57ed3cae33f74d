//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{
    AccessScope, OrderDirection, OrderField, ShortUrl, ShortUrlIdentifier, ShortUrlsOrdering,
    ShortUrlsParams, Tag,
};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

const SELECT_SHORT_URLS: &str = r#"
    SELECT
        s.id,
        s.short_code,
        s.domain,
        s.original_url,
        s.created_at,
        s.valid_since,
        s.valid_until,
        s.max_visits,
        s.author_api_key_id,
        ARRAY(
            SELECT t.name
            FROM short_urls_in_tags st
            JOIN tags t ON t.id = st.tag_id
            WHERE st.short_url_id = s.id
            ORDER BY t.name
        ) AS tags
    FROM short_urls s
"#;

#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    short_code: String,
    domain: Option<String>,
    original_url: String,
    created_at: DateTime<Utc>,
    valid_since: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
    max_visits: Option<i64>,
    author_api_key_id: Option<i64>,
    tags: Vec<String>,
}

impl TryFrom<ShortUrlRow> for ShortUrl {
    type Error = AppError;

    fn try_from(row: ShortUrlRow) -> Result<Self, Self::Error> {
        let max_visits = row
            .max_visits
            .map(u32::try_from)
            .transpose()
            .map_err(|_| {
                AppError::internal(
                    "Stored max_visits out of range",
                    json!({ "id": row.id, "max_visits": row.max_visits }),
                )
            })?;

        Ok(
            ShortUrl::new(row.id, row.short_code, row.original_url, row.created_at)
                .with_domain(row.domain)
                .with_author(row.author_api_key_id)
                .with_validity(row.valid_since, row.valid_until)
                .with_max_visits(max_visits)
                .with_tags(row.tags.into_iter().map(Tag::new)),
        )
    }
}

/// PostgreSQL repository for short URLs.
///
/// Listing filters are assembled with [`QueryBuilder`] and always bound as
/// parameters. Ordering only ever uses whitelisted column names.
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &AccessScope) {
    if let Some(owner_id) = scope.owner_id() {
        qb.push(" AND s.author_api_key_id = ").push_bind(owner_id);
    }
}

/// Escapes `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, params: &ShortUrlsParams, scope: &AccessScope) {
    qb.push(" WHERE TRUE");
    push_scope(qb, scope);

    if let Some(term) = params.normalized_search_term() {
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (s.original_url ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.short_code ILIKE ")
            .push_bind(pattern.clone())
            .push(
                " OR EXISTS (SELECT 1 FROM short_urls_in_tags st JOIN tags t ON t.id = st.tag_id \
                 WHERE st.short_url_id = s.id AND t.name ILIKE ",
            )
            .push_bind(pattern)
            .push("))");
    }

    if !params.tags.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM short_urls_in_tags st JOIN tags t ON t.id = st.tag_id \
             WHERE st.short_url_id = s.id AND t.name = ANY(",
        )
        .push_bind(params.tags.clone())
        .push("))");
    }

    if let Some(start) = params.date_range.start {
        qb.push(" AND s.created_at >= ").push_bind(start);
    }
    if let Some(end) = params.date_range.end {
        qb.push(" AND s.created_at <= ").push_bind(end);
    }
}

fn order_clause(ordering: ShortUrlsOrdering) -> String {
    let column = match ordering.field {
        OrderField::ShortCode => "s.short_code",
        OrderField::LongUrl => "s.original_url",
        OrderField::DateCreated => "s.created_at",
    };
    let direction = match ordering.direction {
        OrderDirection::Asc => "ASC",
        OrderDirection::Desc => "DESC",
    };

    format!(" ORDER BY {column} {direction}, s.id {direction}")
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn find_one(
        &self,
        identifier: &ShortUrlIdentifier,
        scope: &AccessScope,
    ) -> Result<Option<ShortUrl>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SHORT_URLS);
        qb.push(" WHERE s.short_code = ")
            .push_bind(identifier.short_code())
            .push(" AND s.domain IS NOT DISTINCT FROM ")
            .push_bind(identifier.domain());
        push_scope(&mut qb, scope);
        qb.push(" LIMIT 1");

        let row = qb
            .build_query_as::<ShortUrlRow>()
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(ShortUrl::try_from).transpose()
    }

    async fn find_list(
        &self,
        params: &ShortUrlsParams,
        scope: &AccessScope,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let offset_limit = params.validate_and_get_offset_limit()?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SHORT_URLS);
        push_filters(&mut qb, params, scope);
        qb.push(order_clause(params.order_by));

        if let Some((offset, limit)) = offset_limit {
            qb.push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(offset);
        }

        let rows = qb
            .build_query_as::<ShortUrlRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(ShortUrl::try_from).collect()
    }

    async fn count_list(
        &self,
        params: &ShortUrlsParams,
        scope: &AccessScope,
    ) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM short_urls s");
        push_filters(&mut qb, params, scope);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn save(&self, short_url: &ShortUrl) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE short_urls SET
                original_url = $2,
                valid_since  = $3,
                valid_until  = $4,
                max_visits   = $5
            WHERE id = $1
            "#,
        )
        .bind(short_url.id)
        .bind(short_url.long_url())
        .bind(short_url.valid_since())
        .bind(short_url.valid_until())
        .bind(short_url.max_visits().map(i64::from))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::short_url_not_found(&ShortUrlIdentifier::new(
                short_url.short_code(),
                short_url.domain().map(str::to_string),
            )));
        }

        sqlx::query("DELETE FROM short_urls_in_tags WHERE short_url_id = $1")
            .bind(short_url.id)
            .execute(&mut *tx)
            .await?;

        let tag_names = short_url.tag_names();
        if !tag_names.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO tags (name)
                SELECT UNNEST($1::text[])
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(&tag_names)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO short_urls_in_tags (short_url_id, tag_id)
                SELECT $1, t.id FROM tags t WHERE t.name = ANY($2)
                "#,
            )
            .bind(short_url.id)
            .bind(tag_names)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(
            order_clause(ShortUrlsOrdering::default()),
            " ORDER BY s.created_at ASC, s.id ASC"
        );
        assert_eq!(
            order_clause("longUrl-DESC".parse().unwrap()),
            " ORDER BY s.original_url DESC, s.id DESC"
        );
    }
}
