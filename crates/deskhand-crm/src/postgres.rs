//! Postgres-backed contact store.
//!
//! Expresses the `ContactFilter` tiers as ILIKE predicates over the synced
//! `contacts` table. Keeps the store's natural return order for filtered
//! queries; only the no-filter tier orders by recency.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::contacts::{ContactFilter, ContactRecord, ContactStore};

const CONTACT_COLUMNS: &str = "id, location_id, first_name, last_name, full_name, \
     email, phone, tags, custom_fields, sync_status, date_added, date_updated";

#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(needle: &str) -> String {
    format!("%{}%", needle)
}

fn row_to_record(row: sqlx::postgres::PgRow) -> ContactRecord {
    let tags: serde_json::Value = row.try_get("tags").unwrap_or(serde_json::Value::Null);
    ContactRecord {
        id: row.get("id"),
        location_id: row.get("location_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        tags: serde_json::from_value(tags).unwrap_or_default(),
        custom_fields: row
            .try_get("custom_fields")
            .unwrap_or(serde_json::Value::Null),
        sync_status: row.get("sync_status"),
        date_added: row.try_get::<Option<DateTime<Utc>>, _>("date_added").unwrap_or(None),
        date_updated: row.try_get::<Option<DateTime<Utc>>, _>("date_updated").unwrap_or(None),
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn search(
        &self,
        location_id: &str,
        filter: &ContactFilter,
        limit: u32,
    ) -> Result<Vec<ContactRecord>> {
        debug!(location_id, ?filter, limit, "contact cache query");

        let rows = match filter {
            ContactFilter::Recent => {
                sqlx::query(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts \
                     WHERE location_id = $1 AND sync_status = 'active' \
                     ORDER BY date_added DESC LIMIT $2"
                ))
                .bind(location_id)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            ContactFilter::SingleToken(token) => {
                sqlx::query(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts \
                     WHERE location_id = $1 AND sync_status = 'active' \
                     AND (first_name ILIKE $2 OR last_name ILIKE $2 OR full_name ILIKE $2) \
                     LIMIT $3"
                ))
                .bind(location_id)
                .bind(like_pattern(token))
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            ContactFilter::TwoTokens { full, first, last } => {
                sqlx::query(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts \
                     WHERE location_id = $1 AND sync_status = 'active' \
                     AND (full_name ILIKE $2 \
                          OR (first_name ILIKE $3 AND last_name ILIKE $4)) \
                     LIMIT $5"
                ))
                .bind(location_id)
                .bind(like_pattern(full))
                .bind(like_pattern(first))
                .bind(like_pattern(last))
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            ContactFilter::Phrase(phrase) => {
                sqlx::query(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts \
                     WHERE location_id = $1 AND sync_status = 'active' \
                     AND (full_name ILIKE $2 OR email ILIKE $2 OR phone ILIKE $2) \
                     LIMIT $3"
                ))
                .bind(location_id)
                .bind(like_pattern(phrase))
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_needle() {
        assert_eq!(like_pattern("bran"), "%bran%");
        assert_eq!(like_pattern("brandon burgan"), "%brandon burgan%");
    }
}
