use std::net::IpAddr;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentinel_fw_domain::{AddressId, BlockRecord, Comment, DomainError, HistoryEvent, Tag};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use sentinel_fw_application::ports::{StorePort, StoreStats};

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::Database(e.to_string())
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DomainError::Database(format!("corrupt timestamp '{raw}': {e}")))
}

/// The durable table of blocked addresses, address identifiers, and
/// per-address history/tags/comments. The write and read pools are split so
/// the scheduler's expiry sweep never starves a `list`/`ip-history` command.
pub struct SqliteStore {
    write_pool: SqlitePool,
    read_pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(write_pool: SqlitePool, read_pool: SqlitePool) -> Self {
        Self {
            write_pool,
            read_pool,
        }
    }
}

#[async_trait]
impl StorePort for SqliteStore {
    async fn get_or_create_address_id(&self, ip: IpAddr) -> Result<AddressId, DomainError> {
        let ip_text = ip.to_string();
        if let Some(row) = sqlx::query("SELECT id FROM ip_addresses WHERE ip = ?1")
            .bind(&ip_text)
            .fetch_optional(&self.write_pool)
            .await
            .map_err(db_err)?
        {
            let raw: String = row.try_get("id").map_err(db_err)?;
            return AddressId::from_str(&raw)
                .map_err(|e| DomainError::Database(format!("corrupt address id: {e}")));
        }

        let id = AddressId::new();
        let id_text = id.to_string();
        // INSERT OR IGNORE: a concurrent caller may have won the race between
        // the SELECT above and this INSERT; either way `ip` now has exactly
        // one row.
        sqlx::query("INSERT OR IGNORE INTO ip_addresses (id, ip) VALUES (?1, ?2)")
            .bind(&id_text)
            .bind(&ip_text)
            .execute(&self.write_pool)
            .await
            .map_err(db_err)?;

        let row = sqlx::query("SELECT id FROM ip_addresses WHERE ip = ?1")
            .bind(&ip_text)
            .fetch_one(&self.write_pool)
            .await
            .map_err(db_err)?;
        let raw: String = row.try_get("id").map_err(db_err)?;
        AddressId::from_str(&raw).map_err(|e| DomainError::Database(format!("corrupt address id: {e}")))
    }

    async fn upsert_block(&self, record: &BlockRecord) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO blocked_ips (address, blocked_at, duration_seconds) VALUES (?1, ?2, ?3)
             ON CONFLICT(address) DO UPDATE SET blocked_at = excluded.blocked_at, duration_seconds = excluded.duration_seconds",
        )
        .bind(record.address.to_string())
        .bind(record.blocked_at.to_rfc3339())
        .bind(record.duration_seconds)
        .execute(&self.write_pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_block(&self, addr: IpAddr) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM blocked_ips WHERE address = ?1")
            .bind(addr.to_string())
            .execute(&self.write_pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_blocks(&self) -> Result<Vec<BlockRecord>, DomainError> {
        let rows = sqlx::query("SELECT address, blocked_at, duration_seconds FROM blocked_ips")
            .fetch_all(&self.read_pool)
            .await
            .map_err(db_err)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let address_text: String = row.try_get("address").map_err(db_err)?;
            let blocked_at_text: String = row.try_get("blocked_at").map_err(db_err)?;
            let duration_seconds: i64 = row.try_get("duration_seconds").map_err(db_err)?;
            let address = address_text
                .parse()
                .map_err(|_| DomainError::Database(format!("corrupt address '{address_text}'")))?;
            out.push(BlockRecord::new(
                address,
                parse_time(&blocked_at_text)?,
                duration_seconds,
            ));
        }
        Ok(out)
    }

    async fn remove_all_expired(&self, now: DateTime<Utc>) -> Result<Vec<BlockRecord>, DomainError> {
        let all = self.list_blocks().await?;
        let (expired, _remaining): (Vec<_>, Vec<_>) =
            all.into_iter().partition(|b| b.is_expired_at(now));
        for record in &expired {
            self.delete_block(record.address).await?;
        }
        Ok(expired)
    }

    async fn insert_history(&self, event: HistoryEvent) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO ip_history (address_id, time, message) VALUES (?1, ?2, ?3)")
            .bind(event.address_id.to_string())
            .bind(event.time.to_rfc3339())
            .bind(event.message)
            .execute(&self.write_pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_history(&self, address_id: AddressId) -> Result<Vec<HistoryEvent>, DomainError> {
        let rows = sqlx::query(
            "SELECT time, message FROM ip_history WHERE address_id = ?1 ORDER BY time ASC",
        )
        .bind(address_id.to_string())
        .fetch_all(&self.read_pool)
        .await
        .map_err(db_err)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let time_text: String = row.try_get("time").map_err(db_err)?;
            let message: String = row.try_get("message").map_err(db_err)?;
            out.push(HistoryEvent::new(address_id, parse_time(&time_text)?, message));
        }
        Ok(out)
    }

    async fn insert_tag(&self, tag: Tag) -> Result<(), DomainError> {
        sqlx::query("INSERT OR IGNORE INTO ip_tags (address_id, value) VALUES (?1, ?2)")
            .bind(tag.address_id.to_string())
            .bind(tag.value)
            .execute(&self.write_pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_tag(&self, address_id: AddressId, value: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM ip_tags WHERE address_id = ?1 AND value = ?2")
            .bind(address_id.to_string())
            .bind(value)
            .execute(&self.write_pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_tags(&self, address_id: AddressId) -> Result<Vec<Tag>, DomainError> {
        let rows = sqlx::query("SELECT value FROM ip_tags WHERE address_id = ?1")
            .bind(address_id.to_string())
            .fetch_all(&self.read_pool)
            .await
            .map_err(db_err)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let value: String = row.try_get("value").map_err(db_err)?;
            out.push(Tag { address_id, value });
        }
        Ok(out)
    }

    async fn insert_comment(&self, comment: Comment) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO ip_comments (address_id, time, text) VALUES (?1, ?2, ?3)")
            .bind(comment.address_id.to_string())
            .bind(comment.time.to_rfc3339())
            .bind(comment.text)
            .execute(&self.write_pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_comments(&self, address_id: AddressId) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query(
            "SELECT time, text FROM ip_comments WHERE address_id = ?1 ORDER BY time ASC",
        )
        .bind(address_id.to_string())
        .fetch_all(&self.read_pool)
        .await
        .map_err(db_err)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let time_text: String = row.try_get("time").map_err(db_err)?;
            let text: String = row.try_get("text").map_err(db_err)?;
            out.push(Comment {
                address_id,
                time: parse_time(&time_text)?,
                text,
            });
        }
        Ok(out)
    }

    async fn stats(&self) -> Result<StoreStats, DomainError> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM blocked_ips")
            .fetch_one(&self.read_pool)
            .await
            .map_err(db_err)?
            .try_get("n")
            .map_err(db_err)?;

        let recent_fails: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM ip_history WHERE message LIKE '%fail%' COLLATE NOCASE",
        )
        .fetch_one(&self.read_pool)
        .await
        .map_err(db_err)?
        .try_get("n")
        .map_err(db_err)?;

        let last_seen = sqlx::query("SELECT MAX(blocked_at) AS t FROM blocked_ips")
            .fetch_one(&self.read_pool)
            .await
            .map_err(db_err)?
            .try_get::<Option<String>, _>("t")
            .map_err(db_err)?
            .map(|t| parse_time(&t))
            .transpose()?;

        Ok(StoreStats {
            total,
            recent_fails,
            last_seen,
        })
    }
}
