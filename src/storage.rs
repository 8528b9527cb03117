//! Chat turn log
//!
//! Fire-and-forget persistence of (user message, bot reply, mode) rows.
//! Postgres when a database URL is configured, in-memory otherwise; a
//! logging failure must never affect the reply already computed, so callers
//! warn and move on.

use crate::config::Config;
use crate::error::BotError;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: Uuid,
    pub user_message: String,
    pub bot_reply: String,
    pub mode: Option<String>,
    pub created_at: DateTime<Utc>,
}

enum LogBackend {
    InMemory {
        rows: Arc<RwLock<Vec<ChatRecord>>>,
    },
    Postgres {
        pool: PgPool,
        schema_ready: Arc<OnceCell<()>>,
    },
}

pub struct ChatLog {
    backend: LogBackend,
}

impl ChatLog {
    pub fn new(config: &Config) -> Self {
        if let Some(url) = config.database_url.as_deref() {
            match sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect_lazy(url)
            {
                Ok(pool) => {
                    info!("Chat log backend: postgres");
                    return Self {
                        backend: LogBackend::Postgres {
                            pool,
                            schema_ready: Arc::new(OnceCell::new()),
                        },
                    };
                }
                Err(error) => {
                    warn!(
                        "Failed to initialize postgres chat log, falling back to in-memory: {}",
                        error
                    );
                }
            }
        }

        info!("Chat log backend: in-memory");
        Self {
            backend: LogBackend::InMemory {
                rows: Arc::new(RwLock::new(Vec::new())),
            },
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: LogBackend::InMemory {
                rows: Arc::new(RwLock::new(Vec::new())),
            },
        }
    }

    async fn ensure_schema_if_needed(&self) -> Result<()> {
        let LogBackend::Postgres { pool, schema_ready } = &self.backend else {
            return Ok(());
        };

        schema_ready
            .get_or_try_init(|| async {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS chats (
                      id UUID PRIMARY KEY,
                      user_message TEXT NOT NULL,
                      bot_reply TEXT NOT NULL,
                      mode TEXT,
                      created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    );
                    "#,
                )
                .execute(pool)
                .await?;

                Ok::<(), sqlx::Error>(())
            })
            .await
            .map_err(|e| BotError::Database(format!("Failed to initialize chat schema: {}", e)))?;

        Ok(())
    }

    /// Persist one turn. Callers treat failure as log-and-continue.
    pub async fn log_chat(
        &self,
        user_message: &str,
        bot_reply: &str,
        mode: Option<&str>,
    ) -> Result<()> {
        let record = ChatRecord {
            id: Uuid::new_v4(),
            user_message: user_message.to_string(),
            bot_reply: bot_reply.to_string(),
            mode: mode.map(|m| m.to_string()),
            created_at: Utc::now(),
        };

        match &self.backend {
            LogBackend::InMemory { rows } => {
                rows.write().await.push(record);
                Ok(())
            }
            LogBackend::Postgres { pool, .. } => {
                self.ensure_schema_if_needed().await?;

                sqlx::query(
                    "INSERT INTO chats (id, user_message, bot_reply, mode, created_at) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(record.id)
                .bind(&record.user_message)
                .bind(&record.bot_reply)
                .bind(&record.mode)
                .bind(record.created_at)
                .execute(pool)
                .await
                .map_err(|e| BotError::Database(format!("Failed to insert chat row: {}", e)))?;

                Ok(())
            }
        }
    }

    /// Most recent turns, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<ChatRecord>> {
        match &self.backend {
            LogBackend::InMemory { rows } => {
                let rows = rows.read().await;
                Ok(rows.iter().rev().take(limit).cloned().collect())
            }
            LogBackend::Postgres { pool, .. } => {
                self.ensure_schema_if_needed().await?;

                let rows = sqlx::query(
                    "SELECT id, user_message, bot_reply, mode, created_at \
                     FROM chats ORDER BY created_at DESC LIMIT $1",
                )
                .bind(limit as i64)
                .fetch_all(pool)
                .await
                .map_err(|e| BotError::Database(format!("Failed to load chat rows: {}", e)))?;

                Ok(rows
                    .into_iter()
                    .map(|row| ChatRecord {
                        id: row.try_get("id").unwrap_or_else(|_| Uuid::new_v4()),
                        user_message: row.try_get("user_message").unwrap_or_default(),
                        bot_reply: row.try_get("bot_reply").unwrap_or_default(),
                        mode: row.try_get("mode").ok(),
                        created_at: row.try_get("created_at").unwrap_or_else(|_| Utc::now()),
                    })
                    .collect())
            }
        }
    }
}
