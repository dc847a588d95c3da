//! Session repository.
//!
//! `apply_turn` is the only conversational mutator. Writes to the same
//! session id are serialized through a per-id async lock; sessions with
//! different ids proceed independently. Every mutation runs inside a
//! SQLite transaction, so a session's state after `apply_turn` returns is
//! recoverable after a restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::OptionalExtension;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use compass_core::error::CompassError;
use compass_core::session::TurnDelta;
use compass_core::types::{Session, Turn};

use crate::db::Database;

/// Durable, per-session-serialized store of conversation state.
pub struct SessionRepository {
    db: Arc<Database>,
    /// One lock per session id; entries live for the process lifetime.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Turns of transcript retained for display. Structured state is never
    /// truncated.
    transcript_retain: usize,
}

impl SessionRepository {
    pub fn new(db: Arc<Database>, transcript_retain: usize) -> Self {
        Self {
            db,
            locks: Mutex::new(HashMap::new()),
            transcript_retain,
        }
    }

    /// Point lookup by id. Reads are not serialized against writers; they
    /// see the session's latest committed state.
    pub fn get(&self, id: &str) -> Result<Option<Session>, CompassError> {
        self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, created_at, updated_at, profile, results, resources,
                            plan, document, portal
                     FROM sessions WHERE id = ?1",
                    rusqlite::params![id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, String>(5)?,
                            row.get::<_, Option<String>>(6)?,
                            row.get::<_, Option<String>>(7)?,
                            row.get::<_, Option<String>>(8)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| CompassError::Storage(e.to_string()))?;

            let Some((id, created, updated, profile, results, resources, plan, document, portal)) =
                row
            else {
                return Ok(None);
            };

            let mut session = Session::new(id.clone(), epoch_to_utc(created));
            session.updated_at = epoch_to_utc(updated);
            session.profile = serde_json::from_str(&profile)?;
            session.results = serde_json::from_str(&results)?;
            session.resources = serde_json::from_str(&resources)?;
            session.plan = parse_optional(plan)?;
            session.document = parse_optional(document)?;
            session.portal = parse_optional(portal)?;

            let mut stmt = conn
                .prepare(
                    "SELECT user_message, assistant_message, tool_calls, truncated, created_at
                     FROM turns WHERE session_id = ?1 ORDER BY seq ASC",
                )
                .map_err(|e| CompassError::Storage(e.to_string()))?;
            let rows = stmt
                .query_map(rusqlite::params![id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                })
                .map_err(|e| CompassError::Storage(e.to_string()))?;

            for row in rows {
                let (user, assistant, tool_calls, truncated, created_at) =
                    row.map_err(|e| CompassError::Storage(e.to_string()))?;
                session.turns.push(Turn {
                    user_message: user,
                    assistant_message: assistant,
                    tool_calls: serde_json::from_str(&tool_calls)?,
                    truncated: truncated != 0,
                    created_at: epoch_to_utc(created_at),
                });
            }

            Ok(Some(session))
        })
    }

    /// Return the existing session or create an empty one. A caller-supplied
    /// id is kept verbatim; otherwise a fresh UUID is assigned.
    pub async fn create_or_load(&self, id: Option<String>) -> Result<Session, CompassError> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let lock = self.session_lock(&id).await;
        let _guard = lock.lock().await;

        if let Some(session) = self.get(&id)? {
            return Ok(session);
        }

        let session = Session::new(id, Utc::now());
        self.persist(&session)?;
        debug!(session_id = %session.id, "Created session");
        // Return the stored form, so callers always see exactly the state a
        // restart would rehydrate (timestamps at second precision).
        self.get(&session.id)?
            .ok_or_else(|| CompassError::Storage("session vanished after create".to_string()))
    }

    /// Apply a turn delta atomically, serialized against other `apply_turn`
    /// calls for the same id. Returns the updated session.
    pub async fn apply_turn(&self, id: &str, delta: &TurnDelta) -> Result<Session, CompassError> {
        let lock = self.session_lock(id).await;
        let _guard = lock.lock().await;

        let mut session = match self.get(id)? {
            Some(session) => session,
            None => Session::new(id.to_string(), Utc::now()),
        };

        delta.apply(&mut session, Utc::now());

        // Bound transcript growth; structured state is kept in full.
        if session.turns.len() > self.transcript_retain {
            let excess = session.turns.len() - self.transcript_retain;
            session.turns.drain(..excess);
        }

        self.persist(&session)?;
        self.get(&session.id)?
            .ok_or_else(|| CompassError::Storage("session vanished after apply".to_string()))
    }

    /// Caller-initiated removal. Sessions are never deleted automatically.
    pub async fn delete(&self, id: &str) -> Result<bool, CompassError> {
        let lock = self.session_lock(id).await;
        let _guard = lock.lock().await;

        self.db.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM sessions WHERE id = ?1", rusqlite::params![id])
                .map_err(|e| CompassError::Storage(e.to_string()))?;
            Ok(affected > 0)
        })
    }

    /// Write the full session (row upsert plus transcript replace) in one
    /// transaction.
    fn persist(&self, session: &Session) -> Result<(), CompassError> {
        self.db.with_conn(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| CompassError::Storage(e.to_string()))?;

            tx.execute(
                "INSERT INTO sessions (id, created_at, updated_at, profile, results,
                                       resources, plan, document, portal)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                     updated_at = excluded.updated_at,
                     profile    = excluded.profile,
                     results    = excluded.results,
                     resources  = excluded.resources,
                     plan       = excluded.plan,
                     document   = excluded.document,
                     portal     = excluded.portal",
                rusqlite::params![
                    session.id,
                    session.created_at.timestamp(),
                    session.updated_at.timestamp(),
                    serde_json::to_string(&session.profile)?,
                    serde_json::to_string(&session.results)?,
                    serde_json::to_string(&session.resources)?,
                    to_optional_json(&session.plan)?,
                    to_optional_json(&session.document)?,
                    to_optional_json(&session.portal)?,
                ],
            )
            .map_err(|e| CompassError::Storage(e.to_string()))?;

            tx.execute(
                "DELETE FROM turns WHERE session_id = ?1",
                rusqlite::params![session.id],
            )
            .map_err(|e| CompassError::Storage(e.to_string()))?;

            for (seq, turn) in session.turns.iter().enumerate() {
                tx.execute(
                    "INSERT INTO turns (session_id, seq, user_message, assistant_message,
                                        tool_calls, truncated, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![
                        session.id,
                        seq as i64,
                        turn.user_message,
                        turn.assistant_message,
                        serde_json::to_string(&turn.tool_calls)?,
                        turn.truncated as i64,
                        turn.created_at.timestamp(),
                    ],
                )
                .map_err(|e| CompassError::Storage(e.to_string()))?;
            }

            tx.commit()
                .map_err(|e| CompassError::Storage(e.to_string()))?;
            Ok(())
        })
    }

    async fn session_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

fn epoch_to_utc(epoch: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(epoch, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn parse_optional<T: serde::de::DeserializeOwned>(
    column: Option<String>,
) -> Result<Option<T>, CompassError> {
    match column {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn to_optional_json<T: serde::Serialize>(value: &Option<T>) -> Result<Option<String>, CompassError> {
    match value {
        Some(v) => Ok(Some(serde_json::to_string(v)?)),
        None => Ok(None),
    }
}

// =============================================================================
// Tests
// =============================================================================
