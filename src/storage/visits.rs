//! SQLite-backed visit store. Behavior payloads are AES-GCM encrypted at rest;
//! the classifier state lives in a `meta` row as plain JSON.
//! Key derived from a deployment secret (SHA-256 via ring).

use crate::features::VisitorBehavior;
use crate::ingest::VisitRecord;
use crate::model::{IntentClassifier, IntentLabel, ModelError};
use crate::scoring::RecruiterLabel;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use rand::RngCore;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const MODEL_KEY: &str = "intent_classifier";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("payload encryption failed")]
    Encrypt,
    #[error("payload decryption failed")]
    Decrypt,
    #[error("payload encoding: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model state: {0}")]
    Model(#[from] ModelError),
    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("store lock poisoned")]
    Poisoned,
}

fn derive_key(seed: &[u8]) -> [u8; KEY_LEN] {
    use ring::digest;
    let mut out = [0u8; KEY_LEN];
    let h = digest::digest(&digest::SHA256, seed);
    out[..h.as_ref().len().min(KEY_LEN)].copy_from_slice(h.as_ref());
    out
}

fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String, StoreError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| StoreError::Encrypt)?;
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| StoreError::Encrypt)?;
    let mut out = nonce.to_vec();
    out.extend(ciphertext);
    Ok(BASE64.encode(&out))
}

fn decrypt(key: &[u8; KEY_LEN], encoded: &str) -> Result<Vec<u8>, StoreError> {
    let raw = BASE64.decode(encoded)?;
    if raw.len() < NONCE_LEN {
        return Err(StoreError::Decrypt);
    }
    let (nonce, ct) = raw.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| StoreError::Decrypt)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ct)
        .map_err(|_| StoreError::Decrypt)
}

/// Columns as read back, before decryption.
struct VisitRow {
    id: String,
    ts: i64,
    payload_enc: String,
    recruiter_score: i32,
    recruiter_label: String,
    intent: Option<String>,
}

impl VisitRow {
    const COLUMNS: &'static str = "id, ts, payload_enc, recruiter_score, recruiter_label, intent";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            ts: row.get(1)?,
            payload_enc: row.get(2)?,
            recruiter_score: row.get(3)?,
            recruiter_label: row.get(4)?,
            intent: row.get(5)?,
        })
    }
}

pub struct VisitStore {
    conn: Mutex<Connection>,
    key: [u8; KEY_LEN],
}

impl VisitStore {
    /// Open or create DB at path. Key is derived from `secret`.
    pub fn open(path: &Path, secret: &[u8]) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id TEXT PRIMARY KEY,
                ts INTEGER NOT NULL,
                path TEXT NOT NULL,
                payload_enc TEXT NOT NULL,
                recruiter_score INTEGER NOT NULL,
                recruiter_label TEXT NOT NULL,
                intent TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_visits_ts ON visits(ts);
            CREATE TABLE IF NOT EXISTS meta (k TEXT PRIMARY KEY, v TEXT);
            "#,
        )?;
        let key = derive_key(secret);
        Ok(Self {
            conn: Mutex::new(conn),
            key,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert or replace a visit (behavior payload stored encrypted)
    pub fn insert_visit(&self, visit: &VisitRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&visit.behavior)?;
        let enc = encrypt(&self.key, payload.as_bytes())?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO visits (id, ts, path, payload_enc, recruiter_score, recruiter_label, intent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                visit.id,
                visit.ts.timestamp_millis(),
                visit.behavior.path,
                enc,
                visit.recruiter_score,
                visit.recruiter_label.as_str(),
                visit.intent.map(IntentLabel::as_str),
            ],
        )?;
        Ok(())
    }

    fn decode(&self, row: VisitRow) -> Result<VisitRecord, StoreError> {
        let plain = decrypt(&self.key, &row.payload_enc)?;
        let behavior: VisitorBehavior = serde_json::from_slice(&plain)?;
        let ts = DateTime::<Utc>::from_timestamp_millis(row.ts).ok_or_else(|| StoreError::Corrupt {
            id: row.id.clone(),
            reason: format!("timestamp {} out of range", row.ts),
        })?;
        let recruiter_label = row
            .recruiter_label
            .parse::<RecruiterLabel>()
            .map_err(|e| StoreError::Corrupt {
                id: row.id.clone(),
                reason: e.to_string(),
            })?;
        let intent = row
            .intent
            .as_deref()
            .map(str::parse::<IntentLabel>)
            .transpose()?;
        Ok(VisitRecord {
            id: row.id,
            ts,
            behavior,
            recruiter_score: row.recruiter_score,
            recruiter_label,
            intent,
        })
    }

    fn query_visits(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<VisitRecord>, StoreError> {
        let rows: Vec<VisitRow> = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(sql)?;
            let mapped = stmt.query_map(args, VisitRow::from_row)?;
            let rows = mapped.collect::<rusqlite::Result<Vec<VisitRow>>>()?;
            rows
        };
        rows.into_iter().map(|r| self.decode(r)).collect()
    }

    /// Read visit by id (decrypt payload)
    pub fn get_visit(&self, id: &str) -> Result<Option<VisitRecord>, StoreError> {
        let sql = format!("SELECT {} FROM visits WHERE id = ?1", VisitRow::COLUMNS);
        Ok(self.query_visits(&sql, params![id])?.into_iter().next())
    }

    /// Every stored visit, oldest first
    pub fn all_visits(&self) -> Result<Vec<VisitRecord>, StoreError> {
        let sql = format!("SELECT {} FROM visits ORDER BY ts, id", VisitRow::COLUMNS);
        self.query_visits(&sql, [])
    }

    /// Visits without an intent label, oldest first
    pub fn unlabeled_visits(&self) -> Result<Vec<VisitRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM visits WHERE intent IS NULL ORDER BY ts, id",
            VisitRow::COLUMNS
        );
        self.query_visits(&sql, [])
    }

    /// Write back a predicted intent. Returns false if the visit does not exist.
    pub fn set_intent(&self, id: &str, intent: IntentLabel) -> Result<bool, StoreError> {
        let n = self.conn()?.execute(
            "UPDATE visits SET intent = ?1 WHERE id = ?2",
            params![intent.as_str(), id],
        )?;
        Ok(n > 0)
    }

    pub fn count_visits(&self) -> Result<u64, StoreError> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Persist classifier state; last writer wins
    pub fn save_model(&self, classifier: &IntentClassifier) -> Result<(), StoreError> {
        let json = classifier.to_json()?;
        self.conn()?.execute(
            "INSERT OR REPLACE INTO meta (k, v) VALUES (?1, ?2)",
            params![MODEL_KEY, json],
        )?;
        Ok(())
    }

    /// Load the last saved classifier, if any
    pub fn load_model(&self) -> Result<Option<IntentClassifier>, StoreError> {
        let json: Option<Option<String>> = self
            .conn()?
            .query_row("SELECT v FROM meta WHERE k = ?1", params![MODEL_KEY], |row| row.get(0))
            .optional()?;
        match json.flatten() {
            Some(data) => Ok(Some(IntentClassifier::from_json(&data)?)),
            None => Ok(None),
        }
    }

    /// Retention: delete visits older than given timestamp (ms)
    pub fn prune_before(&self, ts: i64) -> Result<u64, StoreError> {
        let n = self
            .conn()?
            .execute("DELETE FROM visits WHERE ts < ?1", params![ts])?;
        Ok(n as u64)
    }
}
