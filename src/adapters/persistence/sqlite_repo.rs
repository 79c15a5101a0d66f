//! SQLite-backed plan store via libsql. Implements PlanStore as a read-only
//! snapshot source for the advisory pass.
//!
//! Plans are created and mutated by the CRUD surface outside this process;
//! this adapter reads active rows and offers an upsert for seeding. One
//! database file: data/plans.db

use crate::domain::{Coordinates, DomainError, LawnPlan, PlanId};
use crate::ports::PlanStore;
use libsql::{params, Database};
use std::path::Path;
use tracing::info;

const PLANS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS lawn_plans (
    id TEXT PRIMARY KEY,
    owner_email TEXT NOT NULL,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    active INTEGER NOT NULL DEFAULT 1
)"#;

/// SQLite plan store. One database file (plans.db) in the given base directory.
pub struct SqlitePlanStore {
    db: Database,
}

impl SqlitePlanStore {
    /// Connect to (or create) the SQLite database and ensure the schema exists.
    /// Call this once at startup; the returned store is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Store(e.to_string()))?;
        let db_path = base.join("plans.db");
        let store = Self::open(db_path.to_string_lossy().as_ref()).await?;
        info!(path = %db_path.display(), "plan store connected");
        Ok(store)
    }

    async fn open(path: &str) -> Result<Self, DomainError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Store(e.to_string()))?;

        // WAL mode enables concurrent readers + one writer.
        // PRAGMA returns a row (new value); use query and consume rows
        // (execute fails when rows are returned).
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("WAL pragma failed: {}", e)))?;
        while wal_rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
            .is_some()
        {}
        let mut sync_rows = conn
            .query("PRAGMA synchronous=NORMAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("synchronous pragma failed: {}", e)))?;
        while sync_rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
            .is_some()
        {}

        conn.execute(PLANS_TABLE, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        Ok(Self { db })
    }

    /// Insert or replace a plan (marked active). Used by seeding tools; the
    /// advisory core itself never writes.
    pub async fn upsert_plan(&self, plan: &LawnPlan) -> Result<(), DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO lawn_plans (id, owner_email, lat, lng, active)
            VALUES (?1, ?2, ?3, ?4, 1)
            ON CONFLICT (id) DO UPDATE SET
                owner_email = excluded.owner_email,
                lat = excluded.lat,
                lng = excluded.lng,
                active = 1
            "#,
            params![
                plan.id.0.as_str(),
                plan.owner_email.as_str(),
                plan.location.lat,
                plan.location.lng
            ],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

    /// Mark a plan inactive; it no longer appears in advisory passes.
    pub async fn deactivate_plan(&self, id: &PlanId) -> Result<(), DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(
            "UPDATE lawn_plans SET active = 0 WHERE id = ?1",
            params![id.0.as_str()],
        )
        .await
        .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }

}

#[async_trait::async_trait]
impl PlanStore for SqlitePlanStore {
    async fn list_active_plans(&self) -> Result<Vec<LawnPlan>, DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut rows = conn
            .query(
                "SELECT id, owner_email, lat, lng FROM lawn_plans WHERE active = 1",
                (),
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let mut plans = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            let id: String = row.get(0).map_err(|e| DomainError::Store(e.to_string()))?;
            let owner_email: String = row.get(1).map_err(|e| DomainError::Store(e.to_string()))?;
            let lat: f64 = row.get(2).map_err(|e| DomainError::Store(e.to_string()))?;
            let lng: f64 = row.get(3).map_err(|e| DomainError::Store(e.to_string()))?;
            plans.push(LawnPlan {
                id: PlanId(id),
                owner_email,
                location: Coordinates { lat, lng },
            });
        }
        Ok(plans)
    }
}
