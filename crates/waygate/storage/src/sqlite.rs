//! SQLite adapter for the warp store
//!
//! Two tables: one row per warp, one row per invitation. The schema is an
//! implementation detail of this adapter; nothing outside this module reads
//! it. Uuids are stored as TEXT so rows stay inspectable from a sqlite
//! shell.

use crate::error::{StorageError, StorageResult};
use crate::traits::WarpStore;
use async_trait::async_trait;
use serde::Deserialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;
use waygate_types::{Invitation, PlayerId, Position, Rotation, Warp, WarpKind, WorldId};

/// Pool settings for [`SqliteWarpStore`]
///
/// Mutations arrive one at a time from the registry's writer worker, so a
/// single connection is the default; raising it only helps concurrent
/// `list_all` readers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            max_connections: 1,
            acquire_timeout_secs: 5,
        }
    }
}

/// SQLite-backed warp store
#[derive(Clone)]
pub struct SqliteWarpStore {
    pool: SqlitePool,
}

impl SqliteWarpStore {
    /// Connect with default pool settings and initialize the schema.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        Self::connect_with(database_url, SqliteConfig::default()).await
    }

    /// Connect with explicit pool settings and initialize the schema.
    pub async fn connect_with(database_url: &str, config: SqliteConfig) -> StorageResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to connect sqlite: {e}")))?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create an adapter from an existing pool.
    pub async fn from_pool(pool: SqlitePool) -> StorageResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> StorageResult<()> {
        let ddl = [
            r#"
            CREATE TABLE IF NOT EXISTS waygate_warps (
                name TEXT PRIMARY KEY,
                creator TEXT NOT NULL,
                kind TEXT NOT NULL,
                world TEXT NOT NULL,
                pos_x REAL NOT NULL,
                pos_y REAL NOT NULL,
                pos_z REAL NOT NULL,
                pitch REAL NOT NULL,
                yaw REAL NOT NULL,
                created_at TEXT NOT NULL,
                visits INTEGER NOT NULL,
                welcome_message TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS waygate_invitations (
                warp_name TEXT NOT NULL,
                invitee_kind TEXT NOT NULL,
                invitee TEXT NOT NULL,
                PRIMARY KEY (warp_name, invitee_kind, invitee)
            )
            "#,
        ];

        for stmt in ddl {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::Backend(format!("schema init failed: {e}")))?;
        }
        Ok(())
    }
}

#[async_trait]
impl WarpStore for SqliteWarpStore {
    async fn add_warp(&self, warp: &Warp) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO waygate_warps
                (name, creator, kind, world, pos_x, pos_y, pos_z, pitch, yaw,
                 created_at, visits, welcome_message)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&warp.name)
        .bind(warp.creator.as_uuid().to_string())
        .bind(kind_to_str(warp.kind))
        .bind(warp.world.as_uuid().to_string())
        .bind(warp.position.x)
        .bind(warp.position.y)
        .bind(warp.position.z)
        .bind(f64::from(warp.rotation.pitch))
        .bind(f64::from(warp.rotation.yaw))
        .bind(warp.created_at)
        .bind(i64::from(warp.visits))
        .bind(&warp.welcome_message)
        .execute(&mut *tx)
        .await?;

        for invitation in &warp.invitations {
            let (invitee_kind, invitee) = encode_invitation(invitation);
            sqlx::query(
                "INSERT OR IGNORE INTO waygate_invitations (warp_name, invitee_kind, invitee) VALUES (?, ?, ?)",
            )
            .bind(&warp.name)
            .bind(invitee_kind)
            .bind(invitee)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove_warp(&self, warp: &Warp) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM waygate_invitations WHERE warp_name = ?")
            .bind(&warp.name)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM waygate_warps WHERE name = ?")
            .bind(&warp.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_creator(&self, warp: &Warp) -> StorageResult<()> {
        let result = sqlx::query("UPDATE waygate_warps SET creator = ? WHERE name = ?")
            .bind(warp.creator.as_uuid().to_string())
            .bind(&warp.name)
            .execute(&self.pool)
            .await?;
        require_row(result.rows_affected(), &warp.name)
    }

    async fn update_location(&self, warp: &Warp) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE waygate_warps
               SET world = ?, pos_x = ?, pos_y = ?, pos_z = ?, pitch = ?, yaw = ?
             WHERE name = ?
            "#,
        )
        .bind(warp.world.as_uuid().to_string())
        .bind(warp.position.x)
        .bind(warp.position.y)
        .bind(warp.position.z)
        .bind(f64::from(warp.rotation.pitch))
        .bind(f64::from(warp.rotation.yaw))
        .bind(&warp.name)
        .execute(&self.pool)
        .await?;
        require_row(result.rows_affected(), &warp.name)
    }

    async fn update_kind(&self, warp: &Warp) -> StorageResult<()> {
        let result = sqlx::query("UPDATE waygate_warps SET kind = ? WHERE name = ?")
            .bind(kind_to_str(warp.kind))
            .bind(&warp.name)
            .execute(&self.pool)
            .await?;
        require_row(result.rows_affected(), &warp.name)
    }

    async fn update_visits(&self, warp: &Warp) -> StorageResult<()> {
        let result = sqlx::query("UPDATE waygate_warps SET visits = ? WHERE name = ?")
            .bind(i64::from(warp.visits))
            .bind(&warp.name)
            .execute(&self.pool)
            .await?;
        require_row(result.rows_affected(), &warp.name)
    }

    async fn update_welcome_message(&self, warp: &Warp) -> StorageResult<()> {
        let result = sqlx::query("UPDATE waygate_warps SET welcome_message = ? WHERE name = ?")
            .bind(&warp.welcome_message)
            .bind(&warp.name)
            .execute(&self.pool)
            .await?;
        require_row(result.rows_affected(), &warp.name)
    }

    async fn add_invitation(&self, warp: &Warp, invitation: &Invitation) -> StorageResult<()> {
        let (invitee_kind, invitee) = encode_invitation(invitation);
        sqlx::query(
            "INSERT OR IGNORE INTO waygate_invitations (warp_name, invitee_kind, invitee) VALUES (?, ?, ?)",
        )
        .bind(&warp.name)
        .bind(invitee_kind)
        .bind(invitee)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_invitation(&self, warp: &Warp, invitation: &Invitation) -> StorageResult<()> {
        let (invitee_kind, invitee) = encode_invitation(invitation);
        sqlx::query(
            "DELETE FROM waygate_invitations WHERE warp_name = ? AND invitee_kind = ? AND invitee = ?",
        )
        .bind(&warp.name)
        .bind(invitee_kind)
        .bind(invitee)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_all(&self) -> StorageResult<Vec<Warp>> {
        let invitation_rows =
            sqlx::query("SELECT warp_name, invitee_kind, invitee FROM waygate_invitations")
                .fetch_all(&self.pool)
                .await?;

        let mut invitations: HashMap<String, HashSet<Invitation>> = HashMap::new();
        for row in invitation_rows {
            let warp_name: String = row.try_get("warp_name")?;
            invitations
                .entry(warp_name)
                .or_default()
                .insert(decode_invitation(&row)?);
        }

        let rows = sqlx::query(
            r#"
            SELECT name, creator, kind, world, pos_x, pos_y, pos_z, pitch, yaw,
                   created_at, visits, welcome_message
              FROM waygate_warps
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let mut warp = warp_from_row(&row)?;
                if let Some(set) = invitations.remove(&warp.name) {
                    warp.invitations = set;
                }
                Ok(warp)
            })
            .collect()
    }
}

fn warp_from_row(row: &SqliteRow) -> StorageResult<Warp> {
    let name: String = row.try_get("name")?;
    let creator = parse_uuid(&row.try_get::<String, _>("creator")?)?;
    let kind = parse_kind(&row.try_get::<String, _>("kind")?)?;
    let world = parse_uuid(&row.try_get::<String, _>("world")?)?;
    let visits: i64 = row.try_get("visits")?;
    let visits = u32::try_from(visits)
        .map_err(|_| StorageError::Corrupt(format!("negative visit count for `{name}`")))?;

    Ok(Warp {
        name,
        creator: PlayerId::from_uuid(creator),
        kind,
        world: WorldId::from_uuid(world),
        position: Position::new(
            row.try_get("pos_x")?,
            row.try_get("pos_y")?,
            row.try_get("pos_z")?,
        ),
        rotation: Rotation::new(
            row.try_get::<f64, _>("pitch")? as f32,
            row.try_get::<f64, _>("yaw")? as f32,
        ),
        created_at: row.try_get("created_at")?,
        visits,
        welcome_message: row.try_get("welcome_message")?,
        invitations: HashSet::new(),
    })
}

fn encode_invitation(invitation: &Invitation) -> (&'static str, String) {
    match invitation {
        Invitation::Player(id) => ("player", id.as_uuid().to_string()),
        Invitation::Group(group) => ("group", group.clone()),
    }
}

fn decode_invitation(row: &SqliteRow) -> StorageResult<Invitation> {
    let kind: String = row.try_get("invitee_kind")?;
    let invitee: String = row.try_get("invitee")?;
    match kind.as_str() {
        "player" => Ok(Invitation::Player(PlayerId::from_uuid(parse_uuid(
            &invitee,
        )?))),
        "group" => Ok(Invitation::Group(invitee)),
        other => Err(StorageError::Corrupt(format!(
            "unknown invitee kind `{other}`"
        ))),
    }
}

fn kind_to_str(kind: WarpKind) -> &'static str {
    match kind {
        WarpKind::Public => "public",
        WarpKind::Private => "private",
    }
}

fn parse_kind(raw: &str) -> StorageResult<WarpKind> {
    match raw {
        "public" => Ok(WarpKind::Public),
        "private" => Ok(WarpKind::Private),
        other => Err(StorageError::Corrupt(format!("unknown warp kind `{other}`"))),
    }
}

fn parse_uuid(raw: &str) -> StorageResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| StorageError::Corrupt(format!("bad uuid `{raw}`: {e}")))
}

fn require_row(rows_affected: u64, name: &str) -> StorageResult<()> {
    if rows_affected == 0 {
        return Err(StorageError::NotFound(name.to_string()));
    }
    Ok(())
}
