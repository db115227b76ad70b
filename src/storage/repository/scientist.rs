use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::storage::models::{
    Mission, MissionWithPlanet, Planet, Scientist, ScientistDetail, ScientistInsert, ScientistPatch,
    ScientistSummary,
};
use crate::storage::repository::{
    begin_write, is_unique_violation, RepositoryError, RepositoryResult,
};
use crate::validation::{RecordValidationError, RecordValidator, ScientistValidator, ValidationErrors};

const ENTITY: &str = "Scientist";

/// 科學家儲存庫特徵
#[async_trait]
pub trait ScientistRepository: Send + Sync {
    /// 列出所有科學家
    async fn list(&self) -> RepositoryResult<Vec<ScientistSummary>>;

    /// 根據ID獲取科學家
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Scientist>>;

    /// 獲取科學家及其任務與造訪過的行星
    async fn get_detail(&self, id: i64) -> RepositoryResult<Option<ScientistDetail>>;

    /// 創建科學家
    async fn create(&self, scientist: &ScientistInsert) -> RepositoryResult<Scientist>;

    /// 部分更新科學家
    async fn update(&self, id: i64, patch: &ScientistPatch) -> RepositoryResult<Scientist>;

    /// 刪除科學家及其所有任務
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// SQLite 科學家儲存庫實現
#[derive(Debug, Clone)]
pub struct SqliteScientistRepository {
    pool: SqlitePool,
}

impl SqliteScientistRepository {
    /// 創建新的科學家儲存庫
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
    ) -> RepositoryResult<Option<Scientist>> {
        let record = sqlx::query_as::<_, Scientist>(
            r#"
            SELECT id, name, field_of_study, avatar, created_at, updated_at
            FROM scientists
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(record)
    }

    /// 檢查名稱是否已被其他科學家使用
    async fn name_taken(
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
        exclude_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scientists
            WHERE name = ? AND (? IS NULL OR id <> ?)
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(count > 0)
    }

    fn map_write_error(err: sqlx::Error) -> RepositoryError {
        if is_unique_violation(&err) {
            RecordValidationError::not_unique(ENTITY, "name").into()
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl ScientistRepository for SqliteScientistRepository {
    async fn list(&self) -> RepositoryResult<Vec<ScientistSummary>> {
        let records = sqlx::query_as::<_, ScientistSummary>(
            r#"
            SELECT id, name, field_of_study, avatar
            FROM scientists
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Scientist>> {
        let record = sqlx::query_as::<_, Scientist>(
            r#"
            SELECT id, name, field_of_study, avatar, created_at, updated_at
            FROM scientists
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_detail(&self, id: i64) -> RepositoryResult<Option<ScientistDetail>> {
        let Some(scientist) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let missions = sqlx::query_as::<_, Mission>(
            r#"
            SELECT id, name, scientist_id, planet_id, created_at, updated_at
            FROM missions
            WHERE scientist_id = ?
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let planets = sqlx::query_as::<_, Planet>(
            r#"
            SELECT DISTINCT
                p.id, p.name, p.distance_from_earth, p.nearest_star, p.image,
                p.created_at, p.updated_at
            FROM planets p
            JOIN missions m ON m.planet_id = p.id
            WHERE m.scientist_id = ?
            ORDER BY p.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let by_id: HashMap<i64, &Planet> = planets.iter().map(|planet| (planet.id, planet)).collect();
        let missions = missions
            .into_iter()
            .filter_map(|mission| {
                let planet = (*by_id.get(&mission.planet_id)?).clone();
                Some(MissionWithPlanet { mission, planet })
            })
            .collect();

        Ok(Some(ScientistDetail {
            scientist,
            missions,
            planets,
        }))
    }

    async fn create(&self, scientist: &ScientistInsert) -> RepositoryResult<Scientist> {
        let mut errors = ValidationErrors::new();
        ScientistValidator.collect(scientist, &mut errors);

        let mut tx = begin_write(&self.pool).await?;

        if !scientist.name.trim().is_empty() && Self::name_taken(&mut tx, &scientist.name, None).await? {
            errors.push(RecordValidationError::not_unique(ENTITY, "name"));
        }
        if let Err(errors) = errors.into_result() {
            warn!("拒絕創建科學家 {:?}: {}", scientist.name, errors);
            return Err(errors.into());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO scientists (name, field_of_study, avatar, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&scientist.name)
        .bind(&scientist.field_of_study)
        .bind(&scientist.avatar)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(Self::map_write_error)?;

        let id = result.last_insert_rowid();
        let created = Self::fetch_in_tx(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;
        tx.commit().await?;

        debug!("已創建科學家 {} ({})", created.id, created.name);
        Ok(created)
    }

    async fn update(&self, id: i64, patch: &ScientistPatch) -> RepositoryResult<Scientist> {
        let mut tx = begin_write(&self.pool).await?;

        let current = Self::fetch_in_tx(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;

        let mut errors = ValidationErrors::new();
        ScientistValidator.collect(patch, &mut errors);

        if let Some(name) = patch.name.as_deref() {
            if !name.trim().is_empty() && Self::name_taken(&mut tx, name, Some(id)).await? {
                errors.push(RecordValidationError::not_unique(ENTITY, "name"));
            }
        }
        if let Err(errors) = errors.into_result() {
            warn!("拒絕更新科學家 {}: {}", id, errors);
            return Err(errors.into());
        }

        let merged = patch.merge_onto(&current);
        sqlx::query(
            r#"
            UPDATE scientists
            SET
                name = ?,
                field_of_study = ?,
                avatar = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&merged.name)
        .bind(&merged.field_of_study)
        .bind(&merged.avatar)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(Self::map_write_error)?;

        let updated = Self::fetch_in_tx(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;
        tx.commit().await?;

        debug!("已更新科學家 {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let mut tx = begin_write(&self.pool).await?;

        // 外鍵已設定級聯刪除，這裡明確刪除以免依賴連接的 PRAGMA 狀態
        let missions = sqlx::query("DELETE FROM missions WHERE scientist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM scientists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!("已刪除科學家 {} 及 {} 個任務", id, missions.rows_affected());
        }
        Ok(deleted)
    }
}
