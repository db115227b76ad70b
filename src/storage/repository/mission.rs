use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, warn};

use crate::storage::models::{Mission, MissionDetail, MissionInsert, Planet, Scientist};
use crate::storage::repository::{
    begin_write, is_unique_violation, RepositoryError, RepositoryResult,
};
use crate::validation::{MissionValidator, RecordValidationError, RecordValidator, ValidationErrors};

const ENTITY: &str = "Mission";

/// 任務儲存庫特徵
#[async_trait]
pub trait MissionRepository: Send + Sync {
    /// 列出所有任務
    async fn list(&self) -> RepositoryResult<Vec<Mission>>;

    /// 根據ID獲取任務
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Mission>>;

    /// 獲取任務及其科學家與行星
    async fn get_detail(&self, id: i64) -> RepositoryResult<Option<MissionDetail>>;

    /// 創建任務
    ///
    /// 科學家與行星必須存在，且同一組科學家與行星只能有一個任務。
    /// 回傳的詳細資料與新記錄在同一個交易中讀取。
    async fn create(&self, mission: &MissionInsert) -> RepositoryResult<MissionDetail>;
}

/// SQLite 任務儲存庫實現
#[derive(Debug, Clone)]
pub struct SqliteMissionRepository {
    pool: SqlitePool,
}

impl SqliteMissionRepository {
    /// 創建新的任務儲存庫
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_on(conn: &mut SqliteConnection, id: i64) -> RepositoryResult<Option<Mission>> {
        let record = sqlx::query_as::<_, Mission>(
            r#"
            SELECT id, name, scientist_id, planet_id, created_at, updated_at
            FROM missions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// 補上任務的科學家與行星，任一方已不存在時回傳 `None`
    async fn attach_relations(
        conn: &mut SqliteConnection,
        mission: Mission,
    ) -> RepositoryResult<Option<MissionDetail>> {
        let scientist = sqlx::query_as::<_, Scientist>(
            r#"
            SELECT id, name, field_of_study, avatar, created_at, updated_at
            FROM scientists
            WHERE id = ?
            "#,
        )
        .bind(mission.scientist_id)
        .fetch_optional(&mut *conn)
        .await?;

        let planet = sqlx::query_as::<_, Planet>(
            r#"
            SELECT
                id, name, distance_from_earth, nearest_star, image,
                created_at, updated_at
            FROM planets
            WHERE id = ?
            "#,
        )
        .bind(mission.planet_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(match (scientist, planet) {
            (Some(scientist), Some(planet)) => Some(MissionDetail {
                mission,
                scientist,
                planet,
            }),
            _ => None,
        })
    }

    async fn row_exists(
        tx: &mut Transaction<'_, Sqlite>,
        sql: &str,
        id: i64,
    ) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(count > 0)
    }

    /// 在交易中檢查外鍵存在與配對唯一性
    async fn check_relations(
        tx: &mut Transaction<'_, Sqlite>,
        mission: &MissionInsert,
        errors: &mut ValidationErrors,
    ) -> RepositoryResult<()> {
        let mut scientist_ok = false;
        let mut planet_ok = false;

        if let Some(scientist_id) = mission.scientist_id {
            scientist_ok = Self::row_exists(
                tx,
                "SELECT COUNT(*) FROM scientists WHERE id = ?",
                scientist_id,
            )
            .await?;
            if !scientist_ok {
                errors.push(RecordValidationError::missing(ENTITY, "scientist"));
            }
        }

        if let Some(planet_id) = mission.planet_id {
            planet_ok =
                Self::row_exists(tx, "SELECT COUNT(*) FROM planets WHERE id = ?", planet_id).await?;
            if !planet_ok {
                errors.push(RecordValidationError::missing(ENTITY, "planet"));
            }
        }

        if let (true, true, Some(scientist_id), Some(planet_id)) =
            (scientist_ok, planet_ok, mission.scientist_id, mission.planet_id)
        {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM missions WHERE scientist_id = ? AND planet_id = ?",
            )
            .bind(scientist_id)
            .bind(planet_id)
            .fetch_one(&mut **tx)
            .await?;
            if count > 0 {
                errors.push(RecordValidationError::DuplicatePairing {
                    scientist_id,
                    planet_id,
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl MissionRepository for SqliteMissionRepository {
    async fn list(&self) -> RepositoryResult<Vec<Mission>> {
        let records = sqlx::query_as::<_, Mission>(
            r#"
            SELECT id, name, scientist_id, planet_id, created_at, updated_at
            FROM missions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Mission>> {
        let record = sqlx::query_as::<_, Mission>(
            r#"
            SELECT id, name, scientist_id, planet_id, created_at, updated_at
            FROM missions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_detail(&self, id: i64) -> RepositoryResult<Option<MissionDetail>> {
        let mut conn = self.pool.acquire().await?;
        let Some(mission) = Self::fetch_on(&mut conn, id).await? else {
            return Ok(None);
        };
        Self::attach_relations(&mut conn, mission).await
    }

    async fn create(&self, mission: &MissionInsert) -> RepositoryResult<MissionDetail> {
        let mut errors = ValidationErrors::new();
        MissionValidator.collect(mission, &mut errors);

        let mut tx = begin_write(&self.pool).await?;
        Self::check_relations(&mut tx, mission, &mut errors).await?;

        if let Err(errors) = errors.into_result() {
            warn!("拒絕創建任務 {:?}: {}", mission.name, errors);
            return Err(errors.into());
        }

        let (Some(scientist_id), Some(planet_id)) = (mission.scientist_id, mission.planet_id) else {
            // 驗證已確保兩者存在
            return Err(RecordValidationError::missing(ENTITY, "scientist").into());
        };

        let result = sqlx::query(
            r#"
            INSERT INTO missions (name, scientist_id, planet_id, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&mission.name)
        .bind(scientist_id)
        .bind(planet_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|err| -> RepositoryError {
            if is_unique_violation(&err) {
                RecordValidationError::DuplicatePairing {
                    scientist_id,
                    planet_id,
                }
                .into()
            } else {
                err.into()
            }
        })?;

        let id = result.last_insert_rowid();
        let created = Self::fetch_on(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;
        let detail = Self::attach_relations(&mut tx, created)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))?;
        tx.commit().await?;

        debug!(
            "已創建任務 {}: 科學家 {} -> 行星 {}",
            id, scientist_id, planet_id
        );
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{PlanetInsert, ScientistInsert};
    use crate::storage::repository::test_support::migrated_pool;
    use crate::storage::repository::{
        PlanetRepository, ScientistRepository, SqlitePlanetRepository, SqliteScientistRepository,
    };
    use assert_matches::assert_matches;

    async fn fixtures(pool: &SqlitePool) -> (Scientist, Planet) {
        let scientist = SqliteScientistRepository::new(pool.clone())
            .create(&ScientistInsert {
                name: "Sara Seager".to_string(),
                field_of_study: "Planetary Science".to_string(),
                avatar: None,
            })
            .await
            .unwrap();
        let planet = SqlitePlanetRepository::new(pool.clone())
            .create(&PlanetInsert {
                name: "55 Cancri e".to_string(),
                ..PlanetInsert::default()
            })
            .await
            .unwrap();
        (scientist, planet)
    }

    fn mission(name: &str, scientist_id: i64, planet_id: i64) -> MissionInsert {
        MissionInsert {
            name: name.to_string(),
            scientist_id: Some(scientist_id),
            planet_id: Some(planet_id),
        }
    }

    #[tokio::test]
    async fn test_create_and_detail() {
        let pool = migrated_pool().await;
        let (scientist, planet) = fixtures(&pool).await;
        let repo = SqliteMissionRepository::new(pool);

        let created = repo
            .create(&mission("Lava World Survey", scientist.id, planet.id))
            .await
            .unwrap();
        assert_eq!(created.mission.scientist_id, scientist.id);
        assert_eq!(created.scientist, scientist);
        assert_eq!(created.planet, planet);

        let detail = repo.get_detail(created.mission.id).await.unwrap().unwrap();
        assert_eq!(detail.mission, created.mission);
        assert_eq!(repo.list().await.unwrap(), vec![created.mission]);
    }

    #[tokio::test]
    async fn test_duplicate_pairing_rejected() {
        let pool = migrated_pool().await;
        let (scientist, planet) = fixtures(&pool).await;
        let repo = SqliteMissionRepository::new(pool);

        repo.create(&mission("First", scientist.id, planet.id)).await.unwrap();
        let err = repo
            .create(&mission("Second", scientist.id, planet.id))
            .await
            .unwrap_err();

        assert_matches!(err, RepositoryError::Validation(errors) => {
            assert!(errors.contains(&RecordValidationError::DuplicatePairing {
                scientist_id: scientist.id,
                planet_id: planet.id,
            }));
        });
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_references_rejected() {
        let pool = migrated_pool().await;
        let (scientist, _) = fixtures(&pool).await;
        let repo = SqliteMissionRepository::new(pool);

        let err = repo.create(&mission("Nowhere", scientist.id, 999)).await.unwrap_err();
        assert_matches!(err, RepositoryError::Validation(errors) => {
            assert_eq!(errors.messages(), vec!["Mission must have a planet."]);
        });

        let err = repo
            .create(&MissionInsert {
                name: String::new(),
                scientist_id: None,
                planet_id: None,
            })
            .await
            .unwrap_err();
        assert_matches!(err, RepositoryError::Validation(errors) => {
            assert_eq!(errors.len(), 3);
        });
    }

    #[tokio::test]
    async fn test_detail_missing_relation_is_none() {
        let pool = migrated_pool().await;
        let (scientist, planet) = fixtures(&pool).await;
        let repo = SqliteMissionRepository::new(pool.clone());

        let created = repo
            .create(&mission("Short Lived", scientist.id, planet.id))
            .await
            .unwrap();

        // 關閉外鍵後刪除行星，留下指向不存在行星的任務
        let mut conn = pool.acquire().await.unwrap();
        sqlx::query("PRAGMA foreign_keys = OFF")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("DELETE FROM planets WHERE id = ?")
            .bind(planet.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        assert!(repo.get_detail(created.mission.id).await.unwrap().is_none());
        assert!(repo.get_by_id(created.mission.id).await.unwrap().is_some());
    }
}
