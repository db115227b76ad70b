use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::storage::models::{
    Mission, MissionWithScientist, Planet, PlanetDetail, PlanetInsert, PlanetSummary, Scientist,
};
use crate::storage::repository::{begin_write, RepositoryError, RepositoryResult};
use crate::validation::{PlanetValidator, RecordValidator};

/// 行星儲存庫特徵
#[async_trait]
pub trait PlanetRepository: Send + Sync {
    /// 列出所有行星
    async fn list(&self) -> RepositoryResult<Vec<PlanetSummary>>;

    /// 根據ID獲取行星
    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Planet>>;

    /// 獲取行星及其任務與曾造訪的科學家
    async fn get_detail(&self, id: i64) -> RepositoryResult<Option<PlanetDetail>>;

    /// 創建行星
    async fn create(&self, planet: &PlanetInsert) -> RepositoryResult<Planet>;

    /// 刪除行星及其所有任務
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// SQLite 行星儲存庫實現
#[derive(Debug, Clone)]
pub struct SqlitePlanetRepository {
    pool: SqlitePool,
}

impl SqlitePlanetRepository {
    /// 創建新的行星儲存庫
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanetRepository for SqlitePlanetRepository {
    async fn list(&self) -> RepositoryResult<Vec<PlanetSummary>> {
        let records = sqlx::query_as::<_, PlanetSummary>(
            r#"
            SELECT id, name, distance_from_earth, nearest_star, image
            FROM planets
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Planet>> {
        let record = sqlx::query_as::<_, Planet>(
            r#"
            SELECT
                id, name, distance_from_earth, nearest_star, image,
                created_at, updated_at
            FROM planets
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_detail(&self, id: i64) -> RepositoryResult<Option<PlanetDetail>> {
        let Some(planet) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let missions = sqlx::query_as::<_, Mission>(
            r#"
            SELECT id, name, scientist_id, planet_id, created_at, updated_at
            FROM missions
            WHERE planet_id = ?
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let scientists = sqlx::query_as::<_, Scientist>(
            r#"
            SELECT DISTINCT
                s.id, s.name, s.field_of_study, s.avatar, s.created_at, s.updated_at
            FROM scientists s
            JOIN missions m ON m.scientist_id = s.id
            WHERE m.planet_id = ?
            ORDER BY s.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let by_id: HashMap<i64, &Scientist> = scientists
            .iter()
            .map(|scientist| (scientist.id, scientist))
            .collect();
        let missions = missions
            .into_iter()
            .filter_map(|mission| {
                let scientist = (*by_id.get(&mission.scientist_id)?).clone();
                Some(MissionWithScientist { mission, scientist })
            })
            .collect();

        Ok(Some(PlanetDetail {
            planet,
            missions,
            scientists,
        }))
    }

    async fn create(&self, planet: &PlanetInsert) -> RepositoryResult<Planet> {
        if let Err(errors) = PlanetValidator.validate(planet) {
            warn!("拒絕創建行星 {:?}: {}", planet.name, errors);
            return Err(errors.into());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO planets (
                name, distance_from_earth, nearest_star, image, created_at
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&planet.name)
        .bind(&planet.distance_from_earth)
        .bind(&planet.nearest_star)
        .bind(&planet.image)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("已創建行星 {} ({})", id, planet.name);

        // 重新獲取完整的行星資訊
        self.get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Planet", id))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let mut tx = begin_write(&self.pool).await?;

        let missions = sqlx::query("DELETE FROM missions WHERE planet_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM planets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!("已刪除行星 {} 及 {} 個任務", id, missions.rows_affected());
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{MissionInsert, ScientistInsert};
    use crate::storage::repository::test_support::migrated_pool;
    use crate::storage::repository::{
        MissionRepository, ScientistRepository, SqliteMissionRepository, SqliteScientistRepository,
    };
    use assert_matches::assert_matches;

    fn planet(name: &str) -> PlanetInsert {
        PlanetInsert {
            name: name.to_string(),
            distance_from_earth: Some("600 light years".to_string()),
            nearest_star: Some("Kepler-22".to_string()),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = SqlitePlanetRepository::new(migrated_pool().await);

        let created = repo.create(&planet("Kepler-22b")).await.unwrap();
        assert_eq!(created.nearest_star.as_deref(), Some("Kepler-22"));

        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![PlanetSummary::from(created)]);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let repo = SqlitePlanetRepository::new(migrated_pool().await);
        assert_matches!(
            repo.create(&planet("  ")).await,
            Err(RepositoryError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_detail_lists_visiting_scientists() {
        let pool = migrated_pool().await;
        let planets = SqlitePlanetRepository::new(pool.clone());
        let scientists = SqliteScientistRepository::new(pool.clone());
        let missions = SqliteMissionRepository::new(pool.clone());

        let target = planets.create(&planet("TRAPPIST-1e")).await.unwrap();
        for name in ["Didier Queloz", "Michel Mayor"] {
            let scientist = scientists
                .create(&ScientistInsert {
                    name: name.to_string(),
                    field_of_study: "Exoplanets".to_string(),
                    avatar: None,
                })
                .await
                .unwrap();
            missions
                .create(&MissionInsert {
                    name: format!("{} to TRAPPIST-1e", name),
                    scientist_id: Some(scientist.id),
                    planet_id: Some(target.id),
                })
                .await
                .unwrap();
        }

        let detail = planets.get_detail(target.id).await.unwrap().unwrap();
        assert_eq!(detail.missions.len(), 2);
        assert_eq!(detail.scientists.len(), 2);
        assert_eq!(detail.missions[0].scientist.name, "Didier Queloz");

        assert!(planets.delete(target.id).await.unwrap());
        assert!(missions.list().await.unwrap().is_empty());
        assert_eq!(scientists.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_planet_detail() {
        let repo = SqlitePlanetRepository::new(migrated_pool().await);
        assert!(repo.get_detail(1).await.unwrap().is_none());
        assert!(!repo.delete(1).await.unwrap());
    }
}
