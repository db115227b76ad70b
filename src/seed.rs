//! 範例資料
//!
//! `migrate seed` 會清空三張表後載入以下資料。

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::storage::models::{MissionInsert, PlanetInsert, ScientistInsert};
use crate::storage::repository::{
    begin_write, MissionRepository, PlanetRepository, ScientistRepository, SqliteMissionRepository,
    SqlitePlanetRepository, SqliteScientistRepository,
};

/// 載入結果統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub scientists: usize,
    pub planets: usize,
    pub missions: usize,
}

const SCIENTISTS: &[(&str, &str)] = &[
    ("Mel T. Valent", "xenobiology"),
    ("P. Legrange", "orbital mechanics"),
    ("Aurelia Voss", "astrochemistry"),
    ("Tomas Okafor", "planetary geology"),
    ("Lin Haoran", "exoplanet atmospheres"),
];

const PLANETS: &[(&str, &str, &str)] = &[
    ("TauCeti E", "12 light years", "Tau Ceti"),
    ("Maxxor", "9 parsecs", "Canis Minor"),
    ("Plasmavia", "15 light years", "Trappist-1"),
    ("Jiangyuan", "41 light years", "Xi Aquilae"),
    ("Lumos Prime", "1.3 parsecs", "Proxima Centauri"),
];

/// 清空並載入範例資料
pub async fn seed(pool: &SqlitePool) -> Result<SeedSummary> {
    info!("清除現有資料...");
    let mut tx = begin_write(pool).await?;
    sqlx::query("DELETE FROM missions").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM scientists").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM planets").execute(&mut *tx).await?;
    tx.commit().await?;

    let scientist_repo = SqliteScientistRepository::new(pool.clone());
    let planet_repo = SqlitePlanetRepository::new(pool.clone());
    let mission_repo = SqliteMissionRepository::new(pool.clone());

    let mut scientists = Vec::with_capacity(SCIENTISTS.len());
    for (name, field_of_study) in SCIENTISTS {
        let slug = name.to_lowercase().replace([' ', '.'], "");
        let scientist = scientist_repo
            .create(&ScientistInsert {
                name: name.to_string(),
                field_of_study: field_of_study.to_string(),
                avatar: Some(format!("https://robohash.org/{}", slug)),
            })
            .await
            .with_context(|| format!("無法創建科學家 {}", name))?;
        scientists.push(scientist);
    }

    let mut planets = Vec::with_capacity(PLANETS.len());
    for (name, distance, star) in PLANETS {
        let planet = planet_repo
            .create(&PlanetInsert {
                name: name.to_string(),
                distance_from_earth: Some(distance.to_string()),
                nearest_star: Some(star.to_string()),
                image: Some(format!("planet-{}.png", planets.len() + 1)),
            })
            .await
            .with_context(|| format!("無法創建行星 {}", name))?;
        planets.push(planet);
    }

    // 每位科學家前往兩顆相鄰的行星，配對不重複
    let mut missions = 0;
    for (index, scientist) in scientists.iter().enumerate() {
        for offset in 0..2 {
            let planet = &planets[(index + offset) % planets.len()];
            mission_repo
                .create(&MissionInsert {
                    name: format!("{} Expedition {}", planet.name, index + 1),
                    scientist_id: Some(scientist.id),
                    planet_id: Some(planet.id),
                })
                .await
                .with_context(|| format!("無法創建 {} 的任務", scientist.name))?;
            missions += 1;
        }
    }

    let summary = SeedSummary {
        scientists: scientists.len(),
        planets: planets.len(),
        missions,
    };
    info!("範例資料載入完成: {:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::storage;

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let pool = storage::connect(&DatabaseConfig::in_memory()).await.unwrap();

        let first = seed(&pool).await.unwrap();
        assert_eq!(
            first,
            SeedSummary {
                scientists: 5,
                planets: 5,
                missions: 10,
            }
        );

        // 第二次執行會先清空，不會撞到唯一約束
        let second = seed(&pool).await.unwrap();
        assert_eq!(first, second);

        let scientists = SqliteScientistRepository::new(pool.clone()).list().await.unwrap();
        assert_eq!(scientists.len(), 5);
    }
}
