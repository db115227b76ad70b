use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mission::MissionWithScientist;
use super::null_as_empty;
use super::scientist::Scientist;

/// 行星模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub distance_from_earth: Option<String>,
    pub nearest_star: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 行星列表項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanetSummary {
    pub id: i64,
    pub name: String,
    pub distance_from_earth: Option<String>,
    pub nearest_star: Option<String>,
    pub image: Option<String>,
}

impl From<Planet> for PlanetSummary {
    fn from(planet: Planet) -> Self {
        Self {
            id: planet.id,
            name: planet.name,
            distance_from_earth: planet.distance_from_earth,
            nearest_star: planet.nearest_star,
            image: planet.image,
        }
    }
}

/// 行星插入模型
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetInsert {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    pub distance_from_earth: Option<String>,
    pub nearest_star: Option<String>,
    pub image: Option<String>,
}

/// 行星詳細資料，包含任務與曾造訪的科學家
#[derive(Debug, Clone, Serialize)]
pub struct PlanetDetail {
    #[serde(flatten)]
    pub planet: Planet,
    pub missions: Vec<MissionWithScientist>,
    pub scientists: Vec<Scientist>,
}
