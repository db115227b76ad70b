use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_empty;
use super::planet::Planet;
use super::scientist::Scientist;

/// 任務模型 (科學家與行星的關聯表)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub scientist_id: i64,
    pub planet_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 任務插入模型
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionInsert {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    pub scientist_id: Option<i64>,
    pub planet_id: Option<i64>,
}

/// 附帶行星的任務，用於科學家詳細資料
#[derive(Debug, Clone, Serialize)]
pub struct MissionWithPlanet {
    #[serde(flatten)]
    pub mission: Mission,
    pub planet: Planet,
}

/// 附帶科學家的任務，用於行星詳細資料
#[derive(Debug, Clone, Serialize)]
pub struct MissionWithScientist {
    #[serde(flatten)]
    pub mission: Mission,
    pub scientist: Scientist,
}

/// 任務詳細資料
#[derive(Debug, Clone, Serialize)]
pub struct MissionDetail {
    #[serde(flatten)]
    pub mission: Mission,
    pub scientist: Scientist,
    pub planet: Planet,
}
