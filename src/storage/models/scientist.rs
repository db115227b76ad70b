use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mission::MissionWithPlanet;
use super::null_as_empty;
use super::planet::Planet;

/// 科學家模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Scientist {
    pub id: i64,
    pub name: String,
    pub field_of_study: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 科學家列表項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScientistSummary {
    pub id: i64,
    pub name: String,
    pub field_of_study: String,
    pub avatar: Option<String>,
}

impl From<Scientist> for ScientistSummary {
    fn from(scientist: Scientist) -> Self {
        Self {
            id: scientist.id,
            name: scientist.name,
            field_of_study: scientist.field_of_study,
            avatar: scientist.avatar,
        }
    }
}

/// 科學家插入模型
///
/// 請求中缺少的欄位以空字串代替，交由驗證器回報。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScientistInsert {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub field_of_study: String,
    pub avatar: Option<String>,
}

/// 科學家部分更新模型
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScientistPatch {
    pub name: Option<String>,
    pub field_of_study: Option<String>,
    pub avatar: Option<String>,
}

impl ScientistPatch {
    /// 將更新套用在現有記錄上，得到完整的新欄位值
    pub fn merge_onto(&self, current: &Scientist) -> ScientistInsert {
        ScientistInsert {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            field_of_study: self
                .field_of_study
                .clone()
                .unwrap_or_else(|| current.field_of_study.clone()),
            avatar: self.avatar.clone().or_else(|| current.avatar.clone()),
        }
    }
}

/// 科學家詳細資料，包含任務與造訪過的行星
#[derive(Debug, Clone, Serialize)]
pub struct ScientistDetail {
    #[serde(flatten)]
    pub scientist: Scientist,
    pub missions: Vec<MissionWithPlanet>,
    pub planets: Vec<Planet>,
}
