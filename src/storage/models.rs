use serde::{Deserialize, Deserializer};

pub mod mission;
pub mod planet;
pub mod scientist;

// 重新匯出常用模型類型
pub use mission::*;
pub use planet::*;
pub use scientist::*;

/// 將 JSON `null` 視為空字串，交由驗證器回報缺少的欄位
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
