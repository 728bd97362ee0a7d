use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::profiles::entities::ProfileSummary;

/// 练习
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct Exercise {
    // 唯一 ID
    pub id: i64,
    // 发布者 ID
    pub professor_id: i64,
    // 标题
    pub title: String,
    // 描述
    pub description: String,
    // 配图公开地址
    pub image_url: Option<String>,
    // 科目标签
    pub matter: Option<String>,
    // 发布时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 发布者资料（列表与详情查询时关联）
    pub professor: Option<ProfileSummary>,
}

impl Exercise {
    pub fn is_owned_by(&self, profile_id: i64) -> bool {
        self.professor_id == profile_id
    }

    pub fn reference(&self) -> ExerciseRef {
        ExerciseRef {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// 答案中引用的练习
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseRef {
    pub id: i64,
    pub title: String,
}
