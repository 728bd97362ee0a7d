use serde::Deserialize;
use ts_rs::TS;

/// 发布练习请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct CreateExerciseRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub matter: Option<String>,
}

/// 练习列表筛选参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseListParams {
    pub search: Option<String>,
    pub matter: Option<String>,
}
