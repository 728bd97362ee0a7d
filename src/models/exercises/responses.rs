use serde::Serialize;
use ts_rs::TS;

use super::entities::Exercise;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseListResponse {
    pub items: Vec<Exercise>,
    pub total: usize,
}
