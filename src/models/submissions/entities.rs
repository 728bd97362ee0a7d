use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::exercises::entities::ExerciseRef;
use crate::models::profiles::entities::ProfileSummary;

// 答案状态（由是否有反馈推导）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Pending,  // 待批改
    Reviewed, // 已反馈
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Reviewed => write!(f, "reviewed"),
        }
    }
}

/// 学生提交的答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub exercise_id: i64,
    pub student_id: i64,
    pub image_url: Option<String>,
    pub text_response: Option<String>,
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 关联的学生资料
    pub student: Option<ProfileSummary>,
    // 关联的练习（仅在全局答案列表中填充）
    pub exercise: Option<ExerciseRef>,
}

impl Submission {
    pub fn status_for(feedback: Option<&str>) -> SubmissionStatus {
        match feedback {
            Some(text) if !text.trim().is_empty() => SubmissionStatus::Reviewed,
            _ => SubmissionStatus::Pending,
        }
    }

    /// 写入反馈并同步状态
    pub fn with_feedback(mut self, feedback: String) -> Self {
        self.status = Self::status_for(Some(&feedback));
        self.feedback = Some(feedback);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_feedback() {
        assert_eq!(Submission::status_for(None), SubmissionStatus::Pending);
        assert_eq!(Submission::status_for(Some("  ")), SubmissionStatus::Pending);
        assert_eq!(
            Submission::status_for(Some("Bien hecho")),
            SubmissionStatus::Reviewed
        );
    }

    #[test]
    fn test_with_feedback_marks_reviewed() {
        let submission = Submission {
            id: 1,
            exercise_id: 2,
            student_id: 3,
            image_url: None,
            text_response: Some("x = 4".to_string()),
            feedback: None,
            status: SubmissionStatus::Pending,
            created_at: chrono::Utc::now(),
            student: None,
            exercise: None,
        };
        let reviewed = submission.with_feedback("Correcto".to_string());
        assert_eq!(reviewed.status, SubmissionStatus::Reviewed);
        assert_eq!(reviewed.feedback.as_deref(), Some("Correcto"));
    }
}
