use crate::models::submissions::entities::Submission;
use crate::services::exercises::filter::normalize_search;

/// 按学生姓名或练习标题做不区分大小写的子串匹配
pub fn filter_submissions(items: Vec<Submission>, search: Option<&str>) -> Vec<Submission> {
    let Some(term) = normalize_search(search) else {
        return items;
    };

    items
        .into_iter()
        .filter(|submission| {
            submission
                .student
                .as_ref()
                .is_some_and(|s| s.full_name.to_lowercase().contains(&term))
                || submission
                    .exercise
                    .as_ref()
                    .is_some_and(|e| e.title.to_lowercase().contains(&term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercises::entities::ExerciseRef;
    use crate::models::profiles::entities::ProfileSummary;
    use crate::models::submissions::entities::SubmissionStatus;

    fn submission(id: i64, student: &str, exercise: &str) -> Submission {
        Submission {
            id,
            exercise_id: id * 10,
            student_id: id,
            image_url: None,
            text_response: Some("respuesta".to_string()),
            feedback: None,
            status: SubmissionStatus::Pending,
            created_at: chrono::Utc::now(),
            student: Some(ProfileSummary {
                id,
                full_name: student.to_string(),
                email: format!("{id}@example.com"),
                youtube_channel: None,
            }),
            exercise: Some(ExerciseRef {
                id: id * 10,
                title: exercise.to_string(),
            }),
        }
    }

    fn ids(items: &[Submission]) -> Vec<i64> {
        items.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_filter_by_student_or_exercise() {
        let items = vec![
            submission(1, "María López", "Derivadas"),
            submission(2, "Juan Ruiz", "Integrales"),
        ];
        assert_eq!(ids(&filter_submissions(items.clone(), Some("maría"))), vec![1]);
        assert_eq!(ids(&filter_submissions(items.clone(), Some("INTEGRAL"))), vec![2]);
        assert_eq!(ids(&filter_submissions(items.clone(), Some(" "))), vec![1, 2]);
        assert!(filter_submissions(items, Some("química")).is_empty());
    }
}
