//! 练习列表的搜索与科目筛选

use crate::models::exercises::entities::Exercise;

/// 统一的搜索词形式：去掉首尾空白并转为小写，空串视为不筛选
pub(crate) fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// 按标题、描述或发布者姓名做不区分大小写的子串匹配，再按科目精确匹配
pub fn filter_exercises(
    items: Vec<Exercise>,
    search: Option<&str>,
    matter: Option<&str>,
) -> Vec<Exercise> {
    let search = normalize_search(search);
    let matter = matter.map(str::trim).filter(|m| !m.is_empty());

    items
        .into_iter()
        .filter(|exercise| match &search {
            Some(term) => {
                exercise.title.to_lowercase().contains(term)
                    || exercise.description.to_lowercase().contains(term)
                    || exercise
                        .professor
                        .as_ref()
                        .is_some_and(|p| p.full_name.to_lowercase().contains(term))
            }
            None => true,
        })
        .filter(|exercise| match matter {
            Some(matter) => exercise.matter.as_deref() == Some(matter),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::ProfileSummary;

    fn exercise(id: i64, title: &str, description: &str, matter: Option<&str>) -> Exercise {
        Exercise {
            id,
            professor_id: 1,
            title: title.to_string(),
            description: description.to_string(),
            image_url: None,
            matter: matter.map(str::to_string),
            created_at: chrono::Utc::now(),
            professor: Some(ProfileSummary {
                id: 1,
                full_name: "Ana Pérez".to_string(),
                email: "ana@example.com".to_string(),
                youtube_channel: None,
            }),
        }
    }

    fn sample() -> Vec<Exercise> {
        vec![
            exercise(1, "Derivadas", "Calcula la derivada", Some("Matemáticas")),
            exercise(2, "Cinemática", "Movimiento rectilíneo", Some("Física")),
            exercise(3, "Ensayo libre", "Tema abierto", None),
        ]
    }

    fn ids(items: &[Exercise]) -> Vec<i64> {
        items.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_empty_search_matches_everything() {
        assert_eq!(ids(&filter_exercises(sample(), None, None)), vec![1, 2, 3]);
        assert_eq!(ids(&filter_exercises(sample(), Some("   "), Some(""))), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        assert_eq!(ids(&filter_exercises(sample(), Some("DERIV"), None)), vec![1]);
        assert_eq!(ids(&filter_exercises(sample(), Some(" rectilíneo "), None)), vec![2]);
    }

    #[test]
    fn test_search_matches_professor_name() {
        assert_eq!(ids(&filter_exercises(sample(), Some("ana pérez"), None)), vec![1, 2, 3]);
        assert!(filter_exercises(sample(), Some("Luis"), None).is_empty());
    }

    #[test]
    fn test_matter_filter_is_exact() {
        assert_eq!(ids(&filter_exercises(sample(), None, Some("Física"))), vec![2]);
        assert!(filter_exercises(sample(), None, Some("Fís")).is_empty());
        assert_eq!(
            ids(&filter_exercises(sample(), Some("movimiento"), Some("Matemáticas"))),
            Vec::<i64>::new()
        );
    }
}
