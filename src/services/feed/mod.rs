//! 主页视图：按角色组装练习或答案列表，以及界面上可执行的操作

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::exercises::entities::Exercise;
use crate::models::feed::{
    requests::{FeedParams, FeedTab},
    responses::{ExerciseFeedItem, FeedResponse, MattersResponse},
};
use crate::models::profiles::entities::Profile;
use crate::models::submissions::entities::Submission;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::exercises::{cached_exercises, filter_exercises};
use crate::services::get_query_cache;
use crate::services::submissions::{cached_submissions, filter_submissions};
use crate::storage::Storage;

pub const STUDENT_HEADING: &str = "Explorar Ejercicios";
pub const PROFESSOR_HEADING: &str = "Mis Ejercicios y Publicaciones";
pub const RESPONSES_HEADING: &str = "Feed de Respuestas";

pub struct FeedService {
    storage: Option<Arc<dyn Storage>>,
}

/// 学生只能看到练习选项卡
pub fn effective_tab(profile: &Profile, requested: FeedTab) -> FeedTab {
    if profile.is_professor() {
        requested
    } else {
        FeedTab::Exercises
    }
}

/// 组装主页视图，`content` 必须与 `effective_tab` 的结果对应
pub fn build_feed(profile: &Profile, content: FeedContent) -> FeedResponse {
    let capabilities = profile.capabilities();

    match content {
        FeedContent::Exercises(items) => {
            let heading = if profile.is_professor() {
                PROFESSOR_HEADING
            } else {
                STUDENT_HEADING
            };
            let exercises = items
                .into_iter()
                .map(|exercise| ExerciseFeedItem {
                    can_delete: profile.is_professor() && exercise.is_owned_by(profile.id),
                    can_answer: capabilities.can_submit,
                    exercise,
                })
                .collect();

            FeedResponse {
                role: profile.role,
                heading: heading.to_string(),
                tab: FeedTab::Exercises,
                exercises: Some(exercises),
                submissions: None,
                capabilities,
            }
        }
        FeedContent::Responses(items) => FeedResponse {
            role: profile.role,
            heading: RESPONSES_HEADING.to_string(),
            tab: FeedTab::Responses,
            exercises: None,
            submissions: Some(items),
            capabilities,
        },
    }
}

pub enum FeedContent {
    Exercises(Vec<Exercise>),
    Responses(Vec<Submission>),
}

impl FeedService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 主页视图
    pub async fn get_feed(
        &self,
        request: &HttpRequest,
        query: FeedParams,
    ) -> ActixResult<HttpResponse> {
        let Some(profile) = RequireJWT::extract_profile(request) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        };

        let storage = self.get_storage(request);
        let cache = get_query_cache(request);

        let content = match effective_tab(&profile, query.tab) {
            FeedTab::Exercises => cached_exercises(&storage, &cache).await.map(|items| {
                FeedContent::Exercises(filter_exercises(
                    items,
                    query.search.as_deref(),
                    query.matter.as_deref(),
                ))
            }),
            FeedTab::Responses => cached_submissions(&storage, &cache)
                .await
                .map(|items| {
                    FeedContent::Responses(filter_submissions(items, query.search.as_deref()))
                }),
        };

        match content {
            Ok(content) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                build_feed(&profile, content),
                "Feed retrieved successfully",
            ))),
            Err(e) => Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load feed: {e}"),
                )),
            ),
        }
    }

    // 可选科目
    pub async fn list_matters(&self) -> ActixResult<HttpResponse> {
        let response = MattersResponse {
            matters: AppConfig::get().app.matters.clone(),
        };
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Matters retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::ProfileRole;

    fn profile(id: i64, role: ProfileRole) -> Profile {
        Profile {
            id,
            email: format!("{id}@example.com"),
            password_hash: String::new(),
            full_name: format!("Perfil {id}"),
            role,
            youtube_channel: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn exercise(id: i64, professor_id: i64) -> Exercise {
        Exercise {
            id,
            professor_id,
            title: format!("Ejercicio {id}"),
            description: "Descripción".to_string(),
            image_url: None,
            matter: None,
            created_at: chrono::Utc::now(),
            professor: None,
        }
    }

    #[test]
    fn test_students_always_get_exercise_tab() {
        let student = profile(1, ProfileRole::Student);
        assert_eq!(effective_tab(&student, FeedTab::Responses), FeedTab::Exercises);

        let professor = profile(2, ProfileRole::Professor);
        assert_eq!(effective_tab(&professor, FeedTab::Responses), FeedTab::Responses);
    }

    #[test]
    fn test_student_feed() {
        let student = profile(1, ProfileRole::Student);
        let feed = build_feed(&student, FeedContent::Exercises(vec![exercise(10, 2)]));

        assert_eq!(feed.heading, STUDENT_HEADING);
        assert!(feed.submissions.is_none());
        let items = feed.exercises.unwrap();
        assert!(items[0].can_answer);
        assert!(!items[0].can_delete);
        assert!(feed.capabilities.can_submit);
        assert!(!feed.capabilities.can_create_exercise);
    }

    #[test]
    fn test_professor_can_delete_only_own_exercises() {
        let professor = profile(2, ProfileRole::Professor);
        let feed = build_feed(
            &professor,
            FeedContent::Exercises(vec![exercise(10, 2), exercise(11, 3)]),
        );

        assert_eq!(feed.heading, PROFESSOR_HEADING);
        let items = feed.exercises.unwrap();
        assert!(items[0].can_delete);
        assert!(!items[1].can_delete);
        assert!(items.iter().all(|item| !item.can_answer));
    }

    #[test]
    fn test_professor_responses_feed() {
        let professor = profile(2, ProfileRole::Professor);
        let feed = build_feed(&professor, FeedContent::Responses(Vec::new()));

        assert_eq!(feed.heading, RESPONSES_HEADING);
        assert_eq!(feed.tab, FeedTab::Responses);
        assert!(feed.exercises.is_none());
        assert_eq!(feed.submissions.map(|s| s.len()), Some(0));
        assert!(feed.capabilities.can_review_responses);
    }
}
