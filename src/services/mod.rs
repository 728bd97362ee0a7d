pub mod auth;
pub mod channel;
pub mod exercises;
pub mod feed;
pub mod files;
pub mod realtime;
pub mod submissions;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, QueryCache};

pub use auth::AuthService;
pub use channel::ChannelService;
pub use exercises::ExerciseService;
pub use feed::FeedService;
pub use files::FileService;
pub use realtime::{RealtimeHub, RealtimeService};
pub use submissions::SubmissionService;

pub(crate) fn get_query_cache(request: &HttpRequest) -> Arc<QueryCache> {
    request
        .app_data::<web::Data<Arc<QueryCache>>>()
        .expect("QueryCache not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn get_object_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}
