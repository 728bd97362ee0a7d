pub mod auth;

pub mod exercises;

pub mod submissions;

pub mod storage;

pub mod feed;

pub mod realtime;

pub mod channel;

pub mod frontend;


pub use auth::configure_auth_routes;
pub use channel::configure_channel_routes;
pub use exercises::configure_exercises_routes;
pub use feed::configure_feed_routes;
pub use frontend::configure_frontend_routes;
pub use realtime::configure_realtime_routes;
pub use storage::configure_storage_routes;
pub use submissions::configure_submissions_routes;
