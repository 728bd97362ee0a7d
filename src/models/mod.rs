//! 数据模型
//!
//! 按业务领域划分：每个子模块包含实体 (`entities`)、请求 (`requests`) 与响应 (`responses`) 模型。
//! 所有对外暴露的结构都通过 ts-rs 导出 TypeScript 类型。

pub mod auth;
pub mod channel;
pub mod common;
pub mod exercises;
pub mod feed;
pub mod files;
pub mod profiles;
pub mod realtime;
pub mod submissions;

pub use common::response::ApiResponse;

/// 业务错误码
///
/// 0 表示成功，1xxx 为通用错误，之后按领域分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户资料
    AuthFailed = 2000,
    RegisterFailed = 2001,
    ProfileEmailInvalid = 2002,
    ProfileEmailAlreadyExists = 2003,
    ProfilePasswordInvalid = 2004,
    ProfileNameInvalid = 2005,
    ProfileChannelInvalid = 2006,
    ProfileRoleNotAllowed = 2007,
    ProfileNotFound = 2008,

    // 练习
    ExerciseNotFound = 3000,
    ExerciseInvalid = 3001,
    ExerciseMatterInvalid = 3002,
    ExerciseCreationFailed = 3003,
    ExerciseDeleteFailed = 3004,

    // 答案提交
    SubmissionNotFound = 4000,
    SubmissionEmpty = 4001,
    SubmissionCreationFailed = 4002,
    FeedbackEmpty = 4003,
    FeedbackFailed = 4004,
    SubmissionDeleteFailed = 4005,

    // 文件存储
    FileUploadFailed = 5000,
    FileNotFound = 5001,
    FileTypeNotAllowed = 5002,
    FileSizeExceeded = 5003,
    MultifileUploadNotAllowed = 5004,
    BucketInvalid = 5005,

    // 频道视频
    ChannelFeedFailed = 6000,
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
