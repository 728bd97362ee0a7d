//! Becanizado - 练习发布与答案反馈平台后端服务
//!
//! 教师发布练习，学生提交文字或图片答案，教师给出反馈。
//! 列表查询经过带新鲜期的查询缓存，写操作通过实时变更通知使缓存失效。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）与查询结果缓存
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理（启动、实时失效监听、关闭）
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
