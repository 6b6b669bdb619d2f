//! InternHub - 实习作业工作流后端服务
//!
//! 基于 Actix Web 构建的实习作业发布、提交与评审服务。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `file_store`: 提交文件存储
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `notifier`: 通知投递
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: HTTP 服务层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数
//! - `workflow`: 作业状态机与提交 / 评审工作流

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod file_store;
pub mod middlewares;
pub mod models;
pub mod notifier;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
pub mod workflow;
