// ==========================================
// 疫苗库存管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 效期与库存预警（状态判定 → 预警汇总 → 表格/报表）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 预警规则
pub mod engine;

// 配置层 - 机构设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LotStatus, ReportType, SortDirection, SortField};

// 领域实体
pub use domain::{AdministrationRecord, ReceiptRecord, StatusResult, VaccineLot};

// 引擎
pub use engine::{AlertAggregator, AlertBuckets, ReportBuilder, StatusClassifier, TableProjector, TableQuery};

// API
pub use api::{AdministrationApi, ConfigApi, InventoryApi, ReceivingApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "疫苗库存管理系统";
