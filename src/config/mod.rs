// ==========================================
// 疫苗库存管理系统 - 配置层
// ==========================================
// 职责: 机构设置与预警阈值管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod inventory_settings;
pub mod settings_reader;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use inventory_settings::{AlertThresholds, InventorySettings};
pub use settings_reader::{ConfigError, InventoryConfigReader};
