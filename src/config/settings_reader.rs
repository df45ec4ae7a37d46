// ==========================================
// 疫苗库存管理系统 - 设置读取 Trait
// ==========================================
// 职责: 定义预警引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::inventory_settings::{AlertThresholds, InventorySettings};
use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// InventoryConfigReader Trait
// ==========================================
// 用途: 状态判定/预警汇总所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait InventoryConfigReader: Send + Sync {
    // ===== 预警阈值 =====

    /// 获取低库存阈值
    ///
    /// # 默认值
    /// - 5
    async fn get_low_stock_threshold(&self) -> Result<i64, ConfigError>;

    /// 获取临期窗口天数
    ///
    /// # 默认值
    /// - 30
    async fn get_expiring_window_days(&self) -> Result<i64, ConfigError>;

    // ===== 机构信息 =====

    async fn get_facility_name(&self) -> Result<String, ConfigError>;

    async fn get_contact_email(&self) -> Result<String, ConfigError>;

    // ===== 开关 =====

    async fn get_auto_backup(&self) -> Result<bool, ConfigError>;

    async fn get_email_alerts(&self) -> Result<bool, ConfigError>;

    // ===== 组合读取 =====

    /// 读取预警阈值（状态判定引擎的调用参数）
    async fn load_thresholds(&self) -> Result<AlertThresholds, ConfigError> {
        Ok(AlertThresholds {
            low_stock_threshold: self.get_low_stock_threshold().await?,
            expiring_window_days: self.get_expiring_window_days().await?,
        })
    }

    /// 读取完整机构设置
    async fn load_settings(&self) -> Result<InventorySettings, ConfigError> {
        Ok(InventorySettings {
            facility_name: self.get_facility_name().await?,
            contact_email: self.get_contact_email().await?,
            low_stock_threshold: self.get_low_stock_threshold().await?,
            expiration_warning_days: self.get_expiring_window_days().await?,
            auto_backup: self.get_auto_backup().await?,
            email_alerts: self.get_email_alerts().await?,
        })
    }
}
