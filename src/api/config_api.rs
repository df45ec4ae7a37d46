// ==========================================
// 疫苗库存管理系统 - 设置管理 API
// ==========================================
// 职责: 机构设置查询、保存、重置、快照
// ==========================================

use std::sync::Arc;

use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_settings;
use crate::config::{AlertThresholds, ConfigManager, InventoryConfigReader, InventorySettings};

// ==========================================
// ConfigApi - 设置管理 API
// ==========================================

/// 设置管理API
///
/// 职责：
/// 1. 设置查询（缺省项回落到默认值）
/// 2. 设置保存（先校验后写入）
/// 3. 恢复默认
pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    /// 创建新的ConfigApi实例
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询机构设置
    pub async fn get_settings(&self) -> ApiResult<InventorySettings> {
        self.config_manager
            .load_settings()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 查询预警阈值
    pub async fn get_thresholds(&self) -> ApiResult<AlertThresholds> {
        self.config_manager
            .load_thresholds()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 保存机构设置
    ///
    /// # 返回
    /// - Ok(()): 成功
    /// - Err(ValidationError): 设置未通过校验,不写入
    pub fn save_settings(&self, settings: &InventorySettings) -> ApiResult<()> {
        let violations = validate_settings(settings);
        if !violations.is_empty() {
            warn!(violations = violations.len(), "机构设置校验失败");
            return Err(ApiError::validation(violations));
        }

        self.config_manager
            .save_settings(settings)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(())
    }

    /// 恢复默认设置
    ///
    /// # 返回
    /// - Ok(InventorySettings): 默认设置
    pub fn reset_settings(&self) -> ApiResult<InventorySettings> {
        self.config_manager
            .reset_settings()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(InventorySettings::default())
    }

    /// 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}
