// ==========================================
// 疫苗库存管理系统 - 机构设置与预警阈值
// ==========================================
// 红线: 阈值只读取一次,按调用传入引擎,不做全局缓存
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认低库存阈值（剂）
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// 默认临期窗口（天）
pub const DEFAULT_EXPIRING_WINDOW_DAYS: i64 = 30;

/// 预警阈值（状态判定引擎的全部可调参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertThresholds {
    /// 低库存阈值：0 < 在库量 <= 该值 视为低库存
    #[serde(alias = "low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// 临期窗口：距有效期天数 <= 该值 视为临期（含边界）
    #[serde(alias = "expiring_window_days", alias = "expirationWarningDays")]
    pub expiring_window_days: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiring_window_days: DEFAULT_EXPIRING_WINDOW_DAYS,
        }
    }
}

/// 机构设置（持久化对象）
///
/// 存储位置：config_kv（scope_id='global'，每个字段一个 key，见 config_keys）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySettings {
    /// 机构名称
    #[serde(alias = "facility_name")]
    pub facility_name: String,

    /// 联系邮箱
    #[serde(alias = "contact_email")]
    pub contact_email: String,

    /// 低库存阈值
    #[serde(alias = "low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// 临期预警天数
    #[serde(alias = "expiration_warning_days", alias = "expiringWindowDays")]
    pub expiration_warning_days: i64,

    /// 自动备份
    #[serde(alias = "auto_backup", default)]
    pub auto_backup: bool,

    /// 邮件预警
    #[serde(alias = "email_alerts", default)]
    pub email_alerts: bool,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            facility_name: "Healthcare Facility".to_string(),
            contact_email: "admin@facility.com".to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            expiration_warning_days: DEFAULT_EXPIRING_WINDOW_DAYS,
            auto_backup: true,
            email_alerts: true,
        }
    }
}

impl InventorySettings {
    /// 提取状态判定所需的阈值
    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            low_stock_threshold: self.low_stock_threshold,
            expiring_window_days: self.expiration_warning_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = InventorySettings::default();
        assert_eq!(settings.low_stock_threshold, 5);
        assert_eq!(settings.expiration_warning_days, 30);
        assert_eq!(settings.thresholds(), AlertThresholds::default());
    }

    #[test]
    fn test_settings_json_aliases() {
        let json = r#"{
            "facility_name": "North Clinic",
            "contactEmail": "ops@north.example",
            "lowStockThreshold": 8,
            "expirationWarningDays": 45
        }"#;
        let settings: InventorySettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.facility_name, "North Clinic");
        assert_eq!(settings.thresholds().expiring_window_days, 45);
        assert!(!settings.auto_backup);
    }
}
