// ==========================================
// 疫苗库存管理系统 - 配置管理器
// ==========================================
// 职责: 设置加载、查询、保存、重置
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::inventory_settings::{
    InventorySettings, DEFAULT_EXPIRING_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD,
};
use crate::config::settings_reader::{ConfigError, InventoryConfigReader};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取整数配置，解析失败时回落默认值
    fn get_i64_or_default(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        Ok(value.trim().parse::<i64>().unwrap_or_else(|_| {
            tracing::warn!(config_key = key, raw_value = %value, "配置值不是整数，使用默认值");
            default
        }))
    }

    /// 读取布尔配置（true/false/1/0），解析失败时回落默认值
    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let value = self.get_config_or_default(key, &default.to_string())?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => {
                tracing::warn!(config_key = key, raw_value = %value, "配置值不是布尔值，使用默认值");
                Ok(default)
            }
        }
    }

    /// 保存完整机构设置（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入的配置项数量
    pub fn save_settings(&self, settings: &InventorySettings) -> Result<usize, ConfigError> {
        let entries: [(&str, String); 6] = [
            (config_keys::FACILITY_NAME, settings.facility_name.clone()),
            (config_keys::CONTACT_EMAIL, settings.contact_email.clone()),
            (config_keys::LOW_STOCK_THRESHOLD, settings.low_stock_threshold.to_string()),
            (config_keys::EXPIRING_WINDOW_DAYS, settings.expiration_warning_days.to_string()),
            (config_keys::AUTO_BACKUP, settings.auto_backup.to_string()),
            (config_keys::EMAIL_ALERTS, settings.email_alerts.to_string()),
        ];

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for (key, value) in entries.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;

        tracing::info!(
            low_stock_threshold = settings.low_stock_threshold,
            expiring_window_days = settings.expiration_warning_days,
            "机构设置已保存"
        );
        Ok(count)
    }

    /// 删除所有设置项，恢复默认值
    pub fn reset_settings(&self) -> Result<usize, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let removed = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key IN (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                config_keys::FACILITY_NAME,
                config_keys::CONTACT_EMAIL,
                config_keys::LOW_STOCK_THRESHOLD,
                config_keys::EXPIRING_WINDOW_DAYS,
                config_keys::AUTO_BACKUP,
                config_keys::EMAIL_ALERTS,
            ],
        )?;
        tracing::info!(removed, "机构设置已重置为默认值");
        Ok(removed)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// InventoryConfigReader Trait 实现
// ==========================================
#[async_trait]
impl InventoryConfigReader for ConfigManager {
    // ===== 预警阈值 =====

    async fn get_low_stock_threshold(&self) -> Result<i64, ConfigError> {
        let value = self.get_i64_or_default(config_keys::LOW_STOCK_THRESHOLD, DEFAULT_LOW_STOCK_THRESHOLD)?;
        if value < 0 {
            tracing::warn!(value, "低库存阈值为负数，使用默认值");
            return Ok(DEFAULT_LOW_STOCK_THRESHOLD);
        }
        Ok(value)
    }

    async fn get_expiring_window_days(&self) -> Result<i64, ConfigError> {
        let value = self.get_i64_or_default(config_keys::EXPIRING_WINDOW_DAYS, DEFAULT_EXPIRING_WINDOW_DAYS)?;
        if value < 0 {
            tracing::warn!(value, "临期窗口为负数，使用默认值");
            return Ok(DEFAULT_EXPIRING_WINDOW_DAYS);
        }
        Ok(value)
    }

    // ===== 机构信息 =====

    async fn get_facility_name(&self) -> Result<String, ConfigError> {
        let default = InventorySettings::default().facility_name;
        self.get_config_or_default(config_keys::FACILITY_NAME, &default)
    }

    async fn get_contact_email(&self) -> Result<String, ConfigError> {
        let default = InventorySettings::default().contact_email;
        self.get_config_or_default(config_keys::CONTACT_EMAIL, &default)
    }

    // ===== 开关 =====

    async fn get_auto_backup(&self) -> Result<bool, ConfigError> {
        self.get_bool_or_default(config_keys::AUTO_BACKUP, true)
    }

    async fn get_email_alerts(&self) -> Result<bool, ConfigError> {
        self.get_bool_or_default(config_keys::EMAIL_ALERTS, true)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 机构
    pub const FACILITY_NAME: &str = "facility_name";
    pub const CONTACT_EMAIL: &str = "contact_email";

    // 预警阈值
    pub const LOW_STOCK_THRESHOLD: &str = "low_stock_threshold";
    pub const EXPIRING_WINDOW_DAYS: &str = "expiring_window_days";

    // 开关
    pub const AUTO_BACKUP: &str = "auto_backup";
    pub const EMAIL_ALERTS: &str = "email_alerts";
}
