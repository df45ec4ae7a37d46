// ==========================================
// 疫苗库存管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AdministrationApi, ConfigApi, InventoryApi, ReceivingApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::repository::{AdministrationRepository, ReceiptRepository, VaccineLotRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 库存查询API（驾驶舱/表格/报表）
    pub inventory_api: Arc<InventoryApi>,

    /// 接收入库API
    pub receiving_api: Arc<ReceivingApi>,

    /// 接种API
    pub administration_api: Arc<AdministrationApi>,

    /// 设置管理API
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 所有仓储与配置管理器共享同一个连接
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;
        let schema_version =
            read_schema_version(&conn).map_err(|e| format!("无法读取数据库版本: {}", e))?;
        tracing::info!(schema_version = ?schema_version, "数据库结构就绪");
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let lot_repo = Arc::new(VaccineLotRepository::new(conn.clone()));
        let receipt_repo = Arc::new(ReceiptRepository::new(conn.clone()));
        let administration_repo = Arc::new(AdministrationRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 创建API实例
        // ==========================================
        let inventory_api = Arc::new(InventoryApi::new(lot_repo.clone(), config_manager.clone()));
        let receiving_api = Arc::new(ReceivingApi::new(lot_repo.clone(), receipt_repo));
        let administration_api = Arc::new(AdministrationApi::new(lot_repo, administration_repo));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            inventory_api,
            receiving_api,
            administration_api,
            config_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级：
/// 1. 环境变量 VACCINE_INVENTORY_DB_PATH
/// 2. 用户数据目录/vaccine-inventory/vaccine_inventory.db
/// 3. 当前目录 ./vaccine_inventory.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("VACCINE_INVENTORY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./vaccine_inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("vaccine-inventory");
        // 目录创建失败时回落到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("vaccine_inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}
