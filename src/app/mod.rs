// ==========================================
// 疫苗库存管理系统 - 应用层
// ==========================================
// 职责: 组装仓储、配置与 API,供命令行/界面使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
