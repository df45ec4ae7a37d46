// ==========================================
// 疫苗库存管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod lot;
pub mod records;
pub mod types;

// 重导出核心类型
pub use lot::{StatusResult, VaccineLot};
pub use records::{AdministrationRecord, ReceiptRecord};
pub use types::{LotStatus, ReportType, SortDirection, SortField};
