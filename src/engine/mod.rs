// ==========================================
// 疫苗库存管理系统 - 引擎层
// ==========================================
// 职责: 实现库存预警规则,纯函数
// 红线: Engine 不拼 SQL、不读系统时钟,today 一律由调用方传入
// ==========================================

pub mod alert;
pub mod projector;
pub mod report;
pub mod status;

// 重导出核心引擎
pub use alert::{AlertAggregator, AlertBuckets, AlertCounts};
pub use projector::{TableProjector, TableQuery};
pub use report::{export_file_name, ReportBuilder, CSV_HEADERS};
pub use status::{days_until_expiry, StatusClassifier};
