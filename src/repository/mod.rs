// ==========================================
// 疫苗库存管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod administration_repo;
pub mod error;
pub mod memory_store;
pub mod receipt_repo;
pub mod record_store;
pub mod vaccine_lot_repo;

// 重导出核心仓储
pub use administration_repo::AdministrationRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use memory_store::InMemoryRecordStore;
pub use receipt_repo::ReceiptRepository;
pub use record_store::{LotStore, Record, RecordStore};
pub use vaccine_lot_repo::VaccineLotRepository;

use crate::db::DATE_FORMAT;
use chrono::NaiveDate;

/// 解析库中存储的日期文本
pub(crate) fn parse_stored_date(field: &str, value: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("无效日期 '{}': {}", value, e),
    })
}
