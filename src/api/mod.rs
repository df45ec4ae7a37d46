// ==========================================
// 疫苗库存管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供界面/命令行调用
// ==========================================

pub mod administration_api;
pub mod config_api;
pub mod error;
pub mod inventory_api;
pub mod receiving_api;
pub mod validator;

// 重导出核心类型
pub use administration_api::{AdministrationApi, AdministrationOutcome};
pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult, FieldViolation};
pub use inventory_api::{CsvExport, DashboardSummary, InventoryApi, TableRow};
pub use receiving_api::{ReceiptOutcome, ReceivingApi};
pub use validator::{is_valid_email, validate_receipt_form, validate_settings, ReceiptForm, ValidatedReceipt};
