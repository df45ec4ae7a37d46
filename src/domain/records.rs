// ==========================================
// 疫苗库存管理系统 - 流水记录领域模型
// ==========================================
// 红线: 只追加,不修改
// 用途: 接种/接收流程写入,引擎层不读取
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// AdministrationRecord - 接种记录
// ==========================================
// 对齐: administration_record 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationRecord {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "vaccine_id")]
    pub vaccine_id: String,
    #[serde(alias = "lot_number")]
    pub lot_number: String,
    #[serde(alias = "doses_administered")]
    pub doses_administered: i64,
    #[serde(alias = "administration_date")]
    pub administration_date: NaiveDate,
}

// ==========================================
// ReceiptRecord - 接收记录
// ==========================================
// 对齐: receipt_record 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "vaccine_id")]
    pub vaccine_id: String,
    #[serde(alias = "received_date")]
    pub received_date: NaiveDate,
    #[serde(alias = "quantity_sent")]
    pub quantity_sent: i64, // 发货数量
    #[serde(alias = "quantity_received")]
    pub quantity_received: i64, // 实收数量
    #[serde(alias = "doses_passed_inspection")]
    pub doses_passed_inspection: i64, // 验收合格
    #[serde(alias = "doses_failed_inspection")]
    pub doses_failed_inspection: i64, // 验收不合格
    #[serde(alias = "discrepancy_reason", default)]
    pub discrepancy_reason: Option<String>, // 差异原因
}

impl ReceiptRecord {
    /// 发货与实收是否存在差异
    pub fn has_discrepancy(&self) -> bool {
        self.quantity_sent != self.quantity_received || self.doses_failed_inspection > 0
    }
}
