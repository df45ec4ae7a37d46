// ==========================================
// 疫苗库存管理系统 - 疫苗批次领域模型
// ==========================================
// 用途: 接收/接种流程写入,引擎层只读
// 命名: Rust/SQL 统一 snake_case,JSON 边界 camelCase（兼容 snake_case 别名）
// ==========================================

use crate::domain::types::LotStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// VaccineLot - 疫苗批次
// ==========================================
// 对齐: vaccine_lot 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccineLot {
    // ===== 主键 =====
    #[serde(alias = "Id")]
    pub id: i64, // 记录ID（由仓储分配）

    // ===== 产品信息 =====
    #[serde(alias = "vaccine_id")]
    pub vaccine_id: String, // 外部目录编码
    #[serde(alias = "commercial_name")]
    pub commercial_name: String, // 商品名
    #[serde(alias = "generic_name")]
    pub generic_name: String, // 通用名
    #[serde(alias = "lot_number")]
    pub lot_number: String, // 生产批号

    // ===== 数量 =====
    pub quantity: i64, // 入库总剂量
    #[serde(alias = "quantity_on_hand")]
    pub quantity_on_hand: i64, // 当前可用剂量

    // ===== 日期 =====
    #[serde(alias = "expiration_date")]
    pub expiration_date: NaiveDate, // 有效期至
    #[serde(alias = "received_date")]
    pub received_date: NaiveDate, // 接收日期
}

impl VaccineLot {
    /// 搜索匹配（四个字段任一包含关键词即命中,忽略大小写）
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle_lower = needle.to_lowercase();
        if needle_lower.is_empty() {
            return true;
        }
        [
            &self.commercial_name,
            &self.generic_name,
            &self.lot_number,
            &self.vaccine_id,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle_lower))
    }
}

// ==========================================
// StatusResult - 状态判定结果
// ==========================================
// 派生值,不持久化,每次读取重新计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub status: LotStatus,
    pub priority: u8,
}

impl StatusResult {
    pub fn new(status: LotStatus) -> Self {
        Self {
            status,
            priority: status.priority(),
        }
    }
}

impl From<LotStatus> for StatusResult {
    fn from(status: LotStatus) -> Self {
        StatusResult::new(status)
    }
}
