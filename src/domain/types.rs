// ==========================================
// 疫苗库存管理系统 - 领域类型定义
// ==========================================
// 状态等级: 过期 > 临期 > 低库存 > 正常（先命中者优先）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 批次状态 (Lot Status)
// ==========================================
// 红线: 一个批次只有一个状态,不叠加
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LotStatus {
    Expired,  // 已过期
    Expiring, // 临期
    LowStock, // 低库存
    Normal,   // 正常
}

impl LotStatus {
    /// 优先级（1 最高）
    pub fn priority(&self) -> u8 {
        match self {
            LotStatus::Expired => 1,
            LotStatus::Expiring => 2,
            LotStatus::LowStock => 3,
            LotStatus::Normal => 4,
        }
    }

    /// 表格行样式类名（正常批次无特殊样式）
    pub fn row_class(&self) -> Option<&'static str> {
        match self {
            LotStatus::Expired => Some("table-row-expired"),
            LotStatus::Expiring => Some("table-row-expiring"),
            LotStatus::LowStock => Some("table-row-low-stock"),
            LotStatus::Normal => None,
        }
    }

    /// 徽标文案的国际化键
    pub fn label_key(&self) -> &'static str {
        match self {
            LotStatus::Expired => "status.expired",
            LotStatus::Expiring => "status.expiring",
            LotStatus::LowStock => "status.low_stock",
            LotStatus::Normal => "status.normal",
        }
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotStatus::Expired => write!(f, "expired"),
            LotStatus::Expiring => write!(f, "expiring"),
            LotStatus::LowStock => write!(f, "lowStock"),
            LotStatus::Normal => write!(f, "normal"),
        }
    }
}

// ==========================================
// 排序字段 (Sort Field)
// ==========================================
// 表格列,与 VaccineLot 字段一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    #[serde(alias = "vaccine_id")]
    VaccineId,
    #[serde(alias = "commercial_name")]
    CommercialName,
    #[serde(alias = "generic_name")]
    GenericName,
    #[serde(alias = "lot_number")]
    LotNumber,
    Quantity,
    #[serde(alias = "quantity_on_hand")]
    QuantityOnHand,
    #[serde(alias = "expiration_date")]
    ExpirationDate,
    #[serde(alias = "received_date")]
    ReceivedDate,
}

impl Default for SortField {
    fn default() -> Self {
        SortField::ExpirationDate
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortField::Id => "id",
            SortField::VaccineId => "vaccineId",
            SortField::CommercialName => "commercialName",
            SortField::GenericName => "genericName",
            SortField::LotNumber => "lotNumber",
            SortField::Quantity => "quantity",
            SortField::QuantityOnHand => "quantityOnHand",
            SortField::ExpirationDate => "expirationDate",
            SortField::ReceivedDate => "receivedDate",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SortField {
    type Err = String;

    /// 同时接受 camelCase 与 snake_case 两种命名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "id" => Ok(SortField::Id),
            "vaccineid" => Ok(SortField::VaccineId),
            "commercialname" => Ok(SortField::CommercialName),
            "genericname" => Ok(SortField::GenericName),
            "lotnumber" => Ok(SortField::LotNumber),
            "quantity" => Ok(SortField::Quantity),
            "quantityonhand" => Ok(SortField::QuantityOnHand),
            "expirationdate" => Ok(SortField::ExpirationDate),
            "receiveddate" => Ok(SortField::ReceivedDate),
            _ => Err(format!("未知排序字段: {}", s)),
        }
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("未知排序方向: {}", s)),
        }
    }
}

// ==========================================
// 报表类型 (Report Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportType {
    Inventory, // 全量库存
    Expired,   // 已过期
    Expiring,  // 临期
    LowStock,  // 低库存
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Inventory
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Inventory => write!(f, "inventory"),
            ReportType::Expired => write!(f, "expired"),
            ReportType::Expiring => write!(f, "expiring"),
            ReportType::LowStock => write!(f, "lowStock"),
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "").as_str() {
            "inventory" => Ok(ReportType::Inventory),
            "expired" => Ok(ReportType::Expired),
            "expiring" => Ok(ReportType::Expiring),
            "lowstock" => Ok(ReportType::LowStock),
            _ => Err(format!("未知报表类型: {}", s)),
        }
    }
}
