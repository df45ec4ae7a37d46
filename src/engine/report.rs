// ==========================================
// 疫苗库存管理系统 - 报表引擎
// ==========================================
// 红线: 报表筛选与驾驶舱预警复用同一汇总引擎,口径一致
// ==========================================
// 职责: 按报表类型筛选批次 + CSV 导出
// ==========================================

use crate::domain::lot::VaccineLot;
use crate::domain::types::{LotStatus, ReportType};
use crate::engine::alert::AlertAggregator;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::io::Write;

/// CSV 表头
pub const CSV_HEADERS: [&str; 6] = [
    "Vaccine ID",
    "Commercial Name",
    "Generic Name",
    "Lot Number",
    "Expiration Date",
    "Quantity On Hand",
];

/// 导出文件名：vaccine-inventory-YYYY-MM-DD.csv
pub fn export_file_name(today: NaiveDate) -> String {
    format!("vaccine-inventory-{}.csv", today.format("%Y-%m-%d"))
}

// ==========================================
// ReportBuilder - 报表引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    aggregator: AlertAggregator,
}

impl ReportBuilder {
    pub fn new(aggregator: AlertAggregator) -> Self {
        Self { aggregator }
    }

    /// 按报表类型筛选
    ///
    /// - Inventory: 全部批次（保持输入顺序）
    /// - 其余类型: 对应预警桶
    pub fn filter(&self, lots: &[VaccineLot], report_type: ReportType, today: NaiveDate) -> Vec<VaccineLot> {
        let status = match report_type {
            ReportType::Inventory => return lots.to_vec(),
            ReportType::Expired => LotStatus::Expired,
            ReportType::Expiring => LotStatus::Expiring,
            ReportType::LowStock => LotStatus::LowStock,
        };

        let buckets = self.aggregator.aggregate(lots, today);
        let selected = buckets.bucket(status).to_vec();

        tracing::debug!(report_type = %report_type, selected = selected.len(), "报表筛选完成");
        selected
    }

    /// 写出 CSV
    ///
    /// # 返回
    /// - Ok(usize): 写出的数据行数（不含表头）
    pub fn write_csv<W: Write>(&self, lots: &[VaccineLot], writer: W) -> Result<usize, csv::Error> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(CSV_HEADERS)?;

        for lot in lots {
            let expiration = lot.expiration_date.format("%Y-%m-%d").to_string();
            let on_hand = lot.quantity_on_hand.to_string();
            wtr.write_record([
                lot.vaccine_id.as_str(),
                lot.commercial_name.as_str(),
                lot.generic_name.as_str(),
                lot.lot_number.as_str(),
                expiration.as_str(),
                on_hand.as_str(),
            ])?;
        }

        wtr.flush()?;
        Ok(lots.len())
    }

    /// 导出为 CSV 字符串
    pub fn to_csv_string(&self, lots: &[VaccineLot]) -> Result<String, csv::Error> {
        let mut buf = Vec::new();
        self.write_csv(lots, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
