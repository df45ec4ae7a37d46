// ==========================================
// 疫苗库存管理系统 - 库存查询 API
// ==========================================
// 职责: 驾驶舱汇总、库存表格、报表与 CSV 导出
// 红线: 阈值从配置读取,驾驶舱与报表使用同一份阈值
// 架构: API 层 → Engine 层（纯函数） + Repository 层（批次读取）
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{AlertThresholds, InventoryConfigReader};
use crate::domain::lot::{StatusResult, VaccineLot};
use crate::domain::types::ReportType;
use crate::engine::{
    export_file_name, AlertAggregator, AlertCounts, ReportBuilder, StatusClassifier,
    TableProjector, TableQuery,
};
use crate::repository::LotStore;

// ==========================================
// 响应 DTO
// ==========================================

/// 驾驶舱汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// 批次总数
    pub total_lots: usize,
    /// 在库剂次合计
    pub total_doses_on_hand: i64,
    /// 预警计数
    pub counts: AlertCounts,
    pub expired: Vec<VaccineLot>,
    pub expiring: Vec<VaccineLot>,
    pub low_stock: Vec<VaccineLot>,
    /// 本次计算使用的阈值
    pub thresholds: AlertThresholds,
}

/// 库存表格行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(flatten)]
    pub lot: VaccineLot,
    pub status: StatusResult,
    /// 行样式（Normal 为 None）
    pub row_class: Option<&'static str>,
}

/// CSV 导出结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub file_name: String,
    pub row_count: usize,
    pub content: String,
}

// ==========================================
// InventoryApi - 库存查询 API
// ==========================================
pub struct InventoryApi {
    lot_store: Arc<dyn LotStore>,
    config: Arc<dyn InventoryConfigReader>,
}

impl InventoryApi {
    /// 创建新的InventoryApi实例
    ///
    /// # 参数
    /// - lot_store: 批次存储
    /// - config: 配置读取器（提供预警阈值）
    pub fn new(lot_store: Arc<dyn LotStore>, config: Arc<dyn InventoryConfigReader>) -> Self {
        Self { lot_store, config }
    }

    /// 读取当前预警阈值
    pub async fn thresholds(&self) -> ApiResult<AlertThresholds> {
        self.config
            .load_thresholds()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    async fn aggregator(&self) -> ApiResult<AlertAggregator> {
        let thresholds = self.thresholds().await?;
        Ok(AlertAggregator::new(StatusClassifier::with_thresholds(thresholds)))
    }

    // ==========================================
    // 批次查询
    // ==========================================

    /// 查询全部批次
    pub fn list_lots(&self) -> ApiResult<Vec<VaccineLot>> {
        Ok(self.lot_store.list()?)
    }

    /// 按ID查询批次
    ///
    /// # 返回
    /// - Err(NotFound): 批次不存在
    pub fn get_lot(&self, lot_id: i64) -> ApiResult<VaccineLot> {
        self.lot_store
            .get(lot_id)?
            .ok_or_else(|| ApiError::NotFound(format!("批次(id={})不存在", lot_id)))
    }

    /// 按疫苗编码查询批次
    pub fn list_lots_by_vaccine(&self, vaccine_id: &str) -> ApiResult<Vec<VaccineLot>> {
        if vaccine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("疫苗编码不能为空".to_string()));
        }
        Ok(self.lot_store.list_by_vaccine_id(vaccine_id.trim())?)
    }

    // ==========================================
    // 驾驶舱
    // ==========================================

    /// 驾驶舱汇总
    ///
    /// # 参数
    /// - today: 计算日
    pub async fn dashboard(&self, today: NaiveDate) -> ApiResult<DashboardSummary> {
        let aggregator = self.aggregator().await?;
        let lots = self.lot_store.list()?;

        let buckets = aggregator.aggregate(&lots, today);
        let total_doses_on_hand = lots.iter().map(|l| l.quantity_on_hand).sum();

        info!(
            total_lots = lots.len(),
            expired = buckets.counts.expired,
            expiring = buckets.counts.expiring,
            low_stock = buckets.counts.low_stock,
            "驾驶舱汇总完成"
        );

        Ok(DashboardSummary {
            total_lots: lots.len(),
            total_doses_on_hand,
            counts: buckets.counts,
            expired: buckets.expired,
            expiring: buckets.expiring,
            low_stock: buckets.low_stock,
            thresholds: aggregator.classifier().thresholds(),
        })
    }

    // ==========================================
    // 库存表格
    // ==========================================

    /// 库存表格（筛选 + 排序 + 状态）
    pub async fn table(&self, query: &TableQuery, today: NaiveDate) -> ApiResult<Vec<TableRow>> {
        let classifier = StatusClassifier::with_thresholds(self.thresholds().await?);
        let lots = self.lot_store.list()?;

        let rows: Vec<TableRow> = TableProjector::new()
            .project(&lots, query)
            .into_iter()
            .map(|lot| {
                let status = classifier.classify(&lot, today);
                TableRow {
                    row_class: status.status.row_class(),
                    status,
                    lot,
                }
            })
            .collect();

        debug!(
            search = %query.search_term,
            field = %query.sort_field,
            direction = %query.sort_direction,
            rows = rows.len(),
            "库存表格投影完成"
        );
        Ok(rows)
    }

    // ==========================================
    // 报表
    // ==========================================

    /// 按类型生成报表
    pub async fn report(&self, report_type: ReportType, today: NaiveDate) -> ApiResult<Vec<VaccineLot>> {
        let builder = ReportBuilder::new(self.aggregator().await?);
        let lots = self.lot_store.list()?;
        Ok(builder.filter(&lots, report_type, today))
    }

    /// 导出报表 CSV
    pub async fn export_report_csv(&self, report_type: ReportType, today: NaiveDate) -> ApiResult<CsvExport> {
        let builder = ReportBuilder::new(self.aggregator().await?);
        let lots = builder.filter(&self.lot_store.list()?, report_type, today);
        let content = builder.to_csv_string(&lots)?;

        info!(report_type = %report_type, rows = lots.len(), "报表导出完成");

        Ok(CsvExport {
            file_name: export_file_name(today),
            row_count: lots.len(),
            content,
        })
    }
}
