// ==========================================
// 疫苗库存管理系统 - 预警汇总引擎
// ==========================================
// 红线: 每个批次最多进入一个预警桶（按状态优先级）
// 红线: 不读取系统时钟，today 由调用方传入
// ==========================================
// 职责: 对批次集合逐个判定状态，分桶并计数
// 调用方: 驾驶舱预警卡片、报表筛选（两者结果必须一致）
// ==========================================

use crate::domain::lot::VaccineLot;
use crate::domain::types::LotStatus;
use crate::engine::status::StatusClassifier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 预警计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCounts {
    pub expired: usize,
    pub expiring: usize,
    pub low_stock: usize,
}

impl AlertCounts {
    pub fn total(&self) -> usize {
        self.expired + self.expiring + self.low_stock
    }
}

/// 预警分桶结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBuckets {
    pub expired: Vec<VaccineLot>,
    pub expiring: Vec<VaccineLot>,
    pub low_stock: Vec<VaccineLot>,
    pub counts: AlertCounts,
}

impl AlertBuckets {
    /// 按状态取桶（Normal 无桶）
    pub fn bucket(&self, status: LotStatus) -> &[VaccineLot] {
        match status {
            LotStatus::Expired => &self.expired,
            LotStatus::Expiring => &self.expiring,
            LotStatus::LowStock => &self.low_stock,
            LotStatus::Normal => &[],
        }
    }
}

// ==========================================
// AlertAggregator - 预警汇总引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertAggregator {
    classifier: StatusClassifier,
}

impl AlertAggregator {
    pub fn new(classifier: StatusClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &StatusClassifier {
        &self.classifier
    }

    /// 汇总预警
    ///
    /// 桶内保持输入顺序；Normal 批次不进入任何桶
    #[instrument(skip(self, lots), fields(count = lots.len()))]
    pub fn aggregate(&self, lots: &[VaccineLot], today: NaiveDate) -> AlertBuckets {
        let mut buckets = AlertBuckets::default();

        for lot in lots {
            match self.classifier.classify(lot, today).status {
                LotStatus::Expired => buckets.expired.push(lot.clone()),
                LotStatus::Expiring => buckets.expiring.push(lot.clone()),
                LotStatus::LowStock => buckets.low_stock.push(lot.clone()),
                LotStatus::Normal => {}
            }
        }

        buckets.counts = AlertCounts {
            expired: buckets.expired.len(),
            expiring: buckets.expiring.len(),
            low_stock: buckets.low_stock.len(),
        };

        tracing::debug!(
            expired = buckets.counts.expired,
            expiring = buckets.counts.expiring,
            low_stock = buckets.counts.low_stock,
            "预警汇总完成"
        );

        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::inventory_settings::AlertThresholds;
    use chrono::Duration;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn lot(id: i64, expires_in_days: i64, on_hand: i64) -> VaccineLot {
        VaccineLot {
            id,
            vaccine_id: format!("VAC-{:03}", id),
            commercial_name: format!("Product {}", id),
            generic_name: "Generic".to_string(),
            lot_number: format!("LOT-{:03}", id),
            quantity: 100,
            quantity_on_hand: on_hand,
            expiration_date: today() + Duration::days(expires_in_days),
            received_date: today() - Duration::days(30),
        }
    }

    fn sample_lots() -> Vec<VaccineLot> {
        vec![
            lot(1, -5, 10),  // expired
            lot(2, -1, 2),   // expired（同时低库存）
            lot(3, 0, 100),  // expiring
            lot(4, 30, 3),   // expiring（同时低库存）
            lot(5, 31, 3),   // lowStock
            lot(6, 200, 5),  // lowStock
            lot(7, 200, 0),  // normal
            lot(8, 200, 80), // normal
        ]
    }

    #[test]
    fn test_aggregate_buckets() {
        let aggregator = AlertAggregator::default();
        let buckets = aggregator.aggregate(&sample_lots(), today());

        let ids = |v: &[VaccineLot]| v.iter().map(|l| l.id).collect::<Vec<_>>();
        assert_eq!(ids(&buckets.expired), vec![1, 2]);
        assert_eq!(ids(&buckets.expiring), vec![3, 4]);
        assert_eq!(ids(&buckets.low_stock), vec![5, 6]);
        assert_eq!(buckets.counts, AlertCounts { expired: 2, expiring: 2, low_stock: 2 });
        assert_eq!(buckets.counts.total(), 6);
    }

    #[test]
    fn test_counts_equal_bucket_sizes_and_no_duplicates() {
        let aggregator = AlertAggregator::default();
        let buckets = aggregator.aggregate(&sample_lots(), today());

        assert_eq!(buckets.counts.expired, buckets.expired.len());
        assert_eq!(buckets.counts.expiring, buckets.expiring.len());
        assert_eq!(buckets.counts.low_stock, buckets.low_stock.len());

        let mut seen = HashSet::new();
        for lot in buckets.expired.iter().chain(&buckets.expiring).chain(&buckets.low_stock) {
            assert!(seen.insert(lot.id), "批次 {} 出现在多个桶中", lot.id);
        }
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let aggregator = AlertAggregator::default();
        let lots = sample_lots();
        assert_eq!(aggregator.aggregate(&lots, today()), aggregator.aggregate(&lots, today()));
    }

    #[test]
    fn test_thresholds_flow_through() {
        let aggregator = AlertAggregator::new(StatusClassifier::with_thresholds(AlertThresholds {
            low_stock_threshold: 2,
            expiring_window_days: 7,
        }));
        let buckets = aggregator.aggregate(&sample_lots(), today());

        assert_eq!(buckets.counts.expired, 2);
        assert_eq!(buckets.counts.expiring, 1); // 仅 lot 3
        assert_eq!(buckets.counts.low_stock, 0); // lot 4/5 在库 3 > 2
    }

    #[test]
    fn test_empty_input() {
        let buckets = AlertAggregator::default().aggregate(&[], today());
        assert_eq!(buckets.counts, AlertCounts::default());
        assert!(buckets.bucket(LotStatus::Normal).is_empty());
    }
}
