// ==========================================
// 疫苗库存管理系统 - 批次状态判定引擎
// ==========================================
// 红线: 状态是"等级制",首个命中即返回,不叠加
// ==========================================
// 职责: 由有效期 + 在库量判定批次状态
// 输入: VaccineLot + 参考日期 today
// 输出: StatusResult (status, priority)
// ==========================================

use crate::config::inventory_settings::AlertThresholds;
use crate::domain::lot::{StatusResult, VaccineLot};
use crate::domain::types::LotStatus;
use chrono::NaiveDate;

/// 距有效期的整天数（有效期 - today，按日历日计）
///
/// 负数表示已过期，0 表示当天到期
pub fn days_until_expiry(expiration_date: NaiveDate, today: NaiveDate) -> i64 {
    (expiration_date - today).num_days()
}

// ==========================================
// StatusClassifier - 批次状态判定引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier {
    thresholds: AlertThresholds,
}

impl StatusClassifier {
    /// 创建使用默认阈值（低库存 5，临期 30 天）的引擎
    pub fn new() -> Self {
        Self::default()
    }

    /// 按指定阈值创建引擎
    pub fn with_thresholds(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定单个批次状态
    ///
    /// 顺序（优先级递减，命中即返回）:
    /// 1) days_until_expiry < 0 → Expired
    /// 2) days_until_expiry <= expiring_window_days → Expiring
    /// 3) 0 < quantity_on_hand <= low_stock_threshold → LowStock
    /// 4) 其他 → Normal
    ///
    /// 边界:
    /// - 当天到期（0 天）不算过期，归入临期
    /// - 在库量为 0 不算低库存
    pub fn classify(&self, lot: &VaccineLot, today: NaiveDate) -> StatusResult {
        StatusResult::new(self.classify_status(lot.expiration_date, lot.quantity_on_hand, today))
    }

    /// 按原始字段判定（表格行样式/徽标复用）
    pub fn classify_status(
        &self,
        expiration_date: NaiveDate,
        quantity_on_hand: i64,
        today: NaiveDate,
    ) -> LotStatus {
        let days = days_until_expiry(expiration_date, today);

        // 规则1: 已过期
        if days < 0 {
            return LotStatus::Expired;
        }

        // 规则2: 临期（含边界）
        if days <= self.thresholds.expiring_window_days {
            return LotStatus::Expiring;
        }

        // 规则3: 低库存（在库为 0 不预警）
        if quantity_on_hand > 0 && quantity_on_hand <= self.thresholds.low_stock_threshold {
            return LotStatus::LowStock;
        }

        // 规则4: 正常
        LotStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn lot(expires_in_days: i64, on_hand: i64) -> VaccineLot {
        VaccineLot {
            id: 1,
            vaccine_id: "VAC-001".to_string(),
            commercial_name: "Infanrix".to_string(),
            generic_name: "DTaP".to_string(),
            lot_number: "LOT-001".to_string(),
            quantity: 100,
            quantity_on_hand: on_hand,
            expiration_date: today() + Duration::days(expires_in_days),
            received_date: today() - Duration::days(60),
        }
    }

    // ==========================================
    // 第一部分：基础规则
    // ==========================================

    #[test]
    fn test_scenario_a_expired_yesterday() {
        let engine = StatusClassifier::new();
        let result = engine.classify(&lot(-1, 50), today());
        assert_eq!(result.status, LotStatus::Expired);
        assert_eq!(result.priority, 1);
    }

    #[test]
    fn test_scenario_b_expiring_window_inclusive() {
        let engine = StatusClassifier::new();
        let result = engine.classify(&lot(30, 100), today());
        assert_eq!(result.status, LotStatus::Expiring, "30天边界应判定为临期");
        assert_eq!(result.priority, 2);
    }

    #[test]
    fn test_scenario_c_low_stock_after_window() {
        let engine = StatusClassifier::new();
        let result = engine.classify(&lot(31, 3), today());
        assert_eq!(result.status, LotStatus::LowStock);
        assert_eq!(result.priority, 3);
    }

    #[test]
    fn test_scenario_d_exhausted_is_normal() {
        let engine = StatusClassifier::new();
        let result = engine.classify(&lot(365, 0), today());
        assert_eq!(result.status, LotStatus::Normal, "在库为0不应判定为低库存");
        assert_eq!(result.priority, 4);
    }

    // ==========================================
    // 第二部分：边界与优先级
    // ==========================================

    #[test]
    fn test_expiring_today_is_not_expired() {
        let engine = StatusClassifier::new();
        let result = engine.classify(&lot(0, 100), today());
        assert_eq!(result.status, LotStatus::Expiring);
    }

    #[test]
    fn test_expired_wins_over_low_stock() {
        let engine = StatusClassifier::new();
        for on_hand in [0, 1, 5, 500] {
            let result = engine.classify(&lot(-10, on_hand), today());
            assert_eq!(result.status, LotStatus::Expired, "on_hand={}", on_hand);
        }
    }

    #[test]
    fn test_expiring_wins_over_low_stock() {
        let engine = StatusClassifier::new();
        for days in 0..=30 {
            let result = engine.classify(&lot(days, 2), today());
            assert_eq!(result.status, LotStatus::Expiring, "days={}", days);
        }
    }

    #[test]
    fn test_low_stock_threshold_inclusive() {
        let engine = StatusClassifier::new();
        assert_eq!(engine.classify(&lot(90, 5), today()).status, LotStatus::LowStock);
        assert_eq!(engine.classify(&lot(90, 6), today()).status, LotStatus::Normal);
    }

    #[test]
    fn test_custom_thresholds() {
        let engine = StatusClassifier::with_thresholds(AlertThresholds {
            low_stock_threshold: 20,
            expiring_window_days: 60,
        });
        assert_eq!(engine.classify(&lot(45, 100), today()).status, LotStatus::Expiring);
        assert_eq!(engine.classify(&lot(61, 20), today()).status, LotStatus::LowStock);
        assert_eq!(engine.classify(&lot(61, 21), today()).status, LotStatus::Normal);
    }

    #[test]
    fn test_zero_window_only_today_is_expiring() {
        let engine = StatusClassifier::with_thresholds(AlertThresholds {
            low_stock_threshold: 5,
            expiring_window_days: 0,
        });
        assert_eq!(engine.classify(&lot(0, 100), today()).status, LotStatus::Expiring);
        assert_eq!(engine.classify(&lot(1, 100), today()).status, LotStatus::Normal);
    }

    #[test]
    fn test_days_until_expiry() {
        assert_eq!(days_until_expiry(today(), today()), 0);
        assert_eq!(days_until_expiry(today() - Duration::days(3), today()), -3);
        assert_eq!(days_until_expiry(today() + Duration::days(400), today()), 400);
    }
}
