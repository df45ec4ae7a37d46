// ==========================================
// 疫苗库存管理系统 - 库存表格投影引擎
// ==========================================
// 红线: 先筛选后排序；排序稳定（相等键保持输入顺序）
// ==========================================
// 职责: 关键词筛选 + 单字段排序
// 输入: 批次集合 + TableQuery
// 输出: 有序批次列表
// ==========================================

use crate::domain::lot::VaccineLot;
use crate::domain::types::{SortDirection, SortField};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

// ==========================================
// TableQuery - 表格查询参数
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    #[serde(default, alias = "search_term")]
    pub search_term: String,
    #[serde(default, alias = "sort_field")]
    pub sort_field: SortField,
    #[serde(default, alias = "sort_direction")]
    pub sort_direction: SortDirection,
}

impl TableQuery {
    pub fn new(search_term: &str, sort_field: SortField, sort_direction: SortDirection) -> Self {
        Self {
            search_term: search_term.to_string(),
            sort_field,
            sort_direction,
        }
    }

    /// 点击表头：同一列切换方向，新列从升序开始
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.reversed();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }
}

// ==========================================
// TableProjector - 表格投影引擎
// ==========================================
pub struct TableProjector {
    // 无状态引擎,不需要注入依赖
}

impl TableProjector {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 投影：筛选后排序
    #[instrument(skip(self, lots, query), fields(count = lots.len(), field = %query.sort_field, dir = %query.sort_direction))]
    pub fn project(&self, lots: &[VaccineLot], query: &TableQuery) -> Vec<VaccineLot> {
        let mut filtered = self.filter(lots, &query.search_term);
        self.sort(&mut filtered, query.sort_field, query.sort_direction);
        filtered
    }

    /// 关键词筛选（商品名/通用名/批号/疫苗编码，忽略大小写）
    ///
    /// 空关键词返回全部
    pub fn filter(&self, lots: &[VaccineLot], search_term: &str) -> Vec<VaccineLot> {
        lots.iter()
            .filter(|lot| lot.matches_search(search_term))
            .cloned()
            .collect()
    }

    /// 稳定排序
    ///
    /// 降序通过反转比较结果实现（而非反转列表），保证相等键维持输入顺序
    pub fn sort(&self, lots: &mut [VaccineLot], field: SortField, direction: SortDirection) {
        lots.sort_by(|a, b| {
            let ord = Self::compare_field(a, b, field);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    /// 按字段比较
    ///
    /// 日期按日历先后，数量按数值，文本按字典序
    pub fn compare_field(a: &VaccineLot, b: &VaccineLot, field: SortField) -> Ordering {
        match field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::VaccineId => a.vaccine_id.cmp(&b.vaccine_id),
            SortField::CommercialName => a.commercial_name.cmp(&b.commercial_name),
            SortField::GenericName => a.generic_name.cmp(&b.generic_name),
            SortField::LotNumber => a.lot_number.cmp(&b.lot_number),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::QuantityOnHand => a.quantity_on_hand.cmp(&b.quantity_on_hand),
            SortField::ExpirationDate => a.expiration_date.cmp(&b.expiration_date),
            SortField::ReceivedDate => a.received_date.cmp(&b.received_date),
        }
    }
}

impl Default for TableProjector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot(id: i64, name: &str, generic: &str, lot_number: &str, expires: NaiveDate, on_hand: i64) -> VaccineLot {
        VaccineLot {
            id,
            vaccine_id: format!("VAC-{:03}", id),
            commercial_name: name.to_string(),
            generic_name: generic.to_string(),
            lot_number: lot_number.to_string(),
            quantity: 100,
            quantity_on_hand: on_hand,
            expiration_date: expires,
            received_date: date(2026, 9, 1),
        }
    }

    fn sample_lots() -> Vec<VaccineLot> {
        vec![
            lot(1, "Infanrix", "DTaP", "A100", date(2027, 5, 1), 40),
            lot(2, "Daptacel", "DTaP", "B200", date(2026, 12, 1), 10),
            lot(3, "M-M-R II", "MMR", "C300", date(2026, 11, 1), 10),
            lot(4, "Pediarix", "DTaP-HepB-IPV", "D400", date(2027, 1, 15), 10),
            lot(5, "Varivax", "Varicella", "dtap-x", date(2027, 9, 9), 3),
        ]
    }

    fn ids(lots: &[VaccineLot]) -> Vec<i64> {
        lots.iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_scenario_e_search_dtap_sorted_by_expiration() {
        let projector = TableProjector::new();
        let query = TableQuery::new("dtap", SortField::ExpirationDate, SortDirection::Asc);
        let result = projector.project(&sample_lots(), &query);

        // lot 5 命中批号 "dtap-x"
        assert_eq!(ids(&result), vec![2, 4, 1, 5]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let projector = TableProjector::new();
        let upper = projector.filter(&sample_lots(), "MMR");
        let lower = projector.filter(&sample_lots(), "mmr");
        assert_eq!(ids(&upper), vec![3]);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_search_matches_vaccine_id() {
        let projector = TableProjector::new();
        assert_eq!(ids(&projector.filter(&sample_lots(), "vac-004")), vec![4]);
    }

    #[test]
    fn test_empty_search_returns_all() {
        let projector = TableProjector::new();
        assert_eq!(projector.filter(&sample_lots(), "").len(), 5);
    }

    #[test]
    fn test_numeric_sort_desc() {
        let projector = TableProjector::new();
        let query = TableQuery::new("", SortField::QuantityOnHand, SortDirection::Desc);
        let result = projector.project(&sample_lots(), &query);
        // 在库 10 的三个批次保持输入顺序 2,3,4
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stability_round_trip() {
        let projector = TableProjector::new();
        let mut lots = sample_lots();
        projector.sort(&mut lots, SortField::QuantityOnHand, SortDirection::Asc);
        let ascending = ids(&lots);

        projector.sort(&mut lots, SortField::QuantityOnHand, SortDirection::Desc);
        projector.sort(&mut lots, SortField::QuantityOnHand, SortDirection::Asc);

        assert_eq!(ids(&lots), ascending);
        assert_eq!(ascending, vec![5, 2, 3, 4, 1]);
    }

    #[test]
    fn test_text_sort_is_lexical() {
        let projector = TableProjector::new();
        let query = TableQuery::new("", SortField::CommercialName, SortDirection::Asc);
        let result = projector.project(&sample_lots(), &query);
        assert_eq!(ids(&result), vec![2, 1, 3, 4, 5]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut query = TableQuery::default();
        assert_eq!(query.sort_field, SortField::ExpirationDate);
        assert_eq!(query.sort_direction, SortDirection::Asc);

        query.toggle_sort(SortField::ExpirationDate);
        assert_eq!(query.sort_direction, SortDirection::Desc);

        query.toggle_sort(SortField::LotNumber);
        assert_eq!(query.sort_field, SortField::LotNumber);
        assert_eq!(query.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_project_is_repeatable() {
        let projector = TableProjector::new();
        let query = TableQuery::new("d", SortField::GenericName, SortDirection::Desc);
        let lots = sample_lots();
        assert_eq!(projector.project(&lots, &query), projector.project(&lots, &query));
    }
}
