// ==========================================
// 疫苗库存管理系统 - 接种 API
// ==========================================
// 职责: 扣减在库量并追加接种记录
// 红线: 在库量不得小于 0；超量接种直接拒绝
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::lot::VaccineLot;
use crate::domain::records::AdministrationRecord;
use crate::repository::{LotStore, RecordStore, RepositoryError};

/// 接种结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationOutcome {
    pub lot: VaccineLot,
    pub record: AdministrationRecord,
}

// ==========================================
// AdministrationApi - 接种 API
// ==========================================
pub struct AdministrationApi {
    lot_store: Arc<dyn LotStore>,
    record_store: Arc<dyn RecordStore<AdministrationRecord>>,
}

impl AdministrationApi {
    pub fn new(
        lot_store: Arc<dyn LotStore>,
        record_store: Arc<dyn RecordStore<AdministrationRecord>>,
    ) -> Self {
        Self {
            lot_store,
            record_store,
        }
    }

    /// 登记接种
    ///
    /// # 参数
    /// - lot_id: 批次ID
    /// - doses: 接种剂次（必须 > 0）
    /// - today: 接种日期
    ///
    /// # 返回
    /// - Ok(AdministrationOutcome): 扣减后的批次 + 接种记录
    /// - Err(InvalidInput): doses <= 0
    /// - Err(NotFound): 批次不存在
    /// - Err(InsufficientStock): doses 超过在库量
    ///
    /// 红线: 接种记录写入失败时回补在库量,不留无记录的扣减
    pub fn administer(&self, lot_id: i64, doses: i64, today: NaiveDate) -> ApiResult<AdministrationOutcome> {
        if doses <= 0 {
            warn!(lot_id, doses, "接种剂次必须大于0");
            return Err(ApiError::InvalidInput(format!(
                "接种剂次必须大于0: doses={}",
                doses
            )));
        }

        let lot = self
            .lot_store
            .get(lot_id)?
            .ok_or_else(|| ApiError::NotFound(format!("批次(id={})不存在", lot_id)))?;

        if doses > lot.quantity_on_hand {
            warn!(lot_id, doses, on_hand = lot.quantity_on_hand, "接种剂次超过在库量");
            return Err(ApiError::InsufficientStock {
                lot_id,
                requested: doses,
                on_hand: lot.quantity_on_hand,
            });
        }

        let updated = self
            .lot_store
            .adjust_quantity_on_hand(lot_id, -doses)
            .map_err(|e| match e {
                // 并发扣减导致的不足
                RepositoryError::BusinessRuleViolation(_) => ApiError::InsufficientStock {
                    lot_id,
                    requested: doses,
                    on_hand: lot.quantity_on_hand,
                },
                other => other.into(),
            })?;

        let record = match self.record_store.create(AdministrationRecord {
            id: 0,
            vaccine_id: updated.vaccine_id.clone(),
            lot_number: updated.lot_number.clone(),
            doses_administered: doses,
            administration_date: today,
        }) {
            Ok(record) => record,
            Err(e) => {
                // 接种记录写入失败: 回补已扣减的剂次
                if let Err(restore_err) = self.lot_store.adjust_quantity_on_hand(lot_id, doses) {
                    warn!(lot_id, doses, error = %restore_err, "回补在库量失败");
                }
                return Err(e.into());
            }
        };

        info!(
            lot_id,
            vaccine_id = %updated.vaccine_id,
            doses,
            remaining = updated.quantity_on_hand,
            "接种登记完成"
        );

        Ok(AdministrationOutcome { lot: updated, record })
    }

    /// 查询全部接种记录
    pub fn list_administrations(&self) -> ApiResult<Vec<AdministrationRecord>> {
        Ok(self.record_store.list()?)
    }

    /// 按疫苗编码查询接种记录
    pub fn list_administrations_by_vaccine(&self, vaccine_id: &str) -> ApiResult<Vec<AdministrationRecord>> {
        if vaccine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("疫苗编码不能为空".to_string()));
        }
        Ok(self.record_store.list_by_vaccine_id(vaccine_id.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryRecordStore, Record, RepositoryResult};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn sample_lot(on_hand: i64) -> VaccineLot {
        VaccineLot {
            id: 1,
            vaccine_id: "MMR-100".to_string(),
            commercial_name: "M-M-R II".to_string(),
            generic_name: "Measles, Mumps, Rubella".to_string(),
            lot_number: "MMR-A1".to_string(),
            quantity: 10,
            quantity_on_hand: on_hand,
            expiration_date: NaiveDate::from_ymd_opt(2027, 5, 1).unwrap(),
            received_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        }
    }

    fn setup(on_hand: i64) -> AdministrationApi {
        AdministrationApi::new(
            Arc::new(InMemoryRecordStore::with_records(vec![sample_lot(on_hand)])),
            Arc::new(InMemoryRecordStore::new()),
        )
    }

    #[test]
    fn test_administer_decrements_and_records() {
        let api = setup(10);
        let outcome = api.administer(1, 4, today()).unwrap();

        assert_eq!(outcome.lot.quantity_on_hand, 6);
        assert_eq!(outcome.record.doses_administered, 4);
        assert_eq!(outcome.record.lot_number, "MMR-A1");
        assert_eq!(outcome.record.administration_date, today());
        assert_eq!(api.list_administrations_by_vaccine("MMR-100").unwrap().len(), 1);
    }

    #[test]
    fn test_administer_exact_on_hand_reaches_zero() {
        let api = setup(3);
        let outcome = api.administer(1, 3, today()).unwrap();
        assert_eq!(outcome.lot.quantity_on_hand, 0);
    }

    #[test]
    fn test_over_administration_rejected() {
        let api = setup(3);
        match api.administer(1, 4, today()) {
            Err(ApiError::InsufficientStock { requested, on_hand, .. }) => {
                assert_eq!((requested, on_hand), (4, 3));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(api.list_administrations().unwrap().is_empty());
    }

    /// 写入必然失败的接种记录存储
    struct FailingRecordStore;

    impl RecordStore<AdministrationRecord> for FailingRecordStore {
        fn list(&self) -> RepositoryResult<Vec<AdministrationRecord>> {
            Ok(Vec::new())
        }

        fn get(&self, _id: i64) -> RepositoryResult<Option<AdministrationRecord>> {
            Ok(None)
        }

        fn create(&self, _record: AdministrationRecord) -> RepositoryResult<AdministrationRecord> {
            Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()))
        }

        fn update(&self, record: &AdministrationRecord) -> RepositoryResult<AdministrationRecord> {
            Err(RepositoryError::not_found(AdministrationRecord::ENTITY, record.id))
        }

        fn delete(&self, _id: i64) -> RepositoryResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_record_write_failure_restores_on_hand() {
        let lots = Arc::new(InMemoryRecordStore::with_records(vec![sample_lot(10)]));
        let api = AdministrationApi::new(lots.clone(), Arc::new(FailingRecordStore));

        let err = api.administer(1, 4, today()).unwrap_err();
        assert!(matches!(err, ApiError::DatabaseError(_)), "unexpected: {:?}", err);
        assert_eq!(lots.get(1).unwrap().unwrap().quantity_on_hand, 10);
    }

    #[test]
    fn test_non_positive_doses_and_missing_lot() {
        let api = setup(3);
        assert!(matches!(api.administer(1, 0, today()), Err(ApiError::InvalidInput(_))));
        assert!(matches!(api.administer(1, -2, today()), Err(ApiError::InvalidInput(_))));
        assert!(matches!(api.administer(9, 1, today()), Err(ApiError::NotFound(_))));
    }
}
