// ==========================================
// 疫苗库存管理系统 - 接收入库 API
// ==========================================
// 职责: 接收表单校验 → 建批次 → 追加接收记录
// 红线: 校验不通过时不写入任何数据
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_receipt_form, ReceiptForm};
use crate::domain::lot::VaccineLot;
use crate::domain::records::ReceiptRecord;
use crate::repository::{LotStore, RecordStore};

/// 接收结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOutcome {
    pub lot: VaccineLot,
    pub receipt: ReceiptRecord,
}

// ==========================================
// ReceivingApi - 接收入库 API
// ==========================================
pub struct ReceivingApi {
    lot_store: Arc<dyn LotStore>,
    receipt_store: Arc<dyn RecordStore<ReceiptRecord>>,
}

impl ReceivingApi {
    pub fn new(
        lot_store: Arc<dyn LotStore>,
        receipt_store: Arc<dyn RecordStore<ReceiptRecord>>,
    ) -> Self {
        Self {
            lot_store,
            receipt_store,
        }
    }

    /// 接收一批疫苗
    ///
    /// # 参数
    /// - form: 接收表单
    /// - today: 接收日期
    ///
    /// # 返回
    /// - Ok(ReceiptOutcome): 新批次 + 接收记录
    /// - Err(ValidationError): 表单校验失败（含全部违规字段）
    pub fn receive_shipment(&self, form: &ReceiptForm, today: NaiveDate) -> ApiResult<ReceiptOutcome> {
        let receipt = validate_receipt_form(form, today).map_err(|violations| {
            warn!(
                vaccine_id = %form.vaccine_id,
                violations = violations.len(),
                "接收表单校验失败"
            );
            ApiError::validation(violations)
        })?;

        let doses_passed = receipt.doses_passed_inspection();

        let lot = self.lot_store.create(VaccineLot {
            id: 0,
            vaccine_id: receipt.vaccine_id.clone(),
            commercial_name: receipt.commercial_name.clone(),
            generic_name: receipt.generic_name.clone(),
            lot_number: receipt.lot_number.clone(),
            quantity: receipt.quantity_received,
            quantity_on_hand: doses_passed,
            expiration_date: receipt.expiration_date,
            received_date: today,
        })?;

        let record = ReceiptRecord {
            id: 0,
            vaccine_id: receipt.vaccine_id.clone(),
            received_date: today,
            quantity_sent: receipt.quantity_sent,
            quantity_received: receipt.quantity_received,
            doses_passed_inspection: doses_passed,
            doses_failed_inspection: receipt.doses_failed_inspection,
            discrepancy_reason: receipt.discrepancy_reason.clone(),
        };

        let receipt_record = match self.receipt_store.create(record) {
            Ok(r) => r,
            Err(e) => {
                // 接收记录写入失败时撤回刚建的批次
                if let Err(rollback_err) = self.lot_store.delete(lot.id) {
                    warn!(lot_id = lot.id, error = %rollback_err, "批次回滚失败");
                }
                return Err(e.into());
            }
        };

        info!(
            lot_id = lot.id,
            vaccine_id = %lot.vaccine_id,
            lot_number = %lot.lot_number,
            received = receipt_record.quantity_received,
            passed = receipt_record.doses_passed_inspection,
            discrepancy = receipt_record.has_discrepancy(),
            "疫苗接收入库"
        );

        Ok(ReceiptOutcome {
            lot,
            receipt: receipt_record,
        })
    }

    /// 查询全部接收记录
    pub fn list_receipts(&self) -> ApiResult<Vec<ReceiptRecord>> {
        Ok(self.receipt_store.list()?)
    }

    /// 按疫苗编码查询接收记录
    pub fn list_receipts_by_vaccine(&self, vaccine_id: &str) -> ApiResult<Vec<ReceiptRecord>> {
        if vaccine_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("疫苗编码不能为空".to_string()));
        }
        Ok(self.receipt_store.list_by_vaccine_id(vaccine_id.trim())?)
    }
}
