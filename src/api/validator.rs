// ==========================================
// 疫苗库存管理系统 - 表单校验器
// ==========================================
// 职责: 接收表单与机构设置的边界校验
// 红线: 日期在此解析,引擎层只接收 NaiveDate
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::FieldViolation;
use crate::config::InventorySettings;
use crate::db::DATE_FORMAT;

const MIN_CODE_LEN: usize = 3;

// ==========================================
// ReceiptForm - 接收表单（原始文本输入）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptForm {
    #[serde(alias = "vaccine_id")]
    pub vaccine_id: String,
    #[serde(alias = "commercial_name")]
    pub commercial_name: String,
    #[serde(alias = "generic_name")]
    pub generic_name: String,
    #[serde(alias = "lot_number")]
    pub lot_number: String,
    #[serde(alias = "expiration_date")]
    pub expiration_date: String,
    #[serde(alias = "quantity_sent")]
    pub quantity_sent: String,
    #[serde(alias = "quantity_received")]
    pub quantity_received: String,
    #[serde(alias = "doses_failed_inspection")]
    pub doses_failed_inspection: String,
    #[serde(alias = "discrepancy_reason")]
    pub discrepancy_reason: String,
}

// ==========================================
// ValidatedReceipt - 校验通过的接收数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReceipt {
    pub vaccine_id: String,
    pub commercial_name: String,
    pub generic_name: String,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity_sent: i64,
    pub quantity_received: i64,
    pub doses_failed_inspection: i64,
    pub discrepancy_reason: Option<String>,
}

impl ValidatedReceipt {
    /// 验收合格剂次 = max(0, 实收 - 不合格)
    pub fn doses_passed_inspection(&self) -> i64 {
        (self.quantity_received - self.doses_failed_inspection).max(0)
    }
}

/// 解析非负整数；空串视为 0
fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse::<i64>().ok().filter(|n| *n >= 0)
}

/// 校验接收表单
///
/// # 参数
/// - form: 原始表单
/// - today: 当前日期（有效期必须晚于该日期）
///
/// # 返回
/// - Ok(ValidatedReceipt): 全部字段通过
/// - Err(Vec<FieldViolation>): 全部违规字段（不在首个错误处停止）
pub fn validate_receipt_form(
    form: &ReceiptForm,
    today: NaiveDate,
) -> Result<ValidatedReceipt, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let vaccine_id = form.vaccine_id.trim();
    if vaccine_id.chars().count() < MIN_CODE_LEN {
        violations.push(FieldViolation::new(
            "vaccineId",
            "Vaccine ID is required (minimum 3 characters)",
        ));
    }

    let commercial_name = form.commercial_name.trim();
    if commercial_name.is_empty() {
        violations.push(FieldViolation::new("commercialName", "Commercial name is required"));
    }

    let generic_name = form.generic_name.trim();
    if generic_name.is_empty() {
        violations.push(FieldViolation::new("genericName", "Generic name is required"));
    }

    let lot_number = form.lot_number.trim();
    if lot_number.chars().count() < MIN_CODE_LEN {
        violations.push(FieldViolation::new(
            "lotNumber",
            "Lot number is required (minimum 3 characters)",
        ));
    }

    let expiration_date = NaiveDate::parse_from_str(form.expiration_date.trim(), DATE_FORMAT)
        .ok()
        .filter(|d| *d > today);
    if expiration_date.is_none() {
        violations.push(FieldViolation::new(
            "expirationDate",
            "Valid expiration date is required",
        ));
    }

    // 实收为必填语义,但与原表单一致,空串按 0 处理
    let quantity_received = parse_count(&form.quantity_received);
    if quantity_received.is_none() {
        violations.push(FieldViolation::new(
            "quantityReceived",
            "Valid quantity received is required",
        ));
    }

    let quantity_sent = parse_count(&form.quantity_sent);
    if quantity_sent.is_none() {
        violations.push(FieldViolation::new("quantitySent", "Valid quantity sent is required"));
    }

    let doses_failed = parse_count(&form.doses_failed_inspection);
    if doses_failed.is_none() {
        violations.push(FieldViolation::new(
            "dosesFailedInspection",
            "Valid failed dose count is required",
        ));
    }

    match (expiration_date, quantity_received, quantity_sent, doses_failed) {
        (Some(expiration_date), Some(quantity_received), Some(quantity_sent), Some(doses_failed))
            if violations.is_empty() =>
        {
            let reason = form.discrepancy_reason.trim();
            Ok(ValidatedReceipt {
                vaccine_id: vaccine_id.to_string(),
                commercial_name: commercial_name.to_string(),
                generic_name: generic_name.to_string(),
                lot_number: lot_number.to_string(),
                expiration_date,
                quantity_sent,
                quantity_received,
                doses_failed_inspection: doses_failed,
                discrepancy_reason: (!reason.is_empty()).then(|| reason.to_string()),
            })
        }
        _ => Err(violations),
    }
}

/// 邮箱格式: x@y.z,不含空白
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// 校验机构设置
///
/// # 返回
/// - 空列表: 校验通过
pub fn validate_settings(settings: &InventorySettings) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if settings.facility_name.trim().is_empty() {
        violations.push(FieldViolation::new("facilityName", "Facility name is required"));
    }
    if !is_valid_email(&settings.contact_email) {
        violations.push(FieldViolation::new("contactEmail", "Valid email address is required"));
    }
    if settings.low_stock_threshold < 0 {
        violations.push(FieldViolation::new(
            "lowStockThreshold",
            "Low stock threshold must not be negative",
        ));
    }
    if settings.expiration_warning_days < 0 {
        violations.push(FieldViolation::new(
            "expirationWarningDays",
            "Expiration warning days must not be negative",
        ));
    }

    violations
}
