// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::{LotStatus, ReportType};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use vaccine_inventory::i18n::t;
/// let msg = t("report.inventory");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use vaccine_inventory::i18n::t_with_args;
/// let msg = t_with_args("report.exported", &[("rows", "3"), ("path", "/tmp/out.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 状态徽标文案
pub fn status_label(status: LotStatus) -> String {
    t(status.label_key())
}

/// 报表标题
pub fn report_title(report_type: ReportType) -> String {
    let key = match report_type {
        ReportType::Inventory => "report.inventory",
        ReportType::Expired => "report.expired",
        ReportType::Expiring => "report.expiring",
        ReportType::LowStock => "report.low_stock",
    };
    t(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("report.inventory"), "库存报表");

        set_locale("en");
        assert_eq!(t("report.inventory"), "Inventory Report");

        set_locale("zh-CN");
    }

    #[test]
    fn test_status_labels() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(status_label(LotStatus::Expired), "Expired");
        assert_eq!(status_label(LotStatus::Expiring), "Expiring Soon");
        assert_eq!(status_label(LotStatus::LowStock), "Low Stock");
        assert_eq!(status_label(LotStatus::Normal), "Normal");
        assert_eq!(report_title(ReportType::LowStock), "Low Stock Report");

        set_locale("zh-CN");
        assert_eq!(status_label(LotStatus::Expiring), "即将过期");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("report.exported", &[("rows", "3"), ("path", "/tmp/out.csv")]);
        assert_eq!(msg, "Exported 3 rows to /tmp/out.csv");

        set_locale("zh-CN");
        let msg = t_with_args("report.exported", &[("rows", "3"), ("path", "/tmp/out.csv")]);
        assert!(msg.contains("/tmp/out.csv"));
    }
}
