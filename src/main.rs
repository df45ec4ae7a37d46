// ==========================================
// 疫苗库存管理系统 - 命令行入口
// ==========================================
// 用法:
//   vaccine-inventory [--db PATH] dashboard
//   vaccine-inventory [--db PATH] table [SEARCH] [FIELD] [asc|desc]
//   vaccine-inventory [--db PATH] report TYPE [OUT.csv]
//   vaccine-inventory [--db PATH] settings
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use std::path::PathBuf;

use vaccine_inventory::app::{get_default_db_path, AppState};
use vaccine_inventory::engine::TableQuery;
use vaccine_inventory::i18n::{report_title, t_with_args};
use vaccine_inventory::{logging, ReportType, SortDirection, SortField};

const USAGE: &str = "usage: vaccine-inventory [--db PATH] <dashboard|table [SEARCH] [FIELD] [asc|desc]|report TYPE [OUT.csv]|settings>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let db_path = match args.iter().position(|a| a == "--db") {
        Some(idx) => {
            if idx + 1 >= args.len() {
                bail!("--db 缺少路径参数\n{}", USAGE);
            }
            let path = args.remove(idx + 1);
            args.remove(idx);
            path
        }
        None => get_default_db_path(),
    };

    let command = args.first().cloned().ok_or_else(|| anyhow!(USAGE))?;
    let rest = &args[1..];

    tracing::info!("{} v{} - 数据库: {}", vaccine_inventory::APP_NAME, vaccine_inventory::VERSION, db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let today = Local::now().date_naive();

    match command.as_str() {
        "dashboard" => {
            let summary = state.inventory_api.dashboard(today).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "table" => {
            let mut query = TableQuery::default();
            if let Some(search) = rest.first() {
                query.search_term = search.clone();
            }
            if let Some(field) = rest.get(1) {
                query.sort_field = field.parse::<SortField>().map_err(|e| anyhow!(e))?;
            }
            if let Some(direction) = rest.get(2) {
                query.sort_direction = direction.parse::<SortDirection>().map_err(|e| anyhow!(e))?;
            }
            let rows = state.inventory_api.table(&query, today).await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        "report" => {
            let report_type = rest
                .first()
                .ok_or_else(|| anyhow!("缺少报表类型\n{}", USAGE))?
                .parse::<ReportType>()
                .map_err(|e| anyhow!(e))?;

            let export = state.inventory_api.export_report_csv(report_type, today).await?;
            let out = rest
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&export.file_name));

            std::fs::write(&out, export.content.as_bytes())
                .with_context(|| format!("无法写入 {}", out.display()))?;

            let rows = export.row_count.to_string();
            let path = out.display().to_string();
            eprintln!("{}", report_title(report_type));
            eprintln!("{}", t_with_args("report.exported", &[("rows", &rows), ("path", &path)]));
        }
        "settings" => {
            let settings = state.config_api.get_settings().await?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}
