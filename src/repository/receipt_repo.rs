// ==========================================
// 疫苗库存管理系统 - 接收记录数据仓储
// ==========================================
// 依据: receipt_record 表
// ==========================================

use crate::db::DATE_FORMAT;
use crate::domain::records::ReceiptRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_stored_date;
use crate::repository::record_store::{Record, RecordStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT id, vaccine_id, received_date, quantity_sent, quantity_received,
           doses_passed_inspection, doses_failed_inspection, discrepancy_reason
    FROM receipt_record
"#;

fn map_row(row: &Row<'_>) -> rusqlite::Result<(ReceiptRecord, String)> {
    Ok((
        ReceiptRecord {
            id: row.get(0)?,
            vaccine_id: row.get(1)?,
            received_date: chrono::NaiveDate::MIN,
            quantity_sent: row.get(3)?,
            quantity_received: row.get(4)?,
            doses_passed_inspection: row.get(5)?,
            doses_failed_inspection: row.get(6)?,
            discrepancy_reason: row.get(7)?,
        },
        row.get(2)?,
    ))
}

fn finish((mut record, date): (ReceiptRecord, String)) -> RepositoryResult<ReceiptRecord> {
    record.received_date = parse_stored_date("received_date", &date)?;
    Ok(record)
}

// ==========================================
// ReceiptRepository - 接收记录仓储
// ==========================================
pub struct ReceiptRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReceiptRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_records(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> RepositoryResult<Vec<ReceiptRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, map_row)?.collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(finish).collect()
    }
}

impl RecordStore<ReceiptRecord> for ReceiptRepository {
    fn list(&self) -> RepositoryResult<Vec<ReceiptRecord>> {
        self.query_records(&format!("{} ORDER BY id ASC", SELECT_COLUMNS), &[])
    }

    fn get(&self, id: i64) -> RepositoryResult<Option<ReceiptRecord>> {
        let row = {
            let conn = self.get_conn()?;
            conn.query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_row)
                .optional()?
        };
        row.map(finish).transpose()
    }

    fn create(&self, record: ReceiptRecord) -> RepositoryResult<ReceiptRecord> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO receipt_record (
                vaccine_id, received_date, quantity_sent, quantity_received,
                doses_passed_inspection, doses_failed_inspection, discrepancy_reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.vaccine_id,
                record.received_date.format(DATE_FORMAT).to_string(),
                record.quantity_sent,
                record.quantity_received,
                record.doses_passed_inspection,
                record.doses_failed_inspection,
                record.discrepancy_reason,
            ],
        )?;

        let mut created = record;
        created.set_id(conn.last_insert_rowid());
        Ok(created)
    }

    fn update(&self, record: &ReceiptRecord) -> RepositoryResult<ReceiptRecord> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE receipt_record SET
                vaccine_id = ?2, received_date = ?3, quantity_sent = ?4, quantity_received = ?5,
                doses_passed_inspection = ?6, doses_failed_inspection = ?7, discrepancy_reason = ?8
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.vaccine_id,
                record.received_date.format(DATE_FORMAT).to_string(),
                record.quantity_sent,
                record.quantity_received,
                record.doses_passed_inspection,
                record.doses_failed_inspection,
                record.discrepancy_reason,
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found(ReceiptRecord::ENTITY, record.id));
        }
        Ok(record.clone())
    }

    fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM receipt_record WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_by_vaccine_id(&self, vaccine_id: &str) -> RepositoryResult<Vec<ReceiptRecord>> {
        self.query_records(
            &format!("{} WHERE vaccine_id = ?1 ORDER BY id ASC", SELECT_COLUMNS),
            &[&vaccine_id],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use chrono::NaiveDate;

    #[test]
    fn test_receipt_persists_discrepancy_reason() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let repo = ReceiptRepository::new(Arc::new(Mutex::new(conn)));

        let created = repo
            .create(ReceiptRecord {
                id: 0,
                vaccine_id: "HPV-010".to_string(),
                received_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
                quantity_sent: 50,
                quantity_received: 48,
                doses_passed_inspection: 46,
                doses_failed_inspection: 2,
                discrepancy_reason: Some("两盒破损".to_string()),
            })
            .unwrap();

        let loaded = repo.get(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(loaded.has_discrepancy());
        assert_eq!(repo.list_by_vaccine_id("HPV-010").unwrap().len(), 1);
        assert!(repo.list_by_vaccine_id("OTHER").unwrap().is_empty());
    }
}
