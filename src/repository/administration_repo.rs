// ==========================================
// 疫苗库存管理系统 - 接种记录数据仓储
// ==========================================
// 依据: administration_record 表
// 红线: 只追加,业务层不调用 update
// ==========================================

use crate::db::DATE_FORMAT;
use crate::domain::records::AdministrationRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_stored_date;
use crate::repository::record_store::{Record, RecordStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT id, vaccine_id, lot_number, doses_administered, administration_date
    FROM administration_record
"#;

fn map_row(row: &Row<'_>) -> rusqlite::Result<(AdministrationRecord, String)> {
    Ok((
        AdministrationRecord {
            id: row.get(0)?,
            vaccine_id: row.get(1)?,
            lot_number: row.get(2)?,
            doses_administered: row.get(3)?,
            administration_date: chrono::NaiveDate::MIN,
        },
        row.get(4)?,
    ))
}

fn finish((mut record, date): (AdministrationRecord, String)) -> RepositoryResult<AdministrationRecord> {
    record.administration_date = parse_stored_date("administration_date", &date)?;
    Ok(record)
}

// ==========================================
// AdministrationRepository - 接种记录仓储
// ==========================================
pub struct AdministrationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AdministrationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_records(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> RepositoryResult<Vec<AdministrationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, map_row)?.collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(finish).collect()
    }
}

impl RecordStore<AdministrationRecord> for AdministrationRepository {
    fn list(&self) -> RepositoryResult<Vec<AdministrationRecord>> {
        self.query_records(&format!("{} ORDER BY id ASC", SELECT_COLUMNS), &[])
    }

    fn get(&self, id: i64) -> RepositoryResult<Option<AdministrationRecord>> {
        let row = {
            let conn = self.get_conn()?;
            conn.query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], map_row)
                .optional()?
        };
        row.map(finish).transpose()
    }

    fn create(&self, record: AdministrationRecord) -> RepositoryResult<AdministrationRecord> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO administration_record (
                vaccine_id, lot_number, doses_administered, administration_date
            ) VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.vaccine_id,
                record.lot_number,
                record.doses_administered,
                record.administration_date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        let mut created = record;
        created.set_id(conn.last_insert_rowid());
        Ok(created)
    }

    fn update(&self, record: &AdministrationRecord) -> RepositoryResult<AdministrationRecord> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE administration_record SET
                vaccine_id = ?2, lot_number = ?3, doses_administered = ?4, administration_date = ?5
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.vaccine_id,
                record.lot_number,
                record.doses_administered,
                record.administration_date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found(AdministrationRecord::ENTITY, record.id));
        }
        Ok(record.clone())
    }

    fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM administration_record WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_by_vaccine_id(&self, vaccine_id: &str) -> RepositoryResult<Vec<AdministrationRecord>> {
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

    fn setup() -> AdministrationRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        AdministrationRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn record(vaccine_id: &str, doses: i64) -> AdministrationRecord {
        AdministrationRecord {
            id: 0,
            vaccine_id: vaccine_id.to_string(),
            lot_number: "LOT-A".to_string(),
            doses_administered: doses,
            administration_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        }
    }

    #[test]
    fn test_append_and_query_by_vaccine() {
        let repo = setup();
        repo.create(record("MMR-001", 2)).unwrap();
        repo.create(record("DTP-002", 1)).unwrap();
        let third = repo.create(record("MMR-001", 3)).unwrap();
        assert_eq!(third.id, 3);

        let mmr = repo.list_by_vaccine_id("MMR-001").unwrap();
        assert_eq!(mmr.len(), 2);
        assert_eq!(mmr[1], third);
        assert!(repo.list_by_vaccine_id("NONE").unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_doses_rejected_by_schema() {
        let repo = setup();
        let err = repo.create(record("MMR-001", 0)).unwrap_err();
        assert!(matches!(err, RepositoryError::CheckConstraintViolation(_)));
    }
}
