// ==========================================
// 疫苗库存管理系统 - 疫苗批次数据仓储
// ==========================================
// 依据: vaccine_lot 表
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::db::DATE_FORMAT;
use crate::domain::lot::VaccineLot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_stored_date;
use crate::repository::record_store::{LotStore, Record, RecordStore};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT id, vaccine_id, commercial_name, generic_name, lot_number,
           quantity, quantity_on_hand, expiration_date, received_date
    FROM vaccine_lot
"#;

// 行映射中间结构（日期为原始文本）
struct LotRow {
    id: i64,
    vaccine_id: String,
    commercial_name: String,
    generic_name: String,
    lot_number: String,
    quantity: i64,
    quantity_on_hand: i64,
    expiration_date: String,
    received_date: String,
}

impl LotRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            vaccine_id: row.get(1)?,
            commercial_name: row.get(2)?,
            generic_name: row.get(3)?,
            lot_number: row.get(4)?,
            quantity: row.get(5)?,
            quantity_on_hand: row.get(6)?,
            expiration_date: row.get(7)?,
            received_date: row.get(8)?,
        })
    }

    fn into_lot(self) -> RepositoryResult<VaccineLot> {
        Ok(VaccineLot {
            id: self.id,
            vaccine_id: self.vaccine_id,
            commercial_name: self.commercial_name,
            generic_name: self.generic_name,
            lot_number: self.lot_number,
            quantity: self.quantity,
            quantity_on_hand: self.quantity_on_hand,
            expiration_date: parse_stored_date("expiration_date", &self.expiration_date)?,
            received_date: parse_stored_date("received_date", &self.received_date)?,
        })
    }
}

// ==========================================
// VaccineLotRepository - 疫苗批次仓储
// ==========================================
pub struct VaccineLotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VaccineLotRepository {
    /// 创建新的批次仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn query_lots(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> RepositoryResult<Vec<VaccineLot>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(args, LotRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(LotRow::into_lot).collect()
    }
}

impl RecordStore<VaccineLot> for VaccineLotRepository {
    fn list(&self) -> RepositoryResult<Vec<VaccineLot>> {
        self.query_lots(&format!("{} ORDER BY id ASC", SELECT_COLUMNS), &[])
    }

    fn get(&self, id: i64) -> RepositoryResult<Option<VaccineLot>> {
        let row = {
            let conn = self.get_conn()?;
            conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                LotRow::from_row,
            )
            .optional()?
        };

        row.map(LotRow::into_lot).transpose()
    }

    fn create(&self, record: VaccineLot) -> RepositoryResult<VaccineLot> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO vaccine_lot (
                vaccine_id, commercial_name, generic_name, lot_number,
                quantity, quantity_on_hand, expiration_date, received_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.vaccine_id,
                record.commercial_name,
                record.generic_name,
                record.lot_number,
                record.quantity,
                record.quantity_on_hand,
                record.expiration_date.format(DATE_FORMAT).to_string(),
                record.received_date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        let mut created = record;
        created.set_id(conn.last_insert_rowid());
        Ok(created)
    }

    fn update(&self, record: &VaccineLot) -> RepositoryResult<VaccineLot> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE vaccine_lot SET
                vaccine_id = ?2, commercial_name = ?3, generic_name = ?4, lot_number = ?5,
                quantity = ?6, quantity_on_hand = ?7, expiration_date = ?8, received_date = ?9
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.vaccine_id,
                record.commercial_name,
                record.generic_name,
                record.lot_number,
                record.quantity,
                record.quantity_on_hand,
                record.expiration_date.format(DATE_FORMAT).to_string(),
                record.received_date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::not_found(VaccineLot::ENTITY, record.id));
        }
        Ok(record.clone())
    }

    fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM vaccine_lot WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_by_vaccine_id(&self, vaccine_id: &str) -> RepositoryResult<Vec<VaccineLot>> {
        self.query_lots(
            &format!("{} WHERE vaccine_id = ?1 ORDER BY id ASC", SELECT_COLUMNS),
            &[&vaccine_id],
        )
    }
}

impl LotStore for VaccineLotRepository {
    /// 条件更新,扣减与检查在同一条 SQL 内完成
    fn adjust_quantity_on_hand(&self, id: i64, delta: i64) -> RepositoryResult<VaccineLot> {
        let rows = {
            let conn = self.get_conn()?;
            conn.execute(
                r#"
                UPDATE vaccine_lot
                SET quantity_on_hand = quantity_on_hand + ?2
                WHERE id = ?1 AND quantity_on_hand + ?2 >= 0
                "#,
                params![id, delta],
            )?
        };

        let lot = self
            .get(id)?
            .ok_or_else(|| RepositoryError::not_found(VaccineLot::ENTITY, id))?;

        if rows == 0 {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "在库量不足: id={}, on_hand={}, delta={}",
                id, lot.quantity_on_hand, delta
            )));
        }
        Ok(lot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use chrono::NaiveDate;

    fn setup() -> VaccineLotRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        VaccineLotRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn lot(vaccine_id: &str, on_hand: i64) -> VaccineLot {
        VaccineLot {
            id: 0,
            vaccine_id: vaccine_id.to_string(),
            commercial_name: "Fluzone".to_string(),
            generic_name: "Influenza".to_string(),
            lot_number: "FL-2026".to_string(),
            quantity: 20,
            quantity_on_hand: on_hand,
            expiration_date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
            received_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        }
    }

    #[test]
    fn test_create_and_get_roundtrip() {
        let repo = setup();
        let created = repo.create(lot("FLU-001", 20)).unwrap();
        assert_eq!(created.id, 1);

        let loaded = repo.get(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(repo.get(999).unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete() {
        let repo = setup();
        let mut created = repo.create(lot("FLU-001", 20)).unwrap();

        created.commercial_name = "Fluzone HD".to_string();
        repo.update(&created).unwrap();
        assert_eq!(repo.get(created.id).unwrap().unwrap().commercial_name, "Fluzone HD");

        assert!(repo.delete(created.id).unwrap());
        assert!(matches!(repo.update(&created), Err(RepositoryError::NotFound { .. })));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_by_vaccine_id() {
        let repo = setup();
        repo.create(lot("FLU-001", 20)).unwrap();
        repo.create(lot("HEP-002", 20)).unwrap();
        repo.create(lot("FLU-001", 5)).unwrap();

        let flu = repo.list_by_vaccine_id("FLU-001").unwrap();
        assert_eq!(flu.iter().map(|l| l.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn test_adjust_quantity_on_hand() {
        let repo = setup();
        let created = repo.create(lot("FLU-001", 3)).unwrap();

        let after = repo.adjust_quantity_on_hand(created.id, -2).unwrap();
        assert_eq!(after.quantity_on_hand, 1);

        let err = repo.adjust_quantity_on_hand(created.id, -2).unwrap_err();
        assert!(matches!(err, RepositoryError::BusinessRuleViolation(_)));
        assert_eq!(repo.get(created.id).unwrap().unwrap().quantity_on_hand, 1);

        assert!(matches!(
            repo.adjust_quantity_on_hand(404, -1),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_date_is_field_error() {
        let repo = setup();
        repo.create(lot("FLU-001", 3)).unwrap();
        {
            let conn = repo.get_conn().unwrap();
            conn.execute("UPDATE vaccine_lot SET expiration_date = 'not-a-date'", [])
                .unwrap();
        }

        let err = repo.list().unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { ref field, .. } if field == "expiration_date"));
    }
}
