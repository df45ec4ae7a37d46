// ==========================================
// 疫苗库存管理系统 - 内存记录存储
// ==========================================
// 用途: 测试注入 / 无数据库场景
// 说明: 显式实例,不使用全局可变状态
// ==========================================

use crate::domain::lot::VaccineLot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::{LotStore, Record, RecordStore};
use std::sync::{Mutex, MutexGuard};

struct Inner<T> {
    records: Vec<T>,
    next_id: i64,
}

/// 内存记录存储
pub struct InMemoryRecordStore<T: Record> {
    inner: Mutex<Inner<T>>,
}

impl<T: Record> InMemoryRecordStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// 以种子数据创建，下一个 id = 最大 id + 1
    pub fn with_records(records: Vec<T>) -> Self {
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner { records, next_id }),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Inner<T>>> {
        self.inner
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl<T: Record> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> for InMemoryRecordStore<T> {
    fn list(&self) -> RepositoryResult<Vec<T>> {
        let inner = self.lock()?;
        let mut records = inner.records.clone();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    fn get(&self, id: i64) -> RepositoryResult<Option<T>> {
        let inner = self.lock()?;
        Ok(inner.records.iter().find(|r| r.id() == id).cloned())
    }

    fn create(&self, mut record: T) -> RepositoryResult<T> {
        let mut inner = self.lock()?;
        record.set_id(inner.next_id);
        inner.next_id += 1;
        inner.records.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: &T) -> RepositoryResult<T> {
        let mut inner = self.lock()?;
        match inner.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record.clone())
            }
            None => Err(RepositoryError::not_found(T::ENTITY, record.id())),
        }
    }

    fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.records.len();
        inner.records.retain(|r| r.id() != id);
        Ok(inner.records.len() != before)
    }
}

impl LotStore for InMemoryRecordStore<VaccineLot> {
    /// 持有同一把锁完成校验与调整
    fn adjust_quantity_on_hand(&self, id: i64, delta: i64) -> RepositoryResult<VaccineLot> {
        let mut inner = self.lock()?;
        let lot = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RepositoryError::not_found(VaccineLot::ENTITY, id))?;

        let next = lot.quantity_on_hand + delta;
        if next < 0 {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "在库量不足: id={}, on_hand={}, delta={}",
                id, lot.quantity_on_hand, delta
            )));
        }

        lot.quantity_on_hand = next;
        Ok(lot.clone())
    }
}
