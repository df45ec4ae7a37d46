// ==========================================
// 疫苗库存管理系统 - 记录存储 Trait
// ==========================================
// 职责: 定义通用 CRUD 接口（list/get/create/update/delete）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 实现者: InMemoryRecordStore（测试）、SQLite 仓储（生产）
// ==========================================

use crate::domain::lot::VaccineLot;
use crate::domain::records::{AdministrationRecord, ReceiptRecord};
use crate::repository::error::RepositoryResult;

// ==========================================
// Record - 可存储实体
// ==========================================
pub trait Record: Clone + Send + Sync {
    /// 实体名（错误信息/日志使用）
    const ENTITY: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// 所属疫苗编码
    fn vaccine_id(&self) -> &str;
}

impl Record for VaccineLot {
    const ENTITY: &'static str = "VaccineLot";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn vaccine_id(&self) -> &str {
        &self.vaccine_id
    }
}

impl Record for AdministrationRecord {
    const ENTITY: &'static str = "AdministrationRecord";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn vaccine_id(&self) -> &str {
        &self.vaccine_id
    }
}

impl Record for ReceiptRecord {
    const ENTITY: &'static str = "ReceiptRecord";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn vaccine_id(&self) -> &str {
        &self.vaccine_id
    }
}

// ==========================================
// RecordStore Trait
// ==========================================
pub trait RecordStore<T: Record>: Send + Sync {
    /// 查询全部记录（按 id 升序）
    fn list(&self) -> RepositoryResult<Vec<T>>;

    /// 按 id 查询
    ///
    /// # 返回
    /// - Ok(Some(T)): 找到记录
    /// - Ok(None): 未找到记录
    fn get(&self, id: i64) -> RepositoryResult<Option<T>>;

    /// 新建记录（忽略传入 id，由存储分配）
    ///
    /// # 返回
    /// - Ok(T): 带新 id 的记录
    fn create(&self, record: T) -> RepositoryResult<T>;

    /// 整条更新
    ///
    /// # 返回
    /// - Err(NotFound): 记录不存在
    fn update(&self, record: &T) -> RepositoryResult<T>;

    /// 删除记录
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    fn delete(&self, id: i64) -> RepositoryResult<bool>;

    /// 按疫苗编码查询
    fn list_by_vaccine_id(&self, vaccine_id: &str) -> RepositoryResult<Vec<T>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.vaccine_id() == vaccine_id)
            .collect())
    }
}

// ==========================================
// LotStore Trait - 批次存储扩展
// ==========================================
// 在库量只能经由接收（增加）与接种（减少）变动
pub trait LotStore: RecordStore<VaccineLot> {
    /// 调整在库量
    ///
    /// # 参数
    /// - id: 批次ID
    /// - delta: 变动量（负数为扣减）
    ///
    /// # 返回
    /// - Ok(VaccineLot): 调整后的批次
    /// - Err(NotFound): 批次不存在
    /// - Err(BusinessRuleViolation): 结果将小于 0
    ///
    /// 红线: 校验与写入必须原子完成
    fn adjust_quantity_on_hand(&self, id: i64, delta: i64) -> RepositoryResult<VaccineLot>;
}
