// ==========================================
// 工程进度重算引擎 - 工效配置表
// ==========================================
// 职责: 工种 → (计量单位, 单人日产出) 的静态映射
// 设计: 以注入的配置对象承载,不做模块级全局状态,
//       便于测试替换自定义工效
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 兜底工种 (未知工种回退至此)
pub const GENERAL_WORK_TYPE: &str = "general";

/// 无工程量且无历史日期时的默认任务工期 (天)
pub const DEFAULT_TASK_DURATION_DAYS: i64 = 5;

/// 无任务可推算时的默认里程碑工期 (天)
pub const DEFAULT_MILESTONE_DURATION_DAYS: i64 = 30;

/// 顺序排布时任务/里程碑之间的缓冲 (天)
pub const SEQUENCE_BUFFER_DAYS: i64 = 1;

// ==========================================
// ProductivityRate - 单工种工效
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityRate {
    pub unit: String,            // 计量单位 (cum/sqm/ton/unit)
    pub rate_per_labour_day: f64, // 单人单日产出
}

impl ProductivityRate {
    pub fn new(unit: &str, rate_per_labour_day: f64) -> Self {
        Self {
            unit: unit.to_string(),
            rate_per_labour_day,
        }
    }
}

// ==========================================
// ProductivityTable - 工效配置表
// ==========================================
/// 工效配置表
/// 职责: 按工种查询工效,未知工种回退 general
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityTable {
    rates: HashMap<String, ProductivityRate>,
}

impl ProductivityTable {
    /// 空表 (仅测试或完全自定义场景使用)
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// 注册或覆写一个工种的工效
    pub fn set_rate(&mut self, work_type: &str, unit: &str, rate_per_labour_day: f64) {
        self.rates.insert(
            work_type.to_string(),
            ProductivityRate::new(unit, rate_per_labour_day),
        );
    }

    /// 查询工种工效
    ///
    /// # 回退规则
    /// - 未知工种 → general 工效
    /// - general 亦缺失 → (unit, 1.0) 兜底,保证推算永不失败
    pub fn rate_for(&self, work_type: &str) -> ProductivityRate {
        if let Some(rate) = self.rates.get(work_type) {
            return rate.clone();
        }
        self.rates
            .get(GENERAL_WORK_TYPE)
            .cloned()
            .unwrap_or_else(|| ProductivityRate::new("unit", 1.0))
    }

    /// 是否显式配置了该工种
    pub fn contains(&self, work_type: &str) -> bool {
        self.rates.contains_key(work_type)
    }
}

impl Default for ProductivityTable {
    /// 来源系统内置工效表
    fn default() -> Self {
        let mut table = Self::empty();
        table.set_rate(GENERAL_WORK_TYPE, "unit", 1.0);
        table.set_rate("excavation", "cum", 2.5);
        table.set_rate("backfilling", "cum", 6.0);
        table.set_rate("concreting", "cum", 1.5);
        table.set_rate("masonry", "cum", 1.2);
        table.set_rate("shuttering", "sqm", 10.0);
        table.set_rate("steel_fixing", "ton", 0.15);
        table.set_rate("plastering", "sqm", 8.0);
        table.set_rate("flooring", "sqm", 7.5);
        table.set_rate("painting", "sqm", 20.0);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_work_type() {
        let table = ProductivityTable::default();
        let rate = table.rate_for("excavation");
        assert_eq!(rate.unit, "cum");
        assert_eq!(rate.rate_per_labour_day, 2.5);
    }

    #[test]
    fn test_unknown_falls_back_to_general() {
        let table = ProductivityTable::default();
        let rate = table.rate_for("welding");
        assert_eq!(rate, table.rate_for(GENERAL_WORK_TYPE));
    }

    #[test]
    fn test_empty_table_never_fails() {
        let table = ProductivityTable::empty();
        assert_eq!(table.rate_for("anything").rate_per_labour_day, 1.0);
    }

    #[test]
    fn test_custom_override() {
        let mut table = ProductivityTable::default();
        table.set_rate("excavation", "cum", 4.0);
        assert_eq!(table.rate_for("excavation").rate_per_labour_day, 4.0);
    }
}
