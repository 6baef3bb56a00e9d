// ==========================================
// 清货清单分析 - 表头模糊匹配
// ==========================================
// 职责: 在表头中定位 数量 / 单位零售价 / 成本 / 描述 列
// 规则: 大小写不敏感的子串匹配；按模式顺序尝试，同一模式取列顺序第一个
// ==========================================

use crate::domain::manifest::ColumnMapping;
use crate::domain::types::CostColumnSource;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::manifest_loader_trait::ColumnResolver;
use tracing::{debug, warn};

// ==========================================
// HeaderPattern - 表头匹配模式
// ==========================================
// all_of: 必须全部包含；any_of: 至少包含一个（为空则忽略）；none_of: 均不包含
#[derive(Debug, Clone, Copy)]
pub struct HeaderPattern {
    pub all_of: &'static [&'static str],
    pub any_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
}

impl HeaderPattern {
    const fn all(all_of: &'static [&'static str]) -> Self {
        Self {
            all_of,
            any_of: &[],
            none_of: &[],
        }
    }

    const fn all_except(all_of: &'static [&'static str], none_of: &'static [&'static str]) -> Self {
        Self {
            all_of,
            any_of: &[],
            none_of,
        }
    }

    const fn any(any_of: &'static [&'static str]) -> Self {
        Self {
            all_of: &[],
            any_of,
            none_of: &[],
        }
    }

    /// header 须已转小写
    pub fn matches(&self, header: &str) -> bool {
        self.all_of.iter().all(|k| header.contains(k))
            && (self.any_of.is_empty() || self.any_of.iter().any(|k| header.contains(k)))
            && !self.none_of.iter().any(|k| header.contains(k))
    }
}

// ===== 各角色的模式表（顺序即优先级） =====

pub const QUANTITY_PATTERNS: &[HeaderPattern] = &[HeaderPattern::all(&["qty"])];

pub const RETAIL_PATTERNS: &[HeaderPattern] = &[
    HeaderPattern::all(&["unit retail"]),
    HeaderPattern::all_except(&["retail"], &["ext"]),
];

/// 第一条为 ExtendedRetail，第二条为 ExtendedCost
pub const COST_PATTERNS: &[HeaderPattern] = &[
    HeaderPattern::all(&["ext", "retail"]),
    HeaderPattern::all(&["cost", "ext"]),
];

pub const DESCRIPTION_PATTERNS: &[HeaderPattern] =
    &[HeaderPattern::any(&["desc", "item", "product"])];

/// 按模式顺序查找，返回 (模式序号, 列序号)
pub fn find_column(patterns: &[HeaderPattern], headers: &[String]) -> Option<(usize, usize)> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    patterns.iter().enumerate().find_map(|(pattern_idx, pattern)| {
        lowered
            .iter()
            .position(|h| pattern.matches(h))
            .map(|col_idx| (pattern_idx, col_idx))
    })
}

// ==========================================
// HeaderColumnResolver - 列匹配实现
// ==========================================
pub struct HeaderColumnResolver;

/// 列下标形式的匹配结果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub quantity: usize,
    pub retail: usize,
    pub cost: usize,
    pub description: Option<usize>,
    pub mapping: ColumnMapping,
}

impl ColumnResolver for HeaderColumnResolver {
    fn resolve(&self, headers: &[String]) -> ImportResult<ResolvedColumns> {
        let quantity = find_column(QUANTITY_PATTERNS, headers);
        let retail = find_column(RETAIL_PATTERNS, headers);
        let cost = find_column(COST_PATTERNS, headers);
        let description = find_column(DESCRIPTION_PATTERNS, headers).map(|(_, col)| col);

        let (Some((_, qty_col)), Some((_, retail_col)), Some((cost_rule, cost_col))) =
            (quantity, retail, cost)
        else {
            debug!(
                quantity = quantity.is_some(),
                retail = retail.is_some(),
                cost = cost.is_some(),
                "必需列未全部匹配"
            );
            return Err(ImportError::MissingColumns {
                found: headers.to_vec(),
            });
        };

        let cost_source = if cost_rule == 0 {
            CostColumnSource::ExtendedRetail
        } else {
            CostColumnSource::ExtendedCost
        };

        // ext+retail 胜出时，若另有一列 ext+cost 列，则标记为歧义
        let ambiguous_cost = cost_source == CostColumnSource::ExtendedRetail
            && headers
                .iter()
                .enumerate()
                .any(|(idx, h)| idx != cost_col && COST_PATTERNS[1].matches(&h.to_lowercase()));
        if ambiguous_cost {
            warn!(
                cost_column = %headers[cost_col],
                "成本列存在歧义: 按 ext+retail 规则选用，同时存在 ext+cost 列"
            );
        }

        let mapping = ColumnMapping {
            quantity: headers[qty_col].clone(),
            retail: headers[retail_col].clone(),
            cost: headers[cost_col].clone(),
            description: description.map(|col| headers[col].clone()),
            cost_source,
            ambiguous_cost,
        };

        Ok(ResolvedColumns {
            quantity: qty_col,
            retail: retail_col,
            cost: cost_col,
            description,
            mapping,
        })
    }
}
