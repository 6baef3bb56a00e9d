// ==========================================
// 清货清单分析 - 文本报告渲染
// ==========================================
// 职责: AnalysisReport → 终端文本
// 文案通过 i18n 键获取，金额统一为 $1,234.56 格式
// ==========================================

use crate::api::AnalysisReport;
use crate::domain::manifest::ManifestSummary;
use crate::engine::{PackageMetrics, PortfolioMetrics};
use crate::i18n::{t, t_with_args};

/// 金额格式化（千分位 + 两位小数）
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

/// 数量格式化：整数不带小数
fn format_qty(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// 渲染完整文本报告
pub fn render_text(report: &AnalysisReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("== {} ==", t("report.title")));
    lines.push(t_with_args(
        "report.scenario",
        &[("pct", &format_qty(report.params.resale_pct))],
    ));
    lines.push(String::new());

    lines.push(format!("-- {} --", t("report.files_heading")));
    for summary in &report.manifests {
        lines.extend(file_lines(summary));
    }
    lines.push(t_with_args(
        "report.files_summary",
        &[
            ("valid", &report.valid_count().to_string()),
            ("total", &report.manifests.len().to_string()),
        ],
    ));
    lines.push(String::new());

    let Some(portfolio) = &report.portfolio else {
        lines.push(t("report.no_valid_files"));
        lines.push(t("report.expected_headers"));
        return lines.join("\n");
    };

    lines.push(format!("-- {} --", t("report.packages_heading")));
    lines.push(format!(
        "{:<32} {:>10} {:>8} {:>14} {:>14} {:>14} {:>9}",
        t("report.col_file"),
        t("report.col_items"),
        t("report.col_variety"),
        t("report.col_cost"),
        t("report.col_retail"),
        t("report.col_profit"),
        t("report.roi"),
    ));
    for package in &report.packages {
        lines.push(package_line(package));
    }
    lines.push(String::new());

    lines.extend(portfolio_lines(portfolio));
    lines.join("\n")
}

fn file_lines(summary: &ManifestSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "  [{}] {}",
        t(summary.status.label_key()),
        summary.filename
    )];
    if !summary.is_ok() {
        lines.push(format!("      {}", summary.details));
        return lines;
    }
    if let Some(mapping) = summary.column_mapping.as_ref().filter(|m| m.ambiguous_cost) {
        lines.push(format!(
            "      {}",
            t_with_args("report.ambiguous_cost", &[("column", &mapping.cost)])
        ));
    }
    lines
}

fn package_line(package: &PackageMetrics) -> String {
    format!(
        "{:<32} {:>10} {:>8} {:>14} {:>14} {:>14} {:>8.1}%",
        package.filename,
        format_qty(package.items),
        package.variety_count,
        format_money(package.total_cost),
        format_money(package.total_retail),
        format_money(package.metrics.profit),
        package.metrics.roi_pct,
    )
}

fn portfolio_lines(portfolio: &PortfolioMetrics) -> Vec<String> {
    let metrics = &portfolio.metrics;
    let mut lines = vec![
        format!("-- {} --", t("report.portfolio_heading")),
        format!(
            "  {:<24} {:>14}",
            t("report.total_investment"),
            format_money(metrics.expenses)
        ),
        format!(
            "  {:<24} {:>14}",
            t("report.overhead"),
            format_money(portfolio.total_overhead())
        ),
        format!(
            "  {:<24} {:>14}",
            t("report.projected_revenue"),
            format_money(metrics.revenue)
        ),
        format!(
            "  {:<24} {:>14}",
            t("report.net_profit"),
            format_money(metrics.profit)
        ),
        format!(
            "  {:<24} {:>13.1}% ({})",
            t("report.roi"),
            metrics.roi_pct,
            t(metrics.roi_band.label_key())
        ),
        String::new(),
        format!("-- {} --", t("report.waterfall_heading")),
    ];

    for step in &portfolio.waterfall {
        lines.push(format!(
            "  {:<24} {:>14}",
            t(&step.label_key),
            format_money(step.amount)
        ));
    }
    lines
}
