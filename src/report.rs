use std::fmt::Write;

use crate::core::RoiResult;

const ABSENT: &str = "—";

pub fn format_money(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs()))
}

pub fn format_percent(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}%", group_thousands(rounded.abs()))
}

pub fn format_payback(months: Option<f64>) -> String {
    match months {
        Some(m) => format!("{m:.1} months"),
        None => ABSENT.to_string(),
    }
}

pub fn render_summary(result: &RoiResult) -> String {
    let tiles = [
        ("Monthly cost (manual)", format_money(result.monthly_total_manual)),
        (
            "Monthly cost (automated)",
            format_money(result.monthly_total_automated),
        ),
        ("Monthly savings", format_money(result.monthly_savings)),
        ("Annual savings", format_money(result.annual_savings)),
        ("ROI", format_percent(result.roi_percent)),
        ("Payback", format_payback(result.payback_months)),
    ];
    let label_width = tiles.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "Key metrics");
    for (label, value) in &tiles {
        let _ = writeln!(out, "  {label:<label_width$}  {value:>12}");
    }

    if !result.series.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Cumulative savings");
        let _ = writeln!(
            out,
            "  {:>5}  {:>12}  {:>12}  {:>14}",
            "Month", "Manual", "Automated", "Cumulative"
        );
        for point in &result.series {
            let _ = writeln!(
                out,
                "  {:>5}  {:>12}  {:>12}  {:>14}",
                point.month,
                format_money(point.manual),
                format_money(point.automated),
                format_money(point.cumulative_savings)
            );
        }
    }

    out
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{value:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
