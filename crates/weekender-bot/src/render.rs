//! Text rendering of option summaries

use chrono::Weekday;
use weekender_core::OptionSummary;

/// Shown instead of a percentage when nobody voted
pub const UNDEFINED_PERCENT: &str = "n/a";

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn day_month(summary: &OptionSummary) -> String {
    summary.date.format("%d/%m").to_string()
}

fn table_header() -> String {
    format!(
        "| {:<10} | {:<5} | {:>5} | {:>5} | {:>5} | {:>8} |",
        "Weekday", "Date", "Yes", "No", "Maybe", "Total"
    )
}

fn table_row(summary: &OptionSummary) -> String {
    let percent = match summary.percent {
        Some(p) => format!("{p:>6.2} %"),
        None => format!("{UNDEFINED_PERCENT:>8}"),
    };
    format!(
        "| {:<10} | {:<5} | {:>5} | {:>5} | {:>5} | {} |",
        weekday_name(summary.weekday),
        day_month(summary),
        summary.yes,
        summary.no,
        summary.maybe,
        percent
    )
}

/// Monospace attendance table wrapped in a MarkdownV2 code block.
///
/// Returns `None` for an empty selection so callers can send a plain notice.
pub fn schedule_table(summaries: &[OptionSummary]) -> Option<String> {
    if summaries.is_empty() {
        return None;
    }

    let mut lines = vec![table_header()];
    lines.extend(summaries.iter().map(table_row));
    Some(format!("```\n{}\n```", escape_code(&lines.join("\n"))))
}

/// Inside MarkdownV2 code blocks only backslash and backtick are special
fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}

/// One-line summary: `Friday (12/01): 3 (YES) 1 (MAYBE) 0 (NO): 100%`.
///
/// Highlighted options are wrapped in `*`.
pub fn summary_line(summary: &OptionSummary) -> String {
    let percent = match summary.percent {
        Some(p) => format!("{p:.0}%"),
        None => UNDEFINED_PERCENT.to_string(),
    };
    let line = format!(
        "{} ({}): {} (YES) {} (MAYBE) {} (NO): {}",
        weekday_name(summary.weekday),
        day_month(summary),
        summary.yes,
        summary.maybe,
        summary.no,
        percent
    );
    if summary.highlighted {
        format!("*{line}*")
    } else {
        line
    }
}
