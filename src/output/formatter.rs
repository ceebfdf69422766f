use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::RecommendedOffering;

const EMPTY_MESSAGE: &str = "No matching colleges found.";

/// One recommendation as returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRecommendation {
    pub institute: String,
    pub program: String,
    /// Score as a percentage, two decimals
    pub score: f64,
    pub package: String,
    pub fees: String,
    pub rank: i64,
}

/// Convert engine matches into API records.
pub fn to_response(matches: &[RecommendedOffering]) -> Vec<ApiRecommendation> {
    matches
        .iter()
        .map(|m| ApiRecommendation {
            institute: m.institute.clone(),
            program: m.program.clone(),
            score: score_percent(m.score),
            package: format_currency(m.average_package),
            fees: format_currency(m.fee),
            rank: m.closing_rank.trunc() as i64,
        })
        .collect()
}

/// Raw score as a percentage rounded to two decimals. Mains scores can
/// exceed 100.
pub fn score_percent(score: f64) -> f64 {
    (score * 10_000.0).round() / 100.0
}

/// Format a score for display, e.g. "82.5%"
pub fn format_score(score: f64) -> String {
    format!("{}%", score_percent(score))
}

/// Format a rupee amount with comma grouping: "₹1,800,000", "₹1,234.50".
/// Decimals are shown only when the amount has a fractional part.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let cents = (abs * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if frac == 0 {
        format!("{}₹{}", sign, grouped)
    } else {
        format!("{}₹{}.{:02}", sign, grouped, frac)
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format matches as a table: index, score, rank, fee, package, then
/// "institute - program" truncated to the terminal width. No headers.
pub fn format_scored_table(matches: &[RecommendedOffering], use_colors: bool) -> String {
    if matches.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";

    matches
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>7}", format_score(m.score));
            let rank_str = format!("{:>8}", format!("#{}", m.closing_rank.trunc() as i64));
            let money_str = format!(
                "{:>12}{}{:>14}",
                format_currency(m.fee),
                separator,
                format_currency(m.average_package)
            );

            let fixed_width = index_str.chars().count()
                + 1
                + score_str.chars().count()
                + rank_str.chars().count()
                + money_str.chars().count()
                + separator.len() * 4;
            let name = format!("{} - {}", m.institute, m.program);
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_text(&name, width - fixed_width),
                Some(_) => truncate_text(&name, 20),
                None => name,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    rank_str.cyan(),
                    separator,
                    money_str.yellow(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_str, separator, rank_str, separator, money_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail for one match (verbose mode)
pub fn format_recommendation_detail(m: &RecommendedOffering, use_colors: bool) -> String {
    if use_colors {
        format!(
            "{}\n  Program: {}\n  Score: {}\n  Closing rank: {}\n  Fee: {}\n  Average package: {}",
            m.institute.bold(),
            m.program.cyan(),
            format_score(m.score),
            m.closing_rank.trunc() as i64,
            format_currency(m.fee),
            format_currency(m.average_package).green()
        )
    } else {
        format!(
            "{}\n  Program: {}\n  Score: {}\n  Closing rank: {}\n  Fee: {}\n  Average package: {}",
            m.institute,
            m.program,
            format_score(m.score),
            m.closing_rank.trunc() as i64,
            format_currency(m.fee),
            format_currency(m.average_package)
        )
    }
}

/// Format matches as tab-separated values for scripting
/// Columns: score, institute, program, rank, fee, package (no headers, no colors)
pub fn format_tsv(matches: &[RecommendedOffering]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                score_percent(m.score),
                m.institute,
                m.program,
                m.closing_rank.trunc() as i64,
                m.fee,
                m.average_package
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> RecommendedOffering {
        RecommendedOffering {
            institute: "IIT X".to_string(),
            program: "Computer Science".to_string(),
            score: 0.825,
            average_package: 1_800_000.0,
            fee: 250_000.0,
            closing_rank: 100.0,
        }
    }

    #[test]
    fn test_format_currency_whole() {
        assert_eq!(format_currency(1_800_000.0), "₹1,800,000");
        assert_eq!(format_currency(250_000.0), "₹250,000");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1_000.0), "₹1,000");
        assert_eq!(format_currency(0.0), "₹0");
    }

    #[test]
    fn test_format_currency_fractional() {
        assert_eq!(format_currency(1_234.5), "₹1,234.50");
        assert_eq!(format_currency(12_345_678.25), "₹12,345,678.25");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-1_500.0), "-₹1,500");
    }

    #[test]
    fn test_score_percent_rounds() {
        assert_eq!(score_percent(0.825), 82.5);
        assert_eq!(score_percent(0.123456), 12.35);
        assert_eq!(score_percent(0.0), 0.0);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.35), "35%");
        assert_eq!(format_score(0.5925), "59.25%");
    }

    #[test]
    fn test_to_response() {
        let mut m = sample_match();
        m.closing_rank = 100.9;
        let response = to_response(&[m]);

        assert_eq!(
            response[0],
            ApiRecommendation {
                institute: "IIT X".to_string(),
                program: "Computer Science".to_string(),
                score: 82.5,
                package: "₹1,800,000".to_string(),
                fees: "₹250,000".to_string(),
                rank: 100,
            }
        );
    }

    #[test]
    fn test_to_response_json_shape() {
        let json = serde_json::to_value(to_response(&[sample_match()])).unwrap();
        let obj = json[0].as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["fees", "institute", "package", "program", "rank", "score"]);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 20), "Short");
        assert_eq!(truncate_text("This is a very long name", 15), "This is a ve...");
        assert_eq!(truncate_text("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_scored_table_empty() {
        assert_eq!(format_scored_table(&[], false), "No matching colleges found.");
    }

    #[test]
    fn test_format_scored_table_rows() {
        let mut second = sample_match();
        second.institute = "NIT Y".to_string();
        second.score = 0.4;

        let result = format_scored_table(&[sample_match(), second], false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("82.5%"));
        assert!(lines[0].contains("#100"));
        assert!(lines[0].contains("₹250,000"));
        assert!(lines[0].contains("IIT X"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("40%"));
    }

    #[test]
    fn test_format_recommendation_detail() {
        let result = format_recommendation_detail(&sample_match(), false);
        assert!(result.starts_with("IIT X\n"));
        assert!(result.contains("Program: Computer Science"));
        assert!(result.contains("Closing rank: 100"));
        assert!(result.contains("Average package: ₹1,800,000"));
    }

    #[test]
    fn test_format_tsv() {
        assert_eq!(format_tsv(&[]), "");
        assert_eq!(
            format_tsv(&[sample_match()]),
            "82.5\tIIT X\tComputer Science\t100\t250000\t1800000"
        );
    }
}
