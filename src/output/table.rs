use unicode_width::UnicodeWidthStr;

use crate::evaluate::Evaluation;
use crate::models::{LooseRecord, ParsedAction};
use crate::pipeline::RunReport;

/// Truncate a string to fit within max_width (respecting unicode width).
pub fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Format action records as a table, grouped under their meeting.
pub fn print_actions(records: &[LooseRecord]) {
    if records.is_empty() {
        println!("No action items detected.");
        return;
    }

    println!("{} action item{}:\n", records.len(), plural(records.len()));

    println!("  {:<16} {:<16} {:<12} TASK", "ASSIGNEE", "ROLE", "DEADLINE");
    println!("  {}", "-".repeat(76));

    let mut last_meeting: Option<&str> = None;
    for r in records {
        let meeting = r.meeting.as_deref().unwrap_or("");
        if last_meeting != Some(meeting) {
            if last_meeting.is_some() {
                println!();
            }
            println!("  [{meeting}]");
            last_meeting = Some(meeting);
        }

        let assignee = r.assignee.as_deref().or(r.speaker.as_deref()).unwrap_or("");
        let deadline = r
            .deadline_iso
            .as_deref()
            .or(r.deadline_text.as_deref())
            .unwrap_or("-");
        println!(
            "  {:<16} {:<16} {:<12} {}",
            truncate(assignee, 16),
            truncate(r.assignee_role.as_deref().unwrap_or(""), 16),
            truncate(deadline, 12),
            truncate(&r.action_item.as_deref().unwrap_or("").replace('\n', " "), 60),
        );
    }
}

/// Format a single extractor result for `meetact parse`.
pub fn print_parsed(text: &str, parsed: Option<&ParsedAction>, deadline_iso: Option<&str>) {
    println!("Utterance: {}", truncate(text, 70));
    let Some(p) = parsed else {
        println!("  Not an action item.");
        return;
    };
    println!("  Task:     {}", p.task);
    println!("  Assignee: {}", p.assignee_name.as_deref().unwrap_or("-"));
    println!("  Deadline: {}", p.deadline_raw.as_deref().unwrap_or("-"));
    if let Some(iso) = deadline_iso {
        println!("  Date:     {iso}");
    }
}

pub fn print_evaluation(e: &Evaluation) {
    println!("Precision: {:.3}", e.precision);
    println!("Recall:    {:.3}", e.recall);
    println!("F1:        {:.3}", e.f1);
    println!(
        "\n  TP {}  FP {}  FN {}",
        e.true_positives, e.false_positives, e.false_negatives
    );
}

/// Summary line after `meetact run`.
pub fn print_run_report(report: &RunReport, gate: &str) {
    println!(
        "{} meeting{}, {} utterance{}, {} action item{} (gate: {gate})",
        report.meetings,
        plural(report.meetings),
        report.utterances,
        plural(report.utterances),
        report.records.len(),
        plural(report.records.len()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_is_unchanged() {
        assert_eq!(truncate("send it", 10), "send it");
    }

    #[test]
    fn test_truncate_long_adds_ellipsis() {
        let t = truncate("prepare the quarterly report", 12);
        assert!(t.ends_with("..."));
        assert!(UnicodeWidthStr::width(t.as_str()) <= 12);
    }

    #[test]
    fn test_truncate_wide_chars() {
        let t = truncate("会議の議事録を送ってください", 10);
        assert!(UnicodeWidthStr::width(t.as_str()) <= 10);
    }
}
