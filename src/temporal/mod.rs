//! Natural language deadline normalization.
//!
//! Converts raw deadline phrases ("by Friday", "in the next two days",
//! "tomorrow") into calendar dates relative to a reference instant. Ambiguous
//! expressions resolve to the future: a weekday name means its next
//! occurrence, and a month/day without a year that has already passed means
//! next year.

use chrono::{Datelike, Duration, Month, Months, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use std::sync::OnceLock;

/// Words that introduce a deadline without changing its meaning.
const CONNECTIVES: &[&str] = &[
    "by", "within", "in", "on", "before", "until", "till", "this", "the", "coming", "over", "at",
    "for", "of",
];

/// Words that resolve to the reference date itself.
const SAME_DAY: &[&str] = &["today", "tonight"];

/// Times of day. They name the reference date unless a later day follows
/// ("noon tomorrow", "the morning of Friday").
const TIME_OF_DAY: &[&str] = &["noon", "midday", "morning", "afternoon", "evening", "eod", "cob"];

/// Normalize a raw deadline phrase to an ISO `YYYY-MM-DD` string.
/// Absent, empty, or unrecognized input yields `None`.
pub fn normalize_deadline(raw: Option<&str>, reference: NaiveDateTime) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    parse_deadline(raw, reference).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Interpret a deadline phrase as a date relative to `reference`.
pub fn parse_deadline(raw: &str, reference: NaiveDateTime) -> Option<NaiveDate> {
    if let Some(date) = parse_iso(raw) {
        return Some(date);
    }

    let lower = raw.to_lowercase();
    let cleaned: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut toks: Vec<&str> = cleaned.split_whitespace().collect();
    while toks.first().is_some_and(|t| CONNECTIVES.contains(t)) {
        toks.remove(0);
    }

    resolve_tokens(&toks, reference)
}

fn resolve_tokens(toks: &[&str], reference: NaiveDateTime) -> Option<NaiveDate> {
    let today = reference.date();

    match toks {
        [] => None,
        ["day", "after", "tomorrow", ..] => today.checked_add_signed(Duration::days(2)),
        ["tomorrow", ..] => today.succ_opt(),
        [first, ..] if SAME_DAY.contains(first) => Some(today),
        [first, rest @ ..] if TIME_OF_DAY.contains(first) => {
            Some(day_after_time_of_day(rest, reference))
        }
        ["end", "of", rest @ ..] => end_of(strip_connectives(rest), reference),
        ["next", rest @ ..] => resolve_next(rest, reference),
        [first, ..] if parse_weekday(first).is_some() => {
            parse_weekday(first).map(|wd| next_weekday(today, wd))
        }
        _ => resolve_count(toks, reference).or_else(|| resolve_calendar(toks, today)),
    }
}

/// The day named after a time-of-day word, or the reference date when
/// nothing resolvable follows.
fn day_after_time_of_day(rest: &[&str], reference: NaiveDateTime) -> NaiveDate {
    resolve_tokens(strip_connectives(rest), reference).unwrap_or(reference.date())
}

fn strip_connectives<'a, 'b>(mut toks: &'a [&'b str]) -> &'a [&'b str] {
    while let Some((first, rest)) = toks.split_first() {
        if !CONNECTIVES.contains(first) {
            break;
        }
        toks = rest;
    }
    toks
}

/// `next week`, `next month`, `next Friday`, or `next two days`.
fn resolve_next(rest: &[&str], reference: NaiveDateTime) -> Option<NaiveDate> {
    let today = reference.date();
    match rest {
        ["week", ..] => today.checked_add_signed(Duration::days(7)),
        ["month", ..] => today.checked_add_months(Months::new(1)),
        ["year", ..] => today.checked_add_months(Months::new(12)),
        [first, ..] if parse_weekday(first).is_some() => {
            parse_weekday(first).map(|wd| next_weekday(today, wd))
        }
        _ => resolve_count(rest, reference),
    }
}

/// `end of day`, `end of the week`, `end of next week`, `end of the month`.
fn end_of(rest: &[&str], reference: NaiveDateTime) -> Option<NaiveDate> {
    let today = reference.date();
    match rest {
        ["day", "after", "tomorrow", ..] => resolve_tokens(rest, reference),
        ["day", more @ ..] => Some(day_after_time_of_day(more, reference)),
        ["today", ..] => Some(today),
        ["week", ..] => Some(end_of_week(today)),
        ["next", "week", ..] => today.checked_add_signed(Duration::days(7)).map(end_of_week),
        ["month", ..] => last_day_of_month(today),
        ["next", "month", ..] => today.checked_add_months(Months::new(1)).and_then(last_day_of_month),
        ["year", ..] => NaiveDate::from_ymd_opt(today.year(), 12, 31),
        _ => None,
    }
}

/// `<n> <unit>`: "2 days", "a week", "a couple of weeks", "three hours".
fn resolve_count(toks: &[&str], reference: NaiveDateTime) -> Option<NaiveDate> {
    let (n, rest) = match toks {
        ["a", "couple", "of", rest @ ..] | ["couple", "of", rest @ ..] => (2, rest),
        ["a", "few", rest @ ..] | ["few", rest @ ..] => (3, rest),
        [first, rest @ ..] => (parse_count(first)?, rest),
        [] => return None,
    };
    let unit = rest.first()?;
    let today = reference.date();

    match unit.trim_end_matches('s') {
        "day" => today.checked_add_signed(Duration::days(n)),
        "week" => today.checked_add_signed(Duration::weeks(n)),
        "month" => today.checked_add_months(Months::new(u32::try_from(n).ok()?)),
        "year" => today.checked_add_months(Months::new(u32::try_from(n).ok()? * 12)),
        "hour" => reference
            .checked_add_signed(Duration::hours(n))
            .map(|dt| dt.date()),
        "minute" | "min" => reference
            .checked_add_signed(Duration::minutes(n))
            .map(|dt| dt.date()),
        _ => None,
    }
}

fn parse_count(tok: &str) -> Option<i64> {
    if let Ok(n) = tok.parse::<i64>() {
        return (0..=3650).contains(&n).then_some(n);
    }
    let n = match tok {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

/// `March 15`, `15th March`, `mar 3 2025`, `the 15th`.
fn resolve_calendar(toks: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let toks: Vec<&str> = toks
        .iter()
        .copied()
        .filter(|t| !matches!(*t, "of" | "the"))
        .collect();
    let (month, day, year) = match toks.as_slice() {
        [m, d, rest @ ..] if parse_month(m).is_some() && parse_day(d).is_some() => {
            (parse_month(m)?, parse_day(d)?, rest.first().and_then(|y| parse_year(y)))
        }
        [d, m, rest @ ..] if parse_day(d).is_some() && parse_month(m).is_some() => {
            (parse_month(m)?, parse_day(d)?, rest.first().and_then(|y| parse_year(y)))
        }
        [d] if is_ordinal(d) => {
            let day = parse_day(d)?;
            let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), day);
            return match this_month {
                Some(date) if date >= today => Some(date),
                _ => {
                    let next = today.checked_add_months(Months::new(1))?;
                    NaiveDate::from_ymd_opt(next.year(), next.month(), day)
                }
            };
        }
        _ => return None,
    };

    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn parse_iso(raw: &str) -> Option<NaiveDate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("Invalid ISO date regex"));
    let m = re.find(raw)?;
    NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok()
}

fn parse_weekday(tok: &str) -> Option<Weekday> {
    // chrono also accepts three-letter abbreviations
    tok.parse::<Weekday>().ok()
}

fn parse_month(tok: &str) -> Option<u32> {
    // "may" is also a modal verb, but in a deadline phrase the month is meant
    tok.parse::<Month>().ok().map(|m| m.number_from_month())
}

fn parse_day(tok: &str) -> Option<u32> {
    let digits = tok
        .strip_suffix("st")
        .or_else(|| tok.strip_suffix("nd"))
        .or_else(|| tok.strip_suffix("rd"))
        .or_else(|| tok.strip_suffix("th"))
        .unwrap_or(tok);
    digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

fn is_ordinal(tok: &str) -> bool {
    ["st", "nd", "rd", "th"].iter().any(|s| tok.ends_with(s)) && parse_day(tok).is_some()
}

fn parse_year(tok: &str) -> Option<i32> {
    tok.parse::<i32>().ok().filter(|y| (1000..=9999).contains(y))
}

/// Next occurrence of `target` strictly after `today`.
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let from = today.weekday().num_days_from_monday() as i64;
    let to = target.num_days_from_monday() as i64;
    let mut ahead = (to - from).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

/// The coming Friday, or `today` if it is Friday.
fn end_of_week(today: NaiveDate) -> NaiveDate {
    let from = today.weekday().num_days_from_monday() as i64;
    let to = Weekday::Fri.num_days_from_monday() as i64;
    today + Duration::days((to - from).rem_euclid(7))
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
