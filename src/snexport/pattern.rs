//! # Date Patterns
//!
//! Supernote names new notes after their creation time (`20240115-093000.note`).
//! A date pattern describes such names with Moment-style tokens, and is used both
//! to recognise daily notes and to generate timestamped filenames.
//!
//! ## Tokens
//!
//! | Token | Field | Matches | Renders |
//! |-------|-------|---------|---------|
//! | `YYYY` | year | exactly 4 digits | 4 digits |
//! | `YY` | year | exactly 2 digits | last 2 digits |
//! | `MM` / `M` | month | 2 / 1-2 digits | padded / unpadded |
//! | `DD` / `D` | day | 2 / 1-2 digits | padded / unpadded |
//! | `HH` / `H` | hour | 2 / 1-2 digits | padded / unpadded |
//! | `mm` / `m` | minute | 2 / 1-2 digits | padded / unpadded |
//! | `ss` / `s` | second | 2 / 1-2 digits | padded / unpadded |
//! | `SS` | second | 2 digits | padded |
//!
//! The template is scanned left to right and the longest token is taken at each
//! position, so `MM` is never read as two `M`s. Anything else is a literal.
//! Tokens are independent of each other: a template may mention the same field
//! twice (`M-MM`) and each occurrence is matched and rendered on its own.
//!
//! `SS` is accepted for seconds because the Supernote default, `YYYYMMDD-HHMMSS`,
//! is written that way. The same template uses `MM` in the minute slot. Matching
//! only depends on digit arity, so it still recognises the device's filenames;
//! rendering puts the month there.
//!
//! Rendering and matching are inverses. `YYYY` only holds years 0 through
//! 9999, so rendering any other year with it is an error instead of a name
//! the pattern would not recognise.

use crate::error::PatternError;
use crate::model::NOTE_EXTENSION;
use chrono::{Datelike, Timelike};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    /// Year as four digits.
    Full,
    /// Year as its last two digits.
    Short,
    Padded,
    Unpadded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Field, Width),
    Literal(char),
}

/// Longest tokens first within each field.
const TOKENS: &[(&str, Field, Width)] = &[
    ("YYYY", Field::Year, Width::Full),
    ("YY", Field::Year, Width::Short),
    ("MM", Field::Month, Width::Padded),
    ("M", Field::Month, Width::Unpadded),
    ("DD", Field::Day, Width::Padded),
    ("D", Field::Day, Width::Unpadded),
    ("HH", Field::Hour, Width::Padded),
    ("H", Field::Hour, Width::Unpadded),
    ("mm", Field::Minute, Width::Padded),
    ("m", Field::Minute, Width::Unpadded),
    ("ss", Field::Second, Width::Padded),
    ("SS", Field::Second, Width::Padded),
    ("s", Field::Second, Width::Unpadded),
];

/// A compiled date pattern.
#[derive(Debug, Clone)]
pub struct DatePattern {
    template: String,
    tokens: Vec<Token>,
    regex: Regex,
}

impl DatePattern {
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        if template.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let tokens = tokenize(template);
        if !tokens.iter().any(|t| matches!(t, Token::Field(..))) {
            return Err(PatternError::NoTokens(template.to_string()));
        }

        let mut source = String::from("^");
        for token in &tokens {
            match token {
                Token::Field(_, Width::Full) => source.push_str("[0-9]{4}"),
                Token::Field(_, Width::Short | Width::Padded) => source.push_str("[0-9]{2}"),
                Token::Field(_, Width::Unpadded) => source.push_str("[0-9]{1,2}"),
                Token::Literal(c) => source.push_str(&regex::escape(&c.to_string())),
            }
        }
        source.push('$');

        Ok(Self {
            template: template.to_string(),
            tokens,
            regex: Regex::new(&source)?,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether a filename conforms to the pattern. A trailing `.note` is ignored;
    /// the rest must match in full.
    pub fn test(&self, filename: &str) -> bool {
        self.regex.is_match(strip_note_extension(filename))
    }

    pub fn render<T: Datelike + Timelike>(&self, now: &T) -> Result<String, PatternError> {
        let mut out = String::with_capacity(self.template.len() + 4);
        for token in &self.tokens {
            match token {
                Token::Literal(c) => out.push(*c),
                Token::Field(field, width) => {
                    let value = field_value(now, *field);
                    match width {
                        Width::Full if !(0..=9999).contains(&value) => {
                            return Err(PatternError::YearOutOfRange(value));
                        }
                        Width::Full => out.push_str(&format!("{:04}", value)),
                        Width::Short => out.push_str(&format!("{:02}", value.rem_euclid(100))),
                        Width::Padded => out.push_str(&format!("{:02}", value)),
                        Width::Unpadded => out.push_str(&value.to_string()),
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Render `now` into `template` in one step.
pub fn render<T: Datelike + Timelike>(template: &str, now: &T) -> Result<String, PatternError> {
    DatePattern::compile(template)?.render(now)
}

fn strip_note_extension(filename: &str) -> &str {
    filename
        .strip_suffix(NOTE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(filename)
}

fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = template;

    'outer: while let Some(c) = rest.chars().next() {
        for (text, field, width) in TOKENS {
            if let Some(after) = rest.strip_prefix(text) {
                tokens.push(Token::Field(*field, *width));
                rest = after;
                continue 'outer;
            }
        }
        tokens.push(Token::Literal(c));
        rest = &rest[c.len_utf8()..];
    }

    tokens
}

fn field_value<T: Datelike + Timelike>(now: &T, field: Field) -> i64 {
    match field {
        Field::Year => i64::from(now.year()),
        Field::Month => i64::from(now.month()),
        Field::Day => i64::from(now.day()),
        Field::Hour => i64::from(now.hour()),
        Field::Minute => i64::from(now.minute()),
        Field::Second => i64::from(now.second()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_supernote_default_pattern() {
        let p = DatePattern::compile("YYYYMMDD-HHMMSS").unwrap();
        assert!(p.test("20240115-093000"));
        assert!(p.test("20240115-093000.note"));
        assert!(!p.test("MyIdeas"));
        assert!(!p.test("2024-01-01"));
        assert!(!p.test("20240115-0930001"));
        assert!(!p.test("x20240115-093000"));
        assert!(!p.test("20240115-0930SS"));
    }

    #[test]
    fn test_only_trailing_note_extension_is_stripped() {
        let p = DatePattern::compile("YYYY-MM-DD").unwrap();
        assert!(p.test("2024-01-15.note"));
        assert!(!p.test("2024-01-15.md"));
        assert!(!p.test("2024-01-15note"));
    }

    #[test]
    fn test_unpadded_tokens_accept_one_or_two_digits() {
        let p = DatePattern::compile("D.M.YY").unwrap();
        assert!(p.test("5.1.24"));
        assert!(p.test("15.11.24"));
        assert!(!p.test("155.1.24"));
        assert!(!p.test("5.1.2024"));
    }

    #[test]
    fn test_literals_are_escaped() {
        let p = DatePattern::compile("YYYY.MM.DD (x)").unwrap();
        assert!(p.test("2024.01.15 (x)"));
        assert!(!p.test("2024a01b15 (x)"));
    }

    #[test]
    fn test_render_pads_and_unpads() {
        let now = at(2024, 1, 5, 9, 3, 7);
        assert_eq!(render("YYYYMMDD-HHmmss", &now).unwrap(), "20240105-090307");
        assert_eq!(render("D/M/YY H:m:s", &now).unwrap(), "5/1/24 9:3:7");
    }

    #[test]
    fn test_mixed_widths_for_same_field_are_independent() {
        let now = at(2024, 3, 9, 0, 0, 0);
        let p = DatePattern::compile("M-MM").unwrap();
        assert_eq!(p.render(&now).unwrap(), "3-03");
        assert!(p.test("3-03"));
        assert!(p.test("12-12"));
        assert!(!p.test("3-3"));
    }

    #[test]
    fn test_render_then_match_roundtrips() {
        let templates = [
            "YYYYMMDD-HHMMSS",
            "YYYY-MM-DD",
            "D.M.YY",
            "YYYY_M_D H-m-s",
            "[YY] DD/MM",
            "log-YYYY-MM-DDTHH.mm.ss",
        ];
        let stamps = [
            at(2024, 1, 15, 9, 30, 0),
            at(1999, 12, 31, 23, 59, 59),
            at(2000, 2, 29, 0, 0, 0),
            at(31, 7, 4, 12, 5, 9),
        ];
        for template in templates {
            let p = DatePattern::compile(template).unwrap();
            for now in &stamps {
                let rendered = p.render(now).unwrap();
                assert!(p.test(&rendered), "{} should match {}", template, rendered);
            }
        }
    }

    #[test]
    fn test_four_digit_year_out_of_range_is_rejected() {
        let p = DatePattern::compile("YYYY-MM-DD").unwrap();
        for year in [-1, 10000] {
            assert!(matches!(
                p.render(&at(year, 1, 1, 0, 0, 0)),
                Err(PatternError::YearOutOfRange(y)) if y == i64::from(year)
            ));
        }
        assert_eq!(p.render(&at(0, 1, 1, 0, 0, 0)).unwrap(), "0000-01-01");
        assert_eq!(p.render(&at(9999, 12, 31, 0, 0, 0)).unwrap(), "9999-12-31");
    }

    #[test]
    fn test_two_digit_year_renders_any_year() {
        let p = DatePattern::compile("YY.MM").unwrap();
        for year in [-1, 10000, 12345] {
            let rendered = p.render(&at(year, 6, 1, 0, 0, 0)).unwrap();
            assert!(p.test(&rendered), "{} should match", rendered);
        }
    }

    #[test]
    fn test_longest_token_wins() {
        // YYY is YY followed by a literal Y
        let p = DatePattern::compile("YYY").unwrap();
        assert!(p.test("24Y"));
        assert!(!p.test("2024"));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(DatePattern::compile(""), Err(PatternError::Empty)));
        assert!(matches!(DatePattern::compile("   "), Err(PatternError::Empty)));
        assert!(matches!(
            DatePattern::compile("abc"),
            Err(PatternError::NoTokens(_))
        ));
    }
}
