//! Text parsing and formatting of calendar dates.
//!
//! ## Usage
//!
//! Supply a [`DateFormat`] to the picker to control what the text field
//! shows and accepts. [`PatternDateFormat`] covers the usual numeric and
//! named-month patterns such as `yyyy/MM/dd` or `d MMM yyyy`.
use std::fmt::Write as _;

use chrono::NaiveDate;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::calendar::CalendarDate;

/// Errors produced while converting between text and dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    /// The text does not match the pattern or names a non-existent day.
    #[error("`{text}` does not match date pattern `{pattern}`")]
    Unparsable {
        /// The rejected input.
        text: String,
        /// The pattern it was checked against.
        pattern: String,
    },
    /// The date cannot be written with the pattern.
    #[error("{date} cannot be represented by date pattern `{pattern}`")]
    OutOfRange {
        /// The date that failed to format.
        date: CalendarDate,
        /// The pattern in use.
        pattern: String,
    },
    /// The pattern itself is malformed.
    #[error("invalid date pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Converts dates to and from the text shown in the picker's field.
pub trait DateFormat: Send + Sync {
    /// Parses user text into a date.
    fn parse(&self, text: &str) -> Result<CalendarDate, DateFormatError>;

    /// Formats a date for display.
    fn format(&self, date: CalendarDate) -> Result<String, DateFormatError>;
}

const FOUR_DIGIT_YEARS: std::ops::RangeInclusive<i32> = 0..=9_999;
const TWO_DIGIT_YEARS: std::ops::RangeInclusive<i32> = 1969..=2068;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year4,
    Year2,
    Month,
    Month2,
    MonthShort,
    MonthLong,
    Day,
    Day2,
    WeekdayShort,
    WeekdayLong,
}

impl Field {
    fn from_run(letter: char, len: usize) -> Option<Self> {
        match (letter, len) {
            ('y', 4) => Some(Field::Year4),
            ('y', 2) => Some(Field::Year2),
            ('M', 1) => Some(Field::Month),
            ('M', 2) => Some(Field::Month2),
            ('M', 3) => Some(Field::MonthShort),
            ('M', 4) => Some(Field::MonthLong),
            ('d', 1) => Some(Field::Day),
            ('d', 2) => Some(Field::Day2),
            ('E', 1..=3) => Some(Field::WeekdayShort),
            ('E', 4) => Some(Field::WeekdayLong),
            _ => None,
        }
    }

    fn chrono_specifier(self) -> &'static str {
        match self {
            Field::Year4 => "%Y",
            Field::Year2 => "%y",
            Field::Month => "%-m",
            Field::Month2 => "%m",
            Field::MonthShort => "%b",
            Field::MonthLong => "%B",
            Field::Day => "%-d",
            Field::Day2 => "%d",
            Field::WeekdayShort => "%a",
            Field::WeekdayLong => "%A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Field),
    Literal(char),
}

/// A [`DateFormat`] driven by a `yyyy/MM/dd`-style pattern.
///
/// Supported fields: `yyyy`, `yy`, `M`, `MM`, `MMM`, `MMMM`, `d`, `dd`,
/// `E`..`EEE` and `EEEE`. Any non-letter character is matched literally;
/// text wrapped in single quotes is literal too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDateFormat {
    pattern: String,
    tokens: SmallVec<[Token; 8]>,
    format_string: String,
    parse_string: String,
}

impl PatternDateFormat {
    /// The pattern used when none is configured.
    pub const DEFAULT_PATTERN: &'static str = "yyyy/MM/dd";

    /// Compiles `pattern`.
    pub fn new(pattern: impl Into<String>) -> Result<Self, DateFormatError> {
        let pattern = pattern.into();
        let tokens = tokenize(&pattern)?;
        if !tokens.iter().any(|t| matches!(t, Token::Field(Field::Year4 | Field::Year2))) {
            return Err(invalid(&pattern, "pattern has no year field"));
        }
        if !tokens.iter().any(|t| {
            matches!(
                t,
                Token::Field(Field::Month | Field::Month2 | Field::MonthShort | Field::MonthLong)
            )
        }) {
            return Err(invalid(&pattern, "pattern has no month field"));
        }
        if !tokens.iter().any(|t| matches!(t, Token::Field(Field::Day | Field::Day2))) {
            return Err(invalid(&pattern, "pattern has no day field"));
        }
        Ok(Self::from_tokens(pattern, tokens))
    }

    fn from_tokens(pattern: String, tokens: SmallVec<[Token; 8]>) -> Self {
        let mut format_string = String::new();
        let mut parse_string = String::new();
        for token in &tokens {
            match token {
                Token::Field(field) => {
                    format_string.push_str(field.chrono_specifier());
                    // chrono's parser already accepts one or two digits for
                    // numeric fields, so padding flags only matter on output.
                    parse_string.push_str(match field {
                        Field::Month => "%m",
                        Field::Day => "%d",
                        other => other.chrono_specifier(),
                    });
                }
                Token::Literal('%') => {
                    format_string.push_str("%%");
                    parse_string.push_str("%%");
                }
                Token::Literal(c) => {
                    format_string.push(*c);
                    parse_string.push(*c);
                }
            }
        }

        Self {
            pattern,
            tokens,
            format_string,
            parse_string,
        }
    }

    /// ISO-8601 `yyyy-MM-dd`.
    pub fn iso() -> Self {
        Self::numeric_ymd("yyyy-MM-dd", '-')
    }

    /// Returns the pattern this format was built from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `yyyy<sep>MM<sep>dd`, built without going through the tokenizer.
    fn numeric_ymd(pattern: &'static str, separator: char) -> Self {
        Self::from_tokens(
            pattern.to_string(),
            smallvec![
                Token::Field(Field::Year4),
                Token::Literal(separator),
                Token::Field(Field::Month2),
                Token::Literal(separator),
                Token::Field(Field::Day2),
            ],
        )
    }

    fn has_field(&self, field: Field) -> bool {
        self.tokens.iter().any(|t| *t == Token::Field(field))
    }

    /// Whether `year` can be written and read back unchanged.
    fn can_represent_year(&self, year: i32) -> bool {
        if self.has_field(Field::Year4) && !FOUR_DIGIT_YEARS.contains(&year) {
            return false;
        }
        // Two-digit years parse back into a fixed century window.
        !self.has_field(Field::Year2) || TWO_DIGIT_YEARS.contains(&year)
    }

    fn unparsable(&self, text: &str) -> DateFormatError {
        DateFormatError::Unparsable {
            text: text.to_string(),
            pattern: self.pattern.clone(),
        }
    }
}

impl Default for PatternDateFormat {
    fn default() -> Self {
        Self::numeric_ymd(Self::DEFAULT_PATTERN, '/')
    }
}

impl DateFormat for PatternDateFormat {
    fn parse(&self, text: &str) -> Result<CalendarDate, DateFormatError> {
        if text.is_empty() {
            return Err(self.unparsable(text));
        }
        let date = NaiveDate::parse_from_str(text, &self.parse_string)
            .map_err(|_| self.unparsable(text))?;
        let date = CalendarDate::from_naive(date);
        if !self.can_represent_year(date.year()) {
            return Err(self.unparsable(text));
        }
        Ok(date)
    }

    fn format(&self, date: CalendarDate) -> Result<String, DateFormatError> {
        if !self.can_represent_year(date.year()) {
            return Err(DateFormatError::OutOfRange {
                date,
                pattern: self.pattern.clone(),
            });
        }
        let mut out = String::new();
        write!(out, "{}", date.as_naive().format(&self.format_string)).map_err(|_| {
            DateFormatError::OutOfRange {
                date,
                pattern: self.pattern.clone(),
            }
        })?;
        Ok(out)
    }
}

fn invalid(pattern: &str, reason: impl Into<String>) -> DateFormatError {
    DateFormatError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn tokenize(pattern: &str) -> Result<SmallVec<[Token; 8]>, DateFormatError> {
    let mut tokens = SmallVec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            let mut closed = false;
            for quoted in chars.by_ref() {
                if quoted == '\'' {
                    closed = true;
                    break;
                }
                tokens.push(Token::Literal(quoted));
            }
            if !closed {
                return Err(invalid(pattern, "unterminated quote"));
            }
            continue;
        }
        if !c.is_ascii_alphabetic() {
            tokens.push(Token::Literal(c));
            continue;
        }
        let mut len = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            len += 1;
        }
        let field = Field::from_run(c, len).ok_or_else(|| {
            invalid(pattern, format!("unsupported field `{}`", c.to_string().repeat(len)))
        })?;
        tokens.push(Token::Field(field));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u8, day: u8) -> CalendarDate {
        CalendarDate::new(year, month, day).unwrap()
    }

    #[test]
    fn default_pattern_round_trips_text() {
        let format = PatternDateFormat::default();
        assert_eq!(format.pattern(), "yyyy/MM/dd");
        assert_eq!(format.format(date(2024, 6, 20)).unwrap(), "2024/06/20");
        assert_eq!(format.parse("2024/06/20").unwrap(), date(2024, 6, 20));
    }

    #[test]
    fn parse_rejects_garbage_and_impossible_days() {
        let format = PatternDateFormat::default();
        assert!(matches!(
            format.parse("not a date"),
            Err(DateFormatError::Unparsable { .. })
        ));
        assert!(format.parse("2023/02/29").is_err());
        assert!(format.parse("2024/06/20 extra").is_err());
        assert!(format.parse("").is_err());
    }

    #[test]
    fn single_letter_fields_are_unpadded() {
        let format = PatternDateFormat::new("d.M.yyyy").unwrap();
        assert_eq!(format.format(date(2024, 3, 7)).unwrap(), "7.3.2024");
        assert_eq!(format.parse("7.3.2024").unwrap(), date(2024, 3, 7));
        assert_eq!(format.parse("07.03.2024").unwrap(), date(2024, 3, 7));
    }

    #[test]
    fn named_month_and_weekday_fields() {
        let format = PatternDateFormat::new("EEE, d MMM yyyy").unwrap();
        assert_eq!(format.format(date(2024, 2, 29)).unwrap(), "Thu, 29 Feb 2024");
        assert_eq!(format.parse("Thu, 29 Feb 2024").unwrap(), date(2024, 2, 29));
        let long = PatternDateFormat::new("MMMM d, yyyy").unwrap();
        assert_eq!(long.format(date(2024, 6, 1)).unwrap(), "June 1, 2024");
    }

    #[test]
    fn quoted_text_is_literal() {
        let format = PatternDateFormat::new("'day' dd 'of' MM/yyyy").unwrap();
        assert_eq!(format.format(date(2024, 6, 5)).unwrap(), "day 05 of 06/2024");
    }

    #[test]
    fn four_digit_year_cannot_format_far_dates() {
        let format = PatternDateFormat::iso();
        let far = date(12_024, 1, 1);
        assert!(matches!(
            format.format(far),
            Err(DateFormatError::OutOfRange { .. })
        ));
        assert!(format.format(date(9_999, 12, 31)).is_ok());
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(
            PatternDateFormat::new("yyyyy/MM/dd"),
            Err(DateFormatError::InvalidPattern { .. })
        ));
        assert!(PatternDateFormat::new("MM/dd").is_err());
        assert!(PatternDateFormat::new("yyyy/MM").is_err());
        assert!(PatternDateFormat::new("yyyy/MM/dd 'open").is_err());
        assert!(PatternDateFormat::new("yyyy/MM/dd HH").is_err());
    }

    #[test]
    fn percent_sign_is_escaped() {
        let format = PatternDateFormat::new("yyyy%MM%dd").unwrap();
        assert_eq!(format.format(date(2024, 1, 2)).unwrap(), "2024%01%02");
        assert_eq!(format.parse("2024%01%02").unwrap(), date(2024, 1, 2));
    }

    #[test]
    fn two_digit_year_only_formats_what_it_reads_back() {
        let format = PatternDateFormat::new("dd/MM/yy").unwrap();
        let recent = date(2024, 3, 1);
        let text = format.format(recent).unwrap();
        assert_eq!(text, "01/03/24");
        assert_eq!(format.parse(&text).unwrap(), recent);
        assert_eq!(format.parse("01/03/69").unwrap(), date(1969, 3, 1));
        assert_eq!(format.parse("31/12/68").unwrap(), date(2068, 12, 31));

        assert!(matches!(
            format.format(date(1950, 3, 1)),
            Err(DateFormatError::OutOfRange { .. })
        ));
        assert!(format.format(date(2069, 1, 1)).is_err());
    }

    #[test]
    fn built_in_formats_match_their_patterns() {
        assert_eq!(
            PatternDateFormat::default(),
            PatternDateFormat::new(PatternDateFormat::DEFAULT_PATTERN).unwrap()
        );
        assert_eq!(
            PatternDateFormat::iso(),
            PatternDateFormat::new("yyyy-MM-dd").unwrap()
        );
    }
}
