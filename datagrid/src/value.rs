//! Cell values extracted from rows by column accessors.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used when displaying date-time cells.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single cell value.
///
/// Column accessors return one of these for every row. The value drives both
/// sorting and the global filter; what is shown on screen can be customized
/// separately with a column renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Boolean value, displayed as `Yes`/`No`.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Number(f64),
    /// Free text.
    Text(String),
    /// Date and time without a timezone.
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Returns `true` for [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Compare two values for sorting.
    ///
    /// This is a total order over every value. Empty sorts first, then values
    /// are grouped by kind (bool, number, text, date-time) and compared
    /// naturally within a kind. Integers and floats are one kind and compare
    /// exactly; NaN sorts after every other number.
    ///
    /// Columns mixing kinds are turned into text before sorting, see
    /// [`CellValue::as_sort_text`].
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => compare_floats(*a, *b),
            (Self::Integer(a), Self::Number(b)) => compare_int_float(*a, *b),
            (Self::Number(a), Self::Integer(b)) => compare_int_float(*b, *a).reverse(),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Sort kind; integers and floats share one.
    pub(crate) fn kind_rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Number(_) => 2,
            Self::Text(_) => 3,
            Self::DateTime(_) => 4,
        }
    }

    /// The value as display text for sorting a mixed-kind column. Empty
    /// stays empty.
    pub fn as_sort_text(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Text(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Lower-cased display text, as matched by the global filter.
    pub fn search_text(&self) -> String {
        self.to_string().to_lowercase()
    }
}

/// Float order with NaN after every number.
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact integer to float comparison, without rounding the integer.
fn compare_int_float(a: i64, b: f64) -> Ordering {
    // 2^63; i64 covers [-2^63, 2^63)
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if b.is_nan() || b >= LIMIT {
        return Ordering::Less;
    }
    if b < -LIMIT {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(b - whole)).unwrap_or(Ordering::Equal),
        ord => ord,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => f.write_str(if *b { "Yes" } else { "No" }),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATE_TIME_FORMAT)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
