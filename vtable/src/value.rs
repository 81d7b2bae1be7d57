use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use core::cmp::Ordering;

use crate::RowKey;

/// A borrowed view of one cell value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// String conversion used by search and advanced filters. `1.0` renders as `"1"`.
    ///
    /// Returns `None` for `Null`: an absent value never matches a text predicate.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match *self {
            Self::Null => None,
            Self::Bool(v) => Some(Cow::Borrowed(if v { "true" } else { "false" })),
            Self::Int(v) => Some(Cow::Owned(format!("{v}"))),
            Self::Float(v) => Some(Cow::Owned(format!("{v}"))),
            Self::Text(s) => Some(Cow::Borrowed(s)),
        }
    }

    /// Lowercased string form, `None` for `Null`.
    pub fn to_lowercase(&self) -> Option<String> {
        self.to_text().map(|s| s.to_lowercase())
    }

    /// Total order used by the sort stage.
    ///
    /// Numbers compare numerically (ints and floats mix), text compares by code point, and values
    /// of different kinds order as `Null < Bool < number < Text`.
    pub fn sort_cmp(&self, other: &Value<'_>) -> Ordering {
        match (self, other) {
            (Self::Text(a), Value::Text(b)) => a.cmp(b),
            (Self::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Self::Int(a), Value::Int(b)) => a.cmp(b),
            _ if self.is_number() && other.is_number() => {
                let a = self.as_f64().unwrap_or_default();
                let b = other.as_f64().unwrap_or_default();
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Whether this value equals a raw filter option, comparing in the value's own type.
    ///
    /// Numeric cells parse the option as a number; everything else compares string forms.
    pub fn matches_option(&self, option: &str) -> bool {
        match *self {
            Self::Null => false,
            Self::Int(v) => match option.trim().parse::<i64>() {
                Ok(o) => o == v,
                Err(_) => option.trim().parse::<f64>().is_ok_and(|o| o == v as f64),
            },
            Self::Float(v) => option.trim().parse::<f64>().is_ok_and(|o| o == v),
            _ => self.to_text().is_some_and(|s| s == option),
        }
    }

    pub fn to_row_key(&self) -> Option<RowKey> {
        match *self {
            Self::Null => None,
            Self::Int(v) => Some(RowKey::Num(v)),
            Self::Text(s) => Some(RowKey::Str(String::from(s))),
            _ => self.to_text().map(|s| RowKey::Str(s.into_owned())),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(v)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(v: &'a String) -> Self {
        Self::Text(v.as_str())
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A row the table can filter and sort: exposes its cells by column key.
///
/// Unknown column keys should return [`Value::Null`].
pub trait Record {
    fn field(&self, column: &str) -> Value<'_>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, column: &str) -> Value<'_> {
        (**self).field(column)
    }
}

impl<R: Record + ?Sized> Record for alloc::boxed::Box<R> {
    fn field(&self, column: &str) -> Value<'_> {
        (**self).field(column)
    }
}

impl<R: Record + ?Sized> Record for alloc::sync::Arc<R> {
    fn field(&self, column: &str) -> Value<'_> {
        (**self).field(column)
    }
}
