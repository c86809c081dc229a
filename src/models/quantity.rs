//! Quantity type for crypto and fiat amounts
//!
//! Internally stores amounts as atoms of 10^-8 units (i64), the same
//! precision as a satoshi, so parsing and display never go through floats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits a quantity can carry
pub const DECIMALS: u32 = 8;

const SCALE: i64 = 10i64.pow(DECIMALS);

/// Currencies displayed with exactly two decimals
const FIAT: [&str; 7] = ["USD", "EUR", "GBP", "USDT", "USDC", "BUSD", "DAI"];

/// A fixed-point amount with eight fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Create a quantity from raw atoms (10^-8 units)
    ///
    /// # Examples
    /// ```
    /// use coinlog::models::Quantity;
    /// let half = Quantity::from_atoms(50_000_000);
    /// assert_eq!(half.to_string(), "0.5");
    /// ```
    pub const fn from_atoms(atoms: i64) -> Self {
        Self(atoms)
    }

    /// Create a quantity from a whole number of units
    pub const fn from_units(units: i64) -> Self {
        Self(units * SCALE)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn atoms(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse a plain decimal string such as `"0.5"`, `"-12"`, `".25"`
    ///
    /// Digits beyond the eighth decimal place are truncated.
    pub fn parse(s: &str) -> Result<Self, QuantityParseError> {
        let invalid = || QuantityParseError::InvalidFormat(s.to_string());
        let trimmed = s.trim();

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| QuantityParseError::Overflow(s.to_string()))?
        };

        let mut frac: i64 = 0;
        for (i, digit) in frac_part.bytes().take(DECIMALS as usize).enumerate() {
            frac += i64::from(digit - b'0') * 10i64.pow(DECIMALS - 1 - i as u32);
        }

        let atoms = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| QuantityParseError::Overflow(s.to_string()))?;

        Ok(Self(if negative { -atoms } else { atoms }))
    }

    /// Lenient parse used for imported cells
    ///
    /// Drops every character except digits, `.` and `-`, then reads the
    /// longest leading number (`100.00-` gives 100, `1.2.3` gives 1.2) and
    /// returns its magnitude. `None` when no digits lead the cleaned text.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        let number = leading_number(&cleaned)?;
        Self::parse(number).ok().map(|q| q.abs())
    }

    /// Human-friendly rendering that depends on the currency
    ///
    /// Fiat and stablecoins get two decimals, amounts of one or more get two
    /// to four, and smaller amounts up to eight. Thousands are grouped.
    pub fn format_for(&self, currency: &str) -> String {
        let is_fiat = FIAT.contains(&currency.trim().to_ascii_uppercase().as_str());
        if is_fiat {
            self.format_decimals(2, 2)
        } else if self.abs().0 >= SCALE {
            self.format_decimals(2, 4)
        } else {
            self.format_decimals(2, 8)
        }
    }

    fn format_decimals(&self, min: u32, max: u32) -> String {
        let factor = 10i64.pow(DECIMALS - max);
        let magnitude = self.0.unsigned_abs() as u128;
        let rounded = (magnitude + factor as u128 / 2) / factor as u128;
        let unit = 10u128.pow(max);

        let whole = group_thousands(&(rounded / unit).to_string());
        let mut frac = format!("{:0width$}", rounded % unit, width = max as usize);
        while frac.len() > min as usize && frac.ends_with('0') {
            frac.pop();
        }

        let sign = if self.0 < 0 && rounded != 0 { "-" } else { "" };
        if frac.is_empty() {
            format!("{}{}", sign, whole)
        } else {
            format!("{}{}.{}", sign, whole, frac)
        }
    }
}

/// Longest `-?digits[.digits]` prefix, requiring at least one digit
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    (digits > 0).then(|| &s[..end])
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

/// Plain decimal form with trailing zeros trimmed, e.g. `21500` or `0.25`
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / SCALE as u64;
        let frac = magnitude % SCALE as u64;
        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let frac = format!("{:08}", frac);
        write!(f, "{}{}.{}", sign, whole, frac.trim_end_matches('0'))
    }
}

/// Error type for quantity parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityParseError {
    InvalidFormat(String),
    Overflow(String),
}

impl fmt::Display for QuantityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
            QuantityParseError::Overflow(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for QuantityParseError {}
