//! USDC amounts in minor units

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{USDC_DECIMALS, USDC_UNIT};
use crate::error::{AmountError, Result};

/// A USDC amount held as an integer count of minor units (10^-6 USDC).
///
/// This is the representation the token contract and the pension contract
/// use for every on-chain argument, so all arithmetic stays on it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Usdc(u64);

impl Usdc {
    pub const ZERO: Usdc = Usdc(0);
    pub const MAX: Usdc = Usdc(u64::MAX);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole tokens, saturating at `Usdc::MAX`
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole.saturating_mul(USDC_UNIT))
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_mul(self, factor: u64) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    pub fn saturating_sub(self, other: Usdc) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse user-entered text the way the calculator form does.
    ///
    /// Leading numeric text is used and the rest ignored, exponents included
    /// ("1e3", "5e-1"); empty, non-numeric and negative input become zero.
    /// Digits below one minor unit round up, so positive text never becomes
    /// zero and text above a bound stays above it. Oversized values saturate.
    /// Use `FormAmount::parse` when the exact value matters for a bound.
    pub fn parse_lossy(text: &str) -> Self {
        FormAmount::parse(text).rounded_up()
    }

    /// Decimal rendering with trailing zeros removed ("10900", "0.5")
    pub fn to_decimal_string(self) -> String {
        let whole = self.0 / USDC_UNIT;
        let fraction = self.0 % USDC_UNIT;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{:0width$}", fraction, width = USDC_DECIMALS as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }

    /// US dollar rendering rounded to cents ("$10,900.00")
    pub fn to_currency_string(self) -> String {
        let cents_unit = USDC_UNIT / 100;
        let cents = (u128::from(self.0) + u128::from(cents_unit / 2)) / u128::from(cents_unit);
        let dollars = (cents / 100).to_string();

        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("${}.{:02}", grouped, cents % 100)
    }
}

impl fmt::Display for Usdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} USDC", self.to_decimal_string())
    }
}

impl FromStr for Usdc {
    type Err = AmountError;

    fn from_str(text: &str) -> Result<Self> {
        let numeric = scan(text);
        if text.trim().is_empty() {
            return Err(AmountError::Empty);
        }
        if !(numeric.has_digits() || numeric.infinite) || !numeric.rest.is_empty() {
            return Err(AmountError::Invalid(text.to_string()));
        }
        if numeric.negative {
            return Err(AmountError::Negative(text.to_string()));
        }
        if numeric.infinite {
            return Err(AmountError::Overflow(text.to_string()));
        }
        match to_minor(&numeric) {
            None => Err(AmountError::Overflow(text.to_string())),
            Some((_, true)) => Err(AmountError::TooManyDecimals(text.to_string())),
            Some((minor, false)) => Ok(Self(minor)),
        }
    }
}

/// Calculator form text resolved to minor units.
///
/// `amount` is rounded down and `inexact` records that the text carried
/// digits below one minor unit, so bound checks still see `0.0000001 > 0`
/// and `1000000.0000001 > 1000000`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormAmount {
    pub amount: Usdc,
    pub inexact: bool,
}

impl FormAmount {
    pub const fn exact(amount: Usdc) -> Self {
        Self {
            amount,
            inexact: false,
        }
    }

    pub fn parse(text: &str) -> Self {
        let numeric = scan(text);
        if numeric.negative || !(numeric.has_digits() || numeric.infinite) {
            return Self::default();
        }
        if numeric.infinite {
            return Self::exact(Usdc::MAX);
        }
        match to_minor(&numeric) {
            Some((minor, inexact)) => Self {
                amount: Usdc(minor),
                inexact,
            },
            None => Self::exact(Usdc::MAX),
        }
    }

    pub fn is_positive(self) -> bool {
        !self.amount.is_zero() || self.inexact
    }

    /// Strictly greater than `bound`
    pub fn exceeds(self, bound: Usdc) -> bool {
        self.amount > bound || (self.amount == bound && self.inexact)
    }

    /// Strictly less than `bound`
    pub fn below(self, bound: Usdc) -> bool {
        self.amount < bound
    }

    pub fn rounded_up(self) -> Usdc {
        if self.inexact {
            Usdc(self.amount.0.saturating_add(1))
        } else {
            self.amount
        }
    }
}

impl From<Usdc> for FormAmount {
    fn from(amount: Usdc) -> Self {
        Self::exact(amount)
    }
}

/// Exponents past this only ever overflow or vanish
const MAX_EXPONENT: i32 = 1000;

struct Numeric<'a> {
    negative: bool,
    infinite: bool,
    whole: &'a str,
    fraction: &'a str,
    exponent: i32,
    rest: &'a str,
}

impl Numeric<'_> {
    fn has_digits(&self) -> bool {
        !self.whole.is_empty() || !self.fraction.is_empty()
    }
}

fn scan(text: &str) -> Numeric<'_> {
    let mut s = text.trim();
    let mut negative = false;
    if let Some(unsigned) = s.strip_prefix('-') {
        negative = true;
        s = unsigned;
    } else if let Some(unsigned) = s.strip_prefix('+') {
        s = unsigned;
    }

    if let Some(rest) = s.strip_prefix("Infinity") {
        return Numeric {
            negative,
            infinite: true,
            whole: "",
            fraction: "",
            exponent: 0,
            rest,
        };
    }

    let whole_len = s.bytes().take_while(u8::is_ascii_digit).count();
    let (whole, after) = s.split_at(whole_len);
    let (fraction, mut rest) = match after.strip_prefix('.') {
        Some(tail) => {
            let len = tail.bytes().take_while(u8::is_ascii_digit).count();
            tail.split_at(len)
        }
        None => ("", after),
    };

    let mut exponent = 0;
    if !whole.is_empty() || !fraction.is_empty() {
        if let Some((value, tail)) = scan_exponent(rest) {
            exponent = value;
            rest = tail;
        }
    }

    Numeric {
        negative,
        infinite: false,
        whole,
        fraction,
        exponent,
        rest,
    }
}

/// `e` or `E`, an optional sign and at least one digit
fn scan_exponent(s: &str) -> Option<(i32, &str)> {
    let tail = s.strip_prefix(|c: char| c == 'e' || c == 'E')?;
    let (negative, tail) = match tail.as_bytes().first() {
        Some(b'-') => (true, &tail[1..]),
        Some(b'+') => (false, &tail[1..]),
        _ => (false, tail),
    };
    let len = tail.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let (digits, rest) = tail.split_at(len);
    let magnitude = digits
        .bytes()
        .fold(0i32, |acc, b| {
            acc.saturating_mul(10).saturating_add(i32::from(b - b'0'))
        })
        .min(MAX_EXPONENT);
    Some((if negative { -magnitude } else { magnitude }, rest))
}

/// Scale the scanned digits to minor units, rounded down.
///
/// Returns the value and whether any non-zero digit fell below one minor
/// unit; `None` on overflow.
fn to_minor(numeric: &Numeric<'_>) -> Option<(u64, bool)> {
    let digit_count = (numeric.whole.len() + numeric.fraction.len()) as i64;
    let shift = i64::from(USDC_DECIMALS) + i64::from(numeric.exponent)
        - numeric.fraction.len() as i64;
    let kept = (digit_count + shift.min(0)).max(0) as usize;

    let mut minor = 0u64;
    let mut inexact = false;
    let digits = numeric.whole.bytes().chain(numeric.fraction.bytes());
    for (i, b) in digits.enumerate() {
        let digit = u64::from(b - b'0');
        if i < kept {
            minor = minor.checked_mul(10)?.checked_add(digit)?;
        } else if digit != 0 {
            inexact = true;
        }
    }
    for _ in 0..shift.max(0) {
        if minor == 0 {
            break;
        }
        minor = minor.checked_mul(10)?;
    }
    Some((minor, inexact))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict() {
        assert_eq!("1000".parse::<Usdc>().unwrap(), Usdc::from_whole(1000));
        assert_eq!("0.5".parse::<Usdc>().unwrap(), Usdc::from_minor(500_000));
        assert_eq!(".25".parse::<Usdc>().unwrap(), Usdc::from_minor(250_000));
        assert_eq!(" 12.000001 ".parse::<Usdc>().unwrap(), Usdc::from_minor(12_000_001));
        assert_eq!("1.5000000".parse::<Usdc>().unwrap(), Usdc::from_minor(1_500_000));
        assert_eq!("2.5e3".parse::<Usdc>().unwrap(), Usdc::from_whole(2500));
    }

    #[test]
    fn test_parse_strict_errors() {
        assert_eq!("".parse::<Usdc>(), Err(AmountError::Empty));
        assert!(matches!("-3".parse::<Usdc>(), Err(AmountError::Negative(_))));
        assert!(matches!("abc".parse::<Usdc>(), Err(AmountError::Invalid(_))));
        assert!(matches!("12abc".parse::<Usdc>(), Err(AmountError::Invalid(_))));
        assert!(matches!(".".parse::<Usdc>(), Err(AmountError::Invalid(_))));
        assert!(matches!(
            "0.0000001".parse::<Usdc>(),
            Err(AmountError::TooManyDecimals(_))
        ));
        assert!(matches!(
            "99999999999999999999".parse::<Usdc>(),
            Err(AmountError::Overflow(_))
        ));
        assert!(matches!("1e-7".parse::<Usdc>(), Err(AmountError::TooManyDecimals(_))));
        assert!(matches!("Infinity".parse::<Usdc>(), Err(AmountError::Overflow(_))));
        assert!(matches!("1e".parse::<Usdc>(), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_parse_lossy() {
        assert_eq!(Usdc::parse_lossy(""), Usdc::ZERO);
        assert_eq!(Usdc::parse_lossy("abc"), Usdc::ZERO);
        assert_eq!(Usdc::parse_lossy("-50"), Usdc::ZERO);
        assert_eq!(Usdc::parse_lossy("100abc"), Usdc::from_whole(100));
        assert_eq!(Usdc::parse_lossy("1.23456789"), Usdc::from_minor(1_234_568));
        assert_eq!(Usdc::parse_lossy("1.5000000"), Usdc::from_minor(1_500_000));
        assert_eq!(Usdc::parse_lossy("99999999999999999999"), Usdc::MAX);
        assert_eq!(Usdc::parse_lossy("Infinity"), Usdc::MAX);
        assert_eq!(Usdc::parse_lossy("-Infinity"), Usdc::ZERO);
    }

    #[test]
    fn test_parse_lossy_exponents() {
        assert_eq!(Usdc::parse_lossy("1e7"), Usdc::from_whole(10_000_000));
        assert_eq!(Usdc::parse_lossy("1E3"), Usdc::from_whole(1000));
        assert_eq!(Usdc::parse_lossy("5e-1"), Usdc::from_minor(500_000));
        assert_eq!(Usdc::parse_lossy("2.5e+2"), Usdc::from_whole(250));
        assert_eq!(Usdc::parse_lossy("1e-7"), Usdc::from_minor(1));
        assert_eq!(Usdc::parse_lossy("1e400"), Usdc::MAX);
        assert_eq!(Usdc::parse_lossy("0e400"), Usdc::ZERO);
        // No exponent digits: the 'e' is trailing text
        assert_eq!(Usdc::parse_lossy("12e"), Usdc::from_whole(12));
        assert_eq!(Usdc::parse_lossy("12e+x"), Usdc::from_whole(12));
        assert_eq!(Usdc::parse_lossy("e5"), Usdc::ZERO);
    }

    #[test]
    fn test_form_amount_keeps_sub_minor_digits() {
        let tiny = FormAmount::parse("0.0000001");
        assert_eq!(tiny.amount, Usdc::ZERO);
        assert!(tiny.inexact);
        assert!(tiny.is_positive());
        assert_eq!(tiny.rounded_up(), Usdc::from_minor(1));

        let over = FormAmount::parse("1000000.0000001");
        assert_eq!(over.amount, Usdc::from_whole(1_000_000));
        assert!(over.exceeds(Usdc::from_whole(1_000_000)));

        let under = FormAmount::parse("0.9999999");
        assert!(under.below(Usdc::from_whole(1)));
        assert_eq!(under.rounded_up(), Usdc::from_whole(1));

        let exact = FormAmount::parse("1000000.0000000");
        assert!(!exact.inexact);
        assert!(!exact.exceeds(Usdc::from_whole(1_000_000)));

        assert!(!FormAmount::parse("").is_positive());
        assert!(!FormAmount::parse("-0.0000001").is_positive());
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Usdc::from_whole(10_900).to_decimal_string(), "10900");
        assert_eq!(Usdc::from_minor(500_000).to_decimal_string(), "0.5");
        assert_eq!(Usdc::from_minor(1).to_decimal_string(), "0.000001");
        assert_eq!(Usdc::ZERO.to_decimal_string(), "0");
        assert_eq!(Usdc::from_whole(11_990).to_string(), "11990 USDC");
    }

    #[test]
    fn test_currency_string() {
        assert_eq!(Usdc::from_whole(10_900).to_currency_string(), "$10,900.00");
        assert_eq!(Usdc::from_minor(1_234_567_890).to_currency_string(), "$1,234.57");
        assert_eq!(Usdc::from_minor(5_000).to_currency_string(), "$0.01");
        assert_eq!(Usdc::ZERO.to_currency_string(), "$0.00");
        assert_eq!(Usdc::from_whole(999).to_currency_string(), "$999.00");
    }

    #[test]
    fn test_serde_is_minor_units() {
        let json = serde_json::to_string(&Usdc::from_whole(2)).unwrap();
        assert_eq!(json, "2000000");
        let back: Usdc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Usdc::from_whole(2));
    }
}
