//! Fixed-point decimal types for wad, ray and rad quantities
//!
//! The source protocol stores every quantity as an integer with an implied
//! number of fractional digits:
//! - wad: 18 digits (balances, collateral and debt deltas)
//! - ray: 27 digits (rates, ratios, price factors)
//! - rad: 45 digits (debt ceilings and stablecoin totals, `wad × ray`)
//!
//! `Decimal` carries an arbitrary-precision mantissa together with its own
//! scale, so conversions from all three units, sums and products are exact.
//! Only division rounds, truncating toward zero at [`DIVISION_SCALE`] digits.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::NumericError;

/// Fractional digits kept by [`Decimal::checked_div`].
pub const DIVISION_SCALE: u32 = 45;

/// Implied-decimal scale of a raw protocol integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    /// 18 fractional digits
    Wad,
    /// 27 fractional digits
    Ray,
    /// 45 fractional digits
    Rad,
}

impl Scale {
    /// Number of implied fractional digits.
    pub const fn digits(self) -> u32 {
        match self {
            Scale::Wad => 18,
            Scale::Ray => 27,
            Scale::Rad => 45,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scale::Wad => "wad",
            Scale::Ray => "ray",
            Scale::Rad => "rad",
        }
    }
}

fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Arbitrary-precision decimal value.
///
/// The mantissa never carries trailing decimal zeros while `scale > 0`, so
/// two values are equal exactly when their representations are equal.
#[derive(Clone, PartialEq, Eq)]
pub struct Decimal {
    digits: BigInt,
    scale: u32,
}

impl Decimal {
    /// Build `digits / 10^scale`.
    pub fn new(digits: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            digits: digits.into(),
            scale,
        }
        .normalized()
    }

    pub fn zero() -> Self {
        Self {
            digits: BigInt::zero(),
            scale: 0,
        }
    }

    pub fn one() -> Self {
        Self::from(1i64)
    }

    /// Interpret a raw signed protocol integer at the given scale.
    pub fn from_raw(raw: &BigInt, scale: Scale) -> Self {
        Self::new(raw.clone(), scale.digits())
    }

    /// Interpret a raw unsigned protocol integer at the given scale.
    pub fn from_raw_unsigned(raw: &BigUint, scale: Scale) -> Self {
        Self::new(BigInt::from_biguint(Sign::Plus, raw.clone()), scale.digits())
    }

    /// Plain integer with no implied fractional digits (durations, counters).
    pub fn from_biguint(raw: &BigUint) -> Self {
        Self::new(BigInt::from_biguint(Sign::Plus, raw.clone()), 0)
    }

    pub fn from_wad(raw: &BigInt) -> Self {
        Self::from_raw(raw, Scale::Wad)
    }

    pub fn from_ray(raw: &BigInt) -> Self {
        Self::from_raw(raw, Scale::Ray)
    }

    pub fn from_rad(raw: &BigInt) -> Self {
        Self::from_raw(raw, Scale::Rad)
    }

    /// Re-encode as a raw protocol integer at the given scale.
    ///
    /// Exact for any value decoded at the same or a coarser scale; digits
    /// finer than the target scale are truncated toward zero.
    pub fn to_raw(&self, scale: Scale) -> BigInt {
        let target = scale.digits();
        if self.scale <= target {
            &self.digits * pow10(target - self.scale)
        } else {
            &self.digits / pow10(self.scale - target)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.digits.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.digits.is_positive()
    }

    pub fn abs(&self) -> Self {
        Self {
            digits: self.digits.abs(),
            scale: self.scale,
        }
    }

    /// Number of fractional digits in the normalized representation.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Divide, returning `None` when `rhs` is zero.
    ///
    /// The quotient keeps [`DIVISION_SCALE`] fractional digits, truncated
    /// toward zero.
    pub fn checked_div(&self, rhs: &Decimal) -> Option<Decimal> {
        if rhs.is_zero() {
            return None;
        }
        // (a / 10^sa) / (b / 10^sb) scaled by 10^P == a * 10^(sb + P) / (b * 10^sa)
        let numerator = &self.digits * pow10(rhs.scale + DIVISION_SCALE);
        let denominator = &rhs.digits * pow10(self.scale);
        Some(Self::new(numerator / denominator, DIVISION_SCALE))
    }

    /// Clamp to an upper bound.
    pub fn min_with(self, cap: &Decimal) -> Decimal {
        if &self > cap {
            cap.clone()
        } else {
            self
        }
    }

    fn normalized(mut self) -> Self {
        if self.digits.is_zero() {
            self.scale = 0;
            return self;
        }
        let ten = BigInt::from(10u8);
        while self.scale > 0 && (&self.digits % &ten).is_zero() {
            self.digits /= &ten;
            self.scale -= 1;
        }
        self
    }

    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        let a = &self.digits * pow10(scale - self.scale);
        let b = &other.digits * pow10(scale - other.scale);
        (a, b, scale)
    }
}

/// Express a wad amount as rad by multiplying with a ray-scaled rate.
///
/// The product of an 18-digit and a 27-digit value fits exactly in 45 digits.
pub fn wad_to_rad(wad: &Decimal, rate: &Decimal) -> Decimal {
    wad * rate
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::new(value, 0)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self::new(value, 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::new(value, 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

// ── Arithmetic ──────────────────────────────────────────────────────

impl<'a> Add<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    fn add(self, rhs: &'a Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(rhs);
        Decimal::new(a + b, scale)
    }
}

impl<'a> Sub<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &'a Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(rhs);
        Decimal::new(a - b, scale)
    }
}

impl<'a> Mul<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &'a Decimal) -> Decimal {
        Decimal::new(&self.digits * &rhs.digits, self.scale + rhs.scale)
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<Decimal> for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a Decimal> for Decimal {
            type Output = Decimal;

            fn $method(self, rhs: &'a Decimal) -> Decimal {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<Decimal> for &'a Decimal {
            type Output = Decimal;

            fn $method(self, rhs: Decimal) -> Decimal {
                self.$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

impl<'a> AddAssign<&'a Decimal> for Decimal {
    fn add_assign(&mut self, rhs: &'a Decimal) {
        *self = &*self + rhs;
    }
}

impl<'a> SubAssign<&'a Decimal> for Decimal {
    fn sub_assign(&mut self, rhs: &'a Decimal) {
        *self = &*self - rhs;
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal {
            digits: -self.digits,
            scale: self.scale,
        }
    }
}

impl<'a> Neg for &'a Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -(self.clone())
    }
}

// ── Text form ───────────────────────────────────────────────────────

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.digits.abs().to_string();
        let sign = if self.digits.is_negative() { "-" } else { "" };
        if self.scale == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }
        let scale = self.scale as usize;
        let padded = if magnitude.len() <= scale {
            format!("{}{}", "0".repeat(scale - magnitude.len() + 1), magnitude)
        } else {
            magnitude
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

impl FromStr for Decimal {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NumericError::InvalidDecimal(s.to_string());
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let joined = format!("{}{}", int_part, frac_part);
        let magnitude = BigInt::from_str(&joined).map_err(|_| invalid())?;
        let digits = if negative { -magnitude } else { magnitude };
        Ok(Decimal::new(digits, frac_part.len() as u32))
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Decimal::from_str(&text).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_scale() -> impl Strategy<Value = Scale> {
        prop_oneof![Just(Scale::Wad), Just(Scale::Ray), Just(Scale::Rad)]
    }

    proptest! {
        #[test]
        fn prop_raw_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..40), scale in any_scale()) {
            let raw = BigInt::from_signed_bytes_be(&bytes);
            let value = Decimal::from_raw(&raw, scale);
            prop_assert_eq!(value.to_raw(scale), raw);
        }

        #[test]
        fn prop_text_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..32), scale in any_scale()) {
            let value = Decimal::from_raw(&BigInt::from_signed_bytes_be(&bytes), scale);
            let parsed = Decimal::from_str(&value.to_string()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prop_add_then_sub_is_identity(a in any::<i64>(), b in any::<i64>()) {
            let x = Decimal::from_wad(&BigInt::from(a));
            let y = Decimal::from_ray(&BigInt::from(b));
            prop_assert_eq!(&(&x + &y) - &y, x);
        }
    }
}
