// Parts of the API shape follow the cosmwasm-std `Decimal` type, which is licensed under the
// Apache License 2.0 - https://github.com/CosmWasm/cosmwasm.

#![no_std]
#![allow(clippy::assign_op_pattern)]

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer used for intermediate products only.
    pub struct U256(4);
}

/// Computes `a * b / denominator` with a 256-bit intermediate product.
///
/// The quotient is truncated toward zero. Returns `None` when `denominator` is zero or when the
/// quotient does not fit back into 128 bits.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    if a == 0 || b == 0 {
        return Some(0);
    }
    let quotient = U256::from(a).checked_mul(U256::from(b))? / U256::from(denominator);
    if quotient > U256::from(u128::MAX) {
        return None;
    }
    Some(quotient.low_u128())
}

/// Unsigned fixed-point number with 18 decimal places.
///
/// Reward accumulators are stored as the raw atomics of this type, i.e. already multiplied by
/// [`Decimal::PRECISION`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Decimal(u128);

impl Decimal {
    /// The number of decimal places. Since decimal types are fixed-point rather than
    /// floating-point, this is a constant.
    pub const DECIMAL_PLACES: u32 = 18;
    /// 1*10**18
    pub const PRECISION: u128 = 1_000_000_000_000_000_000u128;

    pub const fn raw(atomics: u128) -> Self {
        Self(atomics)
    }

    #[must_use]
    #[inline]
    pub const fn atomics(&self) -> u128 {
        self.0
    }

    /// `numerator / denominator`, truncated to 18 places.
    ///
    /// ```
    /// use accrual_decimal::Decimal;
    /// assert_eq!(Decimal::from_ratio(1, 4), Some(Decimal::raw(Decimal::PRECISION / 4)));
    /// assert_eq!(Decimal::from_ratio(1, 0), None);
    /// ```
    pub fn from_ratio(numerator: u128, denominator: u128) -> Option<Self> {
        mul_div(numerator, Self::PRECISION, denominator).map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `amount * self`, rounded down to a whole number of units.
    pub fn mul_floor(self, amount: u128) -> Option<u128> {
        mul_div(amount, self.0, Self::PRECISION)
    }
}
