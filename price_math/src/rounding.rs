//! Decimal rounding for prices

use num_traits::Float;

/// Round `value` to `decimals` places, exact halves to the even neighbour.
///
/// Ties are broken the way dataset tooling rounds (banker's rounding), so
/// averaged quarter prices such as `101.125` become `101.12`. Non-finite
/// values are returned unchanged.
///
/// # Examples
///
/// ```
/// use price_math::round_to;
///
/// assert_eq!(round_to(101.2857_f64, 2), 101.29);
/// assert_eq!(round_to(-3.14159_f64, 3), -3.142);
/// assert_eq!(round_to(101.125_f64, 2), 101.12);
/// ```
pub fn round_to<T: Float>(value: T, decimals: i32) -> T {
    if !value.is_finite() {
        return value;
    }

    let ten = T::from(10.0).unwrap_or_else(T::one);
    let factor = ten.powi(decimals);
    round_half_even(value * factor) / factor
}

/// Round to cents, the precision every price leaves the system with.
pub fn round2<T: Float>(value: T) -> T {
    round_to(value, 2)
}

fn round_half_even<T: Float>(scaled: T) -> T {
    let two = T::one() + T::one();
    let half = T::one() / two;

    if (scaled - scaled.trunc()).abs() == half {
        (scaled / two).round() * two
    } else {
        scaled.round()
    }
}
