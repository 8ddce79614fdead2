//! Travel allowance calculation.

use rust_decimal::Decimal;

use crate::error::EngineResult;

use super::rounding::{checked_add, checked_mul, require_non_negative, round_currency};

/// Returns `round(car_km * car_rate) + round(bike_km * bike_rate)`.
///
/// Each vehicle's amount is rounded on its own before the two are added.
/// Rounding the sum instead gives different totals for fractional rates and
/// would not match the amounts employees see per vehicle.
///
/// # Examples
///
/// ```
/// use field_payroll::calculation::travel_allowance;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let ta = travel_allowance(
///     Decimal::from(10),
///     Decimal::from(10),
///     Decimal::from_str("2.25").unwrap(),
///     Decimal::from_str("1.75").unwrap(),
/// )
/// .unwrap();
/// assert_eq!(ta, Decimal::from(41));
/// ```
pub fn travel_allowance(
    car_km: Decimal,
    bike_km: Decimal,
    car_rate: Decimal,
    bike_rate: Decimal,
) -> EngineResult<Decimal> {
    let car_km = require_non_negative("car_km", car_km)?;
    let bike_km = require_non_negative("bike_km", bike_km)?;
    let car_rate = require_non_negative("car_rate", car_rate)?;
    let bike_rate = require_non_negative("bike_rate", bike_rate)?;

    let car = round_currency(checked_mul("car_km", car_km, car_rate)?);
    let bike = round_currency(checked_mul("bike_km", bike_km, bike_rate)?);
    checked_add("travel_allowance", car, bike)
}
