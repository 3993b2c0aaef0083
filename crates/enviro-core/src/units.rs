//! Unit conversions applied to raw sensor values.

/// Convert a temperature from Celsius to Fahrenheit.
pub fn to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Round to two decimal places, half away from zero.
///
/// Goes through an integer number of centi-units so it works without
/// `std` or libm.
pub fn round2(value: f32) -> f32 {
    let scaled = value * 100.0;
    let nearest = if scaled >= 0.0 {
        (scaled + 0.5) as i64
    } else {
        (scaled - 0.5) as i64
    };
    nearest as f32 / 100.0
}

/// Convert a gas channel resistance from ohms to kilo-ohms.
pub fn ohms_to_kilohms(ohms: f32) -> f32 {
    ohms / 1000.0
}
