//! Fixed unit conversions from the provider's metric values to display units.

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * 0.621371
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm / 25.4
}

/// Round to `places` decimals, halves away from zero.
///
/// On exact halves this can differ from `{:.N}` formatting, which rounds
/// half to even (`round_to(10.25, 1)` is 10.3, `format!("{:.1}", 10.25)` is "10.2").
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
