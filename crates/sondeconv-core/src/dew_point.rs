use crate::error::DomainError;

const MAGNUS_A: f64 = 17.625;
const MAGNUS_B_C: f64 = 243.04;
const SATURATION_PRESSURE_0C_HPA: f64 = 6.112;

/// Saturation vapor pressure over water, hPa.
pub fn saturation_vapor_pressure(temperature_c: f64) -> f64 {
    SATURATION_PRESSURE_0C_HPA * ((MAGNUS_A * temperature_c) / (MAGNUS_B_C + temperature_c)).exp()
}

/// Dew point in °C from the Tetens/Magnus approximation.
///
/// `pressure_hpa` is accepted so callers can pass the full sonde reading, but
/// the approximation has no pressure term and no compensation is applied.
///
/// Humidity must lie in `0..=100`. Exactly 0% fails with
/// [`DomainError::ZeroHumidity`] since the inverted formula takes the
/// logarithm of the vapor pressure.
pub fn dew_point(
    _pressure_hpa: f64,
    temperature_c: f64,
    relative_humidity_pct: f64,
) -> Result<f64, DomainError> {
    if !(0.0..=100.0).contains(&relative_humidity_pct) {
        return Err(DomainError::HumidityOutOfRange(relative_humidity_pct));
    }
    if relative_humidity_pct == 0.0 {
        return Err(DomainError::ZeroHumidity);
    }

    let es = saturation_vapor_pressure(temperature_c);
    let e = es * (relative_humidity_pct / 100.0);
    let gamma = (e / SATURATION_PRESSURE_0C_HPA).ln();
    let dew_point = MAGNUS_B_C * gamma / (MAGNUS_A - gamma);

    if dew_point.is_finite() {
        Ok(dew_point)
    } else {
        Err(DomainError::NonFinite {
            temperature: temperature_c,
            relative_humidity: relative_humidity_pct,
        })
    }
}
