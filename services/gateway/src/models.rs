use serde::Deserialize;

use crate::error::AppError;

/// Form body of `POST /vehicle/{id}`
///
/// Fields stay raw strings so that missing or malformed values are reported
/// by the handler rather than rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePositionForm {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl UpdatePositionForm {
    /// Parse `(lat, lon)` as decimal degrees.
    pub fn coordinates(&self) -> Result<(f64, f64), AppError> {
        let lat = parse_coordinate("lat", self.lat.as_deref())?;
        let lon = parse_coordinate("lon", self.lon.as_deref())?;
        Ok((lat, lon))
    }
}

fn parse_coordinate(name: &str, value: Option<&str>) -> Result<f64, AppError> {
    let value = value.ok_or_else(|| AppError::InvalidInput(format!("bad {}: missing", name)))?;
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|e| AppError::InvalidInput(format!("bad {}: {}", name, e)))?;
    if !parsed.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "bad {}: {:?} is not a finite number",
            name, value
        )));
    }
    Ok(parsed)
}
