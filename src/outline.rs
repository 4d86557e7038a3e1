// Country outline overlay, fetched over HTTP as GeoJSON.
//
// The overlay is best-effort: callers downgrade any error from here to a
// warning and render without it.
use crate::error::{DashboardError, Result};
use geojson::{FeatureCollection, GeoJson};
use std::time::Duration;
use tracing::info;

pub fn fetch_outline(url: &str, timeout: Duration) -> Result<FeatureCollection> {
    let failed = |reason: String| DashboardError::OutlineFetchFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| failed(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| failed(e.to_string()))?;
    let body = response.text().map_err(|e| failed(e.to_string()))?;

    let outline = parse_outline(&body).map_err(|e| match e {
        DashboardError::OutlineFetchFailed { reason, .. } => failed(reason),
        other => other,
    })?;
    info!(url, features = outline.features.len(), "Loaded outline");
    Ok(outline)
}

/// Only a FeatureCollection is accepted; the geometries inside are passed
/// through to the map untouched.
pub fn parse_outline(payload: &str) -> Result<FeatureCollection> {
    let invalid = |reason: String| DashboardError::OutlineFetchFailed {
        url: String::new(),
        reason,
    };
    match payload.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(fc)) => Ok(fc),
        Ok(GeoJson::Feature(_)) => Err(invalid("expected a FeatureCollection, got a Feature".into())),
        Ok(GeoJson::Geometry(_)) => Err(invalid("expected a FeatureCollection, got a Geometry".into())),
        Err(e) => Err(invalid(e.to_string())),
    }
}
