use crate::config::{AppConfig, Labels, MapView};
use crate::error::Result;
use crate::loader;
use crate::outline;
use crate::reports;
use crate::types::{
    DatasetTotals, LegendEntry, LoadReport, MapMarker, PreparedDataset, ProvinceSummaryRow,
    ZoneSummaryRow,
};
use crate::zones;
use geojson::FeatureCollection;
use serde::Serialize;
use tracing::warn;

/// Everything the presentation layer needs to draw the page.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub labels: Labels,
    pub totals: DatasetTotals,
    pub load_report: LoadReport,
    pub zone_summary: Vec<ZoneSummaryRow>,
    pub zone_summary_max: u64,
    pub province_summary: Vec<ProvinceSummaryRow>,
    pub province_summary_max: u64,
    pub markers: Vec<MapMarker>,
    pub legend: Vec<LegendEntry>,
    pub map: MapView,
    pub outline: Option<FeatureCollection>,
}

/// prepare -> bucket -> aggregate, with no I/O.
pub fn assemble(data: &PreparedDataset, config: &AppConfig) -> Dashboard {
    let markers = reports::build_markers(&data.records);
    let zone_summary = reports::summarize_by_zone(&data.records);
    let province_summary = reports::summarize_by_province(&data.records);

    Dashboard {
        labels: config.labels.clone(),
        totals: data.totals,
        load_report: data.report,
        zone_summary_max: reports::max_clients(zone_summary.iter().map(|r| r.client_count)),
        province_summary_max: reports::max_clients(
            province_summary.iter().map(|r| r.client_count),
        ),
        zone_summary,
        province_summary,
        markers,
        legend: zones::legend(),
        map: config.map.clone(),
        outline: None,
    }
}

/// Full run: cached load, assembly, then the best-effort outline overlay.
/// Only source errors are returned; an outline failure is logged and the
/// dashboard comes back without it.
pub fn build_dashboard(config: &AppConfig) -> Result<Dashboard> {
    let data = loader::load_cached(&config.source, &config.columns)?;
    let mut dashboard = assemble(&data, config);

    if let Some(url) = config.outline_url() {
        match outline::fetch_outline(url, config.outline_timeout()) {
            Ok(fc) => dashboard.outline = Some(fc),
            Err(e) if !e.is_fatal() => warn!(error = %e, "Continuing without country outline"),
            Err(e) => return Err(e),
        }
    }

    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MacroZone;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(dir: &tempfile::TempDir, body: &str, outline_url: &str) -> AppConfig {
        let source = dir.path().join("dataset_zonas.csv");
        fs::write(&source, body).unwrap();
        AppConfig {
            source,
            outline_url: outline_url.to_string(),
            outline_timeout_secs: 2,
            ..AppConfig::default()
        }
    }

    const BODY: &str = "ZONA DEL PERU;NÚMERO DE CLIENTES;FACTURACIÓN USD 2025;LATITUD;LONGITUD\n\
LIMA;120;50000;-12.0;-77.0\n\
CENTRO ANDINO;40;8000;-9.9;-76.0\n\
X;;1000;-5.0;-80.0\n";

    #[test]
    fn end_to_end_without_outline() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir, BODY, "");
        let dashboard = build_dashboard(&config).unwrap();

        assert_eq!(dashboard.totals.total_clients, 160);
        assert_eq!(dashboard.totals.total_revenue, 59_000.0);
        assert_eq!(dashboard.totals.row_count, 3);
        assert_eq!(dashboard.zone_summary[0].macro_zone, MacroZone::Lima);
        assert_eq!(dashboard.zone_summary[1].macro_zone, MacroZone::Centro);
        assert_eq!(dashboard.zone_summary[2].macro_zone, MacroZone::Otro);
        assert_eq!(dashboard.zone_summary_max, 120);
        assert_eq!(dashboard.province_summary_max, 120);
        assert_eq!(dashboard.markers.len(), 3);
        assert_eq!(dashboard.markers[2].bucket, None);
        assert_eq!(dashboard.legend.len(), 5);
        assert!(dashboard.outline.is_none());
    }

    #[test]
    fn outline_failure_does_not_halt() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir, BODY, "http://127.0.0.1:9/peru.geojson");
        let dashboard = build_dashboard(&config).unwrap();
        assert!(dashboard.outline.is_none());
        assert_eq!(dashboard.markers.len(), 3);
    }

    #[test]
    fn source_errors_halt_the_pipeline() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir, "ZONA DEL PERU;LATITUD\nLIMA;-12.0\n", "");
        assert!(build_dashboard(&config).unwrap_err().is_fatal());
    }

    #[test]
    fn empty_dataset_still_assembles() {
        let data = PreparedDataset {
            records: vec![],
            totals: DatasetTotals::default(),
            report: LoadReport::default(),
        };
        let dashboard = assemble(&data, &AppConfig::default());
        assert!(dashboard.zone_summary.is_empty());
        assert!(dashboard.province_summary.is_empty());
        assert_eq!(dashboard.zone_summary_max, 1);
        assert_eq!(dashboard.province_summary_max, 1);
    }

    #[test]
    fn dashboard_serializes_for_presentation() {
        let dir = tempdir().unwrap();
        let config = config_for(&dir, BODY, "");
        let dashboard = build_dashboard(&config).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["zone_summary"][0]["ZONA_PRINCIPAL"], "LIMA");
        assert_eq!(json["zone_summary"][0]["Facturación (USD)"], "$ 50K");
        assert_eq!(json["markers"][0]["bucket"], "101-200 clientes");
        assert_eq!(json["markers"][0]["color"], "#fef08a");
        assert!(json["outline"].is_null());
    }
}
