use crate::error::Result;
use crate::pipeline::Dashboard;
use crate::util::{format_int, format_usd};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

/// Sidebar metrics, e.g. `Total Clientes: 1,234 (56 registros/provincias)`.
pub fn metric_lines(dashboard: &Dashboard) -> Vec<String> {
    let labels = &dashboard.labels;
    vec![
        format!(
            "{}: {} ({} registros/provincias)",
            labels.clients_metric,
            format_int(dashboard.totals.total_clients),
            dashboard.totals.row_count
        ),
        format!(
            "{}: {}",
            labels.revenue_metric,
            format_usd(dashboard.totals.total_revenue)
        ),
    ]
}

/// Console rendition of the sidebar: metrics, both summaries and the legend.
pub fn print_sidebar(dashboard: &Dashboard, max_rows: usize) {
    println!("{}\n", dashboard.labels.title);
    for line in metric_lines(dashboard) {
        println!("{}", line);
    }
    if dashboard.load_report.dropped_rows > 0 {
        println!(
            "Note: {} rows skipped due to missing coordinates or revenue.",
            format_int(dashboard.load_report.dropped_rows)
        );
    }
    println!("");

    println!("Resumen por Zona Principal\n");
    println!("{}\n", render_table(&dashboard.zone_summary, max_rows));

    println!("Detalle por Provincia\n");
    println!("{}\n", render_table(&dashboard.province_summary, max_rows));

    println!("Leyenda");
    for entry in &dashboard.legend {
        println!("  {}  {}", entry.color, entry.bucket);
    }
    println!("");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::loader::{compute_totals, prepare_row};
    use crate::pipeline::assemble;
    use crate::types::{LoadReport, PreparedDataset, RawRow, ZoneSummaryRow};
    use tempfile::tempdir;

    fn dashboard() -> Dashboard {
        let rows = [
            ("LIMA", "1200", "1500000", "-12.0", "-77.0"),
            ("Costa Sur", "45", "2300", "-16.4", "-71.5"),
        ];
        let records: Vec<_> = rows
            .iter()
            .filter_map(|(z, c, r, lat, lon)| {
                prepare_row(RawRow {
                    zone: Some(z.to_string()),
                    clients: Some(c.to_string()),
                    revenue: Some(r.to_string()),
                    latitude: Some(lat.to_string()),
                    longitude: Some(lon.to_string()),
                })
            })
            .collect();
        let data = PreparedDataset {
            totals: compute_totals(&records),
            report: LoadReport::default(),
            records,
        };
        assemble(&data, &AppConfig::default())
    }

    #[test]
    fn metrics_use_grouping_and_compact_revenue() {
        let lines = metric_lines(&dashboard());
        assert_eq!(lines[0], "Total Clientes: 1,245 (2 registros/provincias)");
        assert_eq!(lines[1], "Total Facturación (USD) ENE-SET 2025: $ 1.5M");
    }

    #[test]
    fn tables_render_as_markdown() {
        let d = dashboard();
        let table = render_table(&d.zone_summary, 10);
        assert!(table.contains("ZONA_PRINCIPAL"));
        assert!(table.contains("LIMA"));
        assert!(!table.contains("revenue"));
        assert_eq!(render_table::<ZoneSummaryRow>(&[], 10), "(no rows)");
    }

    #[test]
    fn writes_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        write_json(&path, &dashboard()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["totals"]["total_clients"], 1245);
        assert_eq!(value["province_summary"][1]["ZONA DEL PERU"], "Costa Sur");
    }
}
