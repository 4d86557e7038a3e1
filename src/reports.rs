use crate::types::{MacroZone, MapMarker, PreparedRecord, ProvinceSummaryRow, ZoneSummaryRow};
use crate::util::format_usd;
use crate::zones::bucket_for;
use std::collections::HashMap;

/// Client and revenue sums per macro-zone, largest client count first.
///
/// Groups appear in first-occurrence order before sorting, and the sort is
/// stable, so ties keep that order.
pub fn summarize_by_zone(data: &[PreparedRecord]) -> Vec<ZoneSummaryRow> {
    struct Acc {
        zone: MacroZone,
        clients: u64,
        revenue: f64,
    }

    let mut slots: HashMap<MacroZone, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in data {
        let idx = *slots.entry(r.macro_zone).or_insert_with(|| {
            groups.push(Acc {
                zone: r.macro_zone,
                clients: 0,
                revenue: 0.0,
            });
            groups.len() - 1
        });
        let e = &mut groups[idx];
        e.clients = e.clients.saturating_add(r.clients());
        e.revenue += r.revenue;
    }

    let mut rows: Vec<ZoneSummaryRow> = groups
        .into_iter()
        .map(|acc| ZoneSummaryRow {
            macro_zone: acc.zone,
            client_count: acc.clients,
            revenue: acc.revenue,
            revenue_display: format_usd(acc.revenue),
        })
        .collect();
    rows.sort_by(|a, b| b.client_count.cmp(&a.client_count));
    rows
}

/// One row per record, keyed by its zone label, same ordering rules as
/// `summarize_by_zone`. A missing client count shows as 0.
pub fn summarize_by_province(data: &[PreparedRecord]) -> Vec<ProvinceSummaryRow> {
    let mut rows: Vec<ProvinceSummaryRow> = data
        .iter()
        .map(|r| ProvinceSummaryRow {
            zone_label: r.zone_label.clone(),
            client_count: r.clients(),
            revenue_display: r.revenue_display.clone(),
        })
        .collect();
    rows.sort_by(|a, b| b.client_count.cmp(&a.client_count));
    rows
}

/// Upper bound for proportional bars. Never 0, so callers can divide by it.
pub fn max_clients<I>(counts: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    counts.into_iter().max().filter(|m| *m > 0).unwrap_or(1)
}

/// Attach bucket and colour to each record. Records without a client count
/// get no bucket and no colour.
pub fn build_markers(data: &[PreparedRecord]) -> Vec<MapMarker> {
    data.iter()
        .map(|r| {
            let bucket = r.client_count.map(bucket_for);
            MapMarker {
                zone_label: r.zone_label.clone(),
                macro_zone: r.macro_zone,
                client_count: r.client_count,
                revenue: r.revenue,
                revenue_display: r.revenue_display.clone(),
                latitude: r.latitude,
                longitude: r.longitude,
                bucket,
                color: bucket.map(|b| b.color()),
                text: r
                    .client_count
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            }
        })
        .collect()
}
