use crate::config::ColumnNames;
use crate::error::{DashboardError, Result};
use crate::types::{DatasetTotals, LoadReport, PreparedDataset, PreparedRecord, RawRow};
use crate::util::{format_usd, parse_count_safe, parse_f64_safe};
use crate::zones::classify_zone;
use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::{debug, info};

// Prepared datasets keyed by source identity. Entries are never mutated once
// inserted; a changed file produces a new key.
static CACHE: Lazy<Mutex<HashMap<SourceKey, Arc<PreparedDataset>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
    columns: ColumnNames,
}

impl SourceKey {
    /// Identity of the file behind an open handle, so the key describes the
    /// same bytes that are later read from that handle.
    fn for_file(file: &File, path: &Path, columns: &ColumnNames) -> Result<Self> {
        let meta = file.metadata().map_err(|e| malformed(path, e))?;
        let canonical = fs::canonicalize(path).map_err(|source| DashboardError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(SourceKey {
            path: canonical,
            modified: meta.modified().ok(),
            len: meta.len(),
            columns: columns.clone(),
        })
    }
}

/// Column positions of the required fields, resolved from the header row.
struct ColumnIndex {
    zone: usize,
    clients: usize,
    revenue: usize,
    latitude: usize,
    longitude: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String], columns: &ColumnNames) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = columns
            .required()
            .into_iter()
            .filter(|name| position(*name).is_none())
            .map(str::to_string)
            .collect();

        match (
            position(columns.zone.as_str()),
            position(columns.clients.as_str()),
            position(columns.revenue.as_str()),
            position(columns.latitude.as_str()),
            position(columns.longitude.as_str()),
        ) {
            (Some(zone), Some(clients), Some(revenue), Some(latitude), Some(longitude)) => {
                Ok(ColumnIndex {
                    zone,
                    clients,
                    revenue,
                    latitude,
                    longitude,
                })
            }
            _ => Err(DashboardError::SchemaError {
                required: columns.required().into_iter().map(str::to_string).collect(),
                missing,
                found: headers.to_vec(),
            }),
        }
    }

    fn raw_row(&self, record: &StringRecord) -> RawRow {
        let field = |i: usize| record.get(i).map(str::to_string);
        RawRow {
            zone: field(self.zone),
            clients: field(self.clients),
            revenue: field(self.revenue),
            latitude: field(self.latitude),
            longitude: field(self.longitude),
        }
    }
}

fn malformed(path: &Path, reason: impl ToString) -> DashboardError {
    DashboardError::MalformedSource {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read, validate and enrich the CSV at `path`.
///
/// Rows without a usable latitude, longitude or revenue are dropped and
/// counted in the returned `LoadReport`; they are not errors.
pub fn prepare(path: &Path, columns: &ColumnNames) -> Result<PreparedDataset> {
    prepare_from_reader(open_source(path)?, path, columns)
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DashboardError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })
}

fn prepare_from_reader<R: Read>(
    reader: R,
    path: &Path,
    columns: &ColumnNames,
) -> Result<PreparedDataset> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| malformed(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(malformed(path, "no header row"));
    }
    let index = ColumnIndex::resolve(&headers, columns)?;

    let mut total_rows = 0usize;
    let mut missing_client_count = 0usize;
    let mut records: Vec<PreparedRecord> = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| malformed(path, e))?;
        total_rows += 1;

        // Short rows are padded with missing values; extra fields mean the
        // delimiter or quoting is broken.
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(malformed(
                path,
                format!(
                    "line {}: expected {} fields, saw {}",
                    line,
                    headers.len(),
                    record.len()
                ),
            ));
        }

        let Some(prepared) = prepare_row(index.raw_row(&record)) else {
            continue;
        };
        if prepared.client_count.is_none() {
            missing_client_count += 1;
        }
        records.push(prepared);
    }

    let totals = compute_totals(&records);
    let report = LoadReport {
        total_rows,
        retained_rows: records.len(),
        dropped_rows: total_rows - records.len(),
        missing_client_count,
    };
    info!(
        path = %path.display(),
        total_rows = report.total_rows,
        retained = report.retained_rows,
        dropped = report.dropped_rows,
        missing_client_count = report.missing_client_count,
        "Prepared dataset"
    );

    Ok(PreparedDataset {
        records,
        totals,
        report,
    })
}

/// Coerce one raw row. `None` means the row lacks latitude, longitude or
/// revenue and must not enter the dataset.
pub fn prepare_row(row: RawRow) -> Option<PreparedRecord> {
    let latitude = parse_f64_safe(row.latitude.as_deref())?;
    let longitude = parse_f64_safe(row.longitude.as_deref())?;
    let revenue = parse_f64_safe(row.revenue.as_deref())?;

    let zone_label = row.zone.unwrap_or_default().trim().to_string();
    let macro_zone = classify_zone(&zone_label);
    Some(PreparedRecord {
        client_count: parse_count_safe(row.clients.as_deref()),
        revenue_display: format_usd(revenue),
        zone_label,
        revenue,
        latitude,
        longitude,
        macro_zone,
    })
}

pub fn compute_totals(records: &[PreparedRecord]) -> DatasetTotals {
    DatasetTotals {
        total_clients: records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.clients())),
        total_revenue: records.iter().map(|r| r.revenue).sum(),
        row_count: records.len(),
    }
}

/// Memoized `prepare`. The same unchanged file is parsed at most once per
/// process; later calls share the cached snapshot.
pub fn load_cached(path: &Path, columns: &ColumnNames) -> Result<Arc<PreparedDataset>> {
    let file = open_source(path)?;
    let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let key = SourceKey::for_file(&file, path, columns)?;
    if let Some(hit) = cache.get(&key) {
        debug!(path = %key.path.display(), "Dataset cache hit");
        return Ok(Arc::clone(hit));
    }
    debug!(path = %key.path.display(), "Dataset cache miss");
    let dataset = Arc::new(prepare_from_reader(file, path, columns)?);
    cache.insert(key, Arc::clone(&dataset));
    Ok(dataset)
}

pub fn invalidate_cache() {
    CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
