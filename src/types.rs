use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// One CSV row exactly as read, before any coercion. Fields the row does not
/// carry (short rows) are `None`.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub zone: Option<String>,
    pub clients: Option<String>,
    pub revenue: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MacroZone {
    Lima,
    Centro,
    Norte,
    Sur,
    Oriente,
    Otro,
}

impl MacroZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacroZone::Lima => "LIMA",
            MacroZone::Centro => "CENTRO",
            MacroZone::Norte => "NORTE",
            MacroZone::Sur => "SUR",
            MacroZone::Oriente => "ORIENTE",
            MacroZone::Otro => "OTRO",
        }
    }
}

impl fmt::Display for MacroZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-count range used to colour map markers and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    UpTo50,
    UpTo100,
    UpTo200,
    UpTo500,
    Over500,
}

impl Bucket {
    /// Legend order, lowest range first.
    pub const ALL: [Bucket; 5] = [
        Bucket::UpTo50,
        Bucket::UpTo100,
        Bucket::UpTo200,
        Bucket::UpTo500,
        Bucket::Over500,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::UpTo50 => "1-50 clientes",
            Bucket::UpTo100 => "51-100 clientes",
            Bucket::UpTo200 => "101-200 clientes",
            Bucket::UpTo500 => "201-500 clientes",
            Bucket::Over500 => "501+ clientes",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Bucket::UpTo50 => "#bbf7d0",
            Bucket::UpTo100 => "#d9f99d",
            Bucket::UpTo200 => "#fef08a",
            Bucket::UpTo500 => "#fed7aa",
            Bucket::Over500 => "#fecaca",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Bucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A validated row. Latitude, longitude and revenue are always present;
/// `macro_zone` and `revenue_display` are derived from the other fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRecord {
    pub zone_label: String,
    pub client_count: Option<u64>,
    pub revenue: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub macro_zone: MacroZone,
    pub revenue_display: String,
}

impl PreparedRecord {
    /// Client count as it enters sums: a missing count contributes nothing.
    pub fn clients(&self) -> u64 {
        self.client_count.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DatasetTotals {
    pub total_clients: u64,
    pub total_revenue: f64,
    pub row_count: usize,
}

/// Row accounting for a single load, so excluded rows are never silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub retained_rows: usize,
    pub dropped_rows: usize,
    pub missing_client_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    pub records: Vec<PreparedRecord>,
    pub totals: DatasetTotals,
    pub report: LoadReport,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ZoneSummaryRow {
    #[serde(rename = "ZONA_PRINCIPAL")]
    #[tabled(rename = "ZONA_PRINCIPAL")]
    pub macro_zone: MacroZone,
    #[serde(rename = "Clientes")]
    #[tabled(rename = "Clientes")]
    pub client_count: u64,
    #[serde(skip)]
    #[tabled(skip)]
    pub revenue: f64,
    #[serde(rename = "Facturación (USD)")]
    #[tabled(rename = "Facturación (USD)")]
    pub revenue_display: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ProvinceSummaryRow {
    #[serde(rename = "ZONA DEL PERU")]
    #[tabled(rename = "ZONA DEL PERU")]
    pub zone_label: String,
    #[serde(rename = "Clientes")]
    #[tabled(rename = "Clientes")]
    pub client_count: u64,
    #[serde(rename = "Facturación (USD)")]
    #[tabled(rename = "Facturación (USD)")]
    pub revenue_display: String,
}

/// A prepared record with its bucket and colour, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub zone_label: String,
    pub macro_zone: MacroZone,
    pub client_count: Option<u64>,
    pub revenue: f64,
    pub revenue_display: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bucket: Option<Bucket>,
    pub color: Option<&'static str>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub bucket: Bucket,
    pub color: &'static str,
}
