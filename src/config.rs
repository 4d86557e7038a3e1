// Runtime configuration.
//
// Every field has a built-in default so the dashboard runs without any
// configuration file. An optional `mapa_clientes.toml` next to the binary's
// working directory can override individual values.
use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "mapa_clientes.toml";

pub const COL_ZONA: &str = "ZONA DEL PERU";
pub const COL_CLIENTES: &str = "NÚMERO DE CLIENTES";
pub const COL_FACTURACION: &str = "FACTURACIÓN USD 2025";
pub const COL_LAT: &str = "LATITUD";
pub const COL_LNG: &str = "LONGITUD";

pub const DEFAULT_SOURCE: &str = "dataset_zonas.csv";
pub const DEFAULT_OUTLINE_URL: &str =
    "https://raw.githubusercontent.com/juaneladio/peru-geojson/master/peru_departamental_simple.geojson";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub source: PathBuf,
    /// An empty URL disables the country outline overlay.
    pub outline_url: String,
    pub outline_timeout_secs: u64,
    pub output: PathBuf,
    pub columns: ColumnNames,
    pub map: MapView,
    pub labels: Labels,
}

/// Header names looked up in the source CSV. Columns are matched by name,
/// never by position.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct ColumnNames {
    pub zone: String,
    pub clients: String,
    pub revenue: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    pub size_max: u32,
    pub opacity: f64,
    pub outline_color: String,
    pub outline_width: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub clients_metric: String,
    pub revenue_metric: String,
    pub caption: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source: PathBuf::from(DEFAULT_SOURCE),
            outline_url: DEFAULT_OUTLINE_URL.to_string(),
            outline_timeout_secs: 10,
            output: PathBuf::from("dashboard.json"),
            columns: ColumnNames::default(),
            map: MapView::default(),
            labels: Labels::default(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            zone: COL_ZONA.to_string(),
            clients: COL_CLIENTES.to_string(),
            revenue: COL_FACTURACION.to_string(),
            latitude: COL_LAT.to_string(),
            longitude: COL_LNG.to_string(),
        }
    }
}

impl Default for MapView {
    fn default() -> Self {
        MapView {
            center_lat: -10.0,
            center_lon: -76.0,
            zoom: 4.8,
            size_max: 50,
            opacity: 0.7,
            outline_color: "#9C9C9C".to_string(),
            outline_width: 1.0,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            title: "Clientes del Canal Operador".to_string(),
            clients_metric: "Total Clientes".to_string(),
            revenue_metric: "Total Facturación (USD) ENE-SET 2025".to_string(),
            caption: "Distribución geográfica por Zona / Provincia (Datos del CSV)".to_string(),
        }
    }
}

impl ColumnNames {
    /// Required columns in the order they are reported in schema errors.
    pub fn required(&self) -> [&str; 5] {
        [
            self.zone.as_str(),
            self.clients.as_str(),
            self.revenue.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DashboardError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| DashboardError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load `mapa_clientes.toml` when present, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn outline_url(&self) -> Option<&str> {
        let url = self.outline_url.trim();
        (!url.is_empty()).then_some(url)
    }

    pub fn outline_timeout(&self) -> Duration {
        Duration::from_secs(self.outline_timeout_secs)
    }
}
