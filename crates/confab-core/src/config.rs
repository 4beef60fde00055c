use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A calendar listed under the item-listing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSource {
    /// Opaque calendar identifier under the item-listing API
    pub calendar_api_id: String,

    /// Display name used for provenance and reporting
    pub name: String,
}

/// One configured upstream source, either a discovery slug or a calendar id.
///
/// Variants carry everything the source client needs to page through the
/// corresponding endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Slug { slug: String },
    Calendar { calendar_api_id: String, name: String },
}

impl SourceRef {
    /// Human-readable label used for provenance, logging, and reporting.
    pub fn label(&self) -> &str {
        match self {
            SourceRef::Slug { slug } => slug,
            SourceRef::Calendar { name, .. } => name,
        }
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Geographic bounding box applied to every upstream page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for GeoBounds {
    fn default() -> Self {
        // San Francisco Bay Area
        Self {
            north: 37.96737772066783,
            south: 36.71845574708184,
            east: -121.57055455494474,
            west: -122.7412517581312,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourcesConfig {
    /// Slugs fetched through the discovery endpoint
    #[serde(default)]
    pub slugs: Vec<String>,

    /// Calendars fetched through the item-listing endpoint
    #[serde(default)]
    pub calendars: Vec<CalendarSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the snapshot documents are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("aggregated")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TravelConfig {
    /// Explicit origin for distance lookups; IP detection is used when absent
    #[serde(default)]
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// IANA time zone used for date/weekday filtering unless overridden
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Upstream sources to aggregate
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Bounding box passed to the upstream endpoints
    #[serde(default)]
    pub bounds: GeoBounds,

    /// Snapshot output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Travel enrichment settings
    #[serde(default)]
    pub travel: TravelConfig,

    /// Filter defaults
    #[serde(default)]
    pub filter: FilterConfig,
}

/// File names of the two snapshot documents.
pub const COMBINED_EVENTS_FILE: &str = "combined_events.json";
pub const CITY_SUMMARY_FILE: &str = "city_summary.json";

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.source_refs().is_empty() {
            result.add_warning("sources", "No sources configured; aggregation will be empty");
        }

        for (i, slug) in self.sources.slugs.iter().enumerate() {
            if slug.trim().is_empty() {
                result.add_error(format!("sources.slugs[{}]", i), "Slug must not be empty");
            }
        }

        for (i, cal) in self.sources.calendars.iter().enumerate() {
            if cal.calendar_api_id.trim().is_empty() {
                result.add_error(
                    format!("sources.calendars[{}].calendar_api_id", i),
                    "Calendar API id must not be empty",
                );
            }
            if cal.name.trim().is_empty() {
                result.add_error(
                    format!("sources.calendars[{}].name", i),
                    "Calendar name must not be empty",
                );
            }
        }

        let b = &self.bounds;
        if !(b.north.is_finite() && b.south.is_finite() && b.east.is_finite() && b.west.is_finite())
        {
            result.add_error("bounds", "Bounding box coordinates must be finite");
        } else {
            if b.north <= b.south {
                result.add_error("bounds", "North latitude must be greater than south");
            }
            if b.north > 90.0 || b.south < -90.0 {
                result.add_error("bounds", "Latitudes must be within [-90, 90]");
            }
            if b.east.abs() > 180.0 || b.west.abs() > 180.0 {
                result.add_error("bounds", "Longitudes must be within [-180, 180]");
            }
        }

        if self.filter.timezone.parse::<chrono_tz::Tz>().is_err() {
            result.add_error(
                "filter.timezone",
                format!("Unknown IANA time zone: {}", self.filter.timezone),
            );
        }

        result
    }

    /// Flatten the configured sources into ordered descriptors.
    ///
    /// Slugs come first, then calendars, each in configuration order; the
    /// aggregator concatenates per-source results in this order.
    pub fn source_refs(&self) -> Vec<SourceRef> {
        let mut refs = Vec::with_capacity(self.sources.slugs.len() + self.sources.calendars.len());
        for slug in &self.sources.slugs {
            refs.push(SourceRef::Slug { slug: slug.clone() });
        }
        for cal in &self.sources.calendars {
            refs.push(SourceRef::Calendar {
                calendar_api_id: cal.calendar_api_id.clone(),
                name: cal.name.clone(),
            });
        }
        refs
    }

    /// Path of the combined-events snapshot under the configured output dir.
    pub fn combined_events_path(&self) -> PathBuf {
        self.output.dir.join(COMBINED_EVENTS_FILE)
    }

    /// Path of the city-summary snapshot under the configured output dir.
    pub fn city_summary_path(&self) -> PathBuf {
        self.output.dir.join(CITY_SUMMARY_FILE)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("confab");

        Ok(config_dir.join("config.toml"))
    }
}
