use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How `.` and `,` inside a number are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecimalConvention {
    /// Both are thousands separators; amounts are whole units.
    #[default]
    None,
    /// A trailing `,dd` is a decimal part (e.g. `50.000,00`).
    Comma,
    /// A trailing `.dd` is a decimal part (e.g. `50,000.00`).
    Dot,
}

impl DecimalConvention {
    pub fn decimal_separator(self) -> Option<char> {
        match self {
            DecimalConvention::None => None,
            DecimalConvention::Comma => Some(','),
            DecimalConvention::Dot => Some('.'),
        }
    }
}

impl fmt::Display for DecimalConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalConvention::None => write!(f, "none"),
            DecimalConvention::Comma => write!(f, "comma"),
            DecimalConvention::Dot => write!(f, "dot"),
        }
    }
}

impl FromStr for DecimalConvention {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DecimalConvention::None),
            "comma" => Ok(DecimalConvention::Comma),
            "dot" => Ok(DecimalConvention::Dot),
            other => Err(format!("Unknown decimal convention: '{other}'")),
        }
    }
}

/// Component order for dates whose first component is not a four-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DateOrder {
    #[default]
    Dmy,
    Mdy,
    Ymd,
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrder::Dmy => write!(f, "DMY"),
            DateOrder::Mdy => write!(f, "MDY"),
            DateOrder::Ymd => write!(f, "YMD"),
        }
    }
}

impl FromStr for DateOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DMY" => Ok(DateOrder::Dmy),
            "MDY" => Ok(DateOrder::Mdy),
            "YMD" => Ok(DateOrder::Ymd),
            other => Err(format!("Unknown date order: '{other}'")),
        }
    }
}

/// Locale assumptions and bounds used by the receipt field extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub decimal_convention: DecimalConvention,
    pub date_order: DateOrder,
    /// Lines containing any of these (case-insensitive) are never the merchant.
    pub merchant_stopwords: Vec<String>,
    /// Exclusive lower bound for an amount candidate.
    pub min_amount: u64,
    /// Exclusive upper bound for an amount candidate.
    pub max_amount: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            decimal_convention: DecimalConvention::None,
            date_order: DateOrder::Dmy,
            merchant_stopwords: ["Total", "Amount", "Rp", "IDR"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_amount: 100,
            max_amount: 100_000_000,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_amount >= self.max_amount {
            return Err(ConfigError::Invalid(format!(
                "min_amount ({}) must be below max_amount ({})",
                self.min_amount, self.max_amount
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Images larger than this on either side are downscaled before OCR.
    pub max_image_side: u32,
    /// Root of the content-addressed receipt image store. Unset disables storage.
    pub store_dir: Option<PathBuf>,
    pub tesseract_lang: String,
    pub tesseract_data_path: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_image_side: 2800,
            store_dir: None,
            tesseract_lang: "eng".to_string(),
            tesseract_data_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrukConfig {
    pub extraction: ExtractionConfig,
    pub scan: ScanConfig,
}

impl StrukConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: StrukConfig = toml::from_str(toml_content)?;
        config.extraction.validate()?;
        if config.scan.max_image_side == 0 {
            return Err(ConfigError::Invalid("max_image_side must be positive".into()));
        }
        Ok(config)
    }

    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_yields_defaults() {
        let c = StrukConfig::from_toml("").unwrap();
        assert_eq!(c, StrukConfig::default());
        assert_eq!(c.extraction.merchant_stopwords, vec!["Total", "Amount", "Rp", "IDR"]);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let c = StrukConfig::from_toml(
            r#"
            [extraction]
            date_order = "MDY"
            decimal_convention = "comma"
            "#,
        )
        .unwrap();
        assert_eq!(c.extraction.date_order, DateOrder::Mdy);
        assert_eq!(c.extraction.decimal_convention, DecimalConvention::Comma);
        assert_eq!(c.extraction.max_amount, 100_000_000);
        assert_eq!(c.scan.max_image_side, 2800);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = StrukConfig::from_toml("[extraction]\nmin_amount = 500\nmax_amount = 500\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_date_order() {
        let err = StrukConfig::from_toml("[extraction]\ndate_order = \"DYM\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let mut c = StrukConfig::default();
        c.scan.store_dir = Some(PathBuf::from("/tmp/receipts"));
        c.extraction.date_order = DateOrder::Ymd;
        let text = c.to_toml().unwrap();
        assert_eq!(StrukConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(StrukConfig::load(None).unwrap(), StrukConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("struk.toml");
        std::fs::write(&path, "[scan]\ntesseract_lang = \"ind\"\n").unwrap();
        let c = StrukConfig::load(Some(&path)).unwrap();
        assert_eq!(c.scan.tesseract_lang, "ind");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StrukConfig::load(Some(Path::new("/nonexistent/struk.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn enum_from_str() {
        assert_eq!("dmy".parse::<DateOrder>().unwrap(), DateOrder::Dmy);
        assert_eq!("Dot".parse::<DecimalConvention>().unwrap(), DecimalConvention::Dot);
        assert!("ydm".parse::<DateOrder>().is_err());
    }
}
