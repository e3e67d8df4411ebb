use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Cannot read or write '{path}': {source}")]
    FileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {message}")]
    ParseError { path: String, message: String },

    #[error("Malformed record for country '{country}': field '{field}' {reason}")]
    MalformedRecordError {
        country: String,
        field: String,
        reason: String,
    },

    #[error("Reference country '{reference}' not found in the dataset")]
    ReferenceNotFoundError { reference: String },

    #[error("Reference country '{reference}' has unusable cost of living index {value}")]
    InvalidReferenceError { reference: String, value: f64 },

    #[error("No data: '{path}' contains no country records")]
    EmptyDatasetError { path: String },

    #[error("Nothing to render: no country matched between records and boundaries")]
    NothingToRenderError,

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid configuration value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parse,
    DataIntegrity,
    Render,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        MapError::FileError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::FileError { .. } => ErrorCategory::Io,
            MapError::ParseError { .. } => ErrorCategory::Parse,
            MapError::MalformedRecordError { .. }
            | MapError::ReferenceNotFoundError { .. }
            | MapError::InvalidReferenceError { .. }
            | MapError::EmptyDatasetError { .. } => ErrorCategory::DataIntegrity,
            MapError::NothingToRenderError
            | MapError::RenderError { .. }
            | MapError::CsvError(_)
            | MapError::SerializationError(_) => ErrorCategory::Render,
            MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. }
            | MapError::ConfigValidationError { .. } => ErrorCategory::Config,
        }
    }

    /// 所有錯誤都會中止執行，嚴重程度只決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Config | ErrorCategory::Parse => ErrorSeverity::Medium,
            ErrorCategory::DataIntegrity | ErrorCategory::Render => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MapError::FileError { path, .. } => {
                format!("Check that '{}' exists and is readable/writable", path)
            }
            MapError::ParseError { path, .. } => {
                format!("Fix the syntax of '{}' (expected a mapping of country records or a GeoJSON FeatureCollection)", path)
            }
            MapError::MalformedRecordError { country, field, .. } => {
                format!("Add a numeric '{}' value for '{}' in the data file", field, country)
            }
            MapError::ReferenceNotFoundError { reference } => format!(
                "Add '{}' to the data file or choose another reference country",
                reference
            ),
            MapError::InvalidReferenceError { reference, .. } => format!(
                "Give '{}' a positive cost_living_index or choose another reference country",
                reference
            ),
            MapError::EmptyDatasetError { path } => {
                format!("Add at least one country record to '{}'", path)
            }
            MapError::NothingToRenderError => {
                "Make sure country names in the data file match the boundary NAME property exactly"
                    .to_string()
            }
            MapError::RenderError { .. }
            | MapError::CsvError(_)
            | MapError::SerializationError(_) => {
                "Re-run with --verbose and report the failing country".to_string()
            }
            MapError::InvalidConfigValueError { field, .. }
            | MapError::MissingConfigError { field }
            | MapError::ConfigValidationError { field, .. } => {
                format!("Review the '{}' setting", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Parse => format!("Input could not be parsed: {}", self),
            ErrorCategory::DataIntegrity => format!("Input data is inconsistent: {}", self),
            ErrorCategory::Render => format!("Map could not be rendered: {}", self),
            ErrorCategory::Config => format!("Configuration is invalid: {}", self),
        }
    }

    /// 依嚴重程度對應的非零退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
