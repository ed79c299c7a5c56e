use thiserror::Error;

#[derive(Error, Debug)]
pub enum RmspError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid impact count '{value}' at point '{point}', layer {layer}")]
    InvalidImpactError {
        point: String,
        layer: String,
        value: String,
    },

    #[error("Unknown layer '{layer}' at point '{point}'")]
    UnknownLayerError { point: String, layer: String },

    #[error("Invalid condition '{value}' at point '{point}', layer {layer}: {reason}")]
    InvalidConditionError {
        point: String,
        layer: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate reading for point '{point}', layer {layer}{condition}")]
    DuplicateReadingError {
        point: String,
        layer: String,
        condition: String,
    },

    #[error("{count} sampling points found, at most {max} allowed")]
    TooManyPointsError { count: usize, max: usize },

    #[error("No usable readings: {message}")]
    EmptyInputError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RmspError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RmspError::ConfigError { .. }
            | RmspError::ConfigValidationError { .. }
            | RmspError::InvalidConfigValueError { .. }
            | RmspError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RmspError::InvalidImpactError { .. }
            | RmspError::UnknownLayerError { .. }
            | RmspError::InvalidConditionError { .. }
            | RmspError::DuplicateReadingError { .. }
            | RmspError::TooManyPointsError { .. }
            | RmspError::EmptyInputError { .. }
            | RmspError::CsvError(_) => ErrorCategory::Input,
            RmspError::ProcessingError { .. } | RmspError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            RmspError::ZipError(_) | RmspError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者可修正輸入後重試
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binaries; `0` means the run may still count as done.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RmspError::InvalidImpactError { layer, .. } => format!(
                "Enter a whole, non-negative number of impacts for layer {}",
                layer
            ),
            RmspError::UnknownLayerError { .. } => {
                "Use one of the configured layer labels (e.g. 0-5, 5-10) or adjust the layer list"
                    .to_string()
            }
            RmspError::InvalidConditionError { .. } => {
                "Fill the condition column with before/after in comparison mode and leave it empty in profile mode"
                    .to_string()
            }
            RmspError::DuplicateReadingError { .. } => {
                "Keep a single impact count per point and layer".to_string()
            }
            RmspError::TooManyPointsError { max, .. } => format!(
                "Split the survey into batches of at most {} points or raise max_points",
                max
            ),
            RmspError::EmptyInputError { .. } => {
                "Check that the input file has a header and at least one reading".to_string()
            }
            RmspError::CsvError(_) => {
                "Check the CSV header: point,layer,impacts with an optional condition column"
                    .to_string()
            }
            RmspError::ConfigError { .. }
            | RmspError::ConfigValidationError { .. }
            | RmspError::InvalidConfigValueError { .. }
            | RmspError::MissingConfigError { .. } => {
                "Review the configuration file or command line flags".to_string()
            }
            RmspError::IoError(_) | RmspError::ZipError(_) => {
                "Check that the input exists and the output directory is writable".to_string()
            }
            RmspError::SerializationError(_) | RmspError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input data: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Processing => format!("Report could not be computed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RmspError>;
