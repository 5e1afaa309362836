//! Error types for algoviz.
//!
//! Every failure a user can trigger is an input-validation failure. Those
//! variants are *advisory*: their `Display` text is exactly the inline
//! message a front end shows, and the operation that produced them left the
//! structure in its last valid state. The remaining variants cover loading
//! configuration and writing output.

use thiserror::Error;

/// Result type alias for algoviz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Unified error type for all algoviz operations.
#[derive(Debug, Error)]
pub enum VizError {
    // ===== Advisory (user input) =====
    /// Input could not be parsed as an integer.
    #[error("Please enter a valid number")]
    InvalidNumber,

    /// Position for a positional insert is missing, negative or non-numeric.
    #[error("Please enter valid numbers")]
    InvalidPosition,

    /// A required text field was left empty.
    #[error("Please enter {0}")]
    MissingInput(&'static str),

    /// Traversal requested without selecting a start node.
    #[error("Please select a start node")]
    NoStartNode,

    /// Edge creation requested without both endpoints.
    #[error("Please select both source and target nodes")]
    MissingEndpoints,

    /// A node id that is not part of the graph.
    #[error("Node {0} does not exist")]
    UnknownNode(String),

    /// Edge endpoints are identical.
    #[error("Source and target nodes must be different")]
    SameEndpoints,

    /// Edge already present (in either direction).
    #[error("Edge already exists")]
    DuplicateEdge,

    /// Node id already present.
    #[error("Node {0} already exists")]
    DuplicateNode(String),

    /// Value already present in a set-like structure.
    #[error("Value {0} already exists")]
    DuplicateValue(i64),

    /// Hash table key lookup failed.
    #[error("Key {0} not found")]
    KeyNotFound(String),

    /// Value lookup failed.
    #[error("Value {0} not found")]
    ValueNotFound(i64),

    /// Open-addressing probe sequence exhausted.
    #[error("Hash table is full")]
    TableFull,

    /// Operation needs at least one element.
    #[error("{0} is empty")]
    EmptyStructure(&'static str),

    /// Manual stepping while the animation tick owns the cursor.
    #[error("Pause playback before stepping")]
    StepWhilePlaying,

    /// Seek target outside the step log.
    #[error("Step {index} is out of range (log has {len} steps)")]
    CursorOutOfRange {
        /// Requested cursor position.
        index: usize,
        /// Length of the step log.
        len: usize,
    },

    // ===== Configuration =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ===== Internal =====
    /// A structural invariant failed after an operation.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl VizError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an invariant violation error.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Check if this error is an advisory message for the user.
    ///
    /// Advisory errors are shown inline and never abort the program.
    #[must_use]
    pub const fn is_advisory(&self) -> bool {
        matches!(
            self,
            Self::InvalidNumber
                | Self::InvalidPosition
                | Self::MissingInput(_)
                | Self::NoStartNode
                | Self::MissingEndpoints
                | Self::UnknownNode(_)
                | Self::SameEndpoints
                | Self::DuplicateEdge
                | Self::DuplicateNode(_)
                | Self::DuplicateValue(_)
                | Self::KeyNotFound(_)
                | Self::ValueNotFound(_)
                | Self::TableFull
                | Self::EmptyStructure(_)
                | Self::StepWhilePlaying
                | Self::CursorOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_detection() {
        assert!(VizError::InvalidNumber.is_advisory());
        assert!(VizError::NoStartNode.is_advisory());
        assert!(VizError::TableFull.is_advisory());
        assert!(VizError::EmptyStructure("Heap").is_advisory());
        assert!(VizError::KeyNotFound("apple".to_string()).is_advisory());
        assert!(VizError::CursorOutOfRange { index: 9, len: 3 }.is_advisory());

        assert!(!VizError::config("bad").is_advisory());
        assert!(!VizError::invariant("heap order").is_advisory());
        assert!(!VizError::serialization("oops").is_advisory());
    }

    #[test]
    fn test_advisory_messages_match_ui_text() {
        assert_eq!(
            VizError::InvalidNumber.to_string(),
            "Please enter a valid number"
        );
        assert_eq!(
            VizError::NoStartNode.to_string(),
            "Please select a start node"
        );
        assert_eq!(VizError::TableFull.to_string(), "Hash table is full");
        assert_eq!(
            VizError::KeyNotFound("apple".to_string()).to_string(),
            "Key apple not found"
        );
        assert_eq!(
            VizError::DuplicateValue(50).to_string(),
            "Value 50 already exists"
        );
        assert_eq!(VizError::EmptyStructure("Tree").to_string(), "Tree is empty");
        assert_eq!(
            VizError::MissingInput("both key and value").to_string(),
            "Please enter both key and value"
        );
    }

    #[test]
    fn test_error_config() {
        let err = VizError::config("invalid parameter");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("invalid parameter"));
    }

    #[test]
    fn test_error_cursor_out_of_range_display() {
        let err = VizError::CursorOutOfRange { index: 12, len: 4 };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn test_error_from_yaml() {
        let result: Result<Vec<i64>, _> = serde_yaml::from_str("{{{{not valid yaml");
        let err: VizError = result.unwrap_err().into();
        assert!(err.to_string().contains("YAML parsing error"));
        assert!(!err.is_advisory());
    }

    #[test]
    fn test_error_from_json() {
        let result: Result<Vec<i64>, _> = serde_json::from_str("[1, 2");
        let err: VizError = result.unwrap_err().into();
        assert!(matches!(err, VizError::Serialization(_)));
    }

    #[test]
    fn test_error_io() {
        let err = VizError::from(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("I/O error"));
    }
}
