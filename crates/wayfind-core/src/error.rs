//! Typed failure taxonomy and classifier.
//!
//! Every fallible operation in this crate surfaces a [`Failure`]: an
//! immutable, kind-tagged error value carrying a message, an optional
//! structured-context map, an optional wrapped cause, and a creation
//! timestamp. Failures are created where a problem is detected and flow
//! upward unchanged; callers branch on [`FailureKind`] instead of
//! downcasting through an inheritance chain.
//!
//! [`classify`] converts arbitrary errors (IO failures, serde errors,
//! subprocess trouble) into a `Failure` using ordered first-match-wins
//! rules, and is idempotent on inputs that already are typed failures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// Result alias used throughout the engine.
pub type CoreResult<T> = std::result::Result<T, Failure>;

// ---------------------------------------------------------------------------
// Failure kind
// ---------------------------------------------------------------------------

/// The vocabulary of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Missing or invalid setup, parameters, or environment.
    Configuration,
    /// The external planner ran but produced no usable result, or crashed.
    Planning,
    /// Template or structured-data processing failed.
    Parsing,
    /// Filesystem access failure.
    FileIo,
    /// A bounded wait was exceeded.
    Timeout,
    /// Connection-level failure.
    Network,
    /// Input data failed validation.
    Validation,
    /// Fallback for anything unrecognised.
    Unknown,
}

impl FailureKind {
    /// Stable machine-readable name, used in serialized failure maps.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration_error",
            FailureKind::Planning => "planning_error",
            FailureKind::Parsing => "parsing_error",
            FailureKind::FileIo => "file_io_error",
            FailureKind::Timeout => "timeout_error",
            FailureKind::Network => "network_error",
            FailureKind::Validation => "validation_error",
            FailureKind::Unknown => "unknown_error",
        }
    }

    /// Short human-readable label for user-facing summaries.
    fn label(self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration error",
            FailureKind::Planning => "planning failed",
            FailureKind::Parsing => "parsing error",
            FailureKind::FileIo => "file I/O error",
            FailureKind::Timeout => "timed out",
            FailureKind::Network => "network error",
            FailureKind::Validation => "validation error",
            FailureKind::Unknown => "unexpected error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

/// An immutable, kind-tagged error value.
///
/// Constructed at the point of detection via the per-kind constructors
/// ([`Failure::planning`], [`Failure::configuration`], ...) and enriched
/// with [`with_detail`](Failure::with_detail) /
/// [`with_source`](Failure::with_source) before being returned. Once a
/// failure is typed it is never re-classified.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    /// Discriminant for the caller-boundary branch.
    pub kind: FailureKind,
    /// The original, full error message.
    pub message: String,
    /// Structured context supplied by the detector (command line, log
    /// path, error excerpt, ...).
    pub details: Map<String, Value>,
    /// The wrapped original cause, when the failure re-types another error.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// When this failure was constructed.
    pub timestamp: DateTime<Utc>,
}

impl Failure {
    /// Create a failure of the given kind.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Map::new(),
            source: None,
            timestamp: Utc::now(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Configuration, message)
    }

    pub fn planning(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Planning, message)
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Parsing, message)
    }

    pub fn file_io(message: impl Into<String>) -> Self {
        Self::new(FailureKind::FileIo, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }

    /// Attach one structured-context entry.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Attach the original cause.
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Look up one structured-context entry.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// Short, user-facing summary: a per-kind label plus the message.
    ///
    /// Deliberately leaner than the diagnostic that gets logged; command
    /// lines and log excerpts stay in [`Failure::details`].
    pub fn summary(&self) -> String {
        format!("{}: {}", self.kind.label(), self.message)
    }

    /// Serialize kind, message, details, timestamp, and the cause (as a
    /// string) into a JSON map.
    pub fn to_map(&self) -> Value {
        serde_json::json!({
            "error_type": self.kind.as_str(),
            "message": self.message,
            "details": Value::Object(self.details.clone()),
            "timestamp": self.timestamp.to_rfc3339(),
            "original_error": self.source.as_ref().map(|s| s.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Convert a raw error into a typed [`Failure`].
///
/// Already-typed failures are returned unchanged (classification is
/// idempotent). Everything else is matched against ordered rules, first
/// match wins; the returned failure carries the original message, the
/// caller-supplied context map, and the original error as its cause.
///
/// Side effect: the full diagnostic (kind, message, context, cause chain)
/// is logged at error severity here, so the short [`Failure::summary`]
/// can stay short at the caller boundary.
pub fn classify(error: anyhow::Error, context: Map<String, Value>) -> Failure {
    // Idempotent on typed failures.
    let error = match error.downcast::<Failure>() {
        Ok(failure) => {
            tracing::error!(
                kind = %failure.kind,
                message = %failure.message,
                details = ?failure.details,
                "failure passed through classifier"
            );
            return failure;
        }
        Err(other) => other,
    };

    let kind = classify_kind(&error);
    tracing::error!(
        kind = %kind,
        context = ?context,
        diagnostic = ?error,
        "classified raw error"
    );

    let mut failure = Failure::new(kind, error.to_string());
    failure.details = context;
    failure.with_source(Box::<dyn std::error::Error + Send + Sync>::from(error))
}

/// Ordered classification rules (first match wins).
fn classify_kind(error: &anyhow::Error) -> FailureKind {
    // The lowercased chain message, so markers in wrapped causes count too.
    let message = format!("{error:#}").to_lowercase();

    // 1. File-not-found / IO-class errors.
    if error.root_cause().downcast_ref::<std::io::Error>().is_some()
        || message.contains("no such file")
    {
        return FailureKind::FileIo;
    }

    // 2. Template / rendering markers.
    if message.contains("template") || message.contains("render") {
        return FailureKind::Parsing;
    }

    // 3. Structured-data errors.
    if error.root_cause().downcast_ref::<serde_json::Error>().is_some()
        || message.contains("json")
        || message.contains("invalid type")
        || message.contains("missing field")
    {
        return FailureKind::Parsing;
    }

    // 4. Environment errors.
    if error.root_cause().downcast_ref::<std::env::VarError>().is_some()
        || message.contains("command not found")
    {
        return FailureKind::Configuration;
    }

    // 5. Timeouts.
    if error
        .root_cause()
        .downcast_ref::<tokio::time::error::Elapsed>()
        .is_some()
        || message.contains("timeout")
        || message.contains("timed out")
    {
        return FailureKind::Timeout;
    }

    // 6. Network trouble.
    if message.contains("connection") || message.contains("network") {
        return FailureKind::Network;
    }

    FailureKind::Unknown
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
