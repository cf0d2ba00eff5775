// ---------------------------------------------------------------------------
// ScenarioError: everything that can make a sample-and-rebuild cycle fail
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised while fetching or decoding a simulation result.
///
/// Transport and application failures share one user-visible path: the
/// controller keeps the previous scene and flags every readout as `Error`.
#[derive(Debug)]
pub enum ScenarioError {
    /// The request never produced an HTTP response (refused, reset, bad URL).
    Transport(String),
    /// The simulation answered with a non-success status.
    Status { code: u16, body: String },
    /// The payload carried an explicit `error` field.
    Application(String),
    /// The payload was not a valid simulation response.
    Decode(String),
    /// Reading a saved response from disk failed.
    Io(std::io::Error),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Transport(msg) => write!(f, "Transport error: {msg}"),
            ScenarioError::Status { code, body } => {
                if body.trim().is_empty() {
                    write!(f, "Simulation returned HTTP {code}")
                } else {
                    write!(f, "Simulation returned HTTP {code}: {}", body.trim())
                }
            }
            ScenarioError::Application(msg) => write!(f, "Simulation error: {msg}"),
            ScenarioError::Decode(msg) => write!(f, "Malformed simulation response: {msg}"),
            ScenarioError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        ScenarioError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_status_includes_code_and_body() {
        let err = ScenarioError::Status {
            code: 500,
            body: "No successful simulation runs converged. Try again.".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("500"), "got: {msg}");
        assert!(msg.contains("converged"), "got: {msg}");
    }

    #[test]
    fn test_display_status_without_body() {
        let err = ScenarioError::Status {
            code: 503,
            body: "  ".to_string(),
        };
        assert_eq!(format!("{err}"), "Simulation returned HTTP 503");
    }

    #[test]
    fn test_display_application() {
        let err = ScenarioError::Application("Unknown forest_type: palm".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("Simulation error"), "got: {msg}");
        assert!(msg.contains("palm"), "got: {msg}");
    }

    #[test]
    fn test_from_io_keeps_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: ScenarioError = io_err.into();
        assert!(matches!(err, ScenarioError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ScenarioError = parse_err.into();
        assert!(matches!(err, ScenarioError::Decode(_)));
    }
}
