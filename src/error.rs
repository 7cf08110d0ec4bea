//! Rich diagnostic error types for scene-facts.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know what went wrong and how to
//! fix it. Malformed edges and weights are not errors: they are dropped or
//! coerced where they are read.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for a fact lookup.
///
/// A single failed remote call aborts the whole request, so callers either get
/// a complete sentence list or one of these.
#[derive(Debug, Error, Diagnostic)]
pub enum FactsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type FactsResult<T> = std::result::Result<T, FactsError>;

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    #[diagnostic(
        code(facts::fetch::transport),
        help(
            "The knowledge-graph service could not be reached. Check your network \
             connection and the configured `base_url`, then retry the request."
        )
    )]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    #[diagnostic(
        code(facts::fetch::status),
        help("The service rejected the request and did not send a JSON body.")
    )]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {message}")]
    #[diagnostic(
        code(facts::fetch::decode),
        help(
            "The service answered with something other than JSON. \
             Verify that `base_url` points at a ConceptNet-compatible API."
        )
    )]
    Decode { url: String, message: String },

    #[error("response from {url} is not a JSON object")]
    #[diagnostic(
        code(facts::fetch::shape),
        help("Expected an object with an \"edges\" array.")
    )]
    Shape { url: String },

    #[error("failed to read fixture {path}")]
    #[diagnostic(
        code(facts::fetch::fixture_read),
        help("Ensure the fixture file exists and is readable.")
    )]
    FixtureRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture {path}: {message}")]
    #[diagnostic(
        code(facts::fetch::fixture_parse),
        help(
            "A fixture is a JSON object with \"concepts\" and \"pairs\" maps \
             whose values are ConceptNet-style responses."
        )
    )]
    FixtureParse { path: String, message: String },
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(facts::config::no_home),
        help("Set the HOME or XDG_CONFIG_HOME environment variable, or pass --config.")
    )]
    NoHome,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(facts::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}")]
    #[diagnostic(
        code(facts::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config: {message}")]
    #[diagnostic(code(facts::config::serialize))]
    Serialize { message: String },

    #[error("invalid config value for `{field}`: {message}")]
    #[diagnostic(
        code(facts::config::invalid),
        help("Fix the value in the config file or override it on the command line.")
    )]
    Invalid { field: &'static str, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_wraps_transparently() {
        let err: FactsError = FetchError::Status {
            url: "https://api.conceptnet.io/c/en/dog".into(),
            status: 502,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "https://api.conceptnet.io/c/en/dog returned HTTP 502"
        );
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("facts::fetch::status"));
    }

    #[test]
    fn config_error_names_field() {
        let err = ConfigError::Invalid {
            field: "timeout_secs",
            message: "must be greater than zero".into(),
        };
        assert!(err.to_string().contains("`timeout_secs`"));
    }
}
