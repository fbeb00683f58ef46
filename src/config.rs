use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tonic::Code;

use crate::error::TraceConfigError;
use crate::options::TraceOption;

/// Service name reported by server interceptors when none is configured.
pub const DEFAULT_SERVER_SERVICE_NAME: &str = "grpc.server";
/// Service name reported by client interceptors when none is configured.
pub const DEFAULT_CLIENT_SERVICE_NAME: &str = "grpc.client";

/// Tracing settings for a gRPC interceptor or stats handler.
///
/// Built once per interceptor from [`TraceConfig::default`] plus a sequence
/// of [`TraceOption`]s, then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Service name for span attribution. Empty means "use the role default".
    pub service_name: String,
    /// Status codes that are not treated as errors
    #[serde(with = "code_set")]
    pub non_error_codes: HashSet<Code>,
    /// Trace analytics sampling rate, stored without clamping
    pub analytics_rate: f64,
    /// Trace streaming calls
    pub trace_stream_calls: bool,
    /// Trace individual messages of a stream
    pub trace_stream_messages: bool,
    /// Omit debug stacks from error spans
    pub no_debug_stack: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            non_error_codes: HashSet::from([Code::Cancelled]),
            analytics_rate: 0.0,
            trace_stream_calls: true,
            trace_stream_messages: true,
            no_debug_stack: false,
        }
    }
}

impl TraceConfig {
    /// Apply `options` in order to a defaulted config.
    pub fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = TraceOption>,
    {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }

    /// Service name to attribute to server spans.
    pub fn server_service_name(&self) -> &str {
        if self.service_name.is_empty() {
            DEFAULT_SERVER_SERVICE_NAME
        } else {
            &self.service_name
        }
    }

    /// Service name to attribute to client spans.
    pub fn client_service_name(&self) -> &str {
        if self.service_name.is_empty() {
            DEFAULT_CLIENT_SERVICE_NAME
        } else {
            &self.service_name
        }
    }

    /// Whether `code` is exempt from error classification.
    pub fn is_non_error_code(&self, code: Code) -> bool {
        self.non_error_codes.contains(&code)
    }

    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TraceConfigError> {
        let config: TraceConfig = serde_json::from_str(json)?;
        warn_if_rate_out_of_range(config.analytics_rate);
        Ok(config)
    }

    /// Load a config from a JSON file.
    ///
    /// A file that is empty or only whitespace is reported as
    /// [`TraceConfigError::ConfigError`] naming the path, rather than the
    /// parse error [`from_json_str`](Self::from_json_str) gives for `""`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Err(TraceConfigError::ConfigError(format!(
                "empty configuration file: {}",
                path.display()
            )));
        }
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON.
    ///
    /// JSON has no encoding for a NaN or infinite analytics rate, so such a
    /// config fails here instead of producing output the loader rejects.
    pub fn to_json(&self) -> Result<String, TraceConfigError> {
        if !self.analytics_rate.is_finite() {
            return Err(TraceConfigError::ConfigError(format!(
                "analytics rate {} cannot be written as JSON",
                self.analytics_rate
            )));
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Logs a warning for a rate outside `[0, 1]`. The rate is still stored.
pub(crate) fn warn_if_rate_out_of_range(rate: f64) {
    if !(0.0..=1.0).contains(&rate) {
        tracing::warn!(rate, "analytics rate outside [0, 1], storing as-is");
    }
}

/// Serializes a code set as a sorted list of numeric gRPC codes.
mod code_set {
    use std::collections::HashSet;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use tonic::Code;

    pub fn serialize<S>(codes: &HashSet<Code>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut raw: Vec<i32> = codes.iter().map(|code| *code as i32).collect();
        raw.sort_unstable();
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashSet<Code>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<i32>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(Code::from).collect())
    }
}
