//! Resolved settings as seen by a client or server interceptor.

use std::fmt;

use tonic::Code;

use crate::config::{TraceConfig, DEFAULT_CLIENT_SERVICE_NAME, DEFAULT_SERVER_SERVICE_NAME};
use crate::options::TraceOption;

/// Which side of the RPC an interceptor instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Server,
    Client,
}

impl Role {
    pub fn default_service_name(self) -> &'static str {
        match self {
            Role::Server => DEFAULT_SERVER_SERVICE_NAME,
            Role::Client => DEFAULT_CLIENT_SERVICE_NAME,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => write!(f, "server"),
            Role::Client => write!(f, "client"),
        }
    }
}

/// Immutable view of a [`TraceConfig`] bound to a [`Role`].
#[derive(Debug, Clone)]
pub struct InterceptorConfig {
    role: Role,
    config: TraceConfig,
}

impl InterceptorConfig {
    /// Fold `options` over a defaulted config for `role`.
    pub fn new<I>(role: Role, options: I) -> Self
    where
        I: IntoIterator<Item = TraceOption>,
    {
        Self::from_config(role, TraceConfig::from_options(options))
    }

    /// Bind an already built config, e.g. one loaded from a file.
    pub fn from_config(role: Role, config: TraceConfig) -> Self {
        let this = Self { role, config };
        tracing::debug!(
            role = %this.role,
            service = this.service_name(),
            stream_calls = this.config.trace_stream_calls,
            stream_messages = this.config.trace_stream_messages,
            no_debug_stack = this.config.no_debug_stack,
            analytics_rate = this.config.analytics_rate,
            "grpc tracing configured"
        );
        this
    }

    /// Side of the RPC this config instruments.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The underlying settings record.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Service name resolved for this role.
    pub fn service_name(&self) -> &str {
        match self.role {
            Role::Server => self.config.server_service_name(),
            Role::Client => self.config.client_service_name(),
        }
    }

    /// Whether a call finishing with `code` should be recorded as an error.
    pub fn is_error(&self, code: Code) -> bool {
        code != Code::Ok && !self.config.is_non_error_code(code)
    }

    /// Whether streaming calls are traced.
    pub fn traces_stream_calls(&self) -> bool {
        self.config.trace_stream_calls
    }

    /// Whether individual stream messages are traced.
    pub fn traces_stream_messages(&self) -> bool {
        self.config.trace_stream_messages
    }

    /// Analytics rate to tag spans with, `None` when left at zero.
    pub fn analytics_rate(&self) -> Option<f64> {
        if self.config.analytics_rate == 0.0 {
            None
        } else {
            Some(self.config.analytics_rate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::*;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_role_defaults() {
        assert_eq!(Role::Server.default_service_name(), "grpc.server");
        assert_eq!(Role::Client.default_service_name(), "grpc.client");
        assert_eq!(Role::Client.to_string(), "client");
    }

    #[test]
    fn test_service_name_by_role() {
        init_logging();
        let server = InterceptorConfig::new(Role::Server, Vec::new());
        let client = InterceptorConfig::new(Role::Client, Vec::new());
        assert_eq!(server.service_name(), "grpc.server");
        assert_eq!(client.service_name(), "grpc.client");

        let client = InterceptorConfig::new(Role::Client, [with_service_name("checkout")]);
        assert_eq!(client.service_name(), "checkout");
        assert_eq!(client.role(), Role::Client);
    }

    #[test]
    fn test_error_classification_defaults() {
        let cfg = InterceptorConfig::new(Role::Server, Vec::new());
        assert!(!cfg.is_error(Code::Ok));
        assert!(!cfg.is_error(Code::Cancelled));
        assert!(cfg.is_error(Code::NotFound));
        assert!(cfg.is_error(Code::Internal));
    }

    #[test]
    fn test_error_classification_override() {
        init_logging();
        let cfg = InterceptorConfig::new(Role::Client, [non_error_codes([Code::NotFound])]);
        assert!(cfg.is_error(Code::Cancelled));
        assert!(!cfg.is_error(Code::NotFound));
        assert!(!cfg.is_error(Code::Ok));

        let cfg = InterceptorConfig::new(Role::Client, [non_error_codes([])]);
        assert!(cfg.is_error(Code::Cancelled));
        assert!(!cfg.is_error(Code::Ok));
    }

    #[test]
    fn test_analytics_rate() {
        let cfg = InterceptorConfig::new(Role::Server, Vec::new());
        assert_eq!(cfg.analytics_rate(), None);

        let cfg = InterceptorConfig::new(Role::Server, [with_analytics(true)]);
        assert_eq!(cfg.analytics_rate(), Some(1.0));

        init_logging();
        let cfg = InterceptorConfig::new(Role::Server, [with_analytics_rate(2.5)]);
        assert_eq!(cfg.analytics_rate(), Some(2.5));

        let cfg = InterceptorConfig::new(
            Role::Server,
            [with_analytics(true), with_analytics(false)],
        );
        assert_eq!(cfg.analytics_rate(), None);
    }

    #[test]
    fn test_stream_flags() {
        let cfg = InterceptorConfig::new(
            Role::Server,
            [with_stream_calls(false), no_debug_stack()],
        );
        assert!(!cfg.traces_stream_calls());
        assert!(cfg.traces_stream_messages());
        assert!(cfg.config().no_debug_stack);
    }

    #[test]
    fn test_from_loaded_config() {
        let loaded = TraceConfig::from_json_str(r#"{"service_name": "inventory"}"#).unwrap();
        let cfg = InterceptorConfig::from_config(Role::Server, loaded);
        assert_eq!(cfg.service_name(), "inventory");
        assert!(!cfg.is_error(Code::Cancelled));
    }
}
