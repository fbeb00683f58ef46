//! # grpc-trace-options
//!
//! Configuration for tracing gRPC clients and servers. Interceptors are
//! configured with a list of [`TraceOption`]s, applied in order to a
//! defaulted [`TraceConfig`]:
//!
//! ```
//! use grpc_trace_options::{non_error_codes, with_service_name, Code, InterceptorConfig, Role};
//!
//! let cfg = InterceptorConfig::new(
//!     Role::Server,
//!     [with_service_name("billing"), non_error_codes([Code::NotFound])],
//! );
//! assert_eq!(cfg.service_name(), "billing");
//! assert!(cfg.is_error(Code::Cancelled));
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod options;

pub use config::TraceConfig;
pub use error::TraceConfigError;
pub use interceptor::{InterceptorConfig, Role};
pub use options::{
    no_debug_stack, non_error_codes, with_analytics, with_analytics_rate, with_service_name,
    with_stream_calls, with_stream_messages, TraceOption,
};
pub use tonic::Code;
