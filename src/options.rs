//! Option constructors for [`TraceConfig`].
//!
//! Each constructor returns a [`TraceOption`] describing one change. Options
//! are applied in the order given, so later options win for the same field.

use std::collections::HashSet;
use std::fmt;

use tonic::Code;

use crate::config::{warn_if_rate_out_of_range, TraceConfig};

/// A single deferred change to a [`TraceConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOption {
    ServiceName(String),
    StreamCalls(bool),
    StreamMessages(bool),
    NoDebugStack,
    NonErrorCodes(HashSet<Code>),
    AnalyticsRate(f64),
}

impl TraceOption {
    /// Apply this option to `config`.
    pub fn apply(&self, config: &mut TraceConfig) {
        tracing::trace!(option = %self, "applying trace option");
        match self {
            TraceOption::ServiceName(name) => config.service_name = name.clone(),
            TraceOption::StreamCalls(enabled) => config.trace_stream_calls = *enabled,
            TraceOption::StreamMessages(enabled) => config.trace_stream_messages = *enabled,
            TraceOption::NoDebugStack => config.no_debug_stack = true,
            // replaces, never merges with, the default Cancelled exemption
            TraceOption::NonErrorCodes(codes) => config.non_error_codes = codes.clone(),
            TraceOption::AnalyticsRate(rate) => {
                warn_if_rate_out_of_range(*rate);
                config.analytics_rate = *rate;
            }
        }
    }
}

impl fmt::Display for TraceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceOption::ServiceName(name) => write!(f, "service_name={:?}", name),
            TraceOption::StreamCalls(enabled) => write!(f, "stream_calls={}", enabled),
            TraceOption::StreamMessages(enabled) => write!(f, "stream_messages={}", enabled),
            TraceOption::NoDebugStack => write!(f, "no_debug_stack"),
            TraceOption::NonErrorCodes(codes) => {
                let mut raw: Vec<i32> = codes.iter().map(|code| *code as i32).collect();
                raw.sort_unstable();
                write!(f, "non_error_codes={:?}", raw)
            }
            TraceOption::AnalyticsRate(rate) => write!(f, "analytics_rate={}", rate),
        }
    }
}

/// Set the service name attributed to spans.
///
/// An empty name is stored as-is and resolves to the role default.
pub fn with_service_name(name: impl Into<String>) -> TraceOption {
    TraceOption::ServiceName(name.into())
}

/// Enable or disable tracing of streaming calls. Not used by stats handlers.
pub fn with_stream_calls(enabled: bool) -> TraceOption {
    TraceOption::StreamCalls(enabled)
}

/// Enable or disable tracing of individual stream messages. Not used by stats handlers.
pub fn with_stream_messages(enabled: bool) -> TraceOption {
    TraceOption::StreamMessages(enabled)
}

/// Omit debug stacks from error spans, for services where errors are frequent.
pub fn no_debug_stack() -> TraceOption {
    TraceOption::NoDebugStack
}

/// Set exactly which codes are not considered errors.
///
/// This overrides the default treatment of [`Code::Cancelled`] as a
/// non-error; passing no codes leaves every non-OK code an error.
pub fn non_error_codes<I>(codes: I) -> TraceOption
where
    I: IntoIterator<Item = Code>,
{
    TraceOption::NonErrorCodes(codes.into_iter().collect())
}

/// Flag all started spans for trace analytics, or none.
pub fn with_analytics(on: bool) -> TraceOption {
    if on {
        with_analytics_rate(1.0)
    } else {
        with_analytics_rate(0.0)
    }
}

/// Set the trace analytics sampling rate. The value is not clamped.
pub fn with_analytics_rate(rate: f64) -> TraceOption {
    TraceOption::AnalyticsRate(rate)
}
