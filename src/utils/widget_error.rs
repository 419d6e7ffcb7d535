use std::time::Duration;

use thiserror::Error;

/// Failures inside the widget. None of these reach the caller of
/// `mount`/`update`: they are logged and binding is skipped.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Invalid `{key}` property: {source}")]
    InvalidProperty {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Timed out after {timeout:?} waiting for script {url}")]
    ScriptLoadTimeout { timeout: Duration, url: String },
}
