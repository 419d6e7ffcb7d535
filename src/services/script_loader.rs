use std::{sync::Arc, time::Duration};

use tracing::debug;
use urlencoding::encode;

use crate::{
    dom::document::{Document, ScriptLoadSignal},
    utils::widget_error::WidgetError,
};

pub const GOOGLE_MAPS_HOST: &str = "https://maps.googleapis.com";

pub fn script_url(host: &str, api_key: &str) -> String {
    format!(
        "{}/maps/api/js?key={}&libraries=places",
        host.trim_end_matches('/'),
        encode(api_key)
    )
}

#[derive(Clone)]
pub struct ScriptLoader {
    document: Arc<dyn Document>,
    load_timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct ScriptLoad {
    url: String,
    signal: ScriptLoadSignal,
    load_timeout: Option<Duration>,
}

impl ScriptLoader {
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            load_timeout: None,
        }
    }

    /// Give up waiting after `load_timeout`. Without it, a script that never
    /// loads keeps the wait pending forever.
    pub fn with_load_timeout(mut self, load_timeout: Option<Duration>) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    /// A tag with this exact src counts as loaded, even if it is still in
    /// flight.
    pub fn ensure_loaded(&self, url: &str) -> ScriptLoad {
        let signal = if self.document.script_count(url) > 0 {
            debug!("Places script already on the page");
            ScriptLoadSignal::ready()
        } else {
            self.document.append_script(url)
        };

        ScriptLoad {
            url: url.to_string(),
            signal,
            load_timeout: self.load_timeout,
        }
    }
}

impl ScriptLoad {
    pub async fn wait(self) -> Result<(), WidgetError> {
        match self.load_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.signal.loaded())
                .await
                .map_err(|_| WidgetError::ScriptLoadTimeout {
                    timeout,
                    url: self.url,
                }),
            None => {
                self.signal.loaded().await;
                Ok(())
            }
        }
    }
}
