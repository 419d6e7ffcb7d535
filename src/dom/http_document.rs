use std::sync::{Arc, Mutex, PoisonError};

use tokio::{runtime::Handle, sync::oneshot};
use tracing::{debug, warn};

use super::document::{Document, ScriptLoadSignal};

/// A script counts as loaded once a GET for its src succeeds. Any other
/// outcome is logged and the element never fires `load`.
#[derive(Clone)]
pub struct HttpDocument {
    client: reqwest::Client,
    scripts: Arc<Mutex<Vec<String>>>,
}

impl HttpDocument {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            scripts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HttpDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for HttpDocument {
    fn script_count(&self, src: &str) -> usize {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.as_str() == src)
            .count()
    }

    fn append_script(&self, src: &str) -> ScriptLoadSignal {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(src.to_string());

        let (on_load, load) = oneshot::channel();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot fetch script outside of a runtime: {}", e);
                return ScriptLoadSignal::on_load(load);
            }
        };

        let client = self.client.clone();
        let src = src.to_string();
        runtime.spawn(async move {
            match client
                .get(&src)
                .send()
                .await
                .and_then(|resp| resp.error_for_status())
            {
                Ok(_) => {
                    debug!("Script loaded");
                    let _ = on_load.send(());
                }
                Err(e) => warn!("Failed to load script: {}", e.without_url()),
            }
        });

        ScriptLoadSignal::on_load(load)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn fires_load_after_fetch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/maps/api/js")
            .match_query(mockito::Matcher::Regex("key=abc".to_string()))
            .with_header("content-type", "text/javascript")
            .with_body("window.google = {};")
            .create_async()
            .await;

        let document = HttpDocument::new();
        let src = format!("{}/maps/api/js?key=abc&libraries=places", server.url());

        document.append_script(&src).loaded().await;

        mock.assert_async().await;
        assert_eq!(document.script_count(&src), 1);
        assert_eq!(document.scripts(), vec![src]);
    }

    #[tokio::test]
    async fn failed_fetch_never_loads() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/maps/api/js")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let document = HttpDocument::new();
        let src = format!("{}/maps/api/js?key=bad&libraries=places", server.url());

        let outcome =
            tokio::time::timeout(Duration::from_millis(300), document.append_script(&src).loaded())
                .await;

        assert!(outcome.is_err());
        assert_eq!(document.script_count(&src), 1);
    }
}
