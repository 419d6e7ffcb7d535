use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde_json::Value;
use tracing::warn;

use crate::{
    dom::input::InputRef,
    services::script_loader::script_url,
    types::{
        app_state::AppState,
        widget_props::{WidgetProps, API_KEY},
    },
    widget::render::{escape_html, is_attribute_name, is_event_handler, render},
};

/// Demo page with the widget input. Query parameters become input
/// properties; the API key only ever comes from the server config. Event
/// handler and malformed parameter names are refused.
pub async fn get_widget_page(
    State(state): State<AppState>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Html<String> {
    params.remove(API_KEY);

    let mut props = WidgetProps::from_properties(
        params
            .into_iter()
            .filter(|(key, _)| {
                let allowed = is_attribute_name(key) && !is_event_handler(key);
                if !allowed {
                    warn!("Refusing page parameter {:?}", key);
                }
                allowed
            })
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    );
    if let Some(api_key) = &state.api_key {
        props = props.with(API_KEY, api_key.as_str());
    }

    let input = render(&props, &InputRef::new()).to_html();
    let script = props
        .api_key()
        .map(|key| {
            format!(
                "<script src=\"{}\"></script>",
                escape_html(&script_url(&state.script_host, key))
            )
        })
        .unwrap_or_default();

    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Places widget</title></head><body>{}{}</body></html>",
        input, script
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::app::{gen_app, AppConfig};

    async fn page(config: AppConfig, uri: &str) -> String {
        let response = gen_app(config)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn renders_input_and_script() {
        let body = page(
            AppConfig {
                maps_host: "https://maps.googleapis.com".to_string(),
                api_key: Some("abc".to_string()),
            },
            "/?placeholder=Address&className=wide&options=ignored",
        )
        .await;

        assert!(body.contains("<input class=\"wide\" placeholder=\"Address\" />"));
        assert!(body.contains(
            "<script src=\"https://maps.googleapis.com/maps/api/js?key=abc&amp;libraries=places\"></script>"
        ));
        assert!(!body.contains("ignored"));
    }

    #[tokio::test]
    async fn refuses_markup_and_handlers_in_parameter_names() {
        let body = page(
            AppConfig {
                maps_host: "https://maps.googleapis.com".to_string(),
                api_key: None,
            },
            "/?x%3E%3Cscript%3Ealert(1)%3C%2Fscript%3E%3Cinput%20a=1&onfocus=alert(2)&placeholder=Street",
        )
        .await;

        assert!(body.contains("<input placeholder=\"Street\" />"));
        assert!(!body.contains("<script"));
        assert!(!body.contains("onfocus"));
        assert!(!body.contains("alert"));
    }

    #[tokio::test]
    async fn no_script_without_api_key() {
        let body = page(
            AppConfig {
                maps_host: "https://maps.googleapis.com".to_string(),
                api_key: None,
            },
            "/?apiKey=injected",
        )
        .await;

        assert!(body.contains("<input />"));
        assert!(!body.contains("<script"));
        assert!(!body.contains("injected"));
    }
}
