use serde_json::{Map, Value};
use urlencoding::encode;

use super::types::{
    google_autocomplete_response::GoogleAutocompleteResponse,
    google_place_details_response::GooglePlaceDetailsResponse,
    places_service_error::PlacesServiceError,
};
use crate::types::{autocomplete_options::AutocompleteOptions, place_result::PlaceResult};

#[derive(Clone)]
pub struct PlacesServiceConfig {
    pub api_key: String,
    pub host: String,
}

#[derive(Clone)]
pub struct PlacesService {
    config: PlacesServiceConfig,
    client: reqwest::Client,
}

pub struct AutocompleteSearchInput {
    pub input: String,
    pub options: AutocompleteOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteSearchOutputPrediction {
    pub description: String,
    pub main_text: String,
    pub secondary_text: String,
    pub place_id: String,
}

pub struct AutocompleteSearchOutput {
    pub predictions: Vec<AutocompleteSearchOutputPrediction>,
}

impl PlacesService {
    pub fn new(config: PlacesServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get_autocomplete(
        &self,
        input: AutocompleteSearchInput,
    ) -> Result<AutocompleteSearchOutput, PlacesServiceError> {
        let mut url = format!(
            "{}/maps/api/place/autocomplete/json?input={}&key={}",
            self.config.host,
            encode(&input.input),
            encode(&self.config.api_key)
        );
        for (name, value) in option_params(&input.options) {
            url.push_str(&format!("&{}={}", name, encode(&value)));
        }

        let body = self.fetch::<GoogleAutocompleteResponse>(&url).await?;

        if body.status != "OK" && body.status != "ZERO_RESULTS" {
            return Err(PlacesServiceError::Status {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            });
        }

        Ok(AutocompleteSearchOutput {
            predictions: body
                .predictions
                .into_iter()
                .map(|p| AutocompleteSearchOutputPrediction {
                    description: p.description,
                    main_text: p.structured_formatting.main_text,
                    secondary_text: p.structured_formatting.secondary_text,
                    place_id: p.place_id,
                })
                .collect(),
        })
    }

    /// Details for one place, restricted to `fields` when any are given.
    pub async fn get_place_details(
        &self,
        place_id: &str,
        fields: &[String],
    ) -> Result<PlaceResult, PlacesServiceError> {
        let mut url = format!(
            "{}/maps/api/place/details/json?place_id={}&key={}",
            self.config.host,
            encode(place_id),
            encode(&self.config.api_key)
        );
        if !fields.is_empty() {
            url.push_str(&format!("&fields={}", encode(&fields.join(","))));
        }

        let body = self.fetch::<GooglePlaceDetailsResponse>(&url).await?;

        match (body.status.as_str(), body.result) {
            ("OK", Some(place)) => Ok(place),
            _ => Err(PlacesServiceError::Status {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, PlacesServiceError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            PlacesServiceError::Internal(format!("Failed to send request: {}", e.without_url()))
        })?;

        resp.json::<T>().await.map_err(|e| {
            PlacesServiceError::Internal(format!("Failed to get response body: {}", e.without_url()))
        })
    }
}

fn option_params(options: &AutocompleteOptions) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    let countries = options.countries();
    if !countries.is_empty() {
        let components: Vec<String> = countries.iter().map(|c| format!("country:{}", c)).collect();
        params.push(("components", components.join("|")));
    }
    if let Some(types) = options.types.as_ref().filter(|t| !t.is_empty()) {
        params.push(("types", types.join("|")));
    }
    if let Some(location) = options.location.as_ref().and_then(lat_lng) {
        params.push(("location", location));
    }
    if let Some(radius) = options.radius {
        params.push(("radius", radius.to_string()));
    }
    if let Some(offset) = options.offset {
        params.push(("offset", offset.to_string()));
    }
    if let Some(origin) = options.origin.as_ref().and_then(lat_lng) {
        params.push(("origin", origin));
    }
    if let Some(bounds) = options.bounds.as_ref().and_then(rectangle) {
        params.push(("locationbias", bounds));
    }
    if let Some(Value::String(token)) = &options.session_token {
        params.push(("sessiontoken", token.clone()));
    }

    params
}

fn lat_lng(point: &Map<String, Value>) -> Option<String> {
    let lat = point.get("lat")?.as_f64()?;
    let lng = point.get("lng")?.as_f64()?;
    Some(format!("{},{}", lat, lng))
}

fn rectangle(bounds: &Map<String, Value>) -> Option<String> {
    let corner = |key: &str| bounds.get(key).and_then(Value::as_f64);
    Some(format!(
        "rectangle:{},{}|{},{}",
        corner("south")?,
        corner("west")?,
        corner("north")?,
        corner("east")?
    ))
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;
    use crate::services::places::types::google_autocomplete_response::{
        GoogleAutocompleteResponsePrediction, GoogleAutocompleteResponsePredictionStructuredFormatting,
    };

    fn service(host: String) -> PlacesService {
        PlacesService::new(PlacesServiceConfig {
            api_key: "key".to_string(),
            host,
        })
    }

    #[tokio::test]
    async fn autocomplete_sends_widget_options() {
        let mut server = mockito::Server::new_async().await;

        let mock_google_response = GoogleAutocompleteResponse {
            predictions: vec![GoogleAutocompleteResponsePrediction {
                place_id: "123".to_string(),
                description: "1600 Amphitheatre Pkwy, Mountain View, CA, USA".to_string(),
                structured_formatting: GoogleAutocompleteResponsePredictionStructuredFormatting {
                    main_text: "1600 Amphitheatre Pkwy".to_string(),
                    secondary_text: "Mountain View, CA, USA".to_string(),
                },
            }],
            status: "OK".to_string(),
            error_message: None,
        };

        let mock = server
            .mock("GET", "/maps/api/place/autocomplete/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("input".into(), "1600 Amph".into()),
                Matcher::UrlEncoded("key".into(), "key".into()),
                Matcher::UrlEncoded("components".into(), "country:us".into()),
                Matcher::UrlEncoded("types".into(), "address".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_google_response).unwrap())
            .create_async()
            .await;

        let output = service(server.url())
            .get_autocomplete(AutocompleteSearchInput {
                input: "1600 Amph".to_string(),
                options: AutocompleteOptions::widget_default(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(output.predictions.len(), 1);
        assert_eq!(output.predictions[0].place_id, "123");
        assert_eq!(output.predictions[0].main_text, "1600 Amphitheatre Pkwy");
        assert_eq!(output.predictions[0].secondary_text, "Mountain View, CA, USA");
    }

    #[tokio::test]
    async fn autocomplete_reports_denied_requests() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/maps/api/place/autocomplete/json")
            .match_query(Matcher::Any)
            .with_body(
                json!({ "status": "REQUEST_DENIED", "error_message": "bad key" }).to_string(),
            )
            .create_async()
            .await;

        let err = service(server.url())
            .get_autocomplete(AutocompleteSearchInput {
                input: "x".to_string(),
                options: AutocompleteOptions::default(),
            })
            .await
            .err()
            .unwrap();

        assert_eq!(err.to_string(), "Places API responded with REQUEST_DENIED: bad key");
    }

    #[tokio::test]
    async fn details_restricts_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/maps/api/place/details/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("place_id".into(), "123".into()),
                Matcher::UrlEncoded("fields".into(), "place_id,formatted_address".into()),
            ]))
            .with_body(
                json!({
                    "status": "OK",
                    "result": {
                        "place_id": "123",
                        "formatted_address": "1600 Amphitheatre Pkwy"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let place = service(server.url())
            .get_place_details(
                "123",
                &["place_id".to_string(), "formatted_address".to_string()],
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(place.formatted_address.as_deref(), Some("1600 Amphitheatre Pkwy"));
    }

    #[test]
    fn maps_every_recognized_option() {
        let options: AutocompleteOptions = serde_json::from_value(json!({
            "componentRestrictions": { "country": ["us", "ca"] },
            "types": ["geocode", "establishment"],
            "location": { "lat": 40.5, "lng": -74.25 },
            "radius": 500,
            "offset": 3,
            "origin": { "lat": 1, "lng": 2 },
            "bounds": { "south": 1, "west": 2, "north": 3, "east": 4 },
            "sessionToken": "tok"
        }))
        .unwrap();

        assert_eq!(
            option_params(&options),
            vec![
                ("components", "country:us|country:ca".to_string()),
                ("types", "geocode|establishment".to_string()),
                ("location", "40.5,-74.25".to_string()),
                ("radius", "500".to_string()),
                ("offset", "3".to_string()),
                ("origin", "1,2".to_string()),
                ("locationbias", "rectangle:1,2|3,4".to_string()),
                ("sessiontoken", "tok".to_string()),
            ]
        );
    }
}
