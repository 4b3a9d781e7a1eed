//! Canonical backend client.
//!
//! One method per operation. Every method builds exactly one [`BackendRequest`],
//! hands it to the configured [`Transport`] and strips the backend's `data`
//! envelope from the answer.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::config::ApiKey;
use crate::error::Result;
use crate::operation::Operation;
use crate::transport::{BackendRequest, Transport};
use crate::validation::{AutocompleteInput, Coordinates, GeocodeInput, NearbyInput, OperationInput};

/// Country sent with geocode requests when the caller does not name one.
pub const DEFAULT_COUNTRY: &str = "India";

/// Autocomplete limit forwarded to the backend is never larger than this.
pub const AUTOCOMPLETE_LIMIT_CAP: u64 = 10;

/// Nearby-search limit forwarded to the backend is never larger than this.
pub const NEARBY_LIMIT_CAP: u64 = 50;

/// Client bound to a transport and a single resolved credential.
#[derive(Clone)]
pub struct QuantaRouteClient {
    transport: Arc<dyn Transport>,
    credential: ApiKey,
}

impl QuantaRouteClient {
    pub fn new(transport: Arc<dyn Transport>, credential: ApiKey) -> Self {
        Self {
            transport,
            credential,
        }
    }

    /// Run the backend call matching `input`.
    pub async fn invoke(&self, input: &OperationInput) -> Result<Value> {
        match input {
            OperationInput::Geocode(input) => self.geocode(input).await,
            OperationInput::ReverseGeocode { digipin } => self.reverse_geocode(digipin).await,
            OperationInput::CoordinatesToDigiPin(coordinates) => {
                self.coordinates_to_digipin(*coordinates).await
            }
            OperationInput::ValidateDigiPin { digipin } => self.validate_digipin(digipin).await,
            OperationInput::BatchGeocode { addresses } => self.batch_geocode(addresses).await,
            OperationInput::Autocomplete(input) => self.autocomplete(input).await,
            OperationInput::LookupLocationFromCoordinates(coordinates) => {
                self.lookup_location_from_coordinates(*coordinates).await
            }
            OperationInput::LookupLocationFromDigiPin { digipin } => {
                self.lookup_location_from_digipin(digipin).await
            }
            OperationInput::BatchLocationLookup { locations } => {
                self.batch_location_lookup(locations).await
            }
            OperationInput::FindNearbyBoundaries(input) => {
                self.find_nearby_boundaries(*input).await
            }
            OperationInput::GetUsage => self.get_usage().await,
            OperationInput::GetLocationStatistics => self.get_location_statistics().await,
            OperationInput::GetHealth => self.get_health().await,
        }
    }

    pub async fn geocode(&self, input: &GeocodeInput) -> Result<Value> {
        let mut body = Map::new();
        body.insert("address".into(), Value::String(input.address.clone()));
        body.insert(
            "country".into(),
            Value::String(
                input
                    .country
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            ),
        );
        for (key, value) in [
            ("city", &input.city),
            ("state", &input.state),
            ("pincode", &input.pincode),
        ] {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                body.insert(key.into(), Value::String(value.clone()));
            }
        }

        self.post(Operation::Geocode, Value::Object(body)).await
    }

    pub async fn reverse_geocode(&self, digipin: &str) -> Result<Value> {
        self.post(Operation::ReverseGeocode, json!({ "digipin": digipin }))
            .await
    }

    pub async fn coordinates_to_digipin(&self, coordinates: Coordinates) -> Result<Value> {
        self.post(Operation::CoordinatesToDigiPin, coordinates_body(coordinates))
            .await
    }

    /// The DigiPin travels as one path segment; the transport percent-encodes
    /// it, so it cannot address any other backend path.
    pub async fn validate_digipin(&self, digipin: &str) -> Result<Value> {
        let parent = backend_path(Operation::ValidateDigiPin).trim_end_matches("/{digipin}");
        let request = BackendRequest::get(parent, self.credential.clone()).with_segment(digipin);
        self.send(request).await
    }

    pub async fn batch_geocode(&self, addresses: &[Value]) -> Result<Value> {
        self.post(Operation::BatchGeocode, json!({ "addresses": addresses }))
            .await
    }

    pub async fn autocomplete(&self, input: &AutocompleteInput) -> Result<Value> {
        let request = BackendRequest::get(
            backend_path(Operation::Autocomplete),
            self.credential.clone(),
        )
        .with_query("q", &input.query)
        .with_query("limit", input.limit.min(AUTOCOMPLETE_LIMIT_CAP));
        self.send(request).await
    }

    pub async fn lookup_location_from_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<Value> {
        self.post(
            Operation::LookupLocationFromCoordinates,
            coordinates_body(coordinates),
        )
        .await
    }

    pub async fn lookup_location_from_digipin(&self, digipin: &str) -> Result<Value> {
        self.post(
            Operation::LookupLocationFromDigiPin,
            json!({ "digipin": digipin }),
        )
        .await
    }

    pub async fn batch_location_lookup(&self, locations: &[Value]) -> Result<Value> {
        self.post(
            Operation::BatchLocationLookup,
            json!({ "locations": locations }),
        )
        .await
    }

    /// Backend endpoint is not live yet; the gateway refuses this operation
    /// before it gets here while it is disabled in the operation table.
    pub async fn find_nearby_boundaries(&self, input: NearbyInput) -> Result<Value> {
        let request = BackendRequest::get(
            backend_path(Operation::FindNearbyBoundaries),
            self.credential.clone(),
        )
        .with_query("lat", input.coordinates.latitude)
        .with_query("lng", input.coordinates.longitude)
        .with_query("radius", input.radius_km)
        .with_query("limit", input.limit.min(NEARBY_LIMIT_CAP));
        self.send(request).await
    }

    pub async fn get_usage(&self) -> Result<Value> {
        self.get(Operation::GetUsage).await
    }

    pub async fn get_location_statistics(&self) -> Result<Value> {
        self.get(Operation::GetLocationStatistics).await
    }

    pub async fn get_health(&self) -> Result<Value> {
        self.get(Operation::GetHealth).await
    }

    async fn get(&self, operation: Operation) -> Result<Value> {
        self.send(BackendRequest::get(
            backend_path(operation),
            self.credential.clone(),
        ))
        .await
    }

    async fn post(&self, operation: Operation, body: Value) -> Result<Value> {
        self.send(BackendRequest::post(
            backend_path(operation),
            body,
            self.credential.clone(),
        ))
        .await
    }

    async fn send(&self, request: BackendRequest) -> Result<Value> {
        let response = self.transport.call(request).await?;
        Ok(unwrap_envelope(response))
    }
}

fn backend_path(operation: Operation) -> &'static str {
    operation.spec().backend_path
}

fn coordinates_body(coordinates: Coordinates) -> Value {
    json!({
        "latitude": coordinates.latitude,
        "longitude": coordinates.longitude,
    })
}

/// Return the `data` member of a backend response when it is present and not
/// null, otherwise the whole response.
pub fn unwrap_envelope(response: Value) -> Value {
    match response {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".into(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}
