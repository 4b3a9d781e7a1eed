//! Typed tool arguments.
//!
//! These structs exist to publish JSON input schemas in `tools/list`. Argument
//! checking itself happens in `quantaroute_lib::validate` so both transports
//! reject the same inputs with the same messages.

use schemars::JsonSchema;
use serde::Deserialize;

/// Input for the geocode tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GeocodeArgs {
    /// The address to geocode (required)
    pub address: String,

    /// City name (optional)
    pub city: Option<String>,

    /// State name (optional)
    pub state: Option<String>,

    /// Postal code (optional)
    pub pincode: Option<String>,

    /// Country name (optional, defaults to India)
    pub country: Option<String>,
}

/// Input for reverse_geocode
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReverseGeocodeArgs {
    /// The DigiPin code to reverse geocode (format: XXX-XXX-XXXX)
    pub digipin: String,
}

/// Input for coordinates_to_digipin and lookup_location_from_coordinates
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CoordinatesArgs {
    /// Latitude coordinate (-90 to 90)
    pub latitude: f64,

    /// Longitude coordinate (-180 to 180)
    pub longitude: f64,
}

/// Input for validate_digipin
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ValidateDigipinArgs {
    /// The DigiPin code to validate
    pub digipin: String,
}

/// Input for lookup_location_from_digipin
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DigipinLookupArgs {
    /// DigiPin code (format: XXX-XXX-XXXX)
    pub digipin: String,
}

/// One entry of a batch geocode request
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddressEntry {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
}

/// Input for batch_geocode
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BatchGeocodeArgs {
    /// Array of address objects to geocode
    #[schemars(length(min = 1, max = 100))]
    pub addresses: Vec<AddressEntry>,
}

/// Input for autocomplete
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AutocompleteArgs {
    /// Search query (minimum 3 characters)
    #[schemars(length(min = 3))]
    pub query: String,

    /// Maximum number of suggestions (default: 5, max: 10)
    pub limit: Option<u32>,
}

/// A batch lookup entry, addressed by coordinates or by DigiPin
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LocationEntry {
    Coordinates { latitude: f64, longitude: f64 },
    Digipin { digipin: String },
}

/// Input for batch_location_lookup
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BatchLocationLookupArgs {
    /// Array of location objects (each with latitude+longitude OR digipin)
    #[schemars(length(min = 1, max = 100))]
    pub locations: Vec<LocationEntry>,
}

/// Input for find_nearby_boundaries
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NearbyBoundariesArgs {
    /// Center latitude
    pub latitude: f64,

    /// Center longitude
    pub longitude: f64,

    /// Search radius in kilometers (default: 5.0, max: 100)
    pub radius_km: Option<f64>,

    /// Maximum number of results (default: 10, max: 50)
    pub limit: Option<u32>,
}

/// Input for tools that take no arguments
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NoArgs {}
