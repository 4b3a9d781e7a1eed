//! Per-operation input contracts.
//!
//! Both front-ends hand the raw argument object to [`validate`], which either
//! returns the normalized [`OperationInput`] or the first violated rule as
//! [`Error::Validation`]. Rules are evaluated in a fixed order and stop at the
//! first failure.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::operation::{Operation, MAX_BATCH_SIZE};

/// Minimum autocomplete query length, in characters.
pub const MIN_QUERY_LENGTH: usize = 3;

/// Autocomplete limit used when the caller does not supply one.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: u64 = 5;

/// Nearby-search radius used when the caller does not supply one.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Largest nearby-search radius accepted.
pub const MAX_NEARBY_RADIUS_KM: f64 = 100.0;

/// Nearby-search limit used when the caller does not supply one.
pub const DEFAULT_NEARBY_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeInput {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteInput {
    pub query: String,
    /// Raw requested limit. The client caps it before calling the backend.
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyInput {
    pub coordinates: Coordinates,
    pub radius_km: f64,
    pub limit: u64,
}

/// Normalized input for one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationInput {
    Geocode(GeocodeInput),
    ReverseGeocode { digipin: String },
    CoordinatesToDigiPin(Coordinates),
    ValidateDigiPin { digipin: String },
    /// Entries are forwarded to the backend untouched.
    BatchGeocode { addresses: Vec<Value> },
    Autocomplete(AutocompleteInput),
    LookupLocationFromCoordinates(Coordinates),
    LookupLocationFromDigiPin { digipin: String },
    /// Entries are forwarded to the backend untouched.
    BatchLocationLookup { locations: Vec<Value> },
    FindNearbyBoundaries(NearbyInput),
    GetUsage,
    GetLocationStatistics,
    GetHealth,
}

impl OperationInput {
    pub fn operation(&self) -> Operation {
        match self {
            OperationInput::Geocode(_) => Operation::Geocode,
            OperationInput::ReverseGeocode { .. } => Operation::ReverseGeocode,
            OperationInput::CoordinatesToDigiPin(_) => Operation::CoordinatesToDigiPin,
            OperationInput::ValidateDigiPin { .. } => Operation::ValidateDigiPin,
            OperationInput::BatchGeocode { .. } => Operation::BatchGeocode,
            OperationInput::Autocomplete(_) => Operation::Autocomplete,
            OperationInput::LookupLocationFromCoordinates(_) => {
                Operation::LookupLocationFromCoordinates
            }
            OperationInput::LookupLocationFromDigiPin { .. } => Operation::LookupLocationFromDigiPin,
            OperationInput::BatchLocationLookup { .. } => Operation::BatchLocationLookup,
            OperationInput::FindNearbyBoundaries(_) => Operation::FindNearbyBoundaries,
            OperationInput::GetUsage => Operation::GetUsage,
            OperationInput::GetLocationStatistics => Operation::GetLocationStatistics,
            OperationInput::GetHealth => Operation::GetHealth,
        }
    }
}

/// Apply the rule set of `operation` to `args`.
pub fn validate(operation: Operation, args: &Map<String, Value>) -> Result<OperationInput> {
    let input = match operation {
        Operation::Geocode => OperationInput::Geocode(GeocodeInput {
            address: required_string(args, "address")?,
            city: optional_string(args, "city")?,
            state: optional_string(args, "state")?,
            pincode: optional_string(args, "pincode")?,
            country: optional_string(args, "country")?,
        }),
        Operation::ReverseGeocode => OperationInput::ReverseGeocode {
            digipin: required_string(args, "digipin")?,
        },
        Operation::CoordinatesToDigiPin => {
            OperationInput::CoordinatesToDigiPin(coordinates(args)?)
        }
        Operation::ValidateDigiPin => OperationInput::ValidateDigiPin {
            digipin: path_segment(args, "digipin")?,
        },
        Operation::BatchGeocode => OperationInput::BatchGeocode {
            addresses: bounded_array(args, "addresses")?,
        },
        Operation::Autocomplete => OperationInput::Autocomplete(autocomplete(args)?),
        Operation::LookupLocationFromCoordinates => {
            OperationInput::LookupLocationFromCoordinates(coordinates(args)?)
        }
        Operation::LookupLocationFromDigiPin => OperationInput::LookupLocationFromDigiPin {
            digipin: required_string(args, "digipin")?,
        },
        Operation::BatchLocationLookup => OperationInput::BatchLocationLookup {
            locations: bounded_array(args, "locations")?,
        },
        Operation::FindNearbyBoundaries => OperationInput::FindNearbyBoundaries(nearby(args)?),
        Operation::GetUsage => OperationInput::GetUsage,
        Operation::GetLocationStatistics => OperationInput::GetLocationStatistics,
        Operation::GetHealth => OperationInput::GetHealth,
    };
    Ok(input)
}

fn required_string(args: &Map<String, Value>, field: &'static str) -> Result<String> {
    match args.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => Err(Error::validation(
            field,
            format!("The '{}' field is required and cannot be empty", field),
        )),
        Some(_) => Err(Error::validation(
            field,
            format!("The '{}' field must be a string", field),
        )),
    }
}

/// Required string that travels as a backend path segment. Dot segments would
/// be resolved away by URL normalization, so they are refused here.
fn path_segment(args: &Map<String, Value>, field: &'static str) -> Result<String> {
    let value = required_string(args, field)?;
    if matches!(value.trim(), "." | "..") {
        return Err(Error::validation(
            field,
            format!("The '{}' field cannot be '{}'", field, value.trim()),
        ));
    }
    Ok(value)
}

/// Optional string field. Empty strings are treated as absent.
fn optional_string(args: &Map<String, Value>, field: &'static str) -> Result<Option<String>> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.trim().is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(Error::validation(
            field,
            format!("The '{}' field must be a string", field),
        )),
    }
}

fn required_number(args: &Map<String, Value>, field: &'static str) -> Result<f64> {
    match args.get(field) {
        Some(Value::Number(number)) => number.as_f64().ok_or_else(|| not_a_number(field)),
        None | Some(Value::Null) => Err(Error::validation(
            field,
            format!("The '{}' field is required and must be a number", field),
        )),
        Some(_) => Err(not_a_number(field)),
    }
}

fn optional_number(args: &Map<String, Value>, field: &'static str) -> Result<Option<f64>> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number.as_f64().map(Some).ok_or_else(|| not_a_number(field)),
        Some(_) => Err(not_a_number(field)),
    }
}

fn not_a_number(field: &'static str) -> Error {
    Error::validation(field, format!("The '{}' field must be a number", field))
}

/// Optional positive integer. Integral floats such as `5.0` are accepted.
fn optional_positive_integer(
    args: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<u64>> {
    let invalid = || {
        Error::validation(
            field,
            format!("The '{}' field must be a positive integer", field),
        )
    };

    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            if let Some(value) = number.as_u64() {
                return if value >= 1 { Ok(Some(value)) } else { Err(invalid()) };
            }
            match number.as_f64() {
                Some(value) if value >= 1.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
                    Ok(Some(value as u64))
                }
                _ => Err(invalid()),
            }
        }
        Some(_) => Err(invalid()),
    }
}

fn coordinates(args: &Map<String, Value>) -> Result<Coordinates> {
    let latitude = required_number(args, "latitude")?;
    let longitude = required_number(args, "longitude")?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::validation(
            "latitude",
            "The 'latitude' field must be between -90 and 90",
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::validation(
            "longitude",
            "The 'longitude' field must be between -180 and 180",
        ));
    }

    Ok(Coordinates {
        latitude,
        longitude,
    })
}

/// Non-empty array holding at most [`MAX_BATCH_SIZE`] entries.
fn bounded_array(args: &Map<String, Value>, field: &'static str) -> Result<Vec<Value>> {
    let entries = match args.get(field) {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => {
            return Err(Error::validation(
                field,
                format!("The '{}' field is required and must be a non-empty array", field),
            ))
        }
    };

    if entries.len() > MAX_BATCH_SIZE {
        return Err(Error::validation(
            field,
            format!(
                "The '{}' field must not exceed {} entries per batch (got {})",
                field,
                MAX_BATCH_SIZE,
                entries.len()
            ),
        ));
    }

    Ok(entries.clone())
}

fn autocomplete(args: &Map<String, Value>) -> Result<AutocompleteInput> {
    let query = required_string(args, "query")?;
    if query.chars().count() < MIN_QUERY_LENGTH {
        return Err(Error::validation(
            "query",
            format!(
                "The 'query' field must be at least {} characters long",
                MIN_QUERY_LENGTH
            ),
        ));
    }

    let limit = optional_positive_integer(args, "limit")?.unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT);

    Ok(AutocompleteInput { query, limit })
}

fn nearby(args: &Map<String, Value>) -> Result<NearbyInput> {
    let coordinates = coordinates(args)?;

    let radius_km = optional_number(args, "radius_km")?.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if radius_km <= 0.0 {
        return Err(Error::validation(
            "radius_km",
            "The 'radius_km' field must be a positive number",
        ));
    }
    if radius_km > MAX_NEARBY_RADIUS_KM {
        return Err(Error::validation(
            "radius_km",
            format!("The 'radius_km' field cannot exceed {} km", MAX_NEARBY_RADIUS_KM),
        ));
    }

    let limit = optional_positive_integer(args, "limit")?.unwrap_or(DEFAULT_NEARBY_LIMIT);

    Ok(NearbyInput {
        coordinates,
        radius_km,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn field_of(result: Result<OperationInput>) -> &'static str {
        result.unwrap_err().field().expect("validation error")
    }

    #[test]
    fn test_geocode_requires_address() {
        let err = validate(Operation::Geocode, &args(json!({"city": "Pune"}))).unwrap_err();
        assert_eq!(err.field(), Some("address"));
        assert!(err.to_string().contains("'address'"));
    }

    #[test]
    fn test_geocode_normalizes_optional_fields() {
        let input = validate(
            Operation::Geocode,
            &args(json!({"address": "MG Road", "city": "Bengaluru", "state": ""})),
        )
        .unwrap();

        assert_eq!(
            input,
            OperationInput::Geocode(GeocodeInput {
                address: "MG Road".into(),
                city: Some("Bengaluru".into()),
                state: None,
                pincode: None,
                country: None,
            })
        );
    }

    #[test]
    fn test_geocode_rejects_non_string_optional_field() {
        let result = validate(
            Operation::Geocode,
            &args(json!({"address": "MG Road", "pincode": 560001})),
        );
        assert_eq!(field_of(result), "pincode");
    }

    #[test]
    fn test_digipin_must_be_non_empty_string() {
        for op in [
            Operation::ReverseGeocode,
            Operation::ValidateDigiPin,
            Operation::LookupLocationFromDigiPin,
        ] {
            assert_eq!(field_of(validate(op, &args(json!({})))), "digipin");
            assert_eq!(field_of(validate(op, &args(json!({"digipin": ""})))), "digipin");
            let err = validate(op, &args(json!({"digipin": 42}))).unwrap_err();
            assert!(err.to_string().contains("must be a string"));
        }
    }

    #[test]
    fn test_validate_digipin_refuses_dot_segments() {
        for dots in [".", "..", " .. "] {
            let result = validate(Operation::ValidateDigiPin, &args(json!({ "digipin": dots })));
            assert_eq!(field_of(result), "digipin");
        }
        // Slashes stay legal input; the transport encodes them.
        assert!(validate(
            Operation::ValidateDigiPin,
            &args(json!({"digipin": "../../v1/location/stats"}))
        )
        .is_ok());
    }

    #[test]
    fn test_coordinates_reject_numeric_strings() {
        let result = validate(
            Operation::CoordinatesToDigiPin,
            &args(json!({"latitude": "12.9", "longitude": 77.5})),
        );
        let err = result.unwrap_err();
        assert_eq!(err.field(), Some("latitude"));
        assert!(err.to_string().contains("must be a number"));
    }

    #[test]
    fn test_coordinate_boundaries_are_inclusive() {
        for (lat, lng) in [(-90.0, -180.0), (90.0, 180.0), (0.0, 0.0)] {
            for op in [
                Operation::CoordinatesToDigiPin,
                Operation::LookupLocationFromCoordinates,
            ] {
                let input = validate(op, &args(json!({"latitude": lat, "longitude": lng})));
                assert!(input.is_ok(), "{} ({}, {}) should be valid", op, lat, lng);
            }
        }
    }

    #[test]
    fn test_coordinates_just_outside_bounds_are_rejected() {
        let cases = [
            (90.0001, 0.0, "latitude"),
            (-90.0001, 0.0, "latitude"),
            (0.0, 180.0001, "longitude"),
            (0.0, -180.0001, "longitude"),
        ];
        for (lat, lng, field) in cases {
            for op in [
                Operation::CoordinatesToDigiPin,
                Operation::LookupLocationFromCoordinates,
            ] {
                let err = validate(op, &args(json!({"latitude": lat, "longitude": lng})))
                    .unwrap_err();
                assert_eq!(err.field(), Some(field));
                assert!(err.to_string().contains("must be between"));
            }
        }
    }

    #[test]
    fn test_batch_size_bounds() {
        let entries = |n: usize| -> Vec<Value> { (0..n).map(|i| json!({"address": i})).collect() };

        for (field, op) in [
            ("addresses", Operation::BatchGeocode),
            ("locations", Operation::BatchLocationLookup),
        ] {
            assert!(validate(op, &args(json!({ field: entries(1) }))).is_ok());
            assert!(validate(op, &args(json!({ field: entries(100) }))).is_ok());

            let empty = validate(op, &args(json!({ field: entries(0) }))).unwrap_err();
            assert!(empty.to_string().contains("non-empty array"));

            let too_many = validate(op, &args(json!({ field: entries(101) }))).unwrap_err();
            assert_eq!(too_many.field(), Some(field));
            assert!(too_many.to_string().contains("100"));
            assert!(too_many.to_string().contains("101"));
        }
    }

    #[test]
    fn test_batch_rejects_non_array() {
        let result = validate(
            Operation::BatchGeocode,
            &args(json!({"addresses": "MG Road"})),
        );
        assert_eq!(field_of(result), "addresses");
    }

    #[test]
    fn test_autocomplete_query_length() {
        let short = validate(Operation::Autocomplete, &args(json!({"query": "ab"}))).unwrap_err();
        assert!(short.to_string().contains("at least 3 characters"));

        let ok = validate(Operation::Autocomplete, &args(json!({"query": "abc"}))).unwrap();
        assert_eq!(
            ok,
            OperationInput::Autocomplete(AutocompleteInput {
                query: "abc".into(),
                limit: DEFAULT_AUTOCOMPLETE_LIMIT,
            })
        );
    }

    #[test]
    fn test_autocomplete_counts_characters_not_bytes() {
        // Two Devanagari characters, six bytes.
        let result = validate(Operation::Autocomplete, &args(json!({"query": "मु"})));
        assert_eq!(field_of(result), "query");
    }

    #[test]
    fn test_autocomplete_limit_above_cap_is_kept_for_client() {
        let input = validate(
            Operation::Autocomplete,
            &args(json!({"query": "Delhi", "limit": 11})),
        )
        .unwrap();
        assert_eq!(
            input,
            OperationInput::Autocomplete(AutocompleteInput {
                query: "Delhi".into(),
                limit: 11,
            })
        );
    }

    #[test]
    fn test_autocomplete_limit_must_be_positive_integer() {
        for bad in [json!(0), json!(-1), json!(2.5), json!("5")] {
            let result = validate(
                Operation::Autocomplete,
                &args(json!({"query": "Delhi", "limit": bad})),
            );
            assert_eq!(field_of(result), "limit");
        }
        let integral = validate(
            Operation::Autocomplete,
            &args(json!({"query": "Delhi", "limit": 4.0})),
        );
        assert!(integral.is_ok());
    }

    #[test]
    fn test_nearby_rules() {
        let input = validate(
            Operation::FindNearbyBoundaries,
            &args(json!({"latitude": 28.6, "longitude": 77.2})),
        )
        .unwrap();
        assert_eq!(
            input,
            OperationInput::FindNearbyBoundaries(NearbyInput {
                coordinates: Coordinates {
                    latitude: 28.6,
                    longitude: 77.2
                },
                radius_km: DEFAULT_NEARBY_RADIUS_KM,
                limit: DEFAULT_NEARBY_LIMIT,
            })
        );

        let too_wide = validate(
            Operation::FindNearbyBoundaries,
            &args(json!({"latitude": 28.6, "longitude": 77.2, "radius_km": 100.5})),
        );
        assert_eq!(field_of(too_wide), "radius_km");
    }

    #[test]
    fn test_fail_fast_reports_first_violation() {
        let err = validate(
            Operation::CoordinatesToDigiPin,
            &args(json!({"latitude": 200.0})),
        )
        .unwrap_err();
        // Missing longitude is checked before latitude range.
        assert_eq!(err.field(), Some("longitude"));
    }

    #[test]
    fn test_argument_free_operations_ignore_input() {
        for op in [
            Operation::GetUsage,
            Operation::GetLocationStatistics,
            Operation::GetHealth,
        ] {
            let input = validate(op, &args(json!({"anything": true}))).unwrap();
            assert_eq!(input.operation(), op);
        }
    }
}
