//! The operation table shared by the HTTP and tool-call front-ends.
//!
//! Every backend capability is described once here: its tool name, its HTTP
//! endpoint segment, the HTTP methods that reach it, how GET query parameters map
//! onto argument fields, and whether it is enabled. Both dispatchers resolve
//! names through this table and never keep their own routing lists.

use std::fmt;

/// Canonical gateway operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Geocode,
    ReverseGeocode,
    CoordinatesToDigiPin,
    ValidateDigiPin,
    BatchGeocode,
    Autocomplete,
    LookupLocationFromCoordinates,
    LookupLocationFromDigiPin,
    BatchLocationLookup,
    FindNearbyBoundaries,
    GetUsage,
    GetLocationStatistics,
    GetHealth,
}

/// HTTP methods understood by the REST front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
        }
    }

    /// Parse an HTTP method name (case-sensitive, as on the wire).
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(HttpVerb::Get),
            "POST" => Some(HttpVerb::Post),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping of one GET query parameter onto an argument field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParam {
    /// Name on the URL (e.g. `q`).
    pub name: &'static str,
    /// Argument field it populates (e.g. `query`).
    pub field: &'static str,
    /// Convert the raw string to a JSON number when it parses as one.
    pub numeric: bool,
    /// Placeholder value shown in the HTTP documentation.
    pub example: &'static str,
}

/// Static description of one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationSpec {
    pub operation: Operation,
    /// snake_case name on the tool-call surface.
    pub tool_name: &'static str,
    /// Hyphenated first path segment on the HTTP surface.
    pub endpoint: &'static str,
    /// HTTP methods accepted for `endpoint`.
    pub methods: &'static [HttpVerb],
    /// GET query parameters and the fields they fill.
    pub query_params: &'static [QueryParam],
    /// Backend path (template) this operation calls.
    pub backend_path: &'static str,
    /// Disabled operations fail with "not implemented" before validation.
    pub enabled: bool,
    /// Tool description published by `tools/list`.
    pub description: &'static str,
    /// One-line summary for the HTTP documentation payload.
    pub summary: &'static str,
}

const GET: &[HttpVerb] = &[HttpVerb::Get];
const POST: &[HttpVerb] = &[HttpVerb::Post];
const GET_OR_POST: &[HttpVerb] = &[HttpVerb::Get, HttpVerb::Post];

const NO_QUERY: &[QueryParam] = &[];

/// Maximum number of entries accepted by batch operations.
pub const MAX_BATCH_SIZE: usize = 100;

/// The operation table, in publication order.
pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        operation: Operation::Geocode,
        tool_name: "geocode",
        endpoint: "geocode",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/digipin/geocode",
        enabled: true,
        description: "Geocode an address to get DigiPin code and coordinates. Returns location \
                      information including latitude, longitude, and DigiPin.",
        summary: "Geocode an address",
    },
    OperationSpec {
        operation: Operation::ReverseGeocode,
        tool_name: "reverse_geocode",
        endpoint: "reverse-geocode",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/digipin/reverse",
        enabled: true,
        description: "Reverse geocode a DigiPin code to get coordinates and address information.",
        summary: "Reverse geocode a DigiPin",
    },
    OperationSpec {
        operation: Operation::CoordinatesToDigiPin,
        tool_name: "coordinates_to_digipin",
        endpoint: "coordinates-to-digipin",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/digipin/coordinates-to-digipin",
        enabled: true,
        description: "Convert latitude and longitude coordinates to a DigiPin code.",
        summary: "Convert coordinates to DigiPin",
    },
    OperationSpec {
        operation: Operation::ValidateDigiPin,
        tool_name: "validate_digipin",
        endpoint: "validate-digipin",
        methods: GET_OR_POST,
        query_params: &[QueryParam {
            name: "digipin",
            field: "digipin",
            numeric: false,
            example: "XXX-XXX-XXXX",
        }],
        backend_path: "/v1/digipin/validate/{digipin}",
        enabled: true,
        description: "Validate a DigiPin format and check if it corresponds to a real location.",
        summary: "Validate DigiPin format",
    },
    OperationSpec {
        operation: Operation::BatchGeocode,
        tool_name: "batch_geocode",
        endpoint: "batch-geocode",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/digipin/batch",
        enabled: true,
        description: "Geocode multiple addresses in a single batch request (up to 100 addresses).",
        summary: "Geocode multiple addresses",
    },
    OperationSpec {
        operation: Operation::Autocomplete,
        tool_name: "autocomplete",
        endpoint: "autocomplete",
        methods: GET,
        query_params: &[
            QueryParam {
                name: "q",
                field: "query",
                numeric: false,
                example: "query",
            },
            QueryParam {
                name: "limit",
                field: "limit",
                numeric: true,
                example: "5",
            },
        ],
        backend_path: "/v1/digipin/autocomplete",
        enabled: true,
        description: "Get autocomplete suggestions for addresses (minimum 3 characters).",
        summary: "Get address autocomplete suggestions",
    },
    OperationSpec {
        operation: Operation::LookupLocationFromCoordinates,
        tool_name: "lookup_location_from_coordinates",
        endpoint: "lookup-location-from-coordinates",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/location/lookup",
        enabled: true,
        description: "Get administrative boundaries (pincode, state, division, locality) from \
                      coordinates.",
        summary: "Get location details from coordinates",
    },
    OperationSpec {
        operation: Operation::LookupLocationFromDigiPin,
        tool_name: "lookup_location_from_digipin",
        endpoint: "lookup-location-from-digipin",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/location/lookup",
        enabled: true,
        description: "Get administrative boundaries from a DigiPin code.",
        summary: "Get location details from DigiPin",
    },
    OperationSpec {
        operation: Operation::BatchLocationLookup,
        tool_name: "batch_location_lookup",
        endpoint: "batch-location-lookup",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/location/batch-lookup",
        enabled: true,
        description: "Batch lookup for multiple locations. Each location can be specified by \
                      coordinates or DigiPin (up to 100 locations).",
        summary: "Batch location lookup",
    },
    OperationSpec {
        operation: Operation::FindNearbyBoundaries,
        tool_name: "find_nearby_boundaries",
        endpoint: "find-nearby-boundaries",
        methods: POST,
        query_params: NO_QUERY,
        backend_path: "/v1/location/nearby",
        // Backend endpoint does not exist yet.
        enabled: false,
        description: "Find nearby postal boundaries within a specified radius (experimental \
                      feature, not yet available).",
        summary: "Find nearby postal boundaries (NOT YET IMPLEMENTED - Coming Soon)",
    },
    OperationSpec {
        operation: Operation::GetUsage,
        tool_name: "get_usage",
        endpoint: "usage",
        methods: GET,
        query_params: NO_QUERY,
        backend_path: "/v1/digipin/usage",
        enabled: true,
        description: "Get API usage statistics and quota information.",
        summary: "Get API usage statistics",
    },
    OperationSpec {
        operation: Operation::GetLocationStatistics,
        tool_name: "get_location_statistics",
        endpoint: "location-statistics",
        methods: GET,
        query_params: NO_QUERY,
        backend_path: "/v1/location/stats",
        enabled: true,
        description: "Get live statistics about the Location Lookup service (total boundaries, \
                      states, divisions, etc.).",
        summary: "Get location lookup statistics",
    },
    OperationSpec {
        operation: Operation::GetHealth,
        tool_name: "get_health",
        endpoint: "health",
        methods: GET,
        query_params: NO_QUERY,
        backend_path: "/health",
        enabled: true,
        description: "Check API health status and availability.",
        summary: "Health check",
    },
];

impl Operation {
    /// All operations in table order.
    pub fn all() -> impl Iterator<Item = Operation> {
        OPERATIONS.iter().map(|spec| spec.operation)
    }

    pub fn spec(self) -> &'static OperationSpec {
        OPERATIONS
            .iter()
            .find(|spec| spec.operation == self)
            .unwrap_or_else(|| unreachable!("operation {:?} missing from table", self))
    }

    /// Resolve an exact snake_case tool name.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|spec| spec.tool_name == name)
            .map(|spec| spec.operation)
    }

    /// Resolve an HTTP endpoint segment together with its method.
    ///
    /// Returns `None` when the segment is unknown or does not accept `verb`.
    pub fn from_endpoint(endpoint: &str, verb: HttpVerb) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|spec| spec.endpoint == endpoint && spec.methods.contains(&verb))
            .map(|spec| spec.operation)
    }

    pub fn tool_name(self) -> &'static str {
        self.spec().tool_name
    }

    pub fn endpoint(self) -> &'static str {
        self.spec().endpoint
    }

    pub fn is_enabled(self) -> bool {
        self.spec().enabled
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}
