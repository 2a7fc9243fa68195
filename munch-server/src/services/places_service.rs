use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use munch_api::{CatalogSource, Coordinates};
use serde::Deserialize;

use crate::configs::Places;
use crate::errors::PlacesError;
use crate::models::CandidateVenue;

const METERS_PER_MILE: f64 = 1609.34;

const DEFAULT_NAME: &str = "Unknown Restaurant";
const DEFAULT_ADDRESS: &str = "Address not available";
const DEFAULT_PHONE: &str = "Phone not available";
const DEFAULT_HOURS: &str = "Hours not available";
const DEFAULT_PHOTO: &str = "/sample.webp";
const OPEN_ALL_DAY: &str = "Open 24 hours";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Rounds up so the searched area never shrinks below what was asked for.
pub fn miles_to_meters(miles: f64) -> i32 {
    (miles * METERS_PER_MILE).ceil() as i32
}

/// A geosearch backend returning restaurants around a point.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search(
        &self,
        center: Coordinates,
        radius_meters: i32,
        limit: u32,
    ) -> Result<Vec<CandidateVenue>, PlacesError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacesSource {
    Live,
    Fallback { reason: String },
}

impl PlacesSource {
    pub fn catalog_source(&self) -> CatalogSource {
        match self {
            PlacesSource::Live => CatalogSource::Live,
            PlacesSource::Fallback { .. } => CatalogSource::Fallback,
        }
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            PlacesSource::Live => None,
            PlacesSource::Fallback { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacesResult {
    pub source: PlacesSource,
    pub venues: Vec<CandidateVenue>,
}

/// Searches through a provider and substitutes the sample venues whenever it fails.
#[derive(Clone)]
pub struct PlacesService {
    provider: Arc<dyn PlacesProvider>,
    limit: u32,
}

impl PlacesService {
    pub fn new(provider: Arc<dyn PlacesProvider>, limit: u32) -> Self {
        Self { provider, limit }
    }

    pub async fn search(&self, center: Coordinates, radius_meters: i32) -> PlacesResult {
        match self.provider.search(center, radius_meters, self.limit).await {
            Ok(venues) => {
                tracing::debug!(count = venues.len(), radius_meters, "fetched live venues");

                PlacesResult {
                    source: PlacesSource::Live,
                    venues,
                }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(reason = %reason, "places provider unavailable, serving sample venues");

                PlacesResult {
                    source: PlacesSource::Fallback { reason },
                    venues: fallback_venues(),
                }
            }
        }
    }
}

/// Client for the Geoapify places API.
#[derive(Clone)]
pub struct GeoapifyClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeoapifyClient {
    pub fn new(places: &Places) -> Result<Self, PlacesError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(places.timeout_secs))
            .connect_timeout(Duration::from_secs(places.timeout_secs.min(5)))
            .build()?;

        Ok(Self {
            http_client,
            base_url: places.base_url.trim_end_matches('/').to_string(),
            api_key: places.api_key.clone(),
        })
    }
}

#[async_trait]
impl PlacesProvider for GeoapifyClient {
    async fn search(
        &self,
        center: Coordinates,
        radius_meters: i32,
        limit: u32,
    ) -> Result<Vec<CandidateVenue>, PlacesError> {
        let api_key = self.api_key.as_deref().ok_or(PlacesError::MissingApiKey)?;

        let filter = format!("circle:{},{},{}", center.lng, center.lat, radius_meters);
        let limit = limit.to_string();

        let response = self
            .http_client
            .get(format!("{}/v2/places", self.base_url))
            .query(&[
                ("categories", "catering.restaurant"),
                ("filter", filter.as_str()),
                ("limit", limit.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::Status(status));
        }

        let body = response.text().await?;

        parse_features(&body)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Properties {
    place_id: Option<String>,
    name: Option<String>,
    formatted: Option<String>,
    address_line2: Option<String>,
    phone: Option<String>,
    opening_hours: Option<OpeningHours>,
    photo_url: Option<String>,
    rating: Option<f64>,
    rating_count: Option<i64>,
}

/// `[lng, lat]` pair.
#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpeningHours {
    Text(String),
    Weekdays { weekday_text: Vec<String> },
    Periods { periods: Vec<Period> },
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct Period {
    open: PeriodPoint,
    /// Absent for places that never close.
    close: Option<PeriodPoint>,
}

#[derive(Debug, Deserialize)]
struct PeriodPoint {
    day: usize,
    time: String,
}

impl OpeningHours {
    fn describe(&self) -> Option<String> {
        match self {
            OpeningHours::Text(text) => Some(text.clone()),
            OpeningHours::Weekdays { weekday_text } => Some(weekday_text.join(", ")),
            OpeningHours::Periods { periods } => periods
                .iter()
                .map(|period| {
                    let day = WEEKDAYS.get(period.open.day)?;
                    Some(match &period.close {
                        Some(close) => format!(
                            "{}: {}-{}",
                            day,
                            format_time(&period.open.time),
                            format_time(&close.time)
                        ),
                        None if period.open.time == "0000" => format!("{day}: {OPEN_ALL_DAY}"),
                        None => format!("{}: from {}", day, format_time(&period.open.time)),
                    })
                })
                .collect::<Option<Vec<_>>>()
                .map(|lines| lines.join(", ")),
            OpeningHours::Other(_) => None,
        }
    }
}

/// Formats `HHMM` on a 12 hour clock, e.g. `1730` as `5:30 PM`.
fn format_time(time: &str) -> String {
    if time.is_empty() {
        return String::new();
    }

    let Some(hour) = time.get(0..2).and_then(|hour| hour.parse::<u32>().ok()) else {
        return time.to_string();
    };
    let minute = time.get(2..4).unwrap_or("00");
    let period = if hour >= 12 { "PM" } else { "AM" };
    let hour = match hour % 12 {
        0 => 12,
        hour => hour,
    };

    format!("{hour}:{minute} {period}")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_features(body: &str) -> Result<Vec<CandidateVenue>, PlacesError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;

    let venues = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let Feature {
                properties,
                geometry,
            } = feature;

            let Some(provider_id) = non_empty(properties.place_id) else {
                tracing::warn!(name = ?properties.name, "skipping venue without place id");
                return None;
            };

            let (longitude, latitude) = match geometry.as_ref().map(|g| g.coordinates.as_slice()) {
                Some([lng, lat, ..]) => (Some(*lng), Some(*lat)),
                _ => (None, None),
            };

            Some(CandidateVenue {
                provider_id,
                name: non_empty(properties.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
                address: non_empty(properties.formatted)
                    .or_else(|| non_empty(properties.address_line2))
                    .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
                phone: non_empty(properties.phone).unwrap_or_else(|| DEFAULT_PHONE.to_string()),
                opening_hours: properties
                    .opening_hours
                    .as_ref()
                    .and_then(OpeningHours::describe)
                    .filter(|hours| !hours.is_empty())
                    .unwrap_or_else(|| DEFAULT_HOURS.to_string()),
                photo: non_empty(properties.photo_url)
                    .unwrap_or_else(|| DEFAULT_PHOTO.to_string()),
                rating: properties.rating.unwrap_or(0.0),
                review_count: properties.rating_count.unwrap_or(0),
                latitude,
                longitude,
            })
        })
        .collect();

    Ok(venues)
}

/// Sample venues served when the provider cannot be reached.
pub fn fallback_venues() -> Vec<CandidateVenue> {
    [
        ("Pasta Paradise", "123 Main St, Cityville", "(555) 123-4567", "Mon-Sat: 11AM-10PM", 4.7, 243),
        ("Burger Bistro", "456 Oak Ave, Townsburg", "(555) 987-6543", "Daily: 10AM-11PM", 4.3, 187),
        ("Sushi Sensation", "789 Pine Rd, Villageton", "(555) 456-7890", "Tue-Sun: 12PM-9PM", 4.9, 312),
        ("Taco Temple", "101 Elm St, Hamletville", "(555) 234-5678", "Mon-Sun: 11AM-9PM", 4.5, 178),
        ("Pizza Palace", "202 Maple Ave, Boroughton", "(555) 345-6789", "Tue-Sun: 12PM-11PM", 4.6, 256),
        ("Dim Sum Delight", "303 Cedar Rd, Districtville", "(555) 456-7890", "Wed-Mon: 10AM-8PM", 4.8, 201),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, address, phone, hours, rating, reviews))| CandidateVenue {
        provider_id: format!("fallback-{}", index + 1),
        name: name.to_string(),
        address: address.to_string(),
        phone: phone.to_string(),
        opening_hours: hours.to_string(),
        photo: DEFAULT_PHOTO.to_string(),
        rating,
        review_count: reviews,
        latitude: None,
        longitude: None,
    })
    .collect()
}
