//! Sunrise and sunset from the sunrise-sunset.org JSON API.

use std::time::Duration;

use chrono::NaiveDate;
use hued_app::ports::SunDataSource;
use hued_domain::error::HuedError;
use hued_domain::sun::{Coordinates, SunTimes};
use hued_domain::time::Timestamp;
use serde::Deserialize;
use serde::de::IgnoredAny;

/// Errors fetching sun times.
#[derive(Debug, thiserror::Error)]
pub enum SunApiError {
    /// The request failed or the body did not decode.
    #[error("sun data request failed")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status other than `OK`.
    #[error("sun data API answered `{0}`")]
    Status(String),
}

impl From<SunApiError> for HuedError {
    fn from(err: SunApiError) -> Self {
        Self::External(Box::new(err))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    results: MaybeResults,
}

/// `results` is an empty string when the request was refused.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MaybeResults {
    Times(ApiResults),
    Empty(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct ApiResults {
    sunrise: Timestamp,
    sunset: Timestamp,
}

fn parse_response(response: ApiResponse) -> Result<SunTimes, SunApiError> {
    match (response.status.as_str(), response.results) {
        ("OK", MaybeResults::Times(results)) => Ok(SunTimes {
            sunrise: results.sunrise,
            sunset: results.sunset,
        }),
        _ => Err(SunApiError::Status(response.status)),
    }
}

/// Client for `GET {api_url}?lat=..&lng=..&date=..&formatted=0`.
#[derive(Debug, Clone)]
pub struct SunriseSunsetApi {
    client: reqwest::Client,
    api_url: String,
}

impl SunriseSunsetApi {
    /// # Errors
    ///
    /// Returns [`SunApiError::Http`] if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, SunApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    fn url(&self, coordinates: Coordinates, date: NaiveDate) -> String {
        format!(
            "{}?lat={}&lng={}&date={}&formatted=0",
            self.api_url, coordinates.latitude, coordinates.longitude, date
        )
    }

    async fn fetch(&self, coordinates: Coordinates, date: NaiveDate) -> Result<SunTimes, SunApiError> {
        let url = self.url(coordinates, date);
        tracing::debug!(%url, "requesting sun data");
        let response: ApiResponse = self.client.get(&url).send().await?.json().await?;
        parse_response(response)
    }
}

impl SunDataSource for SunriseSunsetApi {
    async fn sun_times(&self, coordinates: Coordinates, date: NaiveDate) -> Result<SunTimes, HuedError> {
        Ok(self.fetch(coordinates, date).await?)
    }
}
