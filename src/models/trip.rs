use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Shown when a request is submitted with blank fields
pub const INCOMPLETE_REQUEST_MESSAGE: &str = "Please fill in all fields.";

/// Trip parameters collected from the user, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    /// City (or country) the traveller departs from
    pub origin: String,
    /// City the itinerary is planned for
    pub destination: String,
    /// First day of the trip
    pub start_date: NaiveDate,
    /// Last day of the trip
    pub end_date: NaiveDate,
    /// Free-text interests, passed to the model verbatim
    pub interests: String,
}

impl TripRequest {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interests: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            start_date,
            end_date,
            interests: interests.into(),
        }
    }

    /// Names of the text fields left blank.
    ///
    /// Only the CLI consults this; stage building interpolates whatever it is given.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("interests", &self.interests),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Refuse a request with blank fields, logging which ones
    pub fn ensure_complete(&self) -> anyhow::Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        warn!("Missing fields: {}", missing.join(", "));
        anyhow::bail!(INCOMPLETE_REQUEST_MESSAGE)
    }

    /// Destination reduced to something safe to embed in a file name
    pub fn destination_slug(&self) -> String {
        let slug: String = self
            .destination
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let slug = slug.trim_matches('.').trim();

        if slug.is_empty() {
            "destination".to_string()
        } else {
            slug.to_string()
        }
    }
}
