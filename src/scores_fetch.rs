use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::http_client::http_client;

const SCORES_URL: &str =
    "https://web-cdn.api.bbci.co.uk/wc-poll-data/container/sport-data-scores-fixtures";

pub const PREMIER_LEAGUE_URN: &str = "urn:bbc:sportsdata:football:tournament:premier-league";

/// One day's slice of the scores endpoint, grouped by matchday. The payload
/// nests fixtures as `eventGroups[].secondaryGroups[].events[]`; only the
/// first event group carries tournament data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoresPage {
    #[serde(rename = "eventGroups", default)]
    pub event_groups: Vec<EventGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventGroup {
    #[serde(rename = "secondaryGroups", default)]
    pub secondary_groups: Vec<SecondaryGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecondaryGroup {
    /// Matchday label, e.g. "Matchweek 7".
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub events: Vec<FixtureEvent>,
}

/// A single fixture entry. Everything is optional at the wire level; entries
/// missing the fields the collector needs are dropped there, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "startTime", default)]
    pub start_time: String,
    #[serde(default)]
    pub home: Option<EventSide>,
    #[serde(default)]
    pub away: Option<EventSide>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSide {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub score: Option<u32>,
}

pub fn parse_scores_page_json(raw: &str) -> Result<ScoresPage> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ScoresPage::default());
    }
    serde_json::from_str(trimmed).context("invalid scores page json")
}

/// Fetches all fixtures associated with one calendar date. Errors propagate
/// to the caller unchanged; providers do not retry.
pub trait FixtureProvider {
    fn fetch_day(&self, date: NaiveDate) -> Result<ScoresPage>;
}

#[derive(Debug, Clone)]
pub struct BbcFixtureProvider {
    tournament_urn: String,
}

impl BbcFixtureProvider {
    pub fn new(tournament_urn: impl Into<String>) -> Self {
        Self {
            tournament_urn: tournament_urn.into(),
        }
    }
}

impl FixtureProvider for BbcFixtureProvider {
    fn fetch_day(&self, date: NaiveDate) -> Result<ScoresPage> {
        let client = http_client()?;
        let day = date.format("%Y-%m-%d").to_string();
        let resp = client
            .get(SCORES_URL)
            .query(&[
                ("selectedStartDate", day.as_str()),
                ("selectedEndDate", day.as_str()),
                ("todayDate", day.as_str()),
                ("urn", self.tournament_urn.as_str()),
            ])
            .send()
            .with_context(|| format!("scores request failed for {day}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading scores body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {}: {}", status, body));
        }
        parse_scores_page_json(&body)
    }
}
