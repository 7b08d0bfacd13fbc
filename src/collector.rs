use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{Duration as ChronoDuration, NaiveDate};
use tracing::{debug, info};

use crate::scores_fetch::{EventSide, FixtureEvent, FixtureProvider, ScoresPage};

/// Provider fixture state. Only `Finished` results are accepted into the
/// collected list; the first entry in any other state marks the live
/// boundary and ends the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl MatchStatus {
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "PostEvent" => MatchStatus::Finished,
            "MidEvent" => MatchStatus::InProgress,
            _ => MatchStatus::Scheduled,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in-progress",
            MatchStatus::Finished => "finished",
        }
    }
}

/// One accepted result. Immutable once collected; `id` is the identity key
/// and is never accepted twice in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: MatchStatus,
    pub matchweek: String,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub fetch_delay: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid calendar date"),
            end: NaiveDate::from_ymd_opt(2026, 5, 31).expect("valid calendar date"),
            fetch_delay: Duration::from_millis(100),
        }
    }
}

/// What scanning one day's page produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// At least one result was accepted; the date of the last one seeds the
    /// next fetch.
    NextAnchor(NaiveDate),
    /// A fixture that has not finished was reached. No completed results
    /// exist beyond this point; the rest of the page goes unexamined.
    Stopped,
    /// Nothing eligible on this page.
    Empty,
}

/// Walks the season window one matchday page at a time, accumulating
/// deduplicated finished results. Constructed fresh per run; all walk state
/// (seen ids, live-boundary flag, accepted list) lives here.
#[derive(Debug)]
pub struct SeasonCollector {
    cfg: CollectorConfig,
    matches: Vec<MatchRecord>,
    seen_ids: HashSet<String>,
    reached_live_boundary: bool,
}

impl SeasonCollector {
    pub fn new(cfg: CollectorConfig) -> Self {
        Self {
            cfg,
            matches: Vec::new(),
            seen_ids: HashSet::new(),
            reached_live_boundary: false,
        }
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// True once a not-yet-finished fixture has been seen. Terminal: no
    /// further pages are fetched after this.
    pub fn reached_live_boundary(&self) -> bool {
        self.reached_live_boundary
    }

    /// Scans one page, accepting every unseen finished result from the first
    /// event group. Returns the anchor date for the next fetch, `Stopped` at
    /// the first fixture that has not finished, or `Empty` when the page
    /// contributed nothing.
    pub fn parse_page(&mut self, page: &ScoresPage) -> PageOutcome {
        let Some(first_group) = page.event_groups.first() else {
            return PageOutcome::Empty;
        };

        let mut next_anchor = None;
        for group in &first_group.secondary_groups {
            for event in &group.events {
                let Some((id, date, home, away)) = eligible_entry(event) else {
                    continue;
                };
                if self.seen_ids.contains(id) {
                    continue;
                }
                self.seen_ids.insert(id.to_string());

                let status = MatchStatus::from_provider(&event.status);
                if status != MatchStatus::Finished {
                    self.reached_live_boundary = true;
                    return PageOutcome::Stopped;
                }

                self.matches.push(MatchRecord {
                    id: id.to_string(),
                    date,
                    home_team: home.full_name.clone(),
                    away_team: away.full_name.clone(),
                    home_score: home.score,
                    away_score: away.score,
                    status,
                    matchweek: group.title.clone(),
                });
                next_anchor = Some(date);
            }
        }

        match next_anchor {
            Some(date) => PageOutcome::NextAnchor(date),
            None => PageOutcome::Empty,
        }
    }

    /// Hands the accumulated list to the caller.
    pub fn into_matches(self) -> Vec<MatchRecord> {
        self.matches
    }

    /// Walks the configured window. An accepted page seeds the next cursor
    /// from its last result's date; pages with nothing to accept fall back
    /// to single-day advancement, so the walk never stalls. Stops at the
    /// live boundary or when the next cursor would leave the window.
    pub fn run(&mut self, provider: &impl FixtureProvider) -> Result<&[MatchRecord]> {
        let mut current = self.cfg.start;

        while !self.reached_live_boundary {
            info!(date = %current, collected = self.matches.len(), "fetching matchday");
            let page = provider.fetch_day(current)?;

            let next = match self.parse_page(&page) {
                // Clamped so a page whose trailing entry predates the
                // cursor can never move it backwards.
                PageOutcome::NextAnchor(anchor) => {
                    anchor.max(current) + ChronoDuration::days(1)
                }
                PageOutcome::Stopped | PageOutcome::Empty => current + ChronoDuration::days(1),
            };

            if next > self.cfg.end {
                break;
            }
            current = next;
            thread::sleep(self.cfg.fetch_delay);
        }

        debug!(
            collected = self.matches.len(),
            live_boundary = self.reached_live_boundary,
            "season walk complete"
        );
        Ok(&self.matches)
    }
}

/// Splits out the fields a usable entry must carry. Entries missing any of
/// them are malformed and dropped without touching the seen set or the
/// anchor.
fn eligible_entry(event: &FixtureEvent) -> Option<(&str, NaiveDate, &EventSide, &EventSide)> {
    let home = event.home.as_ref()?;
    let away = event.away.as_ref()?;
    let id = event.id.as_deref()?;
    let date = event_date(&event.start_time)?;
    Some((id, date, home, away))
}

/// The provider sends an ISO date-time; only the leading calendar date
/// matters here.
fn event_date(start_time: &str) -> Option<NaiveDate> {
    let day = start_time.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
