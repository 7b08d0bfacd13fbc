use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::collector::MatchRecord;

const BASELINE_RATING: f64 = 1500.0;

#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    pub k: f64,
    pub home_adv_pts: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k: 20.0,
            home_adv_pts: 0.0,
        }
    }
}

/// One post-update rating snapshot. Two are appended per processed match,
/// home side first, so the trace length is always twice the match count.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub team: String,
    pub rating: f64,
}

/// Logistic expectation: the probability that a rating `r_a` side beats a
/// rating `r_b` side.
pub fn expected_score(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((r_b - r_a) / 400.0))
}

/// Sequential zero-sum rating engine. The team universe is fixed at
/// construction from the full match list; every team starts at exactly
/// 1500 and unknown teams are rejected rather than registered on demand.
#[derive(Debug, Clone)]
pub struct EloEngine {
    cfg: EloConfig,
    ratings: HashMap<String, f64>,
    // First-appearance order, so equal ratings rank deterministically.
    team_order: Vec<String>,
    history: Vec<HistoryEntry>,
}

impl EloEngine {
    pub fn new(matches: &[MatchRecord], cfg: EloConfig) -> Self {
        let mut ratings = HashMap::new();
        let mut team_order = Vec::new();
        for m in matches {
            for team in [&m.home_team, &m.away_team] {
                if !ratings.contains_key(team.as_str()) {
                    ratings.insert(team.clone(), BASELINE_RATING);
                    team_order.push(team.clone());
                }
            }
        }
        Self {
            cfg,
            ratings,
            team_order,
            history: Vec::new(),
        }
    }

    pub fn ratings(&self) -> &HashMap<String, f64> {
        &self.ratings
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Applies one result. Both expectations are computed from the
    /// pre-update ratings, with the home-advantage bonus folded into the
    /// home rating in each call; the bonus never reaches the stored rating.
    pub fn update_match(
        &mut self,
        home: &str,
        away: &str,
        home_goals: u32,
        away_goals: u32,
    ) -> Result<()> {
        let r_home = self.rating_of(home)?;
        let r_away = self.rating_of(away)?;

        let (s_home, s_away) = match home_goals.cmp(&away_goals) {
            Ordering::Greater => (1.0, 0.0),
            Ordering::Equal => (0.5, 0.5),
            Ordering::Less => (0.0, 1.0),
        };

        let e_home = expected_score(r_home + self.cfg.home_adv_pts, r_away);
        let e_away = expected_score(r_away, r_home + self.cfg.home_adv_pts);

        let new_home = r_home + self.cfg.k * (s_home - e_home);
        let new_away = r_away + self.cfg.k * (s_away - e_away);
        if let Some(rating) = self.ratings.get_mut(home) {
            *rating = new_home;
        }
        if let Some(rating) = self.ratings.get_mut(away) {
            *rating = new_away;
        }
        Ok(())
    }

    /// Folds every match in input order (the caller supplies them
    /// chronologically; nothing is sorted here) and appends one post-update
    /// history entry per side. On error the table and trace are left
    /// partially updated and must not be trusted.
    pub fn run_season(&mut self, matches: &[MatchRecord]) -> Result<&HashMap<String, f64>> {
        for m in matches {
            let (Some(home_goals), Some(away_goals)) = (m.home_score, m.away_score) else {
                bail!("match {} has no final score", m.id);
            };
            self.update_match(&m.home_team, &m.away_team, home_goals, away_goals)?;
            for team in [&m.home_team, &m.away_team] {
                let rating = self.rating_of(team)?;
                self.history.push(HistoryEntry {
                    team: team.clone(),
                    rating,
                });
            }
        }
        Ok(&self.ratings)
    }

    /// Rating-descending snapshot; equal ratings keep first-appearance
    /// order (stable sort).
    pub fn rankings(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .team_order
            .iter()
            .filter_map(|team| self.ratings.get(team).map(|r| (team.clone(), *r)))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        out
    }

    fn rating_of(&self, team: &str) -> Result<f64> {
        match self.ratings.get(team) {
            Some(rating) => Ok(*rating),
            None => bail!("team {team:?} is not part of the rating universe"),
        }
    }
}
