//! Match history lookup.
//!
//! [`MatchLookup`] is what the prediction flow needs from a match source.
//! [`OfflineMatchStore`] serves the built-in fixture dataset and stands in
//! whenever no backend is configured, so lookups never fail for lack of one.

use std::collections::{BTreeSet, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use statsapp_models::{MatchHistory, MatchRecord, PredictionParams};
use tracing::debug;

use crate::fixtures::offline_matches;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// All results are ordered most recent first and hold at most `limit` matches.
#[async_trait]
pub trait MatchLookup: Send + Sync {
    async fn all_matches(&self, limit: usize) -> Result<Vec<MatchRecord>>;

    /// Matches whose home team contains `home_team` and whose away team
    /// contains `away_team`. A missing or blank filter matches everything.
    async fn search_matches(
        &self,
        home_team: Option<&str>,
        away_team: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MatchRecord>>;

    /// Matches where `team` played on either side.
    async fn search_by_team(&self, team: &str, limit: usize) -> Result<Vec<MatchRecord>>;

    /// Distinct team names, sorted.
    async fn team_names(&self) -> Result<Vec<String>>;
}

/// Collapses whitespace runs and escapes the LIKE escape character and the
/// wildcards `%` and `_`.
pub fn sanitize_like_pattern(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    Literal(char),
    AnyChar,
    AnyRun,
}

/// Case-insensitive `ILIKE '%pattern%'` filter over a team name, built from
/// user input through [`sanitize_like_pattern`] so the input only ever
/// matches literally.
#[derive(Debug, Clone)]
struct TeamFilter {
    tokens: Vec<LikeToken>,
}

impl TeamFilter {
    /// `None` for a missing or blank filter.
    fn parse(input: Option<&str>) -> Option<Self> {
        let pattern = sanitize_like_pattern(input?).to_lowercase();
        if pattern.is_empty() {
            return None;
        }

        let mut tokens = Vec::with_capacity(pattern.len());
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            tokens.push(match c {
                '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
                '%' => LikeToken::AnyRun,
                '_' => LikeToken::AnyChar,
                other => LikeToken::Literal(other),
            });
        }
        Some(Self { tokens })
    }

    fn matches(&self, name: &str) -> bool {
        let text: Vec<char> = name.to_lowercase().chars().collect();
        (0..=text.len()).any(|start| matches_prefix(&text[start..], &self.tokens))
    }
}

fn matches_prefix(text: &[char], tokens: &[LikeToken]) -> bool {
    match tokens.split_first() {
        None => true,
        Some((LikeToken::Literal(c), rest)) => {
            text.first() == Some(c) && matches_prefix(&text[1..], rest)
        }
        Some((LikeToken::AnyChar, rest)) => !text.is_empty() && matches_prefix(&text[1..], rest),
        Some((LikeToken::AnyRun, rest)) => {
            (0..=text.len()).any(|skip| matches_prefix(&text[skip..], rest))
        }
    }
}

fn most_recent_first(mut matches: Vec<MatchRecord>, limit: usize) -> Vec<MatchRecord> {
    matches.sort_by(|a, b| b.match_time.cmp(&a.match_time));
    matches.truncate(limit);
    matches
}

#[derive(Debug, Clone)]
pub struct OfflineMatchStore {
    matches: Vec<MatchRecord>,
}

impl OfflineMatchStore {
    pub fn new() -> Self {
        Self::with_matches(offline_matches())
    }

    pub fn with_matches(matches: Vec<MatchRecord>) -> Self {
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl Default for OfflineMatchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchLookup for OfflineMatchStore {
    async fn all_matches(&self, limit: usize) -> Result<Vec<MatchRecord>> {
        Ok(most_recent_first(self.matches.clone(), limit))
    }

    async fn search_matches(
        &self,
        home_team: Option<&str>,
        away_team: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MatchRecord>> {
        let home = TeamFilter::parse(home_team);
        let away = TeamFilter::parse(away_team);

        let found = self
            .matches
            .iter()
            .filter(|m| home.as_ref().map_or(true, |filter| filter.matches(&m.home_team)))
            .filter(|m| away.as_ref().map_or(true, |filter| filter.matches(&m.away_team)))
            .cloned()
            .collect();

        Ok(most_recent_first(found, limit))
    }

    async fn search_by_team(&self, team: &str, limit: usize) -> Result<Vec<MatchRecord>> {
        let Some(filter) = TeamFilter::parse(Some(team)) else {
            return Ok(Vec::new());
        };

        let found = self
            .matches
            .iter()
            .filter(|m| filter.matches(&m.home_team) || filter.matches(&m.away_team))
            .cloned()
            .collect();

        Ok(most_recent_first(found, limit))
    }

    async fn team_names(&self) -> Result<Vec<String>> {
        let names: BTreeSet<&str> = self
            .matches
            .iter()
            .flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()])
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }
}

/// Collects the three histories the baseline model reads: meetings of the
/// pair, the home team's other home matches and the away team's other away
/// matches.
pub async fn gather_history(
    lookup: &dyn MatchLookup,
    params: &PredictionParams,
    limit: usize,
) -> Result<MatchHistory> {
    let head_to_head = lookup
        .search_matches(Some(params.home_team.as_str()), Some(params.away_team.as_str()), limit)
        .await?;
    let seen: HashSet<i64> = head_to_head.iter().map(|m| m.id).collect();

    let home_matches: Vec<MatchRecord> = lookup
        .search_matches(Some(params.home_team.as_str()), None, limit)
        .await?
        .into_iter()
        .filter(|m| !seen.contains(&m.id))
        .collect();
    let away_matches: Vec<MatchRecord> = lookup
        .search_matches(None, Some(params.away_team.as_str()), limit)
        .await?
        .into_iter()
        .filter(|m| !seen.contains(&m.id))
        .collect();

    debug!(
        "History for {} vs {}: {} h2h, {} home, {} away",
        params.home_team,
        params.away_team,
        head_to_head.len(),
        home_matches.len(),
        away_matches.len()
    );

    Ok(MatchHistory {
        head_to_head,
        home_matches,
        away_matches,
    })
}
