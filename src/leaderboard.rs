//! Client-side view of the score store: a wholesale-replaced cache, display
//! filtering and rank lookup for a just-submitted score.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;

use crate::config::{MAX_LEADERBOARD_ENTRIES_DISPLAY, RANK_TIME_TOLERANCE};
use crate::error::{ApiError, SubmitError};
use crate::util::{cerror, cinfo, cwarn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default)]
    pub name: String,
    /// Missing, null or non-numeric times sort last.
    #[serde(default, deserialize_with = "lenient_time")]
    pub time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub dimension: u32,
}

// One malformed row must not fail the whole board.
fn lenient_time<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(de)?.as_f64())
}

fn lenient_dimension<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(value.as_u64().and_then(|d| u32::try_from(d).ok()).unwrap_or_default())
}

impl ScoreEntry {
    fn sort_key(&self) -> f64 {
        self.time.filter(|t| t.is_finite()).unwrap_or(f64::INFINITY)
    }
}

fn by_time(a: &&ScoreEntry, b: &&ScoreEntry) -> Ordering {
    a.sort_key().total_cmp(&b.sort_key())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimensionFilter {
    All,
    Size(u32),
}

impl DimensionFilter {
    /// Parses a select value: `"all"` or a dimension.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<u32>() {
            Ok(d) if d > 0 => DimensionFilter::Size(d),
            _ => DimensionFilter::All,
        }
    }

    pub fn value(self) -> String {
        match self {
            DimensionFilter::All => "all".to_string(),
            DimensionFilter::Size(d) => d.to_string(),
        }
    }

    fn accepts(self, entry: &ScoreEntry) -> bool {
        match self {
            DimensionFilter::All => true,
            DimensionFilter::Size(d) => entry.dimension == d,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rank {
    Known(usize),
    Unknown,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Known(n) => write!(f, "{n}"),
            Rank::Unknown => f.write_str("N/A"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankData {
    pub overall: Rank,
    pub size: Rank,
}

impl RankData {
    pub const UNKNOWN: RankData = RankData { overall: Rank::Unknown, size: Rank::Unknown };
}

#[derive(Clone, Debug, PartialEq)]
pub enum BoardStatus {
    Loading,
    Ready,
    Failed(String),
}

/// A score that passed local validation and may be sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub time: f64,
    pub dimension: u32,
}

impl ScoreSubmission {
    pub fn validate(name: &str, time: f64, dimension: u32) -> Result<Self, SubmitError> {
        let name = name.trim();
        if name.is_empty() {
            cwarn("submit: empty name");
            return Err(SubmitError::EmptyName);
        }
        if !time.is_finite() || time < 0.0 {
            cerror(&format!("submit: invalid time {time}"));
            return Err(SubmitError::InvalidTime(time));
        }
        if dimension == 0 {
            cerror("submit: invalid dimension 0");
            return Err(SubmitError::InvalidDimension(dimension));
        }
        Ok(Self { name: name.to_string(), time, dimension })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    status: BoardStatus,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self { entries: Vec::new(), status: BoardStatus::Loading }
    }
}

impl Leaderboard {
    pub fn status(&self) -> &BoardStatus {
        &self.status
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mark_loading(&mut self) {
        self.status = BoardStatus::Loading;
    }

    /// Replaces the whole cache with a fetch result. A failed fetch empties it.
    pub fn apply_fetch(&mut self, result: Result<Vec<ScoreEntry>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(entries) => {
                cinfo(&format!("stored {} total scores locally", entries.len()));
                self.entries = entries;
                self.status = BoardStatus::Ready;
                Ok(())
            }
            Err(e) => {
                cerror(&format!("error fetching leaderboard: {e}"));
                self.entries = Vec::new();
                self.status = BoardStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn sorted(&self, filter: DimensionFilter) -> Vec<&ScoreEntry> {
        let mut view: Vec<&ScoreEntry> = self.entries.iter().filter(|e| filter.accepts(e)).collect();
        view.sort_by(by_time);
        view
    }

    /// Fastest entries for the filter, at most `MAX_LEADERBOARD_ENTRIES_DISPLAY`.
    pub fn filtered(&self, filter: DimensionFilter) -> Vec<&ScoreEntry> {
        let mut view = self.sorted(filter);
        view.truncate(MAX_LEADERBOARD_ENTRIES_DISPLAY);
        view
    }

    /// Re-identifies a score by name, dimension and time within tolerance. The first
    /// match wins, so duplicate name/time/dimension triples share a rank.
    pub fn rank(&self, name: &str, time: f64, dimension: u32) -> RankData {
        let close = |e: &ScoreEntry| e.time.is_some_and(|t| (t - time).abs() < RANK_TIME_TOLERANCE);
        let position = |view: Vec<&ScoreEntry>, check_dimension: bool| {
            view.iter()
                .position(|e| e.name == name && (!check_dimension || e.dimension == dimension) && close(e))
                .map_or(Rank::Unknown, |i| Rank::Known(i + 1))
        };
        let overall = position(self.sorted(DimensionFilter::All), true);
        let size = position(self.sorted(DimensionFilter::Size(dimension)), false);
        if overall == Rank::Unknown {
            cwarn("rank calc: score not found in overall list");
        }
        if size == Rank::Unknown {
            cwarn("rank calc: score not found in size-specific list");
        }
        RankData { overall, size }
    }
}

/// Remote score store.
#[allow(async_fn_in_trait)]
pub trait ScoreService {
    async fn fetch_scores(&self) -> Result<Vec<ScoreEntry>, ApiError>;
    async fn post_score(&self, score: &ScoreSubmission) -> Result<(), ApiError>;
}

/// Fetches the full board into the shared cache.
pub async fn fetch_all<S: ScoreService>(service: &S, board: &RefCell<Leaderboard>) -> Result<(), ApiError> {
    board.borrow_mut().mark_loading();
    let result = service.fetch_scores().await;
    board.borrow_mut().apply_fetch(result)
}

/// Validates, posts, refreshes the cache and only then computes the rank.
pub async fn submit<S: ScoreService>(
    service: &S,
    board: &RefCell<Leaderboard>,
    name: &str,
    time: f64,
    dimension: u32,
) -> Result<RankData, SubmitError> {
    let score = ScoreSubmission::validate(name, time, dimension)?;
    cinfo(&format!(
        "submitting score: name='{}', time={:.3}s, dim={}",
        score.name, score.time, score.dimension
    ));
    service.post_score(&score).await?;
    if fetch_all(service, board).await.is_err() {
        cwarn("score saved but leaderboard refresh failed; rank unknown");
        return Ok(RankData::UNKNOWN);
    }
    let ranks = board.borrow().rank(&score.name, score.time, score.dimension);
    cinfo(&format!("rank after submission: overall {}, size {}", ranks.overall, ranks.size));
    Ok(ranks)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    pub(crate) fn entry(name: &str, time: f64, dimension: u32) -> ScoreEntry {
        ScoreEntry { name: name.to_string(), time: Some(time), dimension }
    }

    fn board(entries: Vec<ScoreEntry>) -> Leaderboard {
        let mut b = Leaderboard::default();
        b.apply_fetch(Ok(entries)).unwrap();
        b
    }

    /// In-memory store; `stored_time` mimics the service rounding what it keeps.
    pub(crate) struct FakeStore {
        pub entries: RefCell<Vec<ScoreEntry>>,
        pub fail_post: Option<ApiError>,
        pub fail_fetch: Cell<bool>,
        pub posts: Cell<usize>,
        pub fetches: Cell<usize>,
        pub stored_time: fn(f64) -> f64,
    }

    impl FakeStore {
        pub fn new(entries: Vec<ScoreEntry>) -> Self {
            Self {
                entries: RefCell::new(entries),
                fail_post: None,
                fail_fetch: Cell::new(false),
                posts: Cell::new(0),
                fetches: Cell::new(0),
                stored_time: |t| t,
            }
        }
    }

    impl ScoreService for FakeStore {
        async fn fetch_scores(&self) -> Result<Vec<ScoreEntry>, ApiError> {
            self.fetches.set(self.fetches.get() + 1);
            if self.fail_fetch.get() {
                return Err(ApiError::Network("connection refused".into()));
            }
            Ok(self.entries.borrow().clone())
        }

        async fn post_score(&self, score: &ScoreSubmission) -> Result<(), ApiError> {
            self.posts.set(self.posts.get() + 1);
            if let Some(e) = &self.fail_post {
                return Err(e.clone());
            }
            self.entries
                .borrow_mut()
                .push(entry(&score.name, (self.stored_time)(score.time), score.dimension));
            Ok(())
        }
    }

    #[test]
    fn filtered_sorts_and_truncates() {
        let mut entries: Vec<ScoreEntry> = (0..15).map(|i| entry(&format!("p{i}"), 100.0 - i as f64, 5)).collect();
        entries.push(entry("small", 1.0, 3));
        let b = board(entries);
        let all = b.filtered(DimensionFilter::All);
        assert_eq!(all.len(), MAX_LEADERBOARD_ENTRIES_DISPLAY);
        assert_eq!(all[0].name, "small");
        assert_eq!(all[1].name, "p14");
        let fives = b.filtered(DimensionFilter::Size(5));
        assert!(fives.iter().all(|e| e.dimension == 5));
        assert_eq!(fives[0].name, "p14");
        assert!(b.filtered(DimensionFilter::Size(7)).is_empty());
    }

    #[test]
    fn missing_times_sort_last() {
        let scores: Vec<ScoreEntry> =
            serde_json::from_str(r#"[{"name":"n","dimension":5},{"name":"z","time":null,"dimension":5},{"name":"a","time":9.5,"dimension":5}]"#)
                .unwrap();
        let b = board(scores);
        let names: Vec<&str> = b.filtered(DimensionFilter::All).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "n", "z"]);
    }

    #[test]
    fn malformed_times_sort_last_without_failing_the_board() {
        let scores: Vec<ScoreEntry> = serde_json::from_str(
            r#"[{"name":"Bo","time":"fast","dimension":5},{"name":"Cy","time":{},"dimension":"5"},{"name":"Ada","time":12.5,"dimension":5}]"#,
        )
        .unwrap();
        assert_eq!(scores[0].time, None);
        assert_eq!(scores[1].dimension, 0);
        let b = board(scores);
        let names: Vec<&str> = b.filtered(DimensionFilter::Size(5)).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bo"]);
    }

    #[test]
    fn filtered_does_not_touch_cache() {
        let b = board(vec![entry("b", 2.0, 5), entry("a", 1.0, 5)]);
        let before = b.clone();
        let _ = b.filtered(DimensionFilter::All);
        let _ = b.rank("a", 1.0, 5);
        assert_eq!(b, before);
    }

    #[test]
    fn rank_overall_and_size() {
        let b = board(vec![
            entry("Bo", 3.0, 3),
            entry("Cy", 20.0, 5),
            entry("Ada", 12.5, 5),
            entry("Di", 8.0, 7),
        ]);
        assert_eq!(b.rank("Ada", 12.5, 5), RankData { overall: Rank::Known(3), size: Rank::Known(1) });
        assert_eq!(b.rank("Ada", 12.5, 5), b.rank("Ada", 12.5, 5));
        assert_eq!(b.rank("Ada", 99.0, 5), RankData::UNKNOWN);
        assert_eq!(b.rank("Ada", 12.5, 7), RankData::UNKNOWN);
    }

    #[test]
    fn rank_uses_tolerance_not_equality() {
        let b = board(vec![entry("Zed", 1.0, 5), entry("Ada", 12.5000001, 5)]);
        assert_eq!(b.rank("Ada", 12.5, 5), RankData { overall: Rank::Known(2), size: Rank::Known(2) });
        let far = board(vec![entry("Ada", 12.6, 5)]);
        assert_eq!(far.rank("Ada", 12.5, 5), RankData::UNKNOWN);
    }

    #[test]
    fn duplicates_resolve_to_first_occurrence() {
        let b = board(vec![entry("Ada", 5.0, 5), entry("Ada", 5.0, 5), entry("Bo", 1.0, 5)]);
        assert_eq!(b.rank("Ada", 5.0, 5).size, Rank::Known(2));
    }

    #[test]
    fn failed_fetch_clears_cache() {
        let mut b = board(vec![entry("old", 1.0, 5)]);
        let err = b.apply_fetch(Err(ApiError::status(500, None))).unwrap_err();
        assert_eq!(err, ApiError::status(500, None));
        assert!(b.filtered(DimensionFilter::All).is_empty());
        assert_eq!(b.status(), &BoardStatus::Failed("Error 500".into()));
    }

    #[test]
    fn validation_rejects_before_network() {
        let store = FakeStore::new(vec![]);
        let cache = RefCell::new(Leaderboard::default());
        for (name, time, dim, expected) in [
            ("   ", 1.0, 5, SubmitError::EmptyName),
            ("Ada", -1.0, 5, SubmitError::InvalidTime(-1.0)),
            ("Ada", f64::INFINITY, 5, SubmitError::InvalidTime(f64::INFINITY)),
            ("Ada", 1.0, 0, SubmitError::InvalidDimension(0)),
        ] {
            assert_eq!(block_on(submit(&store, &cache, name, time, dim)), Err(expected));
        }
        let nan = block_on(submit(&store, &cache, "Ada", f64::NAN, 5));
        assert!(matches!(nan, Err(SubmitError::InvalidTime(t)) if t.is_nan()));
        assert_eq!(store.posts.get(), 0);
        assert_eq!(store.fetches.get(), 0);
    }

    #[test]
    fn submit_refreshes_before_ranking() {
        let store = FakeStore::new(vec![entry("Bo", 1.0, 5), entry("Cy", 30.0, 7)]);
        let cache = RefCell::new(Leaderboard::default());
        let ranks = block_on(submit(&store, &cache, "  Ada ", 12.5, 5)).unwrap();
        assert_eq!(ranks, RankData { overall: Rank::Known(2), size: Rank::Known(2) });
        assert_eq!(store.posts.get(), 1);
        assert_eq!(store.fetches.get(), 1);
        assert_eq!(cache.borrow().len(), 3);
        assert_eq!(cache.borrow().status(), &BoardStatus::Ready);
    }

    #[test]
    fn submit_matches_slightly_drifted_stored_time() {
        let mut store = FakeStore::new(vec![entry("Ada", 40.0, 5)]);
        store.stored_time = |t| t + 0.0000001;
        let cache = RefCell::new(Leaderboard::default());
        let ranks = block_on(submit(&store, &cache, "Ada", 12.5, 5)).unwrap();
        assert_eq!(ranks, RankData { overall: Rank::Known(1), size: Rank::Known(1) });
    }

    #[test]
    fn rounded_storage_loses_rank() {
        let mut store = FakeStore::new(vec![]);
        store.stored_time = |t| t.round();
        let cache = RefCell::new(Leaderboard::default());
        let ranks = block_on(submit(&store, &cache, "Ada", 12.4, 5)).unwrap();
        assert_eq!(ranks, RankData::UNKNOWN);
    }

    #[test]
    fn service_error_text_is_surfaced() {
        let mut store = FakeStore::new(vec![]);
        store.fail_post = Some(ApiError::status(400, Some("Invalid dimension value: 4".into())));
        let cache = RefCell::new(Leaderboard::default());
        let err = block_on(submit(&store, &cache, "Ada", 1.0, 4)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid dimension value: 4");
        assert_eq!(store.fetches.get(), 0);
    }

    #[test]
    fn refresh_failure_after_save_leaves_rank_unknown() {
        let store = FakeStore::new(vec![]);
        store.fail_fetch.set(true);
        let cache = RefCell::new(Leaderboard::default());
        assert_eq!(block_on(submit(&store, &cache, "Ada", 1.0, 5)), Ok(RankData::UNKNOWN));
        assert!(cache.borrow().is_empty());
        assert!(matches!(cache.borrow().status(), BoardStatus::Failed(_)));
    }

    #[test]
    fn fetch_failure_shows_empty_list_and_error() {
        let store = FakeStore::new(vec![entry("Ada", 1.0, 5)]);
        let cache = RefCell::new(Leaderboard::default());
        block_on(fetch_all(&store, &cache)).unwrap();
        assert_eq!(cache.borrow().filtered(DimensionFilter::All).len(), 1);
        store.fail_fetch.set(true);
        assert!(block_on(fetch_all(&store, &cache)).is_err());
        assert!(cache.borrow().filtered(DimensionFilter::All).is_empty());
        assert_eq!(
            cache.borrow().status(),
            &BoardStatus::Failed("network error: connection refused".into())
        );
    }

    #[test]
    fn filter_values_round_trip_through_select() {
        assert_eq!(DimensionFilter::parse("all"), DimensionFilter::All);
        assert_eq!(DimensionFilter::parse("10"), DimensionFilter::Size(10));
        assert_eq!(DimensionFilter::parse("0"), DimensionFilter::All);
        assert_eq!(DimensionFilter::Size(7).value(), "7");
        assert_eq!(Rank::Unknown.to_string(), "N/A");
    }
}
