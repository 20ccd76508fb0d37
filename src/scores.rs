use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::config::NAME_MAX_LEN;

const SECS_PER_DAY: u64 = 86_400;

/// Which slice of the score history to rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    AllTime,
    /// Scores recorded on the current UTC day
    Today,
}

/// One stored result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    /// Team or club the player plays for, when known
    #[serde(default)]
    pub team: Option<String>,
    pub score: u32,
    /// UNIX seconds
    pub recorded_at: u64,
}

/// A row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedScore {
    /// 1-based
    pub rank: usize,
    pub name: String,
    pub affiliation: Option<String>,
    pub score: u32,
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Format(serde_json::Error),
    InvalidName,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "score store io error: {e}"),
            Self::Format(e) => write!(f, "score file is malformed: {e}"),
            Self::InvalidName => write!(f, "player name must not be empty"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::InvalidName => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

/// Where finished games are recorded and read back for the leaderboard
pub trait ScoreStore {
    fn record_score(&mut self, name: &str, score: u32) -> Result<(), StoreError>;

    /// Best `limit` scores in `scope`, highest first
    fn top_scores(&self, scope: Scope, limit: usize) -> Result<Vec<RankedScore>, StoreError>;
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Trims the name and caps its length; an empty result is rejected
fn normalize_name(name: &str) -> Result<String, StoreError> {
    let name: String = name.trim().chars().take(NAME_MAX_LEN).collect();
    if name.is_empty() {
        return Err(StoreError::InvalidName);
    }
    Ok(name)
}

/// Ranks `records` (in insertion order) by score, highest first.
/// Equal scores keep their insertion order.
pub fn rank_records(
    records: &[ScoreRecord],
    scope: Scope,
    limit: usize,
    now_secs: u64,
) -> Vec<RankedScore> {
    let today = now_secs / SECS_PER_DAY;
    let mut selected: Vec<&ScoreRecord> = records
        .iter()
        .filter(|r| match scope {
            Scope::AllTime => true,
            Scope::Today => r.recorded_at / SECS_PER_DAY == today,
        })
        .collect();
    // sort_by is stable
    selected.sort_by(|a, b| b.score.cmp(&a.score));

    selected
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, r)| RankedScore {
            rank: i + 1,
            name: r.name.clone(),
            affiliation: r.team.clone(),
            score: r.score,
        })
        .collect()
}

/// Scores kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order; a missing file is an empty store
    pub fn load(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn record_score(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        let name = normalize_name(name)?;
        let mut records = self.load()?;
        records.push(ScoreRecord {
            name,
            team: None,
            score,
            recorded_at: unix_now(),
        });
        self.save(&records)?;
        tracing::debug!(path = %self.path.display(), score, "score recorded");
        Ok(())
    }

    fn top_scores(&self, scope: Scope, limit: usize) -> Result<Vec<RankedScore>, StoreError> {
        Ok(rank_records(&self.load()?, scope, limit, unix_now()))
    }
}

/// Keeps scores for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

impl ScoreStore for MemoryScoreStore {
    fn record_score(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        let name = normalize_name(name)?;
        self.records.push(ScoreRecord {
            name,
            team: None,
            score,
            recorded_at: unix_now(),
        });
        Ok(())
    }

    fn top_scores(&self, scope: Scope, limit: usize) -> Result<Vec<RankedScore>, StoreError> {
        Ok(rank_records(&self.records, scope, limit, unix_now()))
    }
}
