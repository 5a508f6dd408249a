use std::fmt;
use std::str::FromStr;

const CLONING: &str = "cloning";
const READY: &str = "ready";
const FAILED: &str = "failed";
const WEEK_PREFIX: &str = "cloning_week_";

/// Copy status of a destination program.
///
/// Stored as a plain string column (`cloning`, `cloning_week_<i>_of_<n>`, `ready`,
/// `failed`) because external pollers read it directly; inside the worker it is
/// always handled through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyStatus {
    Cloning,
    /// `week` is 1-indexed.
    CloningWeek { week: u32, total: u32 },
    Ready,
    Failed,
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyStatus::Cloning => f.write_str(CLONING),
            CopyStatus::CloningWeek { week, total } => write!(f, "{WEEK_PREFIX}{week}_of_{total}"),
            CopyStatus::Ready => f.write_str(READY),
            CopyStatus::Failed => f.write_str(FAILED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized copy status: {0:?}")]
pub struct StatusParseError(pub String);

impl FromStr for CopyStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CLONING => return Ok(CopyStatus::Cloning),
            READY => return Ok(CopyStatus::Ready),
            FAILED => return Ok(CopyStatus::Failed),
            _ => {}
        }

        let err = || StatusParseError(s.to_string());
        let rest = s.strip_prefix(WEEK_PREFIX).ok_or_else(err)?;
        let (week, total) = rest.split_once("_of_").ok_or_else(err)?;
        let week: u32 = week.parse().map_err(|_| err())?;
        let total: u32 = total.parse().map_err(|_| err())?;
        if week == 0 || total == 0 || week > total {
            return Err(err());
        }
        Ok(CopyStatus::CloningWeek { week, total })
    }
}

/// What a polling client sees for a destination program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    Cloning,
    Ready,
    Failed,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CloneProgress {
    pub state: ProgressState,
    pub week: Option<u32>,
    pub total_weeks: Option<u32>,
    pub percent: Option<u8>,
}

impl CloneProgress {
    /// `None` means the destination row is gone (typically deleted after a failure).
    pub fn from_lookup(status: Option<CopyStatus>) -> Self {
        let (state, week, total_weeks) = match status {
            None => (ProgressState::NotFound, None, None),
            Some(CopyStatus::Cloning) => (ProgressState::Cloning, None, None),
            Some(CopyStatus::CloningWeek { week, total }) => {
                (ProgressState::Cloning, Some(week), Some(total))
            }
            Some(CopyStatus::Ready) => (ProgressState::Ready, None, None),
            Some(CopyStatus::Failed) => (ProgressState::Failed, None, None),
        };

        let percent = match (state, week, total_weeks) {
            (ProgressState::Ready, _, _) => Some(100),
            // The week in flight is not done yet.
            (_, Some(w), Some(t)) => Some((u64::from(w - 1) * 100 / u64::from(t)) as u8),
            (ProgressState::Cloning, _, _) => Some(0),
            _ => None,
        };

        Self {
            state,
            week,
            total_weeks,
            percent,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, ProgressState::Cloning)
    }

    /// `not_found` counts as failed for pollers.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ProgressState::Failed | ProgressState::NotFound)
    }
}
