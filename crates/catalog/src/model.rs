use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown when a sidecar carries no school.
pub const DEFAULT_SCHOOL: &str = "未知学校";
/// Placeholder shown when a sidecar carries no author.
pub const DEFAULT_AUTHOR: &str = "未知作者";

/// The closed set of award classifications.
///
/// A sidecar on disk can carry an arbitrary `prizeType` string; such videos
/// keep their raw tag on [`Video`] but parse to no tier and land in none of
/// the three grouped buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrizeTier {
    First,
    Second,
    Third,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid prize type: {0:?}")]
pub struct TierParseError(pub String);

impl FromStr for PrizeTier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(PrizeTier::First),
            "second" => Ok(PrizeTier::Second),
            "third" => Ok(PrizeTier::Third),
            other => Err(TierParseError(other.to_string())),
        }
    }
}

impl PrizeTier {
    pub const ALL: [PrizeTier; 3] = [PrizeTier::First, PrizeTier::Second, PrizeTier::Third];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeTier::First => "first",
            PrizeTier::Second => "second",
            PrizeTier::Third => "third",
        }
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry, derived by joining a media file with its optional
/// sidecar. Never persisted as a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: String,
    /// Raw tag from the sidecar; what is on disk is what the admin list shows.
    pub prize_type: String,
    pub school: String,
    pub author: String,
}

impl Video {
    /// Interpret the raw prize tag. `None` for unrecognized tags.
    pub fn tier(&self) -> Option<PrizeTier> {
        self.prize_type.parse().ok()
    }
}

/// The JSON sidecar shape at `<videos_dir>/<id>.json`. The id is implicit
/// from the filename and never written into the file. Updates are full
/// overwrites, so fields outside this set do not survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prize_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// The catalog partitioned by tier. Videos with an unrecognized tag are in
/// no bucket.
#[derive(Debug, Default, Serialize)]
pub struct GroupedVideos {
    pub first: Vec<Video>,
    pub second: Vec<Video>,
    pub third: Vec<Video>,
}

/// Result of the two-step delete. Sidecar removal is best-effort; a failure
/// there still counts as overall success but is observable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub media_deleted: bool,
    pub sidecar_deleted: bool,
}

/// Default title for a video without one: the id with `-`/`_` turned into
/// spaces.
pub fn default_title(id: &str) -> String {
    id.replace(['-', '_'], " ")
}
