use crate::rating::UserRating;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rated movie on the user's watched list.
///
/// Field names on the wire match the snapshot format already written by
/// earlier versions of the app, so existing stores keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(rename = "poster", default)]
    pub poster_url: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "userRating")]
    pub user_rating: UserRating,
    pub runtime: Runtime,
    #[serde(rename = "countRatingDecisions", default)]
    pub rating_revision_count: u32,
}

/// Running time in minutes, or `NA` when the source text did not start with a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Minutes(u32),
    NotAvailable,
}

impl Runtime {
    const NOT_AVAILABLE: &'static str = "NA";

    /// Parses remote runtime text such as "148 min". Only the first
    /// whitespace-separated token is considered.
    pub fn parse(text: &str) -> Self {
        text.split_whitespace()
            .next()
            .and_then(|token| token.parse::<u32>().ok())
            .map(Runtime::Minutes)
            .unwrap_or(Runtime::NotAvailable)
    }

    pub fn minutes(self) -> Option<u32> {
        match self {
            Runtime::Minutes(m) => Some(m),
            Runtime::NotAvailable => None,
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Minutes(m) => write!(f, "{} min", m),
            Runtime::NotAvailable => f.write_str(Self::NOT_AVAILABLE),
        }
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Runtime::Minutes(m) => serializer.serialize_u32(*m),
            Runtime::NotAvailable => serializer.serialize_str(Self::NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(m) => Ok(Runtime::Minutes(m)),
            Raw::Text(t) if t == Self::NOT_AVAILABLE => Ok(Runtime::NotAvailable),
            Raw::Text(t) => Err(de::Error::custom(format!("invalid runtime: {:?}", t))),
        }
    }
}
