//! The TVmaze show record and its presentation helpers.
//!
//! Only `id` and `name` are required; every other field is optional so a
//! single sparse entry never poisons a whole remote page.

use crate::record::{Record, RecordId};
use serde::Deserialize;

/// Placeholder shown when an upstream value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// One catalog entry as returned by `GET /shows?page=N`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// TVmaze id.
    pub id: RecordId,
    /// Title.
    pub name: String,
    /// `Scripted`, `Animation`, `Reality`…
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Spoken language.
    #[serde(default)]
    pub language: Option<String>,
    /// Genre names, possibly empty.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Raw status string. See [`Show::status`].
    #[serde(default)]
    pub status: Option<String>,
    /// Episode runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Average runtime in minutes, when episodes vary.
    #[serde(default)]
    pub average_runtime: Option<u32>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub premiered: Option<String>,
    /// Last air date, `YYYY-MM-DD`.
    #[serde(default)]
    pub ended: Option<String>,
    /// Official website URL.
    #[serde(default)]
    pub official_site: Option<String>,
    /// Weekly airing schedule.
    #[serde(default)]
    pub schedule: Option<Schedule>,
    /// User rating.
    #[serde(default)]
    pub rating: Option<Rating>,
    /// Broadcasting network; web-only shows have none.
    #[serde(default)]
    pub network: Option<Network>,
    /// Poster images.
    #[serde(default)]
    pub image: Option<Image>,
    /// HTML summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Ids in other databases.
    #[serde(default)]
    pub externals: Option<Externals>,
}

/// Airing schedule.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Schedule {
    /// `HH:MM`, may be empty.
    #[serde(default)]
    pub time: Option<String>,
    /// Weekday names.
    #[serde(default)]
    pub days: Vec<String>,
}

/// User rating.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Rating {
    /// Average on a 0-10 scale.
    #[serde(default)]
    pub average: Option<f64>,
}

/// Broadcasting network.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Network {
    /// Network name.
    pub name: String,
}

/// Poster URLs.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Image {
    /// Small poster.
    #[serde(default)]
    pub medium: Option<String>,
    /// Full-size poster.
    #[serde(default)]
    pub original: Option<String>,
}

/// Ids in other databases.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Externals {
    /// IMDb title id.
    #[serde(default)]
    pub imdb: Option<String>,
}

/// Broadcast state of a show, parsed from the upstream status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowStatus {
    /// Currently airing.
    Running,
    /// Finished airing.
    Ended,
    /// Announced, not yet airing.
    InDevelopment,
    /// Status still to be determined.
    ToBeDetermined,
    /// No recognisable status.
    Unknown,
}

impl ShowStatus {
    /// Maps the raw upstream value. Anything unrecognised is `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Running") => ShowStatus::Running,
            Some("Ended") => ShowStatus::Ended,
            Some("In Development") => ShowStatus::InDevelopment,
            Some("To Be Determined") => ShowStatus::ToBeDetermined,
            _ => ShowStatus::Unknown,
        }
    }

    /// Short label used on cards and the detail screen.
    pub fn label(self) -> &'static str {
        match self {
            ShowStatus::Running => "Airing",
            ShowStatus::Ended => "Ended",
            ShowStatus::InDevelopment => "In production",
            ShowStatus::ToBeDetermined => "TBD",
            ShowStatus::Unknown => NOT_AVAILABLE,
        }
    }
}

impl Record for Show {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Show {
    /// Parsed broadcast status.
    pub fn status(&self) -> ShowStatus {
        ShowStatus::parse(self.status.as_deref())
    }

    /// Summary with HTML markup removed.
    pub fn plain_summary(&self) -> String {
        match self.summary.as_deref() {
            Some(html) if !html.trim().is_empty() => strip_html(html),
            _ => "No description available".to_string(),
        }
    }

    /// Year part of the premiere date (`YYYY-MM-DD`).
    pub fn premiere_year(&self) -> Option<&str> {
        self.premiered
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }

    /// Days joined with commas, or N/A.
    pub fn schedule_days(&self) -> String {
        match &self.schedule {
            Some(schedule) if !schedule.days.is_empty() => schedule.days.join(", "),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Episode runtime in minutes, falling back to the average runtime.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.or(self.average_runtime)
    }

    /// Average rating, if rated.
    pub fn rating(&self) -> Option<f64> {
        self.rating.as_ref().and_then(|r| r.average)
    }

    /// Best available poster URL, preferring the full-size original.
    pub fn best_image(&self) -> Option<&str> {
        let image = self.image.as_ref()?;
        image.original.as_deref().or(image.medium.as_deref())
    }

    /// Network name, if any.
    pub fn network_name(&self) -> Option<&str> {
        self.network.as_ref().map(|n| n.name.as_str())
    }

    /// IMDb title id, like `tt0944947`.
    pub fn imdb_id(&self) -> Option<&str> {
        self.externals.as_ref().and_then(|e| e.imdb.as_deref())
    }
}

/// Removes every `<...>` tag from `html`, leaving the text content.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}
