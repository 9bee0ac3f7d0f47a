use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::day::{DayParseError, EntryDay};
use crate::model::ids::{EntryId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("entry heading cannot be empty")]
    EmptyHeading,

    #[error(transparent)]
    InvalidDate(#[from] DayParseError),

    #[error("invalid {field}: {raw:?}")]
    InvalidUrl { field: &'static str, raw: String },

    #[error("updated_at is before created_at")]
    InvalidTimeRange,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated input for a new entry, shaped like a submitted form.
///
/// Blank optional fields are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: String,
    pub heading: String,
    pub description: String,
    pub video_url: String,
    pub image_url: String,
}

impl EntryDraft {
    /// A draft for `day` with only the required heading filled in.
    pub fn new(day: EntryDay, heading: impl Into<String>) -> Self {
        Self {
            date: day.to_string(),
            heading: heading.into(),
            description: String::new(),
            video_url: String::new(),
            image_url: String::new(),
        }
    }

    #[must_use]
    pub fn with_date(mut self, raw: impl Into<String>) -> Self {
        self.date = raw.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = url.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Validate the draft for `user_id`, stamping it with `now`.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptyHeading` if the heading is blank,
    /// `EntryError::InvalidDate` if the date is not a canonical calendar day,
    /// and `EntryError::InvalidUrl` if a non-blank link does not parse.
    pub fn validate(self, user_id: UserId, now: DateTime<Utc>) -> Result<ValidatedEntry, EntryError> {
        let heading = self.heading.trim();
        if heading.is_empty() {
            return Err(EntryError::EmptyHeading);
        }
        let date: EntryDay = self.date.trim().parse()?;

        Ok(ValidatedEntry {
            user_id,
            date,
            heading: heading.to_owned(),
            description: non_blank(self.description),
            video_url: parse_optional_url("video_url", &self.video_url)?,
            image_url: parse_optional_url("image_url", &self.image_url)?,
            created_at: now,
        })
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

fn parse_optional_url(field: &'static str, raw: &str) -> Result<Option<Url>, EntryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Url::parse(trimmed)
        .map(Some)
        .map_err(|_| EntryError::InvalidUrl {
            field,
            raw: raw.to_owned(),
        })
}

/// A validated entry that has not been assigned an id by storage yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    pub user_id: UserId,
    pub date: EntryDay,
    pub heading: String,
    pub description: Option<String>,
    pub video_url: Option<Url>,
    pub image_url: Option<Url>,
    pub created_at: DateTime<Utc>,
}

impl ValidatedEntry {
    #[must_use]
    pub fn assign_id(self, id: EntryId) -> ProgressEntry {
        ProgressEntry {
            id,
            user_id: self.user_id,
            date: self.date,
            heading: self.heading,
            description: self.description,
            video_url: self.video_url,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

/// One logged achievement attributed to a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEntry {
    id: EntryId,
    user_id: UserId,
    date: EntryDay,
    heading: String,
    description: Option<String>,
    video_url: Option<Url>,
    image_url: Option<Url>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProgressEntry {
    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::EmptyHeading` for a blank heading and
    /// `EntryError::InvalidTimeRange` if `updated_at` precedes `created_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: EntryId,
        user_id: UserId,
        date: EntryDay,
        heading: String,
        description: Option<String>,
        video_url: Option<Url>,
        image_url: Option<Url>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        if heading.trim().is_empty() {
            return Err(EntryError::EmptyHeading);
        }
        if updated_at < created_at {
            return Err(EntryError::InvalidTimeRange);
        }
        Ok(Self {
            id,
            user_id,
            date,
            heading,
            description,
            video_url,
            image_url,
            created_at,
            updated_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn date(&self) -> EntryDay {
        self.date
    }

    #[must_use]
    pub fn heading(&self) -> &str {
        &self.heading
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&Url> {
        self.video_url.as_ref()
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
