//! Validation and moderation of incoming submissions.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Shape: title and artist present and within length, image URL parses
//! 2. Path convention: the image URL's path points into the private uploads
//!    namespace
//! 3. Denylist: no explicit-content keyword in title or artist (any case)
//! 4. Sanitization: title and artist trimmed and truncated
//!
//! Lengths are counted in characters, not bytes.

use url::Url;

use super::{NewSubmission, SubmissionInput};
use crate::error::ValidationError;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum artist name length in characters.
pub const MAX_ARTIST_LEN: usize = 50;

/// Path segment every accepted image URL must contain.
pub const DEFAULT_UPLOAD_SEGMENT: &str = ".private/uploads/";

/// Keywords rejected in titles and artist names.
pub const DENYLISTED_KEYWORDS: &[&str] = &["nude", "naked", "sex", "porn", "xxx", "nsfw"];

/// Validation/moderation filter applied before a submission is persisted.
#[derive(Debug, Clone)]
pub struct SubmissionFilter {
    upload_segment: String,
    denylist: Vec<String>,
}

impl SubmissionFilter {
    /// Create a filter requiring the given upload path segment.
    pub fn new(upload_segment: impl Into<String>) -> Self {
        Self {
            upload_segment: upload_segment.into(),
            denylist: DENYLISTED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Create a filter for a private directory name (e.g. `.private`).
    pub fn for_private_dir(private_dir: &str) -> Self {
        Self::new(format!("{}/uploads/", private_dir.trim_matches('/')))
    }

    /// The path segment image URLs must contain.
    pub fn upload_segment(&self) -> &str {
        &self.upload_segment
    }

    /// Run every check and return sanitized fields.
    pub fn check(&self, input: &SubmissionInput) -> Result<NewSubmission, ValidationError> {
        self.check_shape(input)?;
        self.check_image_path(&input.image_url)?;
        self.check_denylist(&input.title, &input.artist)?;

        Ok(NewSubmission {
            title: sanitize(&input.title, MAX_TITLE_LEN),
            artist: sanitize(&input.artist, MAX_ARTIST_LEN),
            image_url: input.image_url.trim().to_string(),
        })
    }

    fn check_shape(&self, input: &SubmissionInput) -> Result<(), ValidationError> {
        if input.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if input.title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN });
        }
        if input.artist.trim().is_empty() {
            return Err(ValidationError::ArtistRequired);
        }
        if input.artist.chars().count() > MAX_ARTIST_LEN {
            return Err(ValidationError::ArtistTooLong {
                max: MAX_ARTIST_LEN,
            });
        }
        Url::parse(input.image_url.trim()).map_err(|_| ValidationError::InvalidUrl)?;
        Ok(())
    }

    /// Only the URL path counts: query and fragment are ignored, and dot
    /// segments are already resolved by the parser.
    fn check_image_path(&self, image_url: &str) -> Result<(), ValidationError> {
        let url = Url::parse(image_url.trim()).map_err(|_| ValidationError::InvalidUrl)?;
        if url.path().contains(&self.upload_segment) {
            Ok(())
        } else {
            Err(ValidationError::InvalidImagePath)
        }
    }

    fn check_denylist(&self, title: &str, artist: &str) -> Result<(), ValidationError> {
        let title = title.to_lowercase();
        let artist = artist.to_lowercase();
        let flagged = self
            .denylist
            .iter()
            .any(|keyword| title.contains(keyword.as_str()) || artist.contains(keyword.as_str()));

        if flagged {
            Err(ValidationError::CommunityGuidelines)
        } else {
            Ok(())
        }
    }
}

impl Default for SubmissionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_SEGMENT)
    }
}

fn sanitize(value: &str, max_len: usize) -> String {
    value.trim().chars().take(max_len).collect()
}
