//! Review attachment.
//!
//! Joins review rows onto songs by exact id equality. Quadratic over the
//! batch, which is fine at tens to low hundreds of rows.

use crate::catalog::{Review, Song};
use crate::sheet::{Row, SheetError};
use crate::text::educate;

/// One review row as it appears in the spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReviewRow {
    pub id: String,
    pub review: String,
    pub reviewer: String,
}

impl RawReviewRow {
    pub fn from_row(row: &Row<'_>) -> Result<RawReviewRow, SheetError> {
        Ok(RawReviewRow {
            id: row.get("id")?.trim().to_string(),
            review: row.get("review")?.trim().to_string(),
            reviewer: row.get("reviewer")?.trim().to_string(),
        })
    }
}

/// Attach to each song the reviews whose id matches. Review text is
/// typographically normalized on the way in; reviews with empty text and
/// reviews matching no song are excluded. Returns the number attached.
pub fn attach_reviews(songs: &mut [Song], reviews: &[RawReviewRow]) -> usize {
    let mut attached = 0;
    for song in songs.iter_mut() {
        for review in reviews {
            if song.id == review.id && !review.review.is_empty() {
                song.reviews.push(Review {
                    id: review.id.clone(),
                    review: educate(&review.review),
                    reviewer: review.reviewer.clone(),
                });
                attached += 1;
            }
        }
    }
    attached
}
