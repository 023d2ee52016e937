//! Star rating input for the open movie.

use crate::error::PopcornError;

pub const MAX_RATING: u8 = 10;

/// Tracks the rating being chosen and how often the user changed their mind.
#[derive(Debug, Clone, Default)]
pub struct RatingCapture {
    selected: Option<u8>,
    decisions: u32,
}

/// A rating ready to be stored on a watched entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedRating {
    pub rating: u8,
    pub decisions: u32,
}

impl RatingCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a rating in `1..=10`. Re-selecting the current rating is not a new decision.
    pub fn select(&mut self, rating: u8) -> Result<(), PopcornError> {
        if !(1..=MAX_RATING).contains(&rating) {
            return Err(PopcornError::InvalidRating(rating));
        }
        if self.selected != Some(rating) {
            self.selected = Some(rating);
            self.decisions += 1;
        }
        Ok(())
    }

    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    pub fn decisions(&self) -> u32 {
        self.decisions
    }

    /// `None` until a rating has been selected.
    pub fn commit(&self) -> Option<CommittedRating> {
        self.selected.map(|rating| CommittedRating {
            rating,
            decisions: self.decisions,
        })
    }
}
