mod policy;
mod tally;

pub use policy::{dominant, percentage_of};

use super::domain::{AnswerRecord, Dosha, DoshaPoints};
use serde::{Deserialize, Serialize};

/// Normalised constitution breakdown for a completed answer set.
///
/// Each percentage is rounded half-up on its own, so the three values can sum to
/// anything from 99 to 101. `dominant` is taken from `raw`, never from the rounded
/// percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoshaScoreResult {
    pub vata: u8,
    pub pitta: u8,
    pub kapha: u8,
    pub dominant: Dosha,
    pub raw: DoshaPoints,
}

impl DoshaScoreResult {
    pub fn percentage(&self, dosha: Dosha) -> u8 {
        match dosha {
            Dosha::Vata => self.vata,
            Dosha::Pitta => self.pitta,
            Dosha::Kapha => self.kapha,
        }
    }

    /// Signed distance of the percentage sum from 100. Within one point for any result with
    /// a non-zero total; a degenerate result reports -100.
    pub fn rounding_drift(&self) -> i16 {
        i16::from(self.vata) + i16::from(self.pitta) + i16::from(self.kapha) - 100
    }

    pub fn is_degenerate(&self) -> bool {
        self.raw.is_zero()
    }
}

/// Score a set of answers. Pure: the same answers always produce the same result.
pub fn score<'a, I>(answers: I) -> DoshaScoreResult
where
    I: IntoIterator<Item = &'a AnswerRecord>,
{
    let raw = tally::accumulate(answers);
    let result = from_raw(raw);

    tracing::debug!(
        vata = result.vata,
        pitta = result.pitta,
        kapha = result.kapha,
        dominant = %result.dominant,
        total = raw.total(),
        "scored dosha assessment"
    );

    result
}

/// Derive percentages and the dominant category from accumulated raw points.
pub fn from_raw(raw: DoshaPoints) -> DoshaScoreResult {
    DoshaScoreResult {
        vata: percentage_of(&raw, Dosha::Vata),
        pitta: percentage_of(&raw, Dosha::Pitta),
        kapha: percentage_of(&raw, Dosha::Kapha),
        dominant: dominant(&raw),
        raw,
    }
}
