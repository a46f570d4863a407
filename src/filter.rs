//! Vibe, era and popularity filtering over an aggregated discography.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Utc};

use crate::types::{Bounds, FilterSpec, TrackRecord};

/// Tracks above this popularity count as hits and are dropped by deep cuts.
pub const DEEP_CUTS_MAX_POPULARITY: u8 = 60;
pub const EARLIEST_ERA_YEAR: i32 = 1990;

impl Default for FilterSpec {
    /// Full energy and mood range, 1990 up to the current year, deep cuts off.
    fn default() -> Self {
        FilterSpec {
            energy: Bounds::new(0.0, 1.0),
            mood: Bounds::new(0.0, 1.0),
            era: Bounds::new(EARLIEST_ERA_YEAR, Utc::now().year()),
            deep_cuts: false,
            popularity_ceiling: DEEP_CUTS_MAX_POPULARITY,
        }
    }
}

impl FilterSpec {
    /// Whether a single track passes every predicate.
    pub fn matches(&self, track: &TrackRecord) -> bool {
        self.era.contains(track.release_year)
            && self.energy.contains(track.features.energy)
            && self.mood.contains(track.features.valence)
            && (!self.deep_cuts || track.popularity <= self.popularity_ceiling)
    }

    pub fn apply_preset(&mut self, preset: Preset) -> &mut Self {
        match preset {
            Preset::Party => {
                self.energy = Bounds::new(0.6, 1.0);
            }
            Preset::Sad => {
                self.energy = Bounds::new(0.0, 0.4);
                self.mood = Bounds::new(0.0, 0.3);
            }
            Preset::OldSchool => {
                self.era = Bounds::new(1995, 2010);
            }
        }
        self
    }

    /// Human readable summary used as playlist description.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "Energy={:.1}-{:.1}, Mood={:.1}-{:.1}, Era={}-{}",
            self.energy.lo, self.energy.hi, self.mood.lo, self.mood.hi, self.era.lo, self.era.hi
        );
        if self.deep_cuts {
            text.push_str(&format!(", Deep cuts (popularity <= {})", self.popularity_ceiling));
        }
        text
    }
}

/// Returns the tracks passing `spec`, in input order.
pub fn filter(tracks: &[TrackRecord], spec: &FilterSpec) -> Vec<TrackRecord> {
    tracks.iter().filter(|t| spec.matches(t)).cloned().collect()
}

/// Slider shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Party,
    Sad,
    OldSchool,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Preset::Party => "party",
            Preset::Sad => "sad",
            Preset::OldSchool => "old-school",
        })
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "party" => Ok(Preset::Party),
            "sad" => Ok(Preset::Sad),
            "old-school" | "oldschool" => Ok(Preset::OldSchool),
            other => Err(format!(
                "unknown preset '{}', expected party, sad or old-school",
                other
            )),
        }
    }
}
