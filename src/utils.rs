use std::{collections::BTreeSet, fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::Bounds;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Release groups accepted by the `include_groups` parameter of the artist
/// albums endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseKind {
    Album,
    Single,
    AppearsOn,
    Compilation,
}

impl ReleaseKind {
    fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Album => "album",
            ReleaseKind::Single => "single",
            ReleaseKind::AppearsOn => "appears_on",
            ReleaseKind::Compilation => "compilation",
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseKinds(pub BTreeSet<ReleaseKind>);

impl ReleaseKinds {
    /// Albums and singles, the groups a discography is built from.
    pub fn discography() -> Self {
        ReleaseKinds(BTreeSet::from([ReleaseKind::Album, ReleaseKind::Single]))
    }
}

impl fmt::Display for ReleaseKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

fn parse_bounds<T>(input: &str) -> Result<Bounds<T>, String>
where
    T: FromStr + PartialOrd + Copy,
{
    let (lo, hi) = input
        .split_once("..")
        .ok_or_else(|| format!("expected 'lo..hi', got '{}'", input))?;
    let lo = lo
        .trim()
        .parse::<T>()
        .map_err(|_| format!("invalid lower bound '{}'", lo.trim()))?;
    let hi = hi
        .trim()
        .parse::<T>()
        .map_err(|_| format!("invalid upper bound '{}'", hi.trim()))?;
    if lo > hi {
        return Err(format!("lower bound is above upper bound in '{}'", input));
    }
    Ok(Bounds::new(lo, hi))
}

/// Parses a `lo..hi` slider range for energy or mood; both ends must lie in `0.0..=1.0`.
pub fn parse_unit_range(input: &str) -> Result<Bounds<f64>, String> {
    let bounds = parse_bounds::<f64>(input)?;
    if bounds.lo < 0.0 || bounds.hi > 1.0 {
        return Err(format!("'{}' must lie within 0.0..1.0", input));
    }
    Ok(bounds)
}

/// Parses a `from..to` year range.
pub fn parse_year_range(input: &str) -> Result<Bounds<i32>, String> {
    parse_bounds::<i32>(input)
}

/// Milliseconds as `m:ss`.
pub fn format_duration(duration_ms: u64) -> String {
    let secs = duration_ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
