//! Extent and buffer parsing, buffering, and destination naming.
//!
//! Extents are CRS:84 rectangles in decimal degrees. Buffers expand each axis
//! by a percentage of that axis' span, independently east-west and
//! north-south.
//!
//! Destination directories are named
//! `ne-{scale}m-{xmin}-{ymin}-{xmax}-{ymax}` with every bound rounded half
//! away from zero, plus an optional `-N` collision suffix. Negative bounds
//! render as a double dash (`ne-10m--95-29--87-34`); cleanup tooling matches
//! on `ne-(10|50|110)m-(-?\d+)-(-?\d+)-(-?\d+)-(-?\d+)(-\d+)?`.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::error::PlanError;
use crate::scale::Scale;

/// Buffer applied when the request does not name one.
pub const DEFAULT_BUFFER_PERCENT: f64 = 20.0;

/// Axis-aligned geographic rectangle. `xmin < xmax` and `ymin < ymax` always hold
/// for values produced by [`Extent::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Percentage expansion per axis, each within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferConfig {
    /// East-west expansion, applied to both `xmin` and `xmax`.
    pub ew: f64,
    /// North-south expansion, applied to both `ymin` and `ymax`.
    pub ns: f64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            ew: DEFAULT_BUFFER_PERCENT,
            ns: DEFAULT_BUFFER_PERCENT,
        }
    }
}

impl BufferConfig {
    pub fn uniform(percent: f64) -> Self {
        Self {
            ew: percent,
            ns: percent,
        }
    }

    /// Parse `"pct"` (both axes) or `"ew,ns"`. Absent or empty input yields the
    /// 20% default. Values strictly between 0 and 1 are read as fractions.
    pub fn parse(text: Option<&str>) -> Result<Self, PlanError> {
        let text = match text {
            None | Some("") => return Ok(Self::default()),
            Some(t) => t,
        };

        match split_fields(text).as_slice() {
            [both] => Ok(Self::uniform(parse_percent(text, both)?)),
            [ew, ns] => Ok(Self {
                ew: parse_percent(text, ew)?,
                ns: parse_percent(text, ns)?,
            }),
            fields => Err(PlanError::buffer(
                text,
                format!("expected 1 or 2 values, got {}", fields.len()),
            )),
        }
    }
}

impl fmt::Display for BufferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ew == self.ns {
            write!(f, "{}%", self.ew)
        } else {
            write!(f, "{}% EW, {}% NS", self.ew, self.ns)
        }
    }
}

fn parse_percent(input: &str, token: &str) -> Result<f64, PlanError> {
    let mut value = parse_number(token)
        .ok_or_else(|| PlanError::buffer(input, format!("'{token}' is not a number")))?;

    if value > 0.0 && value < 1.0 {
        value *= 100.0;
    }

    if !(0.0..=100.0).contains(&value) {
        return Err(PlanError::buffer(input, format!("{value} is outside 0-100")));
    }

    Ok(value)
}

impl Extent {
    /// Parse `"xmin,ymin,xmax,ymax"`.
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let fields = split_fields(text);
        if fields.len() != 4 {
            return Err(PlanError::extent(
                text,
                format!("expected 4 values, got {}", fields.len()),
            ));
        }

        let mut coords = [0.0f64; 4];
        for (slot, token) in coords.iter_mut().zip(&fields) {
            *slot = parse_number(token)
                .ok_or_else(|| PlanError::extent(text, format!("'{token}' is not a number")))?;
        }

        let [xmin, ymin, xmax, ymax] = coords;
        if xmin >= xmax {
            return Err(PlanError::extent(text, "xmin must be less than xmax"));
        }
        if ymin >= ymax {
            return Err(PlanError::extent(text, "ymin must be less than ymax"));
        }

        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Return a new extent grown outward by the buffer percentages.
    pub fn buffered(&self, buffer: BufferConfig) -> Extent {
        let dx = self.width() * (buffer.ew / 100.0);
        let dy = self.height() * (buffer.ns / 100.0);

        Extent {
            xmin: self.xmin - dx,
            ymin: self.ymin - dy,
            xmax: self.xmax + dx,
            ymax: self.ymax + dy,
        }
    }

    /// Directory name for this extent at `scale`, without collision suffix.
    pub fn directory_fragment(&self, scale: Scale) -> String {
        format!(
            "ne-{}m-{}-{}-{}-{}",
            scale,
            round_bound(self.xmin),
            round_bound(self.ymin),
            round_bound(self.xmax),
            round_bound(self.ymax)
        )
    }
}

/// `xmin,ymin,xmax,ymax` using shortest round-trip float formatting.
impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// Half away from zero; the integer cast also folds `-0` into `0`.
#[inline]
fn round_bound(v: f64) -> i64 {
    v.round() as i64
}

/// Pick the first free destination under `base` (the working directory when
/// `None`): the bare fragment, then `fragment-1`, `fragment-2`, ...
///
/// Probing and the caller's later `create_dir` are separate steps; two runs
/// racing on the same base and extent can pick the same name.
pub fn find_available_directory(
    scale: Scale,
    extent: &Extent,
    base: Option<&Path>,
) -> io::Result<PathBuf> {
    let base = match base {
        Some(b) => b.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(next_free_path(&base, &extent.directory_fragment(scale)))
}

pub(crate) fn next_free_path(base: &Path, fragment: &str) -> PathBuf {
    let candidate = base.join(fragment);
    if !candidate.exists() {
        return candidate;
    }

    let mut sequence = 1u64;
    loop {
        let candidate = base.join(format!("{fragment}-{sequence}"));
        if !candidate.exists() {
            debug!("{} taken, using suffix -{}", fragment, sequence);
            return candidate;
        }
        sequence += 1;
    }
}

/// Comma split with trailing empty segments dropped, then trimmed.
fn split_fields(text: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = text.split(',').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts.into_iter().map(str::trim).collect()
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn extent(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Extent {
        Extent {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    #[test]
    fn parses_gulf_coast_extent() {
        let e = Extent::parse("-95.0,28.0,-87.7,33.8").unwrap();
        assert_eq!(e, extent(-95.0, 28.0, -87.7, 33.8));
    }

    #[test]
    fn parses_with_whitespace_and_integers() {
        let e = Extent::parse(" -95 , 28,-88 ,34 ").unwrap();
        assert_eq!(e, extent(-95.0, 28.0, -88.0, 34.0));
    }

    #[test]
    fn trailing_comma_is_ignored() {
        assert!(Extent::parse("-95,28,-88,34,").is_ok());
        assert!(Extent::parse("-95,28,-88,34,,").is_ok());
    }

    #[test]
    fn rejects_wrong_arity() {
        for bad in ["", "-95,28,-88", "-95,28,-88,34,1", "-95,,28,-88,34"] {
            assert!(
                matches!(Extent::parse(bad), Err(PlanError::InvalidExtent { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert!(Extent::parse("a,28,-88,34").is_err());
        assert!(Extent::parse("-95,28,-88,NaN").is_err());
        assert!(Extent::parse("-inf,28,-88,34").is_err());
    }

    #[test]
    fn rejects_inverted_and_degenerate_bounds() {
        assert!(Extent::parse("-88,28,-95,34").is_err());
        assert!(Extent::parse("-95,34,-88,28").is_err());
        assert!(Extent::parse("-95,28,-95,34").is_err());
        assert!(Extent::parse("-95,28,-88,28").is_err());
    }

    #[test]
    fn format_round_trips() {
        for text in ["-95,28,-87.7,33.8", "0.125,-10.5,179.999,89.25", "1,2,3,4"] {
            let e = Extent::parse(text).unwrap();
            assert_eq!(Extent::parse(&e.to_string()).unwrap(), e);
        }
        assert_eq!(extent(-95.0, 28.0, -88.0, 34.0).to_string(), "-95,28,-88,34");
    }

    #[test]
    fn buffer_defaults_to_twenty_percent() {
        assert_eq!(BufferConfig::parse(None).unwrap(), BufferConfig::uniform(20.0));
        assert_eq!(BufferConfig::parse(Some("")).unwrap(), BufferConfig::uniform(20.0));
    }

    #[test]
    fn buffer_single_value_applies_to_both_axes() {
        assert_eq!(BufferConfig::parse(Some("15")).unwrap(), BufferConfig::uniform(15.0));
        let b = BufferConfig::parse(Some("0.15")).unwrap();
        assert_close(b.ew, 15.0);
        assert_close(b.ns, 15.0);
    }

    #[test]
    fn buffer_dual_values_are_independent() {
        let b = BufferConfig::parse(Some("25, 15")).unwrap();
        assert_eq!(b, BufferConfig { ew: 25.0, ns: 15.0 });

        let b = BufferConfig::parse(Some("0.3,0.1")).unwrap();
        assert_close(b.ew, 30.0);
        assert_close(b.ns, 10.0);
    }

    #[test]
    fn buffer_accepts_boundaries() {
        assert_eq!(BufferConfig::parse(Some("0")).unwrap(), BufferConfig::uniform(0.0));
        assert_eq!(BufferConfig::parse(Some("100")).unwrap(), BufferConfig::uniform(100.0));
        // 1 is not a fraction; it means one percent.
        assert_eq!(BufferConfig::parse(Some("1")).unwrap(), BufferConfig::uniform(1.0));
    }

    #[test]
    fn buffer_rejects_out_of_range_and_garbage() {
        for bad in ["-5", "100.5", "150", "-0.5", "abc", "20,x", "10,20,30", " "] {
            assert!(
                matches!(
                    BufferConfig::parse(Some(bad)),
                    Err(PlanError::InvalidBuffer { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_buffer_is_identity() {
        let e = extent(-95.0, 28.0, -88.0, 34.0);
        assert_eq!(e.buffered(BufferConfig::uniform(0.0)), e);
    }

    #[test]
    fn full_buffer_pads_each_side_by_the_whole_span() {
        let e = extent(-95.0, 28.0, -87.0, 34.0);
        let b = e.buffered(BufferConfig::uniform(100.0));
        assert_close(b.xmin, -103.0);
        assert_close(b.ymin, 22.0);
        assert_close(b.xmax, -79.0);
        assert_close(b.ymax, 40.0);
    }

    #[test]
    fn independent_buffers_touch_only_their_axis() {
        let e = extent(-95.0, 28.0, -87.0, 34.0);
        let b = e.buffered(BufferConfig { ew: 25.0, ns: 15.0 });
        assert_close(b.xmin, -97.0);
        assert_close(b.ymin, 27.1);
        assert_close(b.xmax, -85.0);
        assert_close(b.ymax, 34.9);

        let oblong = extent(0.0, 0.0, 40.0, 10.0);
        let ew_only = oblong.buffered(BufferConfig { ew: 50.0, ns: 0.0 });
        assert_close(ew_only.xmin, -20.0);
        assert_close(ew_only.xmax, 60.0);
        assert_eq!(ew_only.ymin, 0.0);
        assert_eq!(ew_only.ymax, 10.0);
    }

    #[test]
    fn fragment_rounds_and_double_dashes_negatives() {
        let e = extent(-95.3, 28.7, -87.2, 33.6);
        assert_eq!(e.directory_fragment(Scale::Ten), "ne-10m--95-29--87-34");

        let e = extent(-95.6, 28.4, -87.5, 33.5);
        assert_eq!(e.directory_fragment(Scale::Ten), "ne-10m--96-28--88-34");
    }

    #[test]
    fn fragment_covers_every_scale() {
        let e = extent(-95.0, 28.0, -88.0, 32.0);
        assert_eq!(e.directory_fragment(Scale::Ten), "ne-10m--95-28--88-32");
        assert_eq!(e.directory_fragment(Scale::Fifty), "ne-50m--95-28--88-32");
        assert_eq!(e.directory_fragment(Scale::OneTen), "ne-110m--95-28--88-32");
    }

    #[test]
    fn fragment_halves_round_away_from_zero() {
        let e = extent(-2.5, 0.5, 2.5, 1.5);
        assert_eq!(e.directory_fragment(Scale::Fifty), "ne-50m--3-1-3-2");

        let e = extent(-0.4, -0.5, 0.4, 0.49);
        assert_eq!(e.directory_fragment(Scale::Fifty), "ne-50m-0--1-0-0");
    }

    #[test]
    fn fragment_is_deterministic_and_dot_free() {
        let e = extent(-95.7, 28.3, -87.8, 33.9);
        let a = e.directory_fragment(Scale::OneTen);
        assert_eq!(a, e.directory_fragment(Scale::OneTen));
        assert!(!a.contains('.'));
    }
}
