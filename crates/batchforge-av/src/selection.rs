//! Track selection from user-supplied index lists.
//!
//! Users name tracks with 1-based indices in the order they want them in the
//! output (`"3,1"` puts the third audio track first and makes it the default).
//! Invalid tokens are dropped one by one; the remaining indices keep their
//! order, duplicates included.

use crate::probe::StreamKind;

/// Which streams of one kind to carry into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSelection {
    /// Every stream of the kind, mapped without explicit indices.
    All,
    /// 0-based stream indices in output order.
    Indices(Vec<usize>),
}

impl TrackSelection {
    /// Explicit indices, empty for [`TrackSelection::All`].
    pub fn indices(&self) -> &[usize] {
        match self {
            TrackSelection::All => &[],
            TrackSelection::Indices(v) => v,
        }
    }

    /// True when nothing of this kind will be mapped.
    pub fn is_empty(&self) -> bool {
        matches!(self, TrackSelection::Indices(v) if v.is_empty())
    }
}

/// Rule that produced a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// At least one user token was valid.
    Explicit,
    /// No list was given; the per-kind default applies.
    Default,
    /// A list was given but every token was rejected.
    Fallback,
    /// The file has no streams of this kind.
    NoStreams,
}

/// Why a token of the user list was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Not a non-negative integer.
    NotANumber,
    /// Indices are 1-based; 0 is never valid.
    BelowOne,
    /// Refers past the last stream.
    OutOfRange { total: usize },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotANumber => f.write_str("not a number"),
            RejectReason::BelowOne => f.write_str("indices start at 1"),
            RejectReason::OutOfRange { total } => write!(f, "only {total} stream(s) present"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedToken {
    pub token: String,
    pub reason: RejectReason,
}

/// Outcome of resolving a user list against a stream count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub tracks: TrackSelection,
    pub source: SelectionSource,
    pub rejected: Vec<RejectedToken>,
}

/// Resolve `raw` (comma-separated 1-based indices, possibly empty or unset)
/// against `total` streams of `kind`.
///
/// - unset or blank: audio selects `[0]`, subtitles select [`TrackSelection::All`];
/// - every token rejected: the same defaults, reported as
///   [`SelectionSource::Fallback`];
/// - `total == 0`: an empty selection, except an unset subtitle list which
///   stays [`TrackSelection::All`] because ffmpeg's optional mapping
///   tolerates zero matches.
///
/// # Example
///
/// ```
/// use batchforge_av::probe::StreamKind;
/// use batchforge_av::selection::{select_tracks, TrackSelection};
///
/// let sel = select_tracks(Some("5,1,3"), 4, StreamKind::Audio);
/// assert_eq!(sel.tracks, TrackSelection::Indices(vec![0, 2]));
/// assert_eq!(sel.rejected.len(), 1);
/// ```
pub fn select_tracks(raw: Option<&str>, total: usize, kind: StreamKind) -> Selection {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let (valid, rejected) = match raw {
        Some(list) => parse_indices(list, total),
        None => (Vec::new(), Vec::new()),
    };

    #[cfg(feature = "tracing")]
    for r in &rejected {
        tracing::warn!(
            "Ignoring {} track '{}': {}",
            kind,
            r.token,
            r.reason
        );
    }

    if total == 0 {
        #[cfg(feature = "tracing")]
        tracing::info!("No {} streams found", kind);
        let tracks = match (kind, raw) {
            (StreamKind::Subtitle, None) => TrackSelection::All,
            _ => TrackSelection::Indices(Vec::new()),
        };
        return Selection {
            tracks,
            source: SelectionSource::NoStreams,
            rejected,
        };
    }

    let (tracks, source) = match raw {
        None => (default_for(kind), SelectionSource::Default),
        Some(_) if valid.is_empty() => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "No valid {} tracks in selection, falling back to {}",
                kind,
                match kind {
                    StreamKind::Audio => "the first track",
                    StreamKind::Subtitle => "all tracks",
                }
            );
            (default_for(kind), SelectionSource::Fallback)
        }
        Some(_) => (TrackSelection::Indices(valid), SelectionSource::Explicit),
    };

    Selection {
        tracks,
        source,
        rejected,
    }
}

fn default_for(kind: StreamKind) -> TrackSelection {
    match kind {
        StreamKind::Audio => TrackSelection::Indices(vec![0]),
        StreamKind::Subtitle => TrackSelection::All,
    }
}

/// Split on commas and convert each valid 1-based token to a 0-based index.
fn parse_indices(list: &str, total: usize) -> (Vec<usize>, Vec<RejectedToken>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match check_token(token, total) {
            Ok(index) => valid.push(index),
            Err(reason) => rejected.push(RejectedToken {
                token: token.to_string(),
                reason,
            }),
        }
    }

    (valid, rejected)
}

fn check_token(token: &str, total: usize) -> Result<usize, RejectReason> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectReason::NotANumber);
    }
    // All digits but too large for usize: certainly past the last stream.
    let value: usize = token
        .parse()
        .map_err(|_| RejectReason::OutOfRange { total })?;
    if value < 1 {
        return Err(RejectReason::BelowOne);
    }
    if value - 1 >= total {
        return Err(RejectReason::OutOfRange { total });
    }
    Ok(value - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(raw: Option<&str>, total: usize) -> Selection {
        select_tracks(raw, total, StreamKind::Audio)
    }

    fn subs(raw: Option<&str>, total: usize) -> Selection {
        select_tracks(raw, total, StreamKind::Subtitle)
    }

    #[test]
    fn unset_audio_defaults_to_first_track() {
        for raw in [None, Some(""), Some("   ")] {
            let sel = audio(raw, 3);
            assert_eq!(sel.tracks, TrackSelection::Indices(vec![0]));
            assert_eq!(sel.source, SelectionSource::Default);
        }
    }

    #[test]
    fn unset_subtitles_select_all() {
        let sel = subs(None, 2);
        assert_eq!(sel.tracks, TrackSelection::All);
        assert_eq!(sel.source, SelectionSource::Default);
    }

    #[test]
    fn keeps_user_order_and_duplicates() {
        let sel = audio(Some("3,1,3"), 3);
        assert_eq!(sel.tracks, TrackSelection::Indices(vec![2, 0, 2]));
        assert_eq!(sel.source, SelectionSource::Explicit);
        assert!(sel.rejected.is_empty());
    }

    #[test]
    fn out_of_range_boundary() {
        let sel = audio(Some("5,1,3"), 4);
        assert_eq!(sel.tracks, TrackSelection::Indices(vec![0, 2]));
        assert_eq!(
            sel.rejected,
            vec![RejectedToken {
                token: "5".into(),
                reason: RejectReason::OutOfRange { total: 4 },
            }]
        );

        // 4 of 4 is the last valid index.
        assert_eq!(audio(Some("4"), 4).tracks, TrackSelection::Indices(vec![3]));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let sel = audio(Some("0, x ,-1,+2,2.0,,2"), 3);
        assert_eq!(sel.tracks, TrackSelection::Indices(vec![1]));
        let reasons: Vec<_> = sel.rejected.iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                RejectReason::BelowOne,
                RejectReason::NotANumber,
                RejectReason::NotANumber,
                RejectReason::NotANumber,
                RejectReason::NotANumber,
            ]
        );
    }

    #[test]
    fn huge_number_is_out_of_range() {
        let sel = audio(Some("99999999999999999999999999"), 2);
        assert_eq!(sel.source, SelectionSource::Fallback);
        assert_eq!(
            sel.rejected[0].reason,
            RejectReason::OutOfRange { total: 2 }
        );
    }

    #[test]
    fn all_invalid_falls_back() {
        let sel = audio(Some("9,abc"), 2);
        assert_eq!(sel.tracks, TrackSelection::Indices(vec![0]));
        assert_eq!(sel.source, SelectionSource::Fallback);
        assert_eq!(sel.rejected.len(), 2);

        let sel = subs(Some("7"), 2);
        assert_eq!(sel.tracks, TrackSelection::All);
        assert_eq!(sel.source, SelectionSource::Fallback);
    }

    #[test]
    fn no_streams_yields_empty_selection() {
        let sel = audio(None, 0);
        assert!(sel.tracks.is_empty());
        assert_eq!(sel.source, SelectionSource::NoStreams);

        let sel = audio(Some("1"), 0);
        assert!(sel.tracks.is_empty());
        assert_eq!(sel.rejected.len(), 1);

        let sel = subs(Some("1,2"), 0);
        assert!(sel.tracks.is_empty());
        assert_eq!(sel.source, SelectionSource::NoStreams);
    }

    #[test]
    fn unset_subtitles_without_streams_stay_optional_all() {
        let sel = subs(None, 0);
        assert_eq!(sel.tracks, TrackSelection::All);
        assert!(!sel.tracks.is_empty());
        assert_eq!(sel.source, SelectionSource::NoStreams);
    }

    #[test]
    fn indices_are_always_in_range() {
        let lists = ["1,2,3,4,5,6", "6,5,4,3,2,1", "2,2,2", "10,0,1", "a,3,b"];
        for total in 0..5 {
            for raw in lists {
                let sel = audio(Some(raw), total);
                assert!(
                    sel.tracks.indices().iter().all(|&i| i < total),
                    "{raw} against {total}: {:?}",
                    sel.tracks
                );
            }
        }
    }
}
