//! Subtitle mapping.

use super::{disposition_args, ArgumentList};
use crate::probe::StreamKind;
use crate::selection::TrackSelection;

/// Map subtitle streams and copy them unchanged.
///
/// [`TrackSelection::All`] uses the optional specifier `0:s?`, so files
/// without subtitles still encode. Explicit selections map each index and
/// mark the first mapped stream as default.
pub fn subtitle_args(args: &mut ArgumentList, tracks: &TrackSelection) {
    match tracks {
        TrackSelection::All => {
            args.pair("-map", "0:s?").pair("-c:s", "copy");
        }
        TrackSelection::Indices(indices) if indices.is_empty() => {}
        TrackSelection::Indices(indices) => {
            for index in indices {
                args.pair("-map", format!("0:s:{index}"));
            }
            args.pair("-c:s", "copy");
            disposition_args(args, StreamKind::Subtitle, indices.len());
        }
    }
}
