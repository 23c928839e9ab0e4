//! Plain-text replies

use sona_core::{PlayRequest, Track};
use std::fmt::Write;

/// Queue listings stop growing past this many characters
pub const LISTING_LIMIT: usize = 1950;

/// Rank reports stop growing past this many characters
pub const REPORT_LIMIT: usize = 2000;

const FENCE: &str = "```";

/// `Count: N` then numbered entries in a code block
///
/// Entries that would push the text past [`LISTING_LIMIT`] are replaced by a
/// single line with how many were left out.
pub fn queue_listing(queue: &[&PlayRequest]) -> String {
    if queue.is_empty() {
        return "The queue is empty".to_string();
    }

    let mut text = format!("Count: {}\n{}\n", queue.len(), FENCE);
    for (i, request) in queue.iter().enumerate() {
        let line = format!("{}. {}\n", i + 1, request.track);
        if text.len() + line.len() > LISTING_LIMIT {
            let _ = writeln!(text, "...and {} more", queue.len() - i);
            break;
        }
        text.push_str(&line);
    }
    text.push_str(FENCE);
    text
}

/// Numbered search results for picking
pub fn search_listing(keyword: &str, tracks: &[Track]) -> String {
    let mut text = format!("Results for \"{}\"\n", keyword);
    for (i, track) in tracks.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, track);
    }
    text.push_str("Reply with a number to play it");
    text
}

/// Numbered `title (count)` lines in a code block
///
/// Entries are `(rank, title, play count)` in rank order; ranks may have gaps
/// where a title could not be resolved. Lines that would push
/// the text past [`REPORT_LIMIT`] are dropped.
pub fn rank_report(entries: &[(usize, String, u64)]) -> String {
    let mut text = format!("Most played\n{}\n", FENCE);
    for (rank, title, count) in entries {
        let line = format!("{}. {} ({})\n", rank, title, count);
        if text.len() + line.len() + FENCE.len() > REPORT_LIMIT {
            break;
        }
        text.push_str(&line);
    }
    text.push_str(FENCE);
    text
}
