//! Recognising YouTube links in free text

use sona_core::CatalogLink;
use url::Url;

const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com", "music.youtube.com"];
const SHORT_HOST: &str = "youtu.be";

/// Classify the first YouTube link found in `text`
///
/// A `list` parameter wins over `v`, so a watch link inside a playlist
/// queues the whole playlist.
pub fn parse_youtube_link(text: &str) -> Option<CatalogLink> {
    text.split_whitespace().find_map(classify)
}

fn classify(token: &str) -> Option<CatalogLink> {
    let url = Url::parse(token).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;

    if host == SHORT_HOST {
        let id = url.path_segments()?.next().filter(|s| !s.is_empty())?;
        return Some(CatalogLink::Track(id.to_string()));
    }

    if !WATCH_HOSTS.contains(&host) {
        return None;
    }

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.into_owned())
    };

    match url.path() {
        "/watch" | "/playlist" => {
            if let Some(list) = query("list") {
                return Some(CatalogLink::Playlist(list));
            }
            query("v").map(CatalogLink::Track)
        }
        _ => None,
    }
}
