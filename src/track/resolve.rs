//! Table-driven normalization from `RawTrack` to `TrackRecord`.
//!
//! Each attribute has one lookup table listing the upstream field names in
//! preference order. Adding a new naming convention means adding a row.

use std::time::Duration;

use crate::error::CatalogError;

use super::model::{ArtworkCandidate, SourceCandidate, TrackId, TrackRecord};
use super::raw::{
    Lenient, RawAlbum, RawId, RawImages, RawNumber, RawTiered, RawTrack, RawUrl, RawUrlItem,
    TieredList,
};

type TextField = fn(&RawTrack) -> Option<&Lenient<String>>;
type TieredField = fn(&RawTrack) -> Option<&Lenient<TieredList>>;
type ImagesField = fn(&RawTrack) -> Option<&Lenient<RawImages>>;

fn name(r: &RawTrack) -> Option<&Lenient<String>> {
    r.name.as_ref()
}
fn title(r: &RawTrack) -> Option<&Lenient<String>> {
    r.title.as_ref()
}
fn primary_artists_camel(r: &RawTrack) -> Option<&Lenient<String>> {
    r.primary_artists_camel.as_ref()
}
fn primary_artists(r: &RawTrack) -> Option<&Lenient<String>> {
    r.primary_artists.as_ref()
}
fn artist(r: &RawTrack) -> Option<&Lenient<String>> {
    r.artist.as_ref()
}
fn thumbnail(r: &RawTrack) -> Option<&Lenient<String>> {
    r.thumbnail.as_ref()
}
fn download_url_camel(r: &RawTrack) -> Option<&Lenient<TieredList>> {
    r.download_url_camel.as_ref()
}
fn download_url(r: &RawTrack) -> Option<&Lenient<TieredList>> {
    r.download_url.as_ref()
}
fn image(r: &RawTrack) -> Option<&Lenient<RawImages>> {
    r.image.as_ref()
}
fn images(r: &RawTrack) -> Option<&Lenient<RawImages>> {
    r.images.as_ref()
}

const TITLE_FIELDS: &[TextField] = &[name, title];
const ARTIST_FIELDS: &[TextField] = &[primary_artists_camel, primary_artists, artist];
const TIERED_SOURCE_FIELDS: &[TieredField] = &[download_url_camel, download_url];
const IMAGE_FIELDS: &[ImagesField] = &[image, images];
const THUMBNAIL_FIELDS: &[TextField] = &[thumbnail];

/// Untiered artwork lists are ordered small to large upstream; index 2 is the
/// large rendition.
const ARTWORK_POSITION_PREFERENCE: [usize; 3] = [2, 1, 0];

const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&#039;", "'"),
    ("&#39;", "'"),
    ("&quot;", "\""),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

pub(super) const UNKNOWN_TITLE: &str = "Unknown title";

pub(super) fn normalize(raw: RawTrack) -> Result<TrackRecord, CatalogError> {
    let id = raw
        .id
        .as_ref()
        .and_then(Lenient::value)
        .and_then(track_id)
        .ok_or(CatalogError::MissingField("id"))?;

    Ok(TrackRecord {
        id,
        title: first_text(&raw, TITLE_FIELDS).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        artist: first_text(&raw, ARTIST_FIELDS).unwrap_or_default(),
        album: album(&raw),
        duration: duration(&raw),
        sources: audio_sources(&raw),
        artwork: artwork(&raw),
    })
}

fn track_id(id: &RawId) -> Option<TrackId> {
    let text = match id {
        RawId::Text(s) => s.trim().to_string(),
        RawId::Number(n) => n.to_string(),
    };
    (!text.is_empty()).then(|| TrackId::new(text))
}

pub(super) fn decode_entities(text: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn clean(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| decode_entities(text))
}

fn first_text(raw: &RawTrack, fields: &[TextField]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| field(raw).and_then(Lenient::value))
        .find_map(|s| clean(s))
}

fn album(raw: &RawTrack) -> Option<String> {
    match raw.album.as_ref().and_then(Lenient::value)? {
        RawAlbum::Name(s) => clean(s),
        RawAlbum::Object(obj) => obj.name.as_ref().and_then(Lenient::value).and_then(|s| clean(s)),
    }
}

fn duration(raw: &RawTrack) -> Option<Duration> {
    let secs = match raw.duration.as_ref().and_then(Lenient::value)? {
        RawNumber::Number(n) => *n,
        RawNumber::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    (secs.is_finite() && secs > 0.0).then(|| Duration::from_secs_f64(secs))
}

/// Leading integer of a tier label: "320kbps" -> 320, "500x500" -> 500.
pub(super) fn parse_tier(label: &str) -> Option<u32> {
    let digits: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn tier_of(entry: &RawTiered) -> Option<u32> {
    entry
        .quality
        .as_ref()
        .and_then(Lenient::value)
        .and_then(|q| parse_tier(q))
}

/// Highest tier first. Entries without a tier rank below tiered ones, later
/// positions first (upstream lists are ascending).
fn rank_tiered<'a>(entries: impl Iterator<Item = &'a RawTiered>) -> Vec<SourceCandidate> {
    let mut ranked: Vec<(usize, SourceCandidate)> = entries
        .enumerate()
        .filter_map(|(pos, entry)| {
            entry.href().map(|url| {
                (
                    pos,
                    SourceCandidate {
                        tier: tier_of(entry),
                        url: url.to_string(),
                    },
                )
            })
        })
        .collect();
    ranked.sort_by(|(pa, a), (pb, b)| b.tier.cmp(&a.tier).then(pb.cmp(pa)));
    ranked.into_iter().map(|(_, c)| c).collect()
}

fn audio_sources(raw: &RawTrack) -> Vec<SourceCandidate> {
    let mut out: Vec<SourceCandidate> = Vec::new();

    for field in TIERED_SOURCE_FIELDS {
        if let Some(list) = field(raw).and_then(Lenient::value) {
            out.extend(rank_tiered(list.iter().filter_map(Lenient::value)));
        }
    }

    match raw.url.as_ref().and_then(Lenient::value) {
        Some(RawUrl::Plain(s)) => {
            if let Some(url) = clean_url(s) {
                out.push(SourceCandidate { tier: None, url });
            }
        }
        Some(RawUrl::List(items)) => {
            let items: Vec<&RawUrlItem> = items.iter().filter_map(Lenient::value).collect();
            out.extend(rank_tiered(items.iter().filter_map(|item| match item {
                RawUrlItem::Tiered(t) => Some(t),
                RawUrlItem::Plain(_) => None,
            })));
            if let Some(RawUrlItem::Plain(s)) = items.first() {
                if let Some(url) = clean_url(s) {
                    out.push(SourceCandidate { tier: None, url });
                }
            }
        }
        None => {}
    }

    let mut seen = std::collections::HashSet::new();
    out.retain(|c| seen.insert(c.url.clone()));
    out
}

fn clean_url(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn artwork(raw: &RawTrack) -> Vec<ArtworkCandidate> {
    let mut out: Vec<ArtworkCandidate> = Vec::new();

    match IMAGE_FIELDS
        .iter()
        .find_map(|field| field(raw).and_then(Lenient::value))
    {
        Some(RawImages::List(list)) => {
            let mut ranked: Vec<(usize, ArtworkCandidate)> = list
                .iter()
                .enumerate()
                .filter_map(|(pos, entry)| {
                    let entry = entry.value()?;
                    let url = entry.href()?.to_string();
                    Some((
                        pos,
                        ArtworkCandidate {
                            tier: tier_of(entry),
                            url,
                        },
                    ))
                })
                .collect();
            ranked.sort_by(|(pa, a), (pb, b)| {
                b.tier
                    .cmp(&a.tier)
                    .then(position_rank(*pa).cmp(&position_rank(*pb)))
            });
            out.extend(ranked.into_iter().map(|(_, c)| c));
        }
        Some(RawImages::Plain(s)) => {
            if let Some(url) = clean_url(s) {
                out.push(ArtworkCandidate { tier: None, url });
            }
        }
        None => {}
    }

    if let Some(url) = first_text(raw, THUMBNAIL_FIELDS) {
        out.push(ArtworkCandidate { tier: None, url });
    }

    out
}

fn position_rank(pos: usize) -> usize {
    ARTWORK_POSITION_PREFERENCE
        .iter()
        .position(|&p| p == pos)
        .unwrap_or(ARTWORK_POSITION_PREFERENCE.len() + pos)
}
