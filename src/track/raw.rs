//! Lenient mirror of upstream catalog track payloads.
//!
//! Every field is optional and every nested value tolerates a wrong type:
//! malformed parts deserialize to `Lenient::Malformed` instead of rejecting
//! the whole record.

use serde::Deserialize;
use serde::de::IgnoredAny;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Lenient<T> {
    Value(T),
    Malformed(IgnoredAny),
}

impl<T> Lenient<T> {
    pub(super) fn value(&self) -> Option<&T> {
        match self {
            Lenient::Value(v) => Some(v),
            Lenient::Malformed(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawNumber {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub(super) struct RawAlbumObject {
    pub name: Option<Lenient<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawAlbum {
    Name(String),
    Object(RawAlbumObject),
}

/// A quality-tiered entry: `{ "quality": "320kbps", "url": "..." }`.
/// Some payloads use `link` instead of `url`.
#[derive(Debug, Deserialize)]
pub(super) struct RawTiered {
    pub quality: Option<Lenient<String>>,
    pub url: Option<Lenient<String>>,
    pub link: Option<Lenient<String>>,
}

impl RawTiered {
    pub(super) fn href(&self) -> Option<&str> {
        [&self.url, &self.link]
            .into_iter()
            .flatten()
            .filter_map(Lenient::value)
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

pub(super) type TieredList = Vec<Lenient<RawTiered>>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawUrlItem {
    Plain(String),
    Tiered(RawTiered),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawUrl {
    Plain(String),
    List(Vec<Lenient<RawUrlItem>>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawImages {
    Plain(String),
    List(TieredList),
}

#[derive(Debug, Deserialize)]
pub(super) struct RawTrack {
    pub id: Option<Lenient<RawId>>,

    pub name: Option<Lenient<String>>,
    pub title: Option<Lenient<String>>,

    #[serde(rename = "primaryArtists")]
    pub primary_artists_camel: Option<Lenient<String>>,
    pub primary_artists: Option<Lenient<String>>,
    pub artist: Option<Lenient<String>>,

    pub album: Option<Lenient<RawAlbum>>,
    pub duration: Option<Lenient<RawNumber>>,

    #[serde(rename = "downloadUrl")]
    pub download_url_camel: Option<Lenient<TieredList>>,
    pub download_url: Option<Lenient<TieredList>>,
    pub url: Option<Lenient<RawUrl>>,

    pub image: Option<Lenient<RawImages>>,
    pub images: Option<Lenient<RawImages>>,
    pub thumbnail: Option<Lenient<String>>,
}
