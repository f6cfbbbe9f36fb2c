use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the metadata API interprets the `input` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Free-text song name
    #[default]
    Name,
    /// Provider-specific song id
    Id,
    /// Song page URL
    Url,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Name => "name",
            FilterMode::Id => "id",
            FilterMode::Url => "url",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FilterMode::Name),
            "id" => Ok(FilterMode::Id),
            "url" => Ok(FilterMode::Url),
            other => Err(format!("unknown filter mode '{}' (expected name, id or url)", other)),
        }
    }
}

/// Input to one song task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuery {
    pub title: String,
    pub filter: FilterMode,
}

impl SongQuery {
    pub fn new(title: impl Into<String>, filter: FilterMode) -> Self {
        Self {
            title: title.into(),
            filter,
        }
    }
}

/// First match returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    pub provider: String,
    pub stream_url: String,
    pub title: String,
    pub author: String,
    pub lyric_text: String,
    pub cover_url: String,
    pub link: String,
    pub song_id: String,
}

/// Raw search response: `{data: [...], code, error}`
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Option<Vec<SongEntry>>,
    pub code: i64,
    #[serde(default)]
    pub error: Option<String>,
}

/// One song record inside `data`. Providers omit fields freely.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SongEntry {
    #[serde(default, rename = "type")]
    pub source: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub songid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub lrc: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pic: Option<String>,
}

impl SongEntry {
    /// `provider` is the id that was queried; the record's own `type` wins when present.
    pub fn into_result(self, provider: &str) -> ProviderResult {
        ProviderResult {
            provider: self
                .source
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| provider.to_string()),
            stream_url: self.url.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            lyric_text: self.lrc.unwrap_or_default(),
            cover_url: self.pic.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            song_id: self.songid.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_mode_parsing() {
        assert_eq!("name".parse::<FilterMode>().unwrap(), FilterMode::Name);
        assert_eq!(" ID ".parse::<FilterMode>().unwrap(), FilterMode::Id);
        assert_eq!("url".parse::<FilterMode>().unwrap(), FilterMode::Url);
        assert!("title".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::Id.to_string(), "id");
    }

    #[test]
    fn test_decode_success_response() {
        let body = r#"{
            "data": [{
                "type": "netease",
                "link": "http://music.163.com/#/song?id=1",
                "songid": "1",
                "title": "Song A",
                "author": "Someone",
                "lrc": "[00:00.00] la la",
                "url": "http://cdn.example/a.mp3",
                "pic": "http://cdn.example/a.jpg"
            }],
            "code": 200,
            "error": ""
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.code, 200);

        let entry = response.data.unwrap().into_iter().next().unwrap();
        let result = entry.into_result("qq");
        assert_eq!(result.provider, "netease");
        assert_eq!(result.stream_url, "http://cdn.example/a.mp3");
        assert_eq!(result.cover_url, "http://cdn.example/a.jpg");
        assert_eq!(result.lyric_text, "[00:00.00] la la");
    }

    #[test]
    fn test_decode_tolerates_nulls_and_missing_fields() {
        let body = r#"{"data": null, "code": 404, "error": null}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.code, 404);
        assert!(response.data.is_none());

        let body = r#"{"data": [{"title": "Only Title", "lrc": null}], "code": 200}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        let result = response.data.unwrap().remove(0).into_result("kugou");
        assert_eq!(result.provider, "kugou");
        assert_eq!(result.title, "Only Title");
        assert!(result.lyric_text.is_empty());
    }

    #[test]
    fn test_empty_body_is_decode_error() {
        assert!(serde_json::from_slice::<SearchResponse>(b"").is_err());
    }
}
