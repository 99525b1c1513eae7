//! Typed project records and the row normalizer.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::decoder::Row;

/// The only value that coerces a boolean column to `true`.
pub const TRUTHY_SENTINEL: &str = "TRUE";

/// Column names of the project sheet
pub mod columns {
    pub const NAME: &str = "name";
    pub const SHORTHAND: &str = "shorthand";
    pub const CREDITS: &str = "credits";
    pub const YEAR: &str = "year";
    pub const MEDIA_PATH: &str = "media_path";
    pub const VISIBLE: &str = "visible";
    pub const CATEGORY: &str = "category";
    pub const BLURB: &str = "blurb";
    pub const TAGS: &str = "tags";
    pub const MEDIA_ASPECT: &str = "media_aspect";
    pub const LINK_FEATURE: &str = "link_feature";
    pub const LINK: &str = "link";
}

const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4", "mov", "m4v"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub role: String,
    pub person: String,
}

/// A credited person split into what is shown and where it points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonLink<'a> {
    pub label: &'a str,
    pub url: Option<&'a str>,
}

impl Credit {
    pub fn new(role: impl Into<String>, person: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            person: person.into(),
        }
    }

    /// Split `Label[https://…]` into label and link target.
    pub fn person_link(&self) -> PersonLink<'_> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"^(?P<label>[^\[]*)\[(?P<url>[^\]]+)\]\s*$").ok());

        match pattern.as_ref().and_then(|re| re.captures(&self.person)) {
            Some(caps) => {
                let label = caps.name("label").map_or("", |m| m.as_str().trim());
                let url = caps.name("url").map(|m| m.as_str().trim());
                PersonLink { label, url }
            }
            None => PersonLink {
                label: self.person.as_str(),
                url: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One entry of the lightbox media strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub shorthand: String,
    pub credits: Vec<Credit>,
    pub year: String,
    pub media_path: String,
    pub visible: bool,
    pub category: String,
    pub blurb: String,
    pub tags: Vec<String>,
    pub media_aspect: String,
    pub link_feature: bool,
    pub link: String,
}

impl Project {
    /// Normalize one row mapping. Absent or malformed fields fall back to
    /// empty strings, empty lists and `false`.
    pub fn from_row(row: &Row) -> Self {
        Self {
            name: row.get(columns::NAME).to_string(),
            shorthand: row.get(columns::SHORTHAND).to_string(),
            credits: parse_credits(row.get(columns::CREDITS)),
            year: row.get(columns::YEAR).to_string(),
            media_path: row.get(columns::MEDIA_PATH).to_string(),
            visible: is_truthy(row.get(columns::VISIBLE)),
            category: row.get(columns::CATEGORY).to_string(),
            blurb: row.get(columns::BLURB).to_string(),
            tags: parse_tags(row.get(columns::TAGS)),
            media_aspect: row.get(columns::MEDIA_ASPECT).to_string(),
            link_feature: is_truthy(row.get(columns::LINK_FEATURE)),
            link: row.get(columns::LINK).to_string(),
        }
    }

    /// Last four characters of the free-text year, e.g. `2024` for `12/25/2024`.
    pub fn display_year(&self) -> &str {
        let count = self.year.chars().count();
        if count <= 4 {
            return &self.year;
        }
        let start = self
            .year
            .char_indices()
            .nth(count - 4)
            .map_or(0, |(i, _)| i);
        &self.year[start..]
    }

    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Chips shown in the lightbox: tags, or the category when untagged.
    pub fn chips(&self) -> Vec<&str> {
        if self.tags.is_empty() {
            if self.category.is_empty() {
                Vec::new()
            } else {
                vec![self.category.as_str()]
            }
        } else {
            self.tags.iter().map(String::as_str).collect()
        }
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        if self.media_path.is_empty() {
            return None;
        }
        let ext = self
            .media_path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            Some(MediaKind::Image)
        }
    }

    /// Lightbox media for this project; `images_url` and `videos_url` are
    /// the public URL prefixes of the two asset directories.
    pub fn media(&self, images_url: &str, videos_url: &str) -> Vec<MediaItem> {
        let Some(kind) = self.media_kind() else {
            return Vec::new();
        };
        let prefix = match kind {
            MediaKind::Image => images_url,
            MediaKind::Video => videos_url,
        };
        vec![MediaItem {
            kind,
            url: format!(
                "{}/{}",
                prefix.trim_end_matches('/'),
                self.media_path.trim_start_matches('/')
            ),
        }]
    }
}

/// `true` only for the exact sentinel; `"true"`, `" TRUE"` and `""` are false.
pub fn is_truthy(raw: &str) -> bool {
    raw == TRUTHY_SENTINEL
}

/// Parse `role,person;role,person`. Entries missing either half are dropped.
pub fn parse_credits(raw: &str) -> Vec<Credit> {
    raw.split(';')
        .filter_map(|segment| {
            let (role, person) = segment.trim().split_once(',')?;
            let (role, person) = (role.trim(), person.trim());
            if role.is_empty() || person.is_empty() {
                None
            } else {
                Some(Credit::new(role, person))
            }
        })
        .collect()
}

/// Parse `tag,tag,…`, trimming each tag. Never yields an empty tag.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize rows in order, keeping visible projects only.
pub fn normalize_rows<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<Project> {
    rows.into_iter()
        .map(Project::from_row)
        .filter(|project| project.visible)
        .collect()
}

pub fn slugify(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    folded
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
