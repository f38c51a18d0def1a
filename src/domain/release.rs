use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl Release {
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|date| date.with_timezone(&Utc))
    }

    /// `YYYY-MM-DD`, or the raw timestamp if it cannot be parsed.
    pub fn display_date(&self) -> String {
        match self.published() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self
                .published_at
                .clone()
                .unwrap_or_else(|| "unpublished".to_string()),
        }
    }

    pub fn matches_marker(&self, marker: &str) -> bool {
        let marker = marker.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&marker);
        contains(&self.tag_name)
            || self.name.as_deref().is_some_and(contains)
            || self.body.as_deref().is_some_and(contains)
    }
}

/// Orders releases newest first by publish time. Undated releases keep
/// their relative order after every dated one.
pub fn sort_newest_first(releases: &mut [Release]) {
    releases.sort_by(|a, b| match (a.published(), b.published()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

pub fn filter_production_releases(releases: &[Release], marker: &str) -> Vec<Release> {
    releases
        .iter()
        .filter(|release| release.matches_marker(marker))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) fn release(tag: &str, published_at: &str) -> Release {
    Release {
        tag_name: tag.to_string(),
        name: None,
        body: None,
        published_at: Some(published_at.to_string()),
    }
}
