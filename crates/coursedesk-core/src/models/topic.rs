use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Store-assigned topic identifier. Opaque; never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(id: impl Into<String>) -> Self {
        TopicId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TopicId {
    fn from(id: String) -> Self {
        TopicId(id)
    }
}

impl From<&str> for TopicId {
    fn from(id: &str) -> Self {
        TopicId(id.to_string())
    }
}

/// A catalog entry as returned by the store.
///
/// Media fields are references to externally hosted content; the catalog
/// never holds the bytes itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRecord {
    #[serde(alias = "_id")]
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_url: Option<String>,
}

impl TopicRecord {
    /// Minimal record with only an id and title; everything else empty.
    pub fn new(id: impl Into<TopicId>, title: impl Into<String>) -> Self {
        TopicRecord {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            unit_name: None,
            class_name: None,
            video_url: None,
            notes_url: None,
        }
    }

    /// Whether every present media link is an absolute http(s) locator.
    pub fn has_valid_links(&self) -> bool {
        [&self.video_url, &self.notes_url]
            .into_iter()
            .flatten()
            .all(|url| is_fetchable_url(url))
    }

    /// Clear any media link that is not an absolute http(s) locator.
    /// Returns the wire names of the fields that were cleared.
    pub fn strip_invalid_links(&mut self) -> Vec<&'static str> {
        let mut cleared = Vec::new();
        for (name, link) in [
            ("videoUrl", &mut self.video_url),
            ("notesUrl", &mut self.notes_url),
        ] {
            if link.as_deref().is_some_and(|url| !is_fetchable_url(url)) {
                *link = None;
                cleared.push(name);
            }
        }
        cleared
    }

    /// "Unit | Class" line shown under a topic, skipping absent parts.
    pub fn unit_and_class(&self) -> String {
        [self.unit_name.as_deref(), self.class_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Validated text fields of a topic, ready to be sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub title: String,
    pub description: String,
    pub unit_name: Option<String>,
    pub class_name: Option<String>,
}

impl NewTopic {
    /// Text form parts in wire order. Absent values are sent as empty strings.
    pub fn form_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("unitName", self.unit_name.as_deref().unwrap_or("")),
            ("className", self.class_name.as_deref().unwrap_or("")),
        ]
    }
}

/// Absolute http or https URL with a host.
pub fn is_fetchable_url(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_store_record_with_underscore_id() {
        let value = json!({
            "_id": "1",
            "title": "Introduction to AI",
            "description": "Basics of Artificial Intelligence and its applications.",
            "unitName": "Unit 1",
            "className": "AIML - II Year",
            "videoUrl": "https://www.youtube.com/watch?v=1t2zzv8sLxM",
            "notesUrl": "https://example.com/ai-notes.pdf"
        });

        let record: TopicRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.id, TopicId::new("1"));
        assert_eq!(record.unit_name.as_deref(), Some("Unit 1"));
        assert_eq!(record.class_name.as_deref(), Some("AIML - II Year"));
        assert!(record.has_valid_links());
    }

    #[test]
    fn test_deserialize_minimal_record_defaults_description() {
        let record: TopicRecord =
            serde_json::from_value(json!({ "id": "3", "title": "ReactJS Basics" })).unwrap();
        assert_eq!(record, TopicRecord::new("3", "ReactJS Basics"));
        assert_eq!(record.description, "");
        assert!(record.video_url.is_none());
        assert!(record.has_valid_links());
    }

    #[test]
    fn test_serialize_skips_absent_media() {
        let value = serde_json::to_value(TopicRecord::new("7", "Graphs")).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["description"], "");
        assert!(value.get("videoUrl").is_none());
        assert!(value.get("notesUrl").is_none());
    }

    #[test]
    fn test_has_valid_links_rejects_relative_locator() {
        let mut record = TopicRecord::new("1", "Intro");
        record.notes_url = Some("/uploads/notes.pdf".to_string());
        assert!(!record.has_valid_links());
    }

    #[test]
    fn test_is_fetchable_url() {
        assert!(is_fetchable_url("https://example.com/ai-notes.pdf"));
        assert!(is_fetchable_url("HTTP://localhost:5000/uploads/v.mp4"));
        assert!(!is_fetchable_url("ftp://example.com/file"));
        assert!(!is_fetchable_url("https://"));
        assert!(!is_fetchable_url("notes.pdf"));
        assert!(!is_fetchable_url("/uploads/videos/1/intro.mp4"));
    }

    #[test]
    fn test_is_fetchable_url_rejects_malformed_hosts() {
        assert!(!is_fetchable_url("https://[::1"));
        assert!(!is_fetchable_url("http://@/x"));
        assert!(!is_fetchable_url("https://%%%/"));
        assert!(!is_fetchable_url("http://:80"));
        assert!(!is_fetchable_url("http://exa mple.com/notes.pdf"));
        assert!(is_fetchable_url("http://[::1]:5000/uploads/v.mp4"));
    }

    #[test]
    fn test_strip_invalid_links_keeps_good_ones() {
        let mut record = TopicRecord::new("1", "Intro");
        record.video_url = Some("/uploads/x.mp4".to_string());
        record.notes_url = Some("https://example.com/ai-notes.pdf".to_string());

        assert_eq!(record.strip_invalid_links(), vec!["videoUrl"]);
        assert!(record.video_url.is_none());
        assert_eq!(
            record.notes_url.as_deref(),
            Some("https://example.com/ai-notes.pdf")
        );
        assert!(record.has_valid_links());
        assert!(record.strip_invalid_links().is_empty());
    }

    #[test]
    fn test_unit_and_class_line() {
        let mut record = TopicRecord::new("1", "Intro");
        assert_eq!(record.unit_and_class(), "");
        record.unit_name = Some("Unit 2".to_string());
        assert_eq!(record.unit_and_class(), "Unit 2");
        record.class_name = Some("CSE - II Year".to_string());
        assert_eq!(record.unit_and_class(), "Unit 2 | CSE - II Year");
    }

    #[test]
    fn test_form_fields_send_empty_strings_for_absent_values() {
        let topic = NewTopic {
            title: "ReactJS Basics".to_string(),
            description: String::new(),
            unit_name: None,
            class_name: Some("Web Development".to_string()),
        };
        assert_eq!(
            topic.form_fields(),
            [
                ("title", "ReactJS Basics"),
                ("description", ""),
                ("unitName", ""),
                ("className", "Web Development"),
            ]
        );
    }
}
