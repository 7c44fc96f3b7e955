//! Sidecar metadata attached to a course file.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::debug;

/// A JSON object map for storing arbitrary metadata fields.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Deserialize tags, treating `null` as empty vec
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// File metadata from a `.meta` sidecar
///
/// # Standard Fields
///
/// | Field           | Type          | Description                      |
/// |-----------------|---------------|----------------------------------|
/// | `author`        | `String`      | Author name                      |
/// | `datePublished` | `String`      | Publication date                 |
/// | `description`   | `String`      | Short description                |
/// | `tags`          | `Vec<String>` | Tags, display order preserved    |
/// | `duration`      | `String`      | Free-form, e.g. "15 min read"    |
/// | `difficulty`    | `Difficulty`  | beginner, intermediate, advanced |
///
/// Any other field lands in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_tags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Unrecognized fields, preserved in document order.
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Metadata {
    /// Keys of the standard fields, as written in a sidecar.
    const STANDARD_FIELDS: [&str; 6] = [
        "author",
        "datePublished",
        "description",
        "tags",
        "duration",
        "difficulty",
    ];

    /// Parse a metadata document. Only JSON objects are accepted.
    ///
    /// A standard field with the wrong type is dropped on its own; the rest
    /// of the document still loads.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let Value::Object(mut map) = serde_json::from_slice(bytes)? else {
            return Err(serde::de::Error::custom("metadata must be a JSON object"));
        };

        let invalid: Vec<&str> = Self::STANDARD_FIELDS
            .into_iter()
            .filter(|field| {
                let Some(value) = map.get(*field) else {
                    return false;
                };
                let single = JsonMap::from_iter([(field.to_string(), value.clone())]);
                match serde_json::from_value::<Self>(Value::Object(single)) {
                    Ok(_) => false,
                    Err(e) => {
                        debug!("meta"; "dropping field `{}`: {}", field, e);
                        true
                    }
                }
            })
            .collect();
        if !invalid.is_empty() {
            map.retain(|key, _| !invalid.contains(&key.as_str()));
        }

        serde_json::from_value(Value::Object(map))
    }

    /// Whether any displayable field is present.
    pub fn has_display_fields(&self) -> bool {
        self.author.is_some()
            || self.date_published.is_some()
            || self.description.is_some()
            || !self.tags.is_empty()
            || self.duration.is_some()
            || self.difficulty.is_some()
    }
}

/// Difficulty level. Unknown values are preserved and shown neutrally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl Difficulty {
    pub fn from_label(label: &str) -> Self {
        match label {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Other(label) => label,
        }
    }

    /// CSS modifier used for the badge color.
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Beginner => "sy-badge--green",
            Self::Intermediate => "sy-badge--yellow",
            Self::Advanced => "sy-badge--red",
            Self::Other(_) => "sy-badge--slate",
        }
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_deserialize() {
        let json = br#"{
            "author": "John Smith",
            "datePublished": "2024-01-15",
            "description": "Intro to rebuttals",
            "tags": ["debate", "basics"],
            "difficulty": "beginner",
            "duration": "15 min read"
        }"#;
        let meta = Metadata::from_slice(json).unwrap();
        assert_eq!(meta.author.as_deref(), Some("John Smith"));
        assert_eq!(meta.date_published.as_deref(), Some("2024-01-15"));
        assert_eq!(meta.tags, vec!["debate", "basics"]);
        assert_eq!(meta.difficulty, Some(Difficulty::Beginner));
        assert_eq!(meta.duration.as_deref(), Some("15 min read"));
        assert!(meta.extra.is_empty());
        assert!(meta.has_display_fields());
    }

    #[test]
    fn test_metadata_extra_fields_preserved_in_order() {
        let json = br#"{"zeta": 1, "author": "A", "alpha": {"nested": true}}"#;
        let meta = Metadata::from_slice(json).unwrap();
        let keys: Vec<_> = meta.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(meta.extra["alpha"]["nested"], true);
    }

    #[test]
    fn test_metadata_null_tags() {
        let meta = Metadata::from_slice(br#"{"tags": null}"#).unwrap();
        assert!(meta.tags.is_empty());
        assert!(!meta.has_display_fields());
    }

    #[test]
    fn test_metadata_unknown_difficulty() {
        let meta = Metadata::from_slice(br#"{"difficulty": "expert"}"#).unwrap();
        let difficulty = meta.difficulty.unwrap();
        assert_eq!(difficulty, Difficulty::Other("expert".into()));
        assert_eq!(difficulty.css_class(), "sy-badge--slate");
    }

    #[test]
    fn test_metadata_wrong_typed_field_dropped_alone() {
        let json = br#"{"author": 42, "description": "ok", "tags": ["a"], "level": 3}"#;
        let meta = Metadata::from_slice(json).unwrap();
        assert_eq!(meta.author, None);
        assert_eq!(meta.description.as_deref(), Some("ok"));
        assert_eq!(meta.tags, vec!["a"]);
        assert_eq!(meta.extra["level"], 3);
        assert!(!meta.extra.contains_key("author"));

        let meta = Metadata::from_slice(br#"{"tags": "debate", "difficulty": 2, "duration": "5 min"}"#).unwrap();
        assert!(meta.tags.is_empty());
        assert_eq!(meta.difficulty, None);
        assert_eq!(meta.duration.as_deref(), Some("5 min"));
    }

    #[test]
    fn test_metadata_rejects_non_object() {
        assert!(Metadata::from_slice(b"[1, 2, 3]").is_err());
        assert!(Metadata::from_slice(b"\"text\"").is_err());
        assert!(Metadata::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_metadata_serialize_round_shape() {
        let meta = Metadata {
            author: Some("A".into()),
            difficulty: Some(Difficulty::Advanced),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["author"], "A");
        assert_eq!(json["difficulty"], "advanced");
        assert!(json.get("tags").is_none());
        assert!(json.get("datePublished").is_none());
    }
}
