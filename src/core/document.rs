//! Game design document model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::asset::AssetHandle;
use super::error::{Error, Result};

/// Author placeholder shown until the user fills in their name
pub const DEFAULT_AUTHOR: &str = "YOUR_NAME";

/// Title shown when the working title is blank
pub const UNTITLED: &str = "Untitled GDD";

/// A game design document
///
/// Every field is plain text. Missing fields in a persisted blob fall back
/// to their defaults and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    pub author_name: String,
    pub working_title: String,
    pub concept: String,
    pub genre: String,
    pub target_audience: String,
    pub target_platform: String,
    pub controls: String,
    pub core_gameplay_mechanics: String,
    pub unique_gameplay_elements: String,
    /// Ordered references; the position is the only identity
    pub references: Vec<ReferenceItem>,
}

/// One image/URL/caption entry in the reference list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredReferenceItem")]
pub struct ReferenceItem {
    pub reference_url: String,
    pub caption: String,
    /// Handle of an attached image, resolved by an [`AssetResolver`](super::asset::AssetResolver)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_handle: Option<AssetHandle>,
}

/// A reference as read from a blob, before the image handle names are merged
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredReferenceItem {
    reference_url: String,
    caption: String,
    image_handle: Option<String>,
    texture_guid: Option<String>,
}

impl From<StoredReferenceItem> for ReferenceItem {
    fn from(stored: StoredReferenceItem) -> Self {
        // imageHandle wins over the legacy textureGuid; empty strings mean no image
        let image_handle = [stored.image_handle, stored.texture_guid]
            .into_iter()
            .flatten()
            .find(|h| !h.is_empty())
            .map(AssetHandle::new);
        Self {
            reference_url: stored.reference_url,
            caption: stored.caption,
            image_handle,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self {
            author_name: DEFAULT_AUTHOR.to_string(),
            working_title: String::new(),
            concept: String::new(),
            genre: String::new(),
            target_audience: String::new(),
            target_platform: String::new(),
            controls: String::new(),
            core_gameplay_mechanics: String::new(),
            unique_gameplay_elements: String::new(),
            references: Vec::new(),
        }
    }
}

impl Document {
    /// Parse a document from a blob
    ///
    /// The top level must be a JSON object. Anything else is a parse error.
    pub fn from_blob(blob: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(blob).map_err(Error::Parse)?;
        if !value.is_object() {
            return Err(Error::Parse(serde::de::Error::custom(
                "document blob must be a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(Error::Parse)
    }

    /// Serialize the document to a blob
    pub fn to_blob(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Serialize)
    }

    /// Get the working title, or a placeholder if it is blank
    pub fn display_title(&self) -> &str {
        if self.working_title.trim().is_empty() {
            UNTITLED
        } else {
            &self.working_title
        }
    }

    /// Get a scalar field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::AuthorName => &self.author_name,
            Field::WorkingTitle => &self.working_title,
            Field::Concept => &self.concept,
            Field::Genre => &self.genre,
            Field::TargetAudience => &self.target_audience,
            Field::TargetPlatform => &self.target_platform,
            Field::Controls => &self.controls,
            Field::CoreGameplayMechanics => &self.core_gameplay_mechanics,
            Field::UniqueGameplayElements => &self.unique_gameplay_elements,
        }
    }

    /// Set a scalar field
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::AuthorName => &mut self.author_name,
            Field::WorkingTitle => &mut self.working_title,
            Field::Concept => &mut self.concept,
            Field::Genre => &mut self.genre,
            Field::TargetAudience => &mut self.target_audience,
            Field::TargetPlatform => &mut self.target_platform,
            Field::Controls => &mut self.controls,
            Field::CoreGameplayMechanics => &mut self.core_gameplay_mechanics,
            Field::UniqueGameplayElements => &mut self.unique_gameplay_elements,
        };
        *slot = value.into();
    }

    /// Append an empty reference and return its index
    pub fn push_reference(&mut self) -> usize {
        self.references.push(ReferenceItem::default());
        self.references.len() - 1
    }

    /// Remove the reference at `index`, shifting later entries down
    pub fn remove_reference(&mut self, index: usize) -> Result<ReferenceItem> {
        self.check_index(index)?;
        Ok(self.references.remove(index))
    }

    /// Set the URL or caption of a reference
    pub fn set_reference_field(
        &mut self,
        index: usize,
        field: ReferenceField,
        value: impl Into<String>,
    ) -> Result<()> {
        let item = self.reference_mut(index)?;
        match field {
            ReferenceField::Url => item.reference_url = value.into(),
            ReferenceField::Caption => item.caption = value.into(),
        }
        Ok(())
    }

    /// Attach or clear the image of a reference
    pub fn set_reference_image(&mut self, index: usize, handle: Option<AssetHandle>) -> Result<()> {
        self.reference_mut(index)?.image_handle = handle.filter(|h| !h.is_empty());
        Ok(())
    }

    fn reference_mut(&mut self, index: usize) -> Result<&mut ReferenceItem> {
        let len = self.references.len();
        self.references.get_mut(index).ok_or(Error::Index { index, len })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.references.len();
        if index < len {
            Ok(())
        } else {
            Err(Error::Index { index, len })
        }
    }
}

/// Scalar text fields of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    AuthorName,
    WorkingTitle,
    Concept,
    Genre,
    TargetAudience,
    TargetPlatform,
    Controls,
    CoreGameplayMechanics,
    UniqueGameplayElements,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::AuthorName,
        Field::WorkingTitle,
        Field::Concept,
        Field::Genre,
        Field::TargetAudience,
        Field::TargetPlatform,
        Field::Controls,
        Field::CoreGameplayMechanics,
        Field::UniqueGameplayElements,
    ];

    /// Name of the field in the persisted blob
    pub fn key(self) -> &'static str {
        match self {
            Field::AuthorName => "authorName",
            Field::WorkingTitle => "workingTitle",
            Field::Concept => "concept",
            Field::Genre => "genre",
            Field::TargetAudience => "targetAudience",
            Field::TargetPlatform => "targetPlatform",
            Field::Controls => "controls",
            Field::CoreGameplayMechanics => "coreGameplayMechanics",
            Field::UniqueGameplayElements => "uniqueGameplayElements",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Field::AuthorName => "By",
            Field::WorkingTitle => "Working Title",
            Field::Concept => "Concept",
            Field::Genre => "Genre",
            Field::TargetAudience => "Target Audience",
            Field::TargetPlatform => "Target Platform",
            Field::Controls => "Controls",
            Field::CoreGameplayMechanics => "Core Gameplay Mechanics",
            Field::UniqueGameplayElements => "Unique Gameplay Elements",
        }
    }

    /// Whether the field holds long-form text
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            Field::Concept
                | Field::Controls
                | Field::CoreGameplayMechanics
                | Field::UniqueGameplayElements
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Strip separators and case so `working-title`, `working_title` and
/// `workingTitle` compare equal
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = normalize(s);
        Field::ALL
            .into_iter()
            .find(|f| normalize(f.key()) == wanted)
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Editable text fields of a [`ReferenceItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceField {
    Url,
    Caption,
}

impl FromStr for ReferenceField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "url" | "referenceurl" => Ok(ReferenceField::Url),
            "caption" => Ok(ReferenceField::Caption),
            _ => Err(format!("Unknown reference field: {}", s)),
        }
    }
}

/// Pages the document is edited in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Introduction,
    Gameplay,
    ArtVisuals,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Introduction, Section::Gameplay, Section::ArtVisuals];

    pub fn title(self) -> &'static str {
        match self {
            Section::Introduction => "Introduction",
            Section::Gameplay => "Gameplay",
            Section::ArtVisuals => "Art & Visuals",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Section::Introduction => "Define the game clearly and quickly.",
            Section::Gameplay => "Describe the core loop, mechanics and what makes it special.",
            Section::ArtVisuals => "Add references + captions to guide the art direction.",
        }
    }

    /// Scalar fields edited on this page (the reference list lives on Art & Visuals)
    pub fn fields(self) -> &'static [Field] {
        match self {
            Section::Introduction => &[
                Field::AuthorName,
                Field::WorkingTitle,
                Field::Concept,
                Field::Genre,
                Field::TargetAudience,
                Field::TargetPlatform,
            ],
            Section::Gameplay => &[
                Field::Controls,
                Field::CoreGameplayMechanics,
                Field::UniqueGameplayElements,
            ],
            Section::ArtVisuals => &[],
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "introduction" | "intro" => Ok(Section::Introduction),
            "gameplay" => Ok(Section::Gameplay),
            "artvisuals" | "art&visuals" | "art" => Ok(Section::ArtVisuals),
            _ => Err(format!("Unknown section: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(doc: &Document) -> Vec<&str> {
        doc.references.iter().map(|r| r.caption.as_str()).collect()
    }

    fn with_captions(captions: &[&str]) -> Document {
        let mut doc = Document::default();
        for caption in captions {
            let idx = doc.push_reference();
            doc.set_reference_field(idx, ReferenceField::Caption, *caption).unwrap();
        }
        doc
    }

    #[test]
    fn test_default_document() {
        let doc = Document::default();
        assert_eq!(doc.author_name, "YOUR_NAME");
        assert_eq!(doc.working_title, "");
        assert!(doc.references.is_empty());
        assert_eq!(doc.display_title(), "Untitled GDD");
    }

    #[test]
    fn test_display_title_ignores_whitespace() {
        let mut doc = Document::default();
        doc.set_field(Field::WorkingTitle, "   ");
        assert_eq!(doc.display_title(), UNTITLED);
        doc.set_field(Field::WorkingTitle, "Sky Raiders");
        assert_eq!(doc.display_title(), "Sky Raiders");
    }

    #[test]
    fn test_set_and_get_every_field() {
        let mut doc = Document::default();
        for field in Field::ALL {
            doc.set_field(field, field.label());
        }
        for field in Field::ALL {
            assert_eq!(doc.field(field), field.label());
        }
        assert_eq!(doc.core_gameplay_mechanics, "Core Gameplay Mechanics");
    }

    #[test]
    fn test_parse_field_names() {
        assert_eq!("workingTitle".parse::<Field>().unwrap(), Field::WorkingTitle);
        assert_eq!("working-title".parse::<Field>().unwrap(), Field::WorkingTitle);
        assert_eq!("TARGET_AUDIENCE".parse::<Field>().unwrap(), Field::TargetAudience);
        assert!("references".parse::<Field>().is_err());
    }

    #[test]
    fn test_remove_reference_shifts_later_entries() {
        let mut doc = with_captions(&["A", "B", "C"]);
        let removed = doc.remove_reference(1).unwrap();
        assert_eq!(removed.caption, "B");
        assert_eq!(refs(&doc), vec!["A", "C"]);
    }

    #[test]
    fn test_remove_out_of_range_leaves_list_unchanged() {
        let mut doc = with_captions(&["A", "B"]);
        let before = doc.clone();
        match doc.remove_reference(99) {
            Err(Error::Index { index, len }) => {
                assert_eq!(index, 99);
                assert_eq!(len, 2);
            }
            other => panic!("expected index error, got {:?}", other),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_duplicate_references_allowed() {
        let doc = with_captions(&["same", "same"]);
        assert_eq!(doc.references.len(), 2);
    }

    #[test]
    fn test_reference_setters_check_bounds() {
        let mut doc = with_captions(&["A"]);
        assert!(doc.set_reference_field(1, ReferenceField::Url, "x").is_err());
        assert!(doc.set_reference_image(3, Some(AssetHandle::new("a.png"))).is_err());

        doc.set_reference_image(0, Some(AssetHandle::new(""))).unwrap();
        assert_eq!(doc.references[0].image_handle, None);
        doc.set_reference_image(0, Some(AssetHandle::new("art/hero.png"))).unwrap();
        assert_eq!(doc.references[0].image_handle.as_ref().map(|h| h.as_str()), Some("art/hero.png"));
    }

    #[test]
    fn test_from_blob_is_tolerant() {
        let doc = Document::from_blob(r#"{"workingTitle": "Tide", "extra": 1}"#).unwrap();
        assert_eq!(doc.working_title, "Tide");
        assert_eq!(doc.author_name, DEFAULT_AUTHOR);
        assert_eq!(doc.genre, "");
    }

    #[test]
    fn test_from_blob_reads_legacy_texture_guid() {
        let blob = r#"{"references": [
            {"referenceUrl": "https://a", "caption": "one", "textureGuid": "abc123"},
            {"referenceUrl": "", "caption": "two", "textureGuid": ""}
        ]}"#;
        let doc = Document::from_blob(blob).unwrap();
        assert_eq!(doc.references[0].image_handle, Some(AssetHandle::new("abc123")));
        assert_eq!(doc.references[1].image_handle, None);
    }

    #[test]
    fn test_image_handle_wins_over_texture_guid() {
        let blob = r#"{"references": [
            {"caption": "both", "imageHandle": "art/new.png", "textureGuid": "old-guid"},
            {"caption": "empty new", "imageHandle": "", "textureGuid": "old-guid"}
        ]}"#;
        let doc = Document::from_blob(blob).unwrap();
        assert_eq!(doc.references[0].image_handle, Some(AssetHandle::new("art/new.png")));
        assert_eq!(doc.references[1].image_handle, Some(AssetHandle::new("old-guid")));
        assert_eq!(doc.references[0].caption, "both");
    }

    #[test]
    fn test_from_blob_rejects_non_objects() {
        for blob in ["null", "[]", "\"text\"", "42", "{not json"] {
            assert!(matches!(Document::from_blob(blob), Err(Error::Parse(_))), "{}", blob);
        }
    }

    #[test]
    fn test_to_blob_omits_absent_image() {
        let doc = with_captions(&["A"]);
        let blob = doc.to_blob().unwrap();
        assert!(blob.contains("\"caption\": \"A\""));
        assert!(!blob.contains("imageHandle"));
    }

    #[test]
    fn test_sections_cover_every_field_once() {
        let mut seen: Vec<Field> = Section::ALL.iter().flat_map(|s| s.fields().iter().copied()).collect();
        seen.sort_by_key(|f| f.key());
        let mut all = Field::ALL.to_vec();
        all.sort_by_key(|f| f.key());
        assert_eq!(seen, all);
        assert_eq!("art".parse::<Section>().unwrap(), Section::ArtVisuals);
    }
}
