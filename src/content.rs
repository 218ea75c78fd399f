use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

/// Visual theme attached to text-bearing blocks by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTheme {
    #[default]
    Default,
    Tinted,
    Accent,
}

impl SectionTheme {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Default => "section--default",
            Self::Tinted => "section--tinted",
            Self::Accent => "section--accent",
        }
    }
}

/// One named rendition of an uploaded asset (thumbnail, small, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaFormat {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mime: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub url: String,
    pub mime: Option<String>,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Named renditions, keyed by format name. Decoded for inspection only;
    /// rendering always uses the original `url`.
    #[serde(default)]
    pub formats: Option<BTreeMap<String, MediaFormat>>,
}

impl MediaAsset {
    /// True when the asset can be shown as an inline image.
    pub fn is_image(&self) -> bool {
        self.mime
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }

    /// Alt text fallback chain: alternativeText -> caption -> empty.
    pub fn alt_text(&self) -> &str {
        self.alternative_text
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.caption.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextBlock {
    #[serde(default)]
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub theme: Option<SectionTheme>,
}

impl RichTextBlock {
    pub fn theme(&self) -> SectionTheme {
        self.theme.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub theme: Option<SectionTheme>,
}

impl QuoteBlock {
    pub fn theme(&self) -> SectionTheme {
        self.theme.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaBlock {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub file: Option<MediaAsset>,
}

/// Catch-all for discriminators this build does not recognize. Carries the
/// raw fields so inspection tools can still show what the backend sent.
#[derive(Debug, Clone)]
pub struct UnknownBlock {
    pub id: u64,
    pub kind: String,
    pub raw: Value,
}

/// One content unit of a page, discriminated by the backend's `__component`
/// field. Unrecognized or malformed blocks land in `Unknown` instead of
/// failing the whole page decode.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    RichText(RichTextBlock),
    Quote(QuoteBlock),
    Media(MediaBlock),
    Unknown(UnknownBlock),
}

pub const RICH_TEXT_COMPONENT: &str = "shared.rich-text";
pub const QUOTE_COMPONENT: &str = "shared.quote";
pub const MEDIA_COMPONENT: &str = "shared.media";

impl ContentBlock {
    pub fn id(&self) -> u64 {
        match self {
            Self::RichText(b) => b.id,
            Self::Quote(b) => b.id,
            Self::Media(b) => b.id,
            Self::Unknown(b) => b.id,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Self::RichText(_) => RICH_TEXT_COMPONENT,
            Self::Quote(_) => QUOTE_COMPONENT,
            Self::Media(_) => MEDIA_COMPONENT,
            Self::Unknown(b) => &b.kind,
        }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let id = value.get("id").and_then(Value::as_u64).unwrap_or(0);
        let kind = value
            .get("__component")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        let parsed = match kind.as_str() {
            RICH_TEXT_COMPONENT => {
                serde_json::from_value(value.clone()).map(ContentBlock::RichText)
            }
            QUOTE_COMPONENT => serde_json::from_value(value.clone()).map(ContentBlock::Quote),
            MEDIA_COMPONENT => serde_json::from_value(value.clone()).map(ContentBlock::Media),
            _ => Err(serde::de::Error::custom("unrecognized component")),
        };

        // A recognized component with missing required fields degrades to
        // Unknown the same way an unrecognized discriminator does.
        Ok(parsed.unwrap_or(ContentBlock::Unknown(UnknownBlock { id, kind, raw: value })))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Seo {
    #[serde(rename = "metaTitle")]
    pub meta_title: String,
    #[serde(rename = "metaDescription", default)]
    pub meta_description: Option<String>,
}

/// One page record as returned by `/api/pages`. Block order is the backend's
/// return order and is the sole input to all grouping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub seo: Option<Seo>,
    #[serde(default)]
    blocks: Option<Vec<ContentBlock>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn blocks(&self) -> &[ContentBlock] {
        self.blocks.as_deref().unwrap_or_default()
    }

    /// Document title: seo metaTitle when present, else the page title.
    pub fn document_title(&self) -> &str {
        self.seo
            .as_ref()
            .map(|s| s.meta_title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn block_from(json: &str) -> ContentBlock {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn rich_text_block() {
        let b = block_from(
            r##"{"__component":"shared.rich-text","id":7,"body":"# Hej","theme":"accent"}"##,
        );
        match b {
            ContentBlock::RichText(rt) => {
                assert_eq!(rt.id, 7);
                assert_eq!(rt.body, "# Hej");
                assert_eq!(rt.theme(), SectionTheme::Accent);
            }
            other => panic!("expected rich text, got {:?}", other),
        }
    }

    #[test]
    fn missing_theme_defaults() {
        let b = block_from(r#"{"__component":"shared.rich-text","id":1,"body":"x"}"#);
        match b {
            ContentBlock::RichText(rt) => assert_eq!(rt.theme(), SectionTheme::Default),
            other => panic!("expected rich text, got {:?}", other),
        }
    }

    #[test]
    fn null_theme_defaults() {
        let b = block_from(r#"{"__component":"shared.quote","id":2,"title":null,"theme":null}"#);
        match b {
            ContentBlock::Quote(q) => assert_eq!(q.theme(), SectionTheme::Default),
            other => panic!("expected quote, got {:?}", other),
        }
    }

    #[test]
    fn media_with_null_file_decodes() {
        let b = block_from(r#"{"__component":"shared.media","id":3,"file":null}"#);
        assert!(matches!(b, ContentBlock::Media(MediaBlock { file: None, .. })));
    }

    #[test]
    fn unknown_component_is_preserved() {
        let b = block_from(r#"{"__component":"shared.slider","id":9,"slides":[1,2]}"#);
        match b {
            ContentBlock::Unknown(u) => {
                assert_eq!(u.kind, "shared.slider");
                assert_eq!(u.id, 9);
                assert!(u.raw.get("slides").is_some());
            }
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn malformed_known_component_degrades_to_unknown() {
        // rich-text without a body must not fail the page decode
        let b = block_from(r#"{"__component":"shared.rich-text","id":4}"#);
        assert!(matches!(b, ContentBlock::Unknown(_)));
    }

    #[test]
    fn alt_text_fallback_chain() {
        let with_alt: MediaAsset = serde_json::from_str(
            r#"{"url":"/uploads/a.png","alternativeText":"Alt","caption":"Cap"}"#,
        )
        .unwrap();
        assert_eq!(with_alt.alt_text(), "Alt");

        let caption_only: MediaAsset =
            serde_json::from_str(r#"{"url":"/uploads/a.png","caption":"Cap"}"#).unwrap();
        assert_eq!(caption_only.alt_text(), "Cap");

        let bare: MediaAsset = serde_json::from_str(r#"{"url":"/uploads/a.png"}"#).unwrap();
        assert_eq!(bare.alt_text(), "");
    }

    #[test]
    fn mime_prefix_decides_image() {
        let img: MediaAsset =
            serde_json::from_str(r#"{"url":"/a.png","mime":"image/png"}"#).unwrap();
        assert!(img.is_image());
        let pdf: MediaAsset =
            serde_json::from_str(r#"{"url":"/a.pdf","mime":"application/pdf"}"#).unwrap();
        assert!(!pdf.is_image());
        let unknown: MediaAsset = serde_json::from_str(r#"{"url":"/a.bin"}"#).unwrap();
        assert!(!unknown.is_image());
    }

    #[test]
    fn page_fixture_decodes() {
        let json = std::fs::read_to_string("tests/fixtures/home_page.json").unwrap();
        let envelope: serde_json::Value = serde_json::from_str(&json).unwrap();
        let page: Page =
            serde_json::from_value(envelope["data"][0].clone()).unwrap();
        assert_eq!(page.slug, "home");
        assert_eq!(page.document_title(), "Hem – Start");
        assert_eq!(page.blocks().len(), 5);
        assert!(matches!(page.blocks()[4], ContentBlock::Unknown(_)));
    }

    #[test]
    fn document_title_falls_back_to_title() {
        let page: Page = serde_json::from_str(
            r#"{"id":1,"title":"Om mig","slug":"about","blocks":[]}"#,
        )
        .unwrap();
        assert_eq!(page.document_title(), "Om mig");
    }
}
