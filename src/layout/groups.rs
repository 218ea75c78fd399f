use std::sync::LazyLock;

use regex::Regex;

use crate::content::{ContentBlock, MediaAsset, QuoteBlock, RichTextBlock};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,3})\s+(.+)$").unwrap());

/// One rendered unit in plain mode. Blocks map 1:1; media with no file and
/// unknown blocks produce nothing.
#[derive(Debug)]
pub enum PlainUnit<'a> {
    Text(&'a RichTextBlock),
    Quote(&'a QuoteBlock),
    Media(&'a MediaAsset),
}

pub fn plain_units(blocks: &[ContentBlock]) -> Vec<PlainUnit<'_>> {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::RichText(rt) => Some(PlainUnit::Text(rt)),
            ContentBlock::Quote(q) => Some(PlainUnit::Quote(q)),
            ContentBlock::Media(m) => m.file.as_ref().map(PlainUnit::Media),
            ContentBlock::Unknown(_) => None,
        })
        .collect()
}

/// One accordion entry: a rich-text block, optionally with the media block
/// that immediately followed it.
#[derive(Debug)]
pub struct AccordionEntry<'a> {
    pub text: &'a RichTextBlock,
    pub media: Option<&'a MediaAsset>,
}

/// Single left-to-right pass with one cursor, no backtracking. A rich-text
/// block immediately followed by a media block consumes both; any other block
/// not taken as a pair's media is skipped.
pub fn accordion_entries(blocks: &[ContentBlock]) -> Vec<AccordionEntry<'_>> {
    let mut entries = Vec::new();
    let mut i = 0;

    while i < blocks.len() {
        let ContentBlock::RichText(rt) = &blocks[i] else {
            i += 1;
            continue;
        };

        let media = match blocks.get(i + 1) {
            Some(ContentBlock::Media(m)) => {
                i += 1;
                // The media block is consumed by the pair even when its file
                // is null; the entry then renders text-only.
                m.file.as_ref()
            }
            _ => None,
        };

        entries.push(AccordionEntry { text: rt, media });
        i += 1;
    }

    entries
}

/// `#`/`##`/`###` line at the start of a body, split off as the entry title.
/// Leading whitespace is ignored. Returns (title, remaining body).
pub fn split_leading_heading(body: &str) -> Option<(&str, &str)> {
    let trimmed = body.trim_start();
    let (first, rest) = trimmed.split_once('\n').unwrap_or((trimmed, ""));
    let caps = HEADING_RE.captures(first.trim_end())?;
    let title = caps.get(2)?.as_str();
    Some((title, rest))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSide {
    Left,
    Right,
}

/// One split-layout unit: text beside an image, or centered text when no
/// usable image resolved.
#[derive(Debug)]
pub struct SplitUnit<'a> {
    pub text: Option<&'a RichTextBlock>,
    pub image: Option<&'a MediaAsset>,
    /// Set exactly when `image` is set. Alternates over image-bearing units
    /// only; text-only units do not consume an alternation slot.
    pub side: Option<ImageSide>,
}

/// Pair adjacent rich-text/media blocks (either order) into split units.
/// Unpaired rich-text or media blocks form singletons; quote and unknown
/// blocks are dropped. An image counts as resolved when the media file is
/// present and carries an `image/` mime.
pub fn split_units(blocks: &[ContentBlock]) -> Vec<SplitUnit<'_>> {
    let mut units = Vec::new();
    let mut image_count = 0usize;
    let mut i = 0;

    while i < blocks.len() {
        let (text, media) = match &blocks[i] {
            ContentBlock::RichText(rt) => match blocks.get(i + 1) {
                Some(ContentBlock::Media(m)) => {
                    i += 2;
                    (Some(rt), Some(m))
                }
                _ => {
                    i += 1;
                    (Some(rt), None)
                }
            },
            ContentBlock::Media(m) => match blocks.get(i + 1) {
                Some(ContentBlock::RichText(rt)) => {
                    i += 2;
                    (Some(rt), Some(m))
                }
                _ => {
                    i += 1;
                    (None, Some(m))
                }
            },
            _ => {
                i += 1;
                continue;
            }
        };

        let image = media
            .and_then(|m| m.file.as_ref())
            .filter(|f| f.is_image());

        // A unit with neither text nor a usable image has nothing to show.
        if text.is_none() && image.is_none() {
            continue;
        }

        let side = if image.is_some() {
            let side = if image_count % 2 == 0 {
                ImageSide::Left
            } else {
                ImageSide::Right
            };
            image_count += 1;
            Some(side)
        } else {
            None
        };

        units.push(SplitUnit { text, image, side });
    }

    units
}

/// One full-width text section; `tinted` on odd 0-indexed positions.
#[derive(Debug)]
pub struct TextSection<'a> {
    pub text: &'a RichTextBlock,
    pub tinted: bool,
}

/// Rich-text blocks only; quote, media and unknown blocks are discarded.
pub fn text_sections(blocks: &[ContentBlock]) -> Vec<TextSection<'_>> {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::RichText(rt) => Some(rt),
            _ => None,
        })
        .enumerate()
        .map(|(i, text)| TextSection {
            text,
            tinted: i % 2 == 1,
        })
        .collect()
}

// ── Tests ──
