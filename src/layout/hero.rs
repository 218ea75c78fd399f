use crate::content::{ContentBlock, MediaAsset, RichTextBlock};

/// Hero section pulled off the top of a page: the first media block and the
/// first rich-text block, found independently by original index.
#[derive(Debug, Clone)]
pub struct Hero {
    pub media: Option<MediaAsset>,
    pub text: Option<RichTextBlock>,
    /// Input order with exactly the hero members removed.
    pub remaining: Vec<ContentBlock>,
}

/// Split a block sequence into a hero and the untouched remainder.
///
/// The first `Media` block is consumed even when its file is null; the hero
/// then falls back to text-only. The two hero members need not be adjacent.
pub fn extract_hero(blocks: &[ContentBlock]) -> Hero {
    let media_index = blocks
        .iter()
        .position(|b| matches!(b, ContentBlock::Media(_)));
    let text_index = blocks
        .iter()
        .position(|b| matches!(b, ContentBlock::RichText(_)));

    let media = media_index.and_then(|i| match &blocks[i] {
        ContentBlock::Media(m) => m.file.clone(),
        _ => None,
    });
    let text = text_index.and_then(|i| match &blocks[i] {
        ContentBlock::RichText(rt) => Some(rt.clone()),
        _ => None,
    });

    let remaining = blocks
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != media_index && Some(*i) != text_index)
        .map(|(_, b)| b.clone())
        .collect();

    Hero {
        media,
        text,
        remaining,
    }
}

// ── Tests ──
