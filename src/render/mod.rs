pub mod html;

use crate::content::{ContentBlock, MediaAsset, Page, QuoteBlock, RichTextBlock};
use crate::layout::groups::{self, ImageSide, PlainUnit};
use crate::layout::hero::{extract_hero, Hero};
use crate::layout::TemplateMode;
use crate::locale::Locale;

use self::html::{escape_html, markdown_to_html, resolve_url};

pub struct RenderContext<'a> {
    pub base_url: &'a str,
    pub locale: Locale,
}

/// Full HTML document for one page: head with the resolved document title
/// and meta description, body with the selected template.
pub fn render_document(
    page: &Page,
    mode: TemplateMode,
    with_hero: bool,
    ctx: &RenderContext<'_>,
) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n");
    out.push_str(&format!("<html lang=\"{}\">\n", ctx.locale.code()));
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>{}</title>\n",
        escape_html(page.document_title())
    ));
    if let Some(description) = page
        .seo
        .as_ref()
        .and_then(|s| s.meta_description.as_deref())
    {
        out.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(description)
        ));
    }
    out.push_str("</head>\n<body>\n");
    out.push_str(&render_body(page, mode, with_hero, ctx));
    out.push_str("</body>\n</html>\n");
    out
}

/// Page body: optional hero banner followed by the grouped blocks. A page
/// with no blocks renders a localized status line instead of nothing.
pub fn render_body(
    page: &Page,
    mode: TemplateMode,
    with_hero: bool,
    ctx: &RenderContext<'_>,
) -> String {
    let blocks = page.blocks();
    if blocks.is_empty() {
        return format!(
            "<p role=\"status\">{}</p>\n",
            escape_html(ctx.locale.empty_page_text())
        );
    }

    if with_hero {
        let hero = extract_hero(blocks);
        let mut out = render_hero(&hero, ctx);
        out.push_str(&render_blocks(&hero.remaining, mode, ctx));
        out
    } else {
        render_blocks(blocks, mode, ctx)
    }
}

/// Hero banner: text over the media, falling back to text-only when the page
/// has no usable hero image. Markdown h1 is kept as the document h1 here.
fn render_hero(hero: &Hero, ctx: &RenderContext<'_>) -> String {
    let style = hero
        .media
        .as_ref()
        .map(|m| {
            format!(
                " style=\"background-image:url('{}')\"",
                escape_html(&resolve_url(ctx.base_url, &m.url))
            )
        })
        .unwrap_or_default();

    let body = hero
        .text
        .as_ref()
        .map(|rt| {
            format!(
                "<div class=\"hero-body\">\n{}</div>\n",
                markdown_to_html(&rt.body, false)
            )
        })
        .unwrap_or_default();

    format!(
        "<section class=\"hero\"{}>\n<div class=\"hero-inner\">\n{}</div>\n</section>\n",
        style, body
    )
}

/// Dispatch a block sequence through the selected grouping mode, one
/// presentation unit per produced group, in group order.
pub fn render_blocks(blocks: &[ContentBlock], mode: TemplateMode, ctx: &RenderContext<'_>) -> String {
    match mode {
        TemplateMode::Plain => render_plain(blocks, ctx),
        TemplateMode::Accordion => render_accordion(blocks, ctx),
        TemplateMode::SplitLayout => render_split(blocks, ctx),
        TemplateMode::TextSections => render_text_sections(blocks, ctx),
    }
}

fn render_plain(blocks: &[ContentBlock], ctx: &RenderContext<'_>) -> String {
    let mut out = String::from("<div class=\"page-blocks\">\n");
    for unit in groups::plain_units(blocks) {
        match unit {
            PlainUnit::Text(rt) => out.push_str(&text_section(rt, ctx)),
            PlainUnit::Quote(q) => out.push_str(&quote_section(q, ctx)),
            PlainUnit::Media(m) => out.push_str(&media_section(m, ctx)),
        }
    }
    out.push_str("</div>\n");
    out
}

fn render_accordion(blocks: &[ContentBlock], ctx: &RenderContext<'_>) -> String {
    let mut out = String::from("<div class=\"accordion\">\n");
    for entry in groups::accordion_entries(blocks) {
        let figure = entry
            .media
            .map(|m| media_inline(m, ctx))
            .unwrap_or_default();

        match groups::split_leading_heading(&entry.text.body) {
            Some((title, rest)) => {
                out.push_str(&format!(
                    "<details class=\"accordion-entry\">\n<summary>{}</summary>\n<div class=\"accordion-body\">\n{}{}</div>\n</details>\n",
                    escape_html(title),
                    markdown_to_html(rest, true),
                    figure,
                ));
            }
            // No heading to collapse under: plain, non-collapsible block.
            None => {
                out.push_str(&format!(
                    "<div class=\"accordion-entry accordion-entry--plain\">\n{}{}</div>\n",
                    markdown_to_html(&entry.text.body, true),
                    figure,
                ));
            }
        }
    }
    out.push_str("</div>\n");
    out
}

fn render_split(blocks: &[ContentBlock], ctx: &RenderContext<'_>) -> String {
    let mut out = String::from("<div class=\"split-layout\">\n");
    for unit in groups::split_units(blocks) {
        let text = unit
            .text
            .map(|rt| {
                format!(
                    "<div class=\"split-text\">\n{}</div>\n",
                    markdown_to_html(&rt.body, true)
                )
            })
            .unwrap_or_default();

        match (unit.image, unit.side) {
            (Some(image), Some(side)) => {
                let side_class = match side {
                    ImageSide::Left => "split--image-left",
                    ImageSide::Right => "split--image-right",
                };
                out.push_str(&format!(
                    "<section class=\"split {}\">\n<div class=\"split-media\">\n{}</div>\n{}</section>\n",
                    side_class,
                    media_figure(image, ctx),
                    text,
                ));
            }
            // No resolvable image: centered text, no placeholder.
            _ => {
                out.push_str(&format!(
                    "<section class=\"split split--center\">\n{}</section>\n",
                    text
                ));
            }
        }
    }
    out.push_str("</div>\n");
    out
}

fn render_text_sections(blocks: &[ContentBlock], _ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    for section in groups::text_sections(blocks) {
        let tint = if section.tinted {
            " text-section--tinted"
        } else {
            ""
        };
        out.push_str(&format!(
            "<section class=\"text-section{}\">\n<div class=\"section-inner\">\n{}</div>\n</section>\n",
            tint,
            markdown_to_html(&section.text.body, true)
        ));
    }
    out
}

fn text_section(rt: &RichTextBlock, _ctx: &RenderContext<'_>) -> String {
    format!(
        "<div class=\"section {}\">\n<div class=\"section-inner\">\n<div class=\"rich-text\">\n{}</div>\n</div>\n</div>\n",
        rt.theme().css_class(),
        markdown_to_html(&rt.body, true)
    )
}

fn quote_section(q: &QuoteBlock, ctx: &RenderContext<'_>) -> String {
    let label = q
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(ctx.locale.quote_label());

    let mut inner = String::new();
    if let Some(title) = q.title.as_deref().filter(|t| !t.is_empty()) {
        inner.push_str(&format!(
            "<p class=\"quote-title\">{}</p>\n",
            escape_html(title)
        ));
    }
    if let Some(body) = q.body.as_deref().filter(|b| !b.is_empty()) {
        inner.push_str(&format!(
            "<p class=\"quote-body\">{}</p>\n",
            escape_html(body)
        ));
    }

    format!(
        "<div class=\"section {}\">\n<div class=\"section-inner\">\n<blockquote class=\"quote\" aria-label=\"{}\">\n{}</blockquote>\n</div>\n</div>\n",
        q.theme().css_class(),
        escape_html(label),
        inner
    )
}

fn media_section(m: &MediaAsset, ctx: &RenderContext<'_>) -> String {
    format!(
        "<div class=\"section section--default\">\n<div class=\"section-inner\">\n{}</div>\n</div>\n",
        media_inline(m, ctx)
    )
}

/// Image media renders as a figure; anything else as a download link.
fn media_inline(m: &MediaAsset, ctx: &RenderContext<'_>) -> String {
    if m.is_image() {
        media_figure(m, ctx)
    } else {
        format!(
            "<p><a href=\"{}\">{}</a></p>\n",
            escape_html(&resolve_url(ctx.base_url, &m.url)),
            escape_html(ctx.locale.download_text())
        )
    }
}

fn media_figure(m: &MediaAsset, ctx: &RenderContext<'_>) -> String {
    let src = resolve_url(ctx.base_url, &m.url);
    let caption = m
        .caption
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!("<figcaption>{}</figcaption>\n", escape_html(c)))
        .unwrap_or_default();
    format!(
        "<figure class=\"media\">\n<img class=\"media-img\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n{}</figure>\n",
        escape_html(&src),
        escape_html(m.alt_text()),
        caption
    )
}

// ── Tests ──
