mod client;
mod content;
mod layout;
mod locale;
mod render;
mod view;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tokio::sync::Semaphore;
use tracing::warn;

use client::{ContentClient, PageError};
use content::{ContentBlock, Page};
use layout::TemplateMode;
use locale::Locale;
use render::RenderContext;
use view::{PageView, ViewState};

const FETCH_CONCURRENCY: usize = 8;

#[derive(Parser)]
#[command(name = "cms_renderer", about = "Static page renderer for the content backend")]
struct Cli {
    /// Backend origin, e.g. https://cms.example.se (defaults to $CMS_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page and render it to HTML
    Render {
        /// Page slug
        #[arg(short, long)]
        slug: String,
        /// Content locale
        #[arg(short, long, value_enum, default_value_t = Locale::Sv)]
        locale: Locale,
        /// Layout template for the page's blocks
        #[arg(short, long, value_enum, default_value_t = TemplateMode::Plain)]
        template: TemplateMode,
        /// Pull the first text/media blocks into a hero banner
        #[arg(long)]
        hero: bool,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render several pages in one run (fetch concurrently, render in parallel)
    Batch {
        /// Page slugs
        #[arg(required = true)]
        slugs: Vec<String>,
        /// Content locale
        #[arg(short, long, value_enum, default_value_t = Locale::Sv)]
        locale: Locale,
        /// Render every slug in both locales
        #[arg(long)]
        all_locales: bool,
        /// Layout template for all pages
        #[arg(short, long, value_enum, default_value_t = TemplateMode::Plain)]
        template: TemplateMode,
        /// Pull the first text/media blocks into a hero banner
        #[arg(long)]
        hero: bool,
        /// Output directory
        #[arg(short, long, default_value = "site")]
        out_dir: PathBuf,
    },
    /// Fetch a page and print a block / grouping summary
    Show {
        /// Page slug
        #[arg(short, long)]
        slug: String,
        /// Content locale
        #[arg(short, long, value_enum, default_value_t = Locale::Sv)]
        locale: Locale,
        /// Grouping mode to summarize
        #[arg(short, long, value_enum, default_value_t = TemplateMode::Plain)]
        template: TemplateMode,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("CMS_URL").ok())
        .context("missing backend base URL: pass --base-url or set CMS_URL")?;
    let client = ContentClient::new(&base_url);

    let result = match cli.command {
        Commands::Render {
            slug,
            locale,
            template,
            hero,
            out,
        } => {
            let mut page_view = PageView::new(&slug);
            page_view.load(&client, &slug, locale).await;

            match page_view.state() {
                ViewState::Success(page) => {
                    let ctx = RenderContext {
                        base_url: client.base_url(),
                        locale,
                    };
                    let html = render::render_document(page, template, hero, &ctx);
                    match out {
                        Some(path) => {
                            std::fs::write(&path, html)
                                .with_context(|| format!("writing {}", path.display()))?;
                            println!("Wrote {} ({})", path.display(), page_view.document_title());
                        }
                        None => print!("{}", html),
                    }
                    Ok(())
                }
                ViewState::Error(message) => Err(anyhow::anyhow!("{}", message)),
                // Loading or not-found: print the same line the UI would show.
                _ => {
                    if let Some(status) = page_view.status_message(locale) {
                        println!("{}", status);
                    }
                    Ok(())
                }
            }
        }
        Commands::Batch {
            slugs,
            locale,
            all_locales,
            template,
            hero,
            out_dir,
        } => {
            let locales: Vec<Locale> = if all_locales {
                vec![Locale::Sv, Locale::En]
            } else {
                vec![locale]
            };
            let jobs: Vec<(String, Locale)> = slugs
                .iter()
                .flat_map(|slug| locales.iter().map(move |l| (slug.clone(), *l)))
                .collect();

            println!("Rendering {} pages to {}...", jobs.len(), out_dir.display());
            let stats = run_batch(Arc::new(client), jobs, template, hero, &out_dir).await?;
            stats.print();
            Ok(())
        }
        Commands::Show {
            slug,
            locale,
            template,
        } => match client.fetch_page(&slug, locale.code()).await {
            Ok(page) => {
                print_page_summary(&page, template);
                Ok(())
            }
            Err(PageError::NotFound) => {
                println!("{}", locale.not_found_text());
                Ok(())
            }
            Err(err) => Err(err.into()),
        },
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

struct BatchStats {
    total: usize,
    rendered: usize,
    not_found: usize,
    errors: usize,
}

impl BatchStats {
    fn print(&self) {
        println!(
            "Done: {} pages ({} rendered, {} not found, {} errors).",
            self.total, self.rendered, self.not_found, self.errors
        );
    }
}

struct FetchOutcome {
    slug: String,
    locale: Locale,
    result: Result<Page, PageError>,
}

/// Two-phase pipeline: fetch all pages concurrently (bounded), then render
/// them in parallel and write one HTML file per (slug, locale).
async fn run_batch(
    client: Arc<ContentClient>,
    jobs: Vec<(String, Locale)>,
    template: TemplateMode,
    hero: bool,
    out_dir: &std::path::Path,
) -> anyhow::Result<BatchStats> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let total = jobs.len();
    let semaphore = Arc::new(Semaphore::new(FETCH_CONCURRENCY));
    let (tx, mut rx) = tokio::sync::mpsc::channel::<FetchOutcome>(FETCH_CONCURRENCY * 2);

    for (slug, locale) in jobs {
        let client = Arc::clone(&client);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");
            let result = client.fetch_page(&slug, locale.code()).await;
            let _ = tx
                .send(FetchOutcome {
                    slug,
                    locale,
                    result,
                })
                .await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish.
    drop(tx);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut fetched = Vec::new();
    let mut not_found = 0usize;
    let mut errors = 0usize;

    while let Some(outcome) = rx.recv().await {
        match outcome.result {
            Ok(page) => fetched.push((outcome.slug, outcome.locale, page)),
            Err(PageError::NotFound) => {
                warn!(slug = %outcome.slug, locale = %outcome.locale, "page not found");
                not_found += 1;
            }
            Err(err) => {
                warn!(slug = %outcome.slug, locale = %outcome.locale, "fetch failed: {}", err);
                errors += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let base_url = client.base_url().to_string();
    let rendered: Vec<(PathBuf, String)> = fetched
        .par_iter()
        .map(|(slug, locale, page)| {
            let ctx = RenderContext {
                base_url: &base_url,
                locale: *locale,
            };
            let html = render::render_document(page, template, hero, &ctx);
            let path = out_dir.join(format!("{}.{}.html", slug, locale.code()));
            (path, html)
        })
        .collect();

    let rendered_count = rendered.len();
    for (path, html) in rendered {
        std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(BatchStats {
        total,
        rendered: rendered_count,
        not_found,
        errors,
    })
}

fn print_page_summary(page: &Page, template: TemplateMode) {
    println!("Page:   {} (id {})", page.slug, page.id);
    println!("Title:  {}", page.document_title());
    if let Some(description) = page
        .seo
        .as_ref()
        .and_then(|s| s.meta_description.as_deref())
    {
        println!("Desc:   {}", description);
    }
    if let Some(published) = page.published_at {
        println!("Publ:   {}", published.format("%Y-%m-%d"));
    }

    println!();
    println!("{:>3} | {:<18} | {:>6} | {}", "#", "Kind", "Id", "Detail");
    println!("{}", "-".repeat(72));
    for (i, block) in page.blocks().iter().enumerate() {
        println!(
            "{:>3} | {:<18} | {:>6} | {}",
            i,
            block.kind(),
            block.id(),
            block_detail(block)
        );
    }

    println!();
    println!("Template '{}':", template.name());
    let blocks = page.blocks();
    match template {
        TemplateMode::Plain => {
            println!("  {} units", layout::groups::plain_units(blocks).len());
        }
        TemplateMode::Accordion => {
            for entry in layout::groups::accordion_entries(blocks) {
                let title = layout::groups::split_leading_heading(&entry.text.body)
                    .map(|(t, _)| t.to_string())
                    .unwrap_or_else(|| "(no heading, plain)".to_string());
                let media = if entry.media.is_some() { " +media" } else { "" };
                println!("  entry: {}{}", title, media);
            }
        }
        TemplateMode::SplitLayout => {
            for unit in layout::groups::split_units(blocks) {
                let side = match unit.side {
                    Some(layout::groups::ImageSide::Left) => "image-left",
                    Some(layout::groups::ImageSide::Right) => "image-right",
                    None => "centered",
                };
                println!(
                    "  unit: {}{}",
                    side,
                    unit.text.map(|_| " +text").unwrap_or_default()
                );
            }
        }
        TemplateMode::TextSections => {
            for section in layout::groups::text_sections(blocks) {
                let tint = if section.tinted { " (tinted)" } else { "" };
                println!("  section: block {}{}", section.text.id, tint);
            }
        }
    }
}

fn block_detail(block: &ContentBlock) -> String {
    match block {
        ContentBlock::RichText(rt) => format!("theme {:?}, {}", rt.theme(), excerpt(&rt.body, 40)),
        ContentBlock::Quote(q) => format!(
            "\"{}\"",
            excerpt(q.title.as_deref().or(q.body.as_deref()).unwrap_or(""), 40)
        ),
        ContentBlock::Media(m) => match &m.file {
            Some(file) => {
                let formats = file
                    .formats
                    .as_ref()
                    .map(|f| format!(" [{}]", f.keys().cloned().collect::<Vec<_>>().join(", ")))
                    .unwrap_or_default();
                format!(
                    "{} ({}){}",
                    file.url,
                    file.mime.as_deref().unwrap_or("unknown mime"),
                    formats
                )
            }
            None => "(no file)".to_string(),
        },
        ContentBlock::Unknown(_) => "(unrecognized, skipped)".to_string(),
    }
}

fn excerpt(s: &str, max: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        let truncated: String = flat.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
