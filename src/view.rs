use tracing::debug;

use crate::client::{ContentClient, PageError};
use crate::content::Page;
use crate::locale::Locale;

/// Fetch state for one mounted page view.
#[derive(Debug)]
pub enum ViewState {
    Loading,
    Success(Page),
    NotFound,
    Error(String),
}

/// Handed out when a fetch begins. Carries the generation that must still be
/// current for the result to commit; a ticket from a superseded fetch is
/// silently discarded.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    pub slug: String,
    pub locale: Locale,
}

/// Orchestrates the fetch lifecycle for a (slug, locale) key:
/// `loading -> {success | not_found | error}`, re-entering `loading` whenever
/// the key changes. The document title is last-writer-wins.
pub struct PageView {
    state: ViewState,
    generation: u64,
    title_fallback: String,
    document_title: Option<String>,
}

impl PageView {
    pub fn new(title_fallback: &str) -> Self {
        Self {
            state: ViewState::Loading,
            generation: 0,
            title_fallback: title_fallback.to_string(),
            document_title: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Resolved document title: seo metaTitle, page title, then the fallback
    /// given at construction.
    pub fn document_title(&self) -> &str {
        self.document_title.as_deref().unwrap_or(&self.title_fallback)
    }

    /// Start a fetch for a new key: bumps the generation (invalidating every
    /// outstanding ticket) and re-enters `loading`.
    pub fn begin(&mut self, slug: &str, locale: Locale) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        FetchTicket {
            generation: self.generation,
            slug: slug.to_string(),
            locale,
        }
    }

    /// Commit a fetch outcome. Returns false when the ticket was superseded
    /// by a newer `begin`, in which case state is untouched.
    pub fn commit(&mut self, ticket: &FetchTicket, outcome: Result<Page, PageError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                slug = %ticket.slug,
                stale = ticket.generation,
                current = self.generation,
                "discarding stale fetch result"
            );
            return false;
        }

        self.state = match outcome {
            Ok(page) => {
                self.document_title = Some(page.document_title().to_string());
                ViewState::Success(page)
            }
            Err(PageError::NotFound) => ViewState::NotFound,
            Err(err) => ViewState::Error(err.to_string()),
        };
        true
    }

    /// Begin-and-commit convenience for a single uncontended fetch.
    pub async fn load(&mut self, client: &ContentClient, slug: &str, locale: Locale) {
        let ticket = self.begin(slug, locale);
        let outcome = client.fetch_page(&ticket.slug, ticket.locale.code()).await;
        self.commit(&ticket, outcome);
    }

    /// Localized status line for the non-success states.
    pub fn status_message(&self, locale: Locale) -> Option<String> {
        match &self.state {
            ViewState::Loading => Some(locale.loading_text().to_string()),
            ViewState::NotFound => Some(locale.not_found_text().to_string()),
            ViewState::Error(message) => Some(message.clone()),
            ViewState::Success(_) => None,
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn page(title: &str, meta_title: Option<&str>) -> Page {
        let seo = meta_title
            .map(|t| format!(r#","seo":{{"metaTitle":"{}"}}"#, t))
            .unwrap_or_default();
        serde_json::from_str(&format!(
            r#"{{"id":1,"title":"{}","slug":"home","blocks":[]{}}}"#,
            title, seo
        ))
        .unwrap()
    }

    #[test]
    fn success_flow_sets_title() {
        let mut view = PageView::new("Start");
        assert!(matches!(view.state(), ViewState::Loading));
        assert_eq!(view.document_title(), "Start");

        let ticket = view.begin("home", Locale::En);
        assert!(view.commit(&ticket, Ok(page("Home", None))));
        assert!(matches!(view.state(), ViewState::Success(_)));
        assert_eq!(view.document_title(), "Home");
        assert!(view.status_message(Locale::En).is_none());
    }

    #[test]
    fn seo_title_wins_over_page_title() {
        let mut view = PageView::new("Start");
        let ticket = view.begin("home", Locale::Sv);
        view.commit(&ticket, Ok(page("Hem", Some("Hem – Start"))));
        assert_eq!(view.document_title(), "Hem – Start");
    }

    #[test]
    fn stale_ticket_never_commits() {
        let mut view = PageView::new("Start");
        let first = view.begin("home", Locale::Sv);
        // Key changes before the first fetch resolves.
        let second = view.begin("about", Locale::Sv);

        assert!(!view.commit(&first, Ok(page("Hem", None))));
        assert!(matches!(view.state(), ViewState::Loading));
        assert_eq!(view.document_title(), "Start");

        assert!(view.commit(&second, Ok(page("Om mig", None))));
        assert!(matches!(view.state(), ViewState::Success(_)));
        assert_eq!(view.document_title(), "Om mig");
    }

    #[test]
    fn stale_error_is_also_discarded() {
        let mut view = PageView::new("Start");
        let first = view.begin("home", Locale::Sv);
        let second = view.begin("home", Locale::En);

        let err = PageError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!view.commit(&first, Err(err)));
        assert!(matches!(view.state(), ViewState::Loading));

        view.commit(&second, Ok(page("Home", None)));
        assert!(matches!(view.state(), ViewState::Success(_)));
    }

    #[test]
    fn not_found_and_error_states() {
        let mut view = PageView::new("Start");
        let ticket = view.begin("missing", Locale::Sv);
        view.commit(&ticket, Err(PageError::NotFound));
        assert!(matches!(view.state(), ViewState::NotFound));
        assert_eq!(
            view.status_message(Locale::Sv).unwrap(),
            "Hittade ingen sida med denna slug."
        );

        let ticket = view.begin("broken", Locale::Sv);
        view.commit(
            &ticket,
            Err(PageError::Status {
                status: 503,
                message: "Service unavailable".to_string(),
            }),
        );
        match view.state() {
            ViewState::Error(msg) => assert_eq!(msg, "Service unavailable"),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_commits_fetched_page() {
        let body = std::fs::read_to_string("tests/fixtures/home_page.json").unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        let client = ContentClient::new(&format!("http://{}", addr));
        let mut view = PageView::new("Start");
        view.load(&client, "home", Locale::Sv).await;

        match view.state() {
            ViewState::Success(page) => assert_eq!(page.slug, "home"),
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(view.document_title(), "Hem – Start");
    }
}
