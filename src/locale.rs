use clap::ValueEnum;

/// UI language for chrome text. Page content itself is whatever the backend
/// returns for the requested locale code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    Sv,
    En,
}

impl Locale {
    /// Locale code sent to the backend and used as the document language.
    pub fn code(self) -> &'static str {
        match self {
            Self::Sv => "sv",
            Self::En => "en",
        }
    }

    pub fn loading_text(self) -> &'static str {
        match self {
            Self::Sv => "Hämtar innehåll…",
            Self::En => "Loading content…",
        }
    }

    pub fn not_found_text(self) -> &'static str {
        match self {
            Self::Sv => "Hittade ingen sida med denna slug.",
            Self::En => "No page found for this slug.",
        }
    }

    pub fn empty_page_text(self) -> &'static str {
        match self {
            Self::Sv => "Sidan saknar blocks.",
            Self::En => "This page has no blocks.",
        }
    }

    pub fn download_text(self) -> &'static str {
        match self {
            Self::Sv => "Ladda ner fil",
            Self::En => "Download file",
        }
    }

    pub fn quote_label(self) -> &'static str {
        match self {
            Self::Sv => "Citat",
            Self::En => "Quote",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
