pub mod groups;
pub mod hero;

use clap::ValueEnum;

/// Template mode selected by the caller. Grouping never infers a mode from
/// content; the page's route configuration decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TemplateMode {
    #[default]
    Plain,
    Accordion,
    SplitLayout,
    TextSections,
}

impl TemplateMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Accordion => "accordion",
            Self::SplitLayout => "split-layout",
            Self::TextSections => "text-sections",
        }
    }
}
