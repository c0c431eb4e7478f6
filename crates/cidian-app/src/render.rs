use std::fmt;

use cidian_types::{DictionaryView, LoadState};

/// Plain text rendering of the view for the terminal
pub struct TextView<'a>(pub &'a DictionaryView);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        writeln!(
            f,
            "[{}] {} ({}) / {}",
            view.route.dictionary_type, view.route.pinyin, view.route.index, view.route.word_head
        )?;
        writeln!(f, "Pinyin indexes: {}", view.pinyin_indexes.join(" "))?;

        match &view.status.word_heads {
            LoadState::Failed(e) => writeln!(f, "Word heads: failed ({})", e)?,
            LoadState::Pending => writeln!(f, "Word heads: loading")?,
            LoadState::Loaded => writeln!(f, "Word heads: {}", view.word_heads.join(" "))?,
        }

        match &view.status.word_items {
            LoadState::Failed(e) => writeln!(f, "Words: failed ({})", e),
            LoadState::Pending => writeln!(f, "Words: loading"),
            LoadState::Loaded => {
                writeln!(f, "Words:")?;
                for item in &view.word_items {
                    writeln!(f, "  {}", item.word)?;
                }
                Ok(())
            }
        }
    }
}

pub fn render_json(view: &DictionaryView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}
