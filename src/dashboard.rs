//! Side-by-side comparison dashboard

use crate::catalog::Selection;
use crate::dispatcher::QueryResult;
use std::borrow::Cow;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style, Width},
};

/// Appended to a response cut down to the character budget
pub const TRUNCATION_MARKER: &str = "...\n[truncated]";

/// Shown in every slot before results arrive
pub const WAITING_PLACEHOLDER: &str = "Waiting for response...";

/// Columns never shrink below this when rendering
const MIN_COLUMN_WIDTH: usize = 12;

/// What a single dashboard slot displays
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// No result yet
    Waiting,
    /// A finished call, success or error text
    Response {
        /// Response text, cut to the budget
        text: String,
        /// Whether the text was cut
        truncated: bool,
        /// Seconds from request to completion
        elapsed_time: f64,
        /// Prompt tokens
        tokens_in: u32,
        /// Response tokens
        tokens_out: u32,
    },
}

impl Panel {
    fn from_result(result: &QueryResult, budget: usize) -> Self {
        let projected = truncate_for_display(&result.text, budget);
        Self::Response {
            truncated: matches!(projected, Cow::Owned(_)),
            text: projected.into_owned(),
            elapsed_time: result.elapsed_time,
            tokens_in: result.tokens_in,
            tokens_out: result.tokens_out,
        }
    }

    /// Timing and token line under a response
    pub fn metrics(&self) -> Option<String> {
        match self {
            Self::Waiting => None,
            Self::Response {
                elapsed_time,
                tokens_in,
                tokens_out,
                ..
            } => Some(format!(
                "Time: {:.2}s | Tokens in: {} | Tokens out: {}",
                elapsed_time, tokens_in, tokens_out
            )),
        }
    }

    /// Full cell content
    pub fn body(&self) -> String {
        match self {
            Self::Waiting => WAITING_PLACEHOLDER.to_string(),
            Self::Response { text, .. } => {
                format!("{}\n\n{}", text, self.metrics().unwrap_or_default())
            }
        }
    }
}

/// One column of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// `provider: model`
    pub title: String,
    /// Slot content
    pub panel: Panel,
}

/// Display projection of a comparison round
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// One slot per selection, in selection order
    pub slots: Vec<Slot>,
}

impl Dashboard {
    /// Build one slot per selection; `results` are matched positionally and
    /// selections without a result stay in the waiting state.
    pub fn build(selections: &[Selection], results: Option<&[QueryResult]>, budget: usize) -> Self {
        let results = results.unwrap_or_default();

        let slots = selections
            .iter()
            .enumerate()
            .map(|(i, selection)| Slot {
                title: selection.to_string(),
                panel: results
                    .get(i)
                    .map_or(Panel::Waiting, |result| Panel::from_result(result, budget)),
            })
            .collect();

        Self { slots }
    }

    /// True while no slot holds a response
    pub fn is_waiting(&self) -> bool {
        self.slots.iter().all(|slot| slot.panel == Panel::Waiting)
    }

    /// Render as a table of equal-width columns fitting in `width`
    pub fn render(&self, width: usize) -> String {
        if self.slots.is_empty() {
            return String::new();
        }

        let columns = self.slots.len();
        // Each column costs one border plus one space of padding either side
        let column_width = (width.saturating_sub(columns + 1) / columns)
            .saturating_sub(2)
            .max(MIN_COLUMN_WIDTH);

        let mut builder = Builder::default();
        builder.push_record(self.slots.iter().map(|slot| fill(&slot.title, column_width)));
        builder.push_record(self.slots.iter().map(|slot| fill(&slot.panel.body(), column_width)));

        let mut table = builder.build();
        table
            .with(Style::modern())
            .with(Width::increase(width))
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }
}

/// Cut `text` to `budget` characters and append the truncation marker.
///
/// Text within budget is borrowed unchanged.
pub fn truncate_for_display(text: &str, budget: usize) -> Cow<'_, str> {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], TRUNCATION_MARKER)),
        None => Cow::Borrowed(text),
    }
}

/// Wrap every line of a cell to the column width
fn fill(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| textwrap::fill(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_borrowed() {
        assert!(matches!(truncate_for_display("4", 200), Cow::Borrowed("4")));
        let exact = "x".repeat(200);
        assert!(matches!(truncate_for_display(&exact, 200), Cow::Borrowed(_)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        let projected = truncate_for_display(&text, 3);
        assert_eq!(projected, format!("ééé{}", TRUNCATION_MARKER));
    }

    #[test]
    fn fill_preserves_blank_lines() {
        assert_eq!(fill("a\n\nb", 10), "a\n\nb");
    }
}
