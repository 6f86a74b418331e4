//! Terminal rendering of full model responses.
//!
//! Responses are split into fenced code, pipe tables and prose. Code goes
//! through syntect, tables through tabled and prose through termimad.

use colored::Colorize;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style, Width},
};
use termimad::{FmtText, MadSkin};

const INDENT: &str = "  ";

/// A contiguous piece of a markdown response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Code { language: String, code: String },
    Table(Vec<Vec<String>>),
    Prose(String),
}

/// Split markdown into code, table and prose blocks
pub fn split_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(fence) = line.trim().strip_prefix("```") {
            flush_prose(&mut prose, &mut blocks);

            let start = i + 1;
            let end = lines[start..]
                .iter()
                .position(|l| l.trim().starts_with("```"))
                .map_or(lines.len(), |offset| start + offset);

            blocks.push(Block::Code {
                language: fence.trim().to_string(),
                code: lines[start..end].join("\n"),
            });

            // Skip the closing fence when there is one
            i = (end + 1).min(lines.len());
            continue;
        }

        if is_table_row(line) {
            let end = lines[i..]
                .iter()
                .position(|l| !is_table_row(l))
                .map_or(lines.len(), |offset| i + offset);

            let rows: Vec<Vec<String>> = lines[i..end]
                .iter()
                .filter(|l| !is_table_separator(l))
                .map(|l| split_cells(l))
                .collect();

            if rows.len() > 1 {
                flush_prose(&mut prose, &mut blocks);
                blocks.push(Block::Table(rows));
            } else {
                prose.extend_from_slice(&lines[i..end]);
            }

            i = end;
            continue;
        }

        prose.push(line);
        i += 1;
    }

    flush_prose(&mut prose, &mut blocks);
    blocks
}

fn flush_prose(prose: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if prose.iter().any(|line| !line.trim().is_empty()) {
        blocks.push(Block::Prose(prose.join("\n")));
    }
    prose.clear();
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn is_table_separator(line: &str) -> bool {
    line.trim()
        .trim_matches('|')
        .split('|')
        .all(|cell| {
            let cell = cell.trim();
            cell.contains('-') && cell.chars().all(|c| matches!(c, '-' | ':'))
        })
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Render a response for a terminal `width` columns wide
pub fn render(text: &str, width: usize) -> String {
    let content_width = width.saturating_sub(INDENT.len() * 2).max(20);

    split_blocks(text)
        .iter()
        .map(|block| match block {
            Block::Code { language, code } => highlight_code(code, language),
            Block::Table(rows) => render_table(rows, content_width),
            Block::Prose(prose) => render_prose(prose, content_width),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn highlight_code(code: &str, language: &str) -> String {
    let syntaxes = SyntaxSet::load_defaults_newlines();
    let themes = ThemeSet::load_defaults();
    let language = if language.is_empty() { "text" } else { language };

    let syntax = syntaxes
        .find_syntax_by_token(language)
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, &themes.themes["base16-ocean.dark"]);

    let mut out = format!("\n{}{} {}\n", INDENT, "```".dimmed(), language.cyan());
    for line in LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, &syntaxes).unwrap_or_default();
        out.push_str(INDENT);
        out.push_str(&as_24_bit_terminal_escaped(&ranges, false));
    }
    // Reset colours left over from the last highlighted span
    out.push_str("\x1b[0m");
    out.push_str(&format!("\n{}{}\n", INDENT, "```".dimmed()));
    out
}

fn render_table(rows: &[Vec<String>], width: usize) -> String {
    let mut builder = Builder::default();
    for row in rows {
        builder.push_record(row.clone());
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Width::wrap(width))
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    indent(&table.to_string())
}

fn render_prose(prose: &str, width: usize) -> String {
    let skin = skin();
    indent(&FmtText::from(&skin, prose, Some(width)).to_string())
}

fn skin() -> MadSkin {
    use termimad::crossterm::style::{Attribute, Color};

    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::Magenta);
    skin.strikeout.add_attr(Attribute::CrossedOut);
    skin.inline_code.set_fg(Color::Green);
    skin.quote_mark.set_fg(Color::DarkGrey);
    skin
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
