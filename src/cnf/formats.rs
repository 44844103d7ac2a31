//! Output formats for token streams
//!
//!     plain   one token per line: `Kind "text"` with the text debug-escaped
//!     json    array of `{kind, start, end, text}` records
//!     yaml    the same records as YAML
//!     html    Pygments-style markup: `<span class="..">` per token inside
//!             `<div class="highlight"><pre>`, so existing Pygments stylesheets apply

use crate::cnf::error::{Error, Result};
use crate::cnf::token::{Token, TokenKind};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Plain,
    Json,
    Yaml,
    Html,
}

impl Format {
    pub const NAMES: [&'static str; 4] = ["plain", "json", "yaml", "html"];

    /// Render `tokens`, whose ranges index into `source`.
    pub fn render<I>(self, source: &str, tokens: I) -> Result<String>
    where
        I: IntoIterator<Item = Token>,
    {
        let records: Vec<TokenRecord<'_>> = tokens
            .into_iter()
            .map(|(kind, range)| TokenRecord {
                kind,
                start: range.start,
                end: range.end,
                text: &source[range],
            })
            .collect();
        match self {
            Format::Plain => Ok(render_plain(&records)),
            Format::Json => Ok(serde_json::to_string_pretty(&records)? + "\n"),
            Format::Yaml => Ok(serde_yaml::to_string(&records)?),
            Format::Html => Ok(render_html(&records)),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "plain" => Ok(Format::Plain),
            "json" => Ok(Format::Json),
            "yaml" => Ok(Format::Yaml),
            "html" => Ok(Format::Html),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    kind: TokenKind,
    start: usize,
    end: usize,
    text: &'a str,
}

fn render_plain(records: &[TokenRecord<'_>]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{:?} {:?}", record.kind, record.text);
    }
    out
}

fn render_html(records: &[TokenRecord<'_>]) -> String {
    let mut out = String::from("<div class=\"highlight\"><pre>");
    for record in records {
        let class = record.kind.short_class();
        if class.is_empty() {
            out.push_str(&escape_html(record.text));
        } else {
            let _ = write!(
                out,
                "<span class=\"{class}\">{}</span>",
                escape_html(record.text)
            );
        }
    }
    out.push_str("</pre></div>\n");
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
