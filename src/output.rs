//! Link-list rendering for display or export.

use std::fmt;
use std::str::FromStr;

/// How a link list is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One link per line.
    #[default]
    Text,
    /// A compact JSON array of strings.
    Json,
    /// `1. <link>` lines.
    Numbered,
    /// An HTML `<ul>` of self-referencing anchors.
    Html,
}

impl OutputFormat {
    /// The name used on the command line and in the config file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Numbered => "numbered",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "numbered" => Ok(Self::Numbered),
            "html" => Ok(Self::Html),
            other => Err(format!(
                "unknown output format '{other}' (expected txt, json, numbered or html)"
            )),
        }
    }
}

/// Renders `links` in `format`. Every format except JSON ends each entry with a newline.
#[must_use]
pub fn render_links(links: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => links.iter().map(|link| format!("{link}\n")).collect(),
        // Serializing a slice of strings cannot fail.
        OutputFormat::Json => serde_json::to_string(links).unwrap_or_else(|_| "[]".to_string()),
        OutputFormat::Numbered => links
            .iter()
            .enumerate()
            .map(|(i, link)| format!("{}. {link}\n", i + 1))
            .collect(),
        OutputFormat::Html => {
            let mut out = String::from("<ul>\n");
            for link in links {
                let escaped = escape_html(link);
                out.push_str(&format!("<li><a href=\"{escaped}\">{escaped}</a></li>\n"));
            }
            out.push_str("</ul>");
            out
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
