//! Server-side HTML pages for documents and shared groups.

use pulldown_cmark::{html, Event, Options, Parser};

use crate::types::group::PopulatedGroup;
use crate::types::markdown::Markdown;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;line-height:1.6;color:#1f2328}\
pre{background:#f6f8fa;padding:.75rem;overflow:auto}code{font-family:ui-monospace,monospace}\
table{border-collapse:collapse}td,th{border:1px solid #d0d7de;padding:.25rem .5rem}\
header{border-bottom:1px solid #d0d7de;margin-bottom:1.5rem}nav a{margin-right:1rem}\
ul.links{list-style:none;padding:0}ul.links li{margin:.5rem 0}.muted{color:#656d76}";

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders markdown to HTML. Raw HTML in the source is shown as text.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Full page for one document, with a download link.
pub fn document_page(doc: &Markdown, public_url: &str) -> String {
    let title = doc.display_title();
    let id = escape_html(&doc.id);
    let body = format!(
        "<header><h1>{}</h1><nav><a href=\"{base}/view/{id}/download\">Download</a>\
         <a href=\"{base}/api/view/{id}\">Raw JSON</a></nav></header>\n<article>\n{}</article>",
        escape_html(title),
        render_markdown(&doc.content),
        base = escape_html(public_url),
        id = id,
    );
    page(title, &body)
}

/// Page listing the documents of a shared group.
pub fn group_page(group: &PopulatedGroup, public_url: &str) -> String {
    let base = escape_html(public_url);
    let items = if group.links.is_empty() {
        "<p class=\"muted\">This group has no documents.</p>".to_string()
    } else {
        let entries: Vec<String> = group
            .links
            .iter()
            .map(|doc| {
                format!(
                    "<li><a href=\"{base}/view/{id}\">{title}</a></li>",
                    base = base,
                    id = escape_html(&doc.id),
                    title = escape_html(doc.display_title()),
                )
            })
            .collect();
        format!("<ul class=\"links\">\n{}\n</ul>", entries.join("\n"))
    };
    let body = format!(
        "<header><h1>{}</h1><p class=\"muted\">{} document(s)</p></header>\n{}",
        escape_html(&group.title),
        group.links.len(),
        items
    );
    page(&group.title, &body)
}

/// Page shown for unknown documents or groups.
pub fn not_found_page(heading: &str, detail: &str) -> String {
    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape_html(heading), escape_html(detail));
    page(heading, &body)
}
