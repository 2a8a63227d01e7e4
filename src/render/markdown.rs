use pulldown_cmark::{html, Options, Parser};

/// Convert Markdown to HTML markup
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// One paragraph per non-blank line of markup, in order and untouched.
///
/// Tags are not interpreted: `<h1>Rome</h1>` becomes a paragraph with that literal text.
pub fn html_paragraphs(html: &str) -> Vec<String> {
    html.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
