//! Renderer options embedded in the HTML document itself.
//!
//! A page can carry its own settings as
//! `<meta name="pdfkit-page-size" content="Legal">`, which becomes
//! `--page-size Legal` on the renderer command line.

use scraper::{Html, Selector};

/// Prefix marking a `<meta>` tag as a renderer option.
pub const META_PREFIX: &str = "pdfkit-";

/// Extract `(key, value)` renderer options from `<meta name="pdfkit-*">` tags.
///
/// Tags without a `content` attribute yield an empty value (a bare flag).
/// Keys keep the position of their first occurrence; a repeated key takes
/// the value of its last one.
pub fn extract_meta_options(html: &str) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let meta_sel = Selector::parse(r#"meta[name^="pdfkit-"]"#).unwrap();

    let mut options: Vec<(String, String)> = Vec::new();
    for el in document.select(&meta_sel) {
        let Some(key) = el
            .value()
            .attr("name")
            .and_then(|n| n.strip_prefix(META_PREFIX))
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            continue;
        };

        let value = el.value().attr("content").unwrap_or_default().trim();
        match options.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => options.push((key.to_string(), value.to_string())),
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_prefixed_meta_tags() {
        let html = r#"<html><head>
            <meta charset="utf-8">
            <meta name="pdfkit-page-size" content="Legal"/>
            <meta name="pdfkit-orientation" content="Landscape">
            <meta name="viewport" content="width=device-width">
        </head><body><p>Hi</p></body></html>"#;

        let opts = extract_meta_options(html);
        assert_eq!(
            opts,
            vec![
                ("page-size".to_string(), "Legal".to_string()),
                ("orientation".to_string(), "Landscape".to_string()),
            ]
        );
    }

    #[test]
    fn missing_content_is_bare_flag() {
        let html = r#"<html><head><meta name="pdfkit-grayscale"></head><body></body></html>"#;
        assert_eq!(
            extract_meta_options(html),
            vec![("grayscale".to_string(), String::new())]
        );
    }

    #[test]
    fn last_occurrence_wins_in_first_position() {
        let html = r#"<html><head>
            <meta name="pdfkit-page-size" content="A4">
            <meta name="pdfkit-orientation" content="Portrait">
            <meta name="pdfkit-page-size" content="Letter">
        </head></html>"#;
        assert_eq!(
            extract_meta_options(html),
            vec![
                ("page-size".to_string(), "Letter".to_string()),
                ("orientation".to_string(), "Portrait".to_string()),
            ]
        );
    }

    #[test]
    fn bare_prefix_is_ignored() {
        let html = r#"<html><head><meta name="pdfkit-" content="x"></head></html>"#;
        assert!(extract_meta_options(html).is_empty());
    }

    #[test]
    fn plain_document_has_no_options() {
        assert!(extract_meta_options("<html><body><h1>Report</h1></body></html>").is_empty());
    }
}
