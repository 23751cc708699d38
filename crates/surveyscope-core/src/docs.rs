//! # Document Export
//!
//! Translate a Markdown report into Google Docs `batchUpdate` requests.
//!
//! Only the subset the reports use is understood: `#`, `##` and `###`
//! headings, whole-line `**bold**` labels, plain lines and blank lines.
//! Insert positions are UTF-16 code unit indices, starting at 1 (the
//! beginning of an empty document body).

use serde_json::{Value, json};

/// Build the edit URL of a document.
#[must_use]
pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", document_id)
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn insert_text(index: usize, text: &str) -> Value {
    json!({
        "insertText": {
            "location": { "index": index },
            "text": text,
        }
    })
}

fn paragraph_style(start: usize, len: usize, style: &str) -> Value {
    json!({
        "updateParagraphStyle": {
            "range": { "startIndex": start, "endIndex": start + len },
            "paragraphStyle": { "namedStyleType": style },
            "fields": "namedStyleType",
        }
    })
}

fn bold(start: usize, len: usize) -> Value {
    json!({
        "updateTextStyle": {
            "range": { "startIndex": start, "endIndex": start + len },
            "textStyle": { "bold": true },
            "fields": "bold",
        }
    })
}

/// Requests that reproduce `markdown` in an empty document.
#[must_use]
pub fn markdown_to_doc_requests(markdown: &str) -> Vec<Value> {
    let mut requests = Vec::new();
    let mut index = 1;

    for line in markdown.split('\n') {
        if line.trim().is_empty() {
            requests.push(insert_text(index, "\n"));
            index += 1;
            continue;
        }

        let heading = [("# ", "TITLE"), ("## ", "HEADING_1"), ("### ", "HEADING_2")]
            .into_iter()
            .find_map(|(prefix, style)| line.strip_prefix(prefix).map(|rest| (rest.trim(), style)));

        let (text, style) = if let Some((text, style)) = heading {
            (text, Some(paragraph_style(index, utf16_len(text), style)))
        } else if line.len() >= 4 && line.starts_with("**") && line.ends_with("**") {
            let text = line[2..line.len() - 2].trim();
            (text, Some(bold(index, utf16_len(text))))
        } else {
            (line.trim(), None)
        };

        requests.push(insert_text(index, &format!("{}\n", text)));
        // Docs rejects empty ranges.
        if !text.is_empty() {
            requests.extend(style);
        }
        index += utf16_len(text) + 1;
    }
    requests
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_bold() {
        let requests = markdown_to_doc_requests("# Title\n## Part\n**Key:**\n  body text  ");
        assert_eq!(requests.len(), 7);

        assert_eq!(requests[0]["insertText"]["location"]["index"], 1);
        assert_eq!(requests[0]["insertText"]["text"], "Title\n");
        assert_eq!(requests[1]["updateParagraphStyle"]["range"]["endIndex"], 6);
        assert_eq!(
            requests[1]["updateParagraphStyle"]["paragraphStyle"]["namedStyleType"],
            "TITLE"
        );

        assert_eq!(requests[2]["insertText"]["location"]["index"], 7);
        assert_eq!(
            requests[3]["updateParagraphStyle"]["paragraphStyle"]["namedStyleType"],
            "HEADING_1"
        );

        assert_eq!(requests[4]["insertText"]["text"], "Key:\n");
        assert_eq!(requests[5]["updateTextStyle"]["fields"], "bold");
        assert_eq!(requests[5]["updateTextStyle"]["range"]["startIndex"], 12);

        assert_eq!(requests[6]["insertText"]["text"], "body text\n");
        assert_eq!(requests[6]["insertText"]["location"]["index"], 17);
    }

    #[test]
    fn empty_heading_and_bold_get_no_style() {
        let requests = markdown_to_doc_requests("#   \n****\n## Next");
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0]["insertText"]["text"], "\n");
        assert_eq!(requests[1]["insertText"]["text"], "\n");
        assert_eq!(requests[1]["insertText"]["location"]["index"], 2);
        assert_eq!(requests[2]["insertText"]["location"]["index"], 3);
        assert_eq!(requests[3]["updateParagraphStyle"]["range"]["startIndex"], 3);
        assert!(
            requests
                .iter()
                .all(|r| r.get("updateTextStyle").is_none())
        );
    }

    #[test]
    fn blank_lines_advance_by_one() {
        let requests = markdown_to_doc_requests("a\n\nb");
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1]["insertText"]["text"], "\n");
        assert_eq!(requests[2]["insertText"]["location"]["index"], 4);
    }

    #[test]
    fn indices_count_utf16_units() {
        let requests = markdown_to_doc_requests("### 📊 Scores\nnext");
        assert_eq!(requests[1]["updateParagraphStyle"]["range"]["endIndex"], 10);
        assert_eq!(requests[2]["insertText"]["location"]["index"], 11);
    }

    #[test]
    fn url_format() {
        assert_eq!(document_url("abc"), "https://docs.google.com/document/d/abc/edit");
    }
}
