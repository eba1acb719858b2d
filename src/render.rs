//! HTML rendering of raw query results

const JSON_VIEWER_ROOT: &str = "http://rawgit.com/abodelot/jquery.json-viewer/master/json-viewer";

/// Wrap a JSON result in a page that renders it as a collapsible tree.
/// The element id carries the paragraph id so several results can share
/// one notebook page. `</` inside the result is written as `<\/` so string
/// values cannot close the script element.
pub fn json_viewer(result: &str, paragraph_id: &str) -> String {
    let result = result.replace("</", "<\\/");
    format!(
        "<html><head>\
         <script src=\"{root}/jquery.json-viewer.js\"></script>\n\
         <link href=\"{root}/jquery.json-viewer.css\" type=\"text/css\" rel=\"stylesheet\" />\n\
         <script>$('#json-renderer{id}').jsonViewer({result});</script>\
         </head><body><pre id=\"json-renderer{id}\"></pre></body>",
        root = JSON_VIEWER_ROOT,
        id = paragraph_id,
        result = result,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_viewer_document() {
        let html = json_viewer(r#"[{"a":1}]"#, "p42");

        assert!(html.starts_with("<html><head>"));
        assert!(html.contains("jquery.json-viewer.js"));
        assert!(html.contains("jquery.json-viewer.css"));
        assert!(html.contains(r#"<script>$('#json-rendererp42').jsonViewer([{"a":1}]);</script>"#));
        assert!(html.ends_with(r#"<pre id="json-rendererp42"></pre></body>"#));
    }

    #[test]
    fn test_closing_tags_in_result_are_escaped() {
        let html = json_viewer(r#"[{"note":"</script><script>alert(1)</script>"}]"#, "p7");

        assert!(html.contains(r#"jsonViewer([{"note":"<\/script><script>alert(1)<\/script>"}]);</script>"#));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
