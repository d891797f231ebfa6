//! Swagger UI page rendering.

use crate::document::ApiDocument;

/// Pinned swagger-ui-dist release served from the CDN.
pub const SWAGGER_UI_VERSION: &str = "5.17.14";

const SWAGGER_UI_CDN: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist";

/// Errors raised when a document cannot be shown by Swagger UI.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("description document has no swagger version")]
    MissingVersion,

    #[error("description document has no title")]
    MissingTitle,

    #[error("failed to serialize description document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Render a description document into a self-contained Swagger UI page.
///
/// The document is embedded as compact JSON, so `host` and `schemes` appear in the
/// page exactly as serde writes them.
pub fn render_swagger_ui(doc: &ApiDocument) -> Result<String, RenderError> {
    if doc.swagger.trim().is_empty() {
        return Err(RenderError::MissingVersion);
    }
    if doc.info.title.trim().is_empty() {
        return Err(RenderError::MissingTitle);
    }

    let spec = script_safe_json(&doc.to_json()?);
    let title = escape_html(&doc.info.title);
    let assets = format!("{SWAGGER_UI_CDN}@{SWAGGER_UI_VERSION}");

    let mut html = String::with_capacity(spec.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("  <title>{title}</title>\n"));
    html.push_str(&format!(
        "  <link rel=\"stylesheet\" href=\"{assets}/swagger-ui.css\">\n"
    ));
    html.push_str("  <style>html { box-sizing: border-box; overflow-y: scroll; } body { margin: 0; background: #fafafa; }</style>\n");
    html.push_str("</head>\n<body>\n  <div id=\"swagger-ui\"></div>\n");
    html.push_str(&format!(
        "  <script src=\"{assets}/swagger-ui-bundle.js\"></script>\n"
    ));
    html.push_str(&format!(
        "  <script src=\"{assets}/swagger-ui-standalone-preset.js\"></script>\n"
    ));
    html.push_str("  <script>\n");
    html.push_str(&format!("    var spec = {spec};\n"));
    html.push_str(concat!(
        "    window.onload = function () {\n",
        "      window.ui = SwaggerUIBundle({\n",
        "        spec: spec,\n",
        "        dom_id: '#swagger-ui',\n",
        "        deepLinking: true,\n",
        "        presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],\n",
        "        plugins: [SwaggerUIBundle.plugins.DownloadUrl],\n",
        "        layout: 'StandaloneLayout'\n",
        "      });\n",
        "    };\n",
    ));
    html.push_str("  </script>\n</body>\n</html>\n");

    Ok(html)
}

/// Escape characters that would let embedded JSON close the surrounding `<script>`.
fn script_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ApiInfo;
    use serde_json::{Map, json};

    fn document() -> ApiDocument {
        let mut paths = Map::new();
        paths.insert(
            "/students".to_string(),
            json!({"get": {"tags": ["Students"], "description": "List students"}}),
        );
        ApiDocument {
            swagger: "2.0".to_string(),
            info: ApiInfo {
                title: "EduSync API".to_string(),
                description: "School records".to_string(),
                version: "1.0.0".to_string(),
            },
            host: "myapp.onrender.com".to_string(),
            schemes: vec!["https".to_string()],
            base_path: "/".to_string(),
            paths,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_render_embeds_host_and_schemes() {
        let html = render_swagger_ui(&document()).unwrap();
        assert!(html.contains(r#""host":"myapp.onrender.com""#));
        assert!(html.contains(r#""schemes":["https"]"#));
        assert!(html.contains("<title>EduSync API</title>"));
        assert!(html.contains("swagger-ui-bundle.js"));
        assert!(html.contains(SWAGGER_UI_VERSION));
    }

    #[test]
    fn test_render_is_deterministic() {
        let doc = document();
        assert_eq!(
            render_swagger_ui(&doc).unwrap(),
            render_swagger_ui(&doc).unwrap()
        );
    }

    #[test]
    fn test_render_escapes_script_breakout() {
        let mut doc = document();
        doc.info.description = "</script><script>alert(1)</script>".to_string();
        let html = render_swagger_ui(&doc).unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn test_render_escapes_title() {
        let mut doc = document();
        doc.info.title = "A <b>bold</b> API".to_string();
        let html = render_swagger_ui(&doc).unwrap();
        assert!(html.contains("<title>A &lt;b&gt;bold&lt;/b&gt; API</title>"));
    }

    #[test]
    fn test_render_rejects_missing_version() {
        let mut doc = document();
        doc.swagger = String::new();
        assert!(matches!(
            render_swagger_ui(&doc),
            Err(RenderError::MissingVersion)
        ));
    }

    #[test]
    fn test_render_rejects_missing_title() {
        let mut doc = document();
        doc.info.title = "  ".to_string();
        assert!(matches!(
            render_swagger_ui(&doc),
            Err(RenderError::MissingTitle)
        ));
    }
}
