//! HTML rendering — injects a projected tree into a D3 page template.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use tracing::{info, warn};

use genealogy_core::{Error, Result};

use crate::projector::TreeNode;

/// Bundled page used when no template file is given.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/tree.html");

static TREE_DATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"var treeData = [^;]*;").unwrap());
static D3_SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<script[^>]*\bsrc="[^"]*\bd3(?:\.v\d+)?(?:\.min)?\.js"[^>]*>\s*</script>"#).unwrap()
});

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Overrides the display name of the root node.
    pub central_name: Option<String>,
}

/// Replace the template's `var treeData = ...;` with `tree`, and optionally
/// define `window.centralName` right after the D3 script tag.
pub fn render_html(template: &str, tree: &TreeNode, options: &RenderOptions) -> Result<String> {
    if !TREE_DATA_RE.is_match(template) {
        return Err(Error::Template(
            "template has no `var treeData = ...;` assignment".into(),
        ));
    }

    let tree_json = script_safe(&serde_json::to_string_pretty(tree)?);
    let assignment = format!("var treeData = {};", tree_json);
    let mut html = TREE_DATA_RE
        .replace(template, NoExpand(&assignment))
        .into_owned();

    if let Some(name) = options.central_name.as_deref() {
        let script = format!(
            "<script>window.centralName = {};</script>",
            script_safe(&serde_json::to_string(name)?)
        );
        match D3_SCRIPT_RE.find(&html).map(|tag| tag.end()) {
            Some(end) => html.insert_str(end, &format!("\n{}", script)),
            None => warn!("No D3 script tag in template; central name not injected"),
        }
    }

    Ok(html)
}

/// Read a tree JSON file and write the rendered page.
pub fn render_file(
    tree_path: &Path,
    html_path: &Path,
    template_path: Option<&Path>,
    options: &RenderOptions,
) -> Result<()> {
    let tree: TreeNode = serde_json::from_str(&std::fs::read_to_string(tree_path)?)?;
    let template = match template_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let html = render_html(&template, &tree, options)?;
    std::fs::write(html_path, html)?;
    info!("Interactive HTML written to {}", html_path.display());
    Ok(())
}

/// Keep JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<html><head>
<script src="https://cdnjs.cloudflare.com/ajax/libs/d3/3.5.5/d3.min.js"></script>
</head><body><script>
var treeData = {"name": "placeholder"};
draw(treeData);
</script></body></html>"#;

    fn tree() -> TreeNode {
        TreeNode {
            id: "1".into(),
            name: "Jean Dupont".into(),
            defense_date: None,
            title: None,
            children: vec![TreeNode {
                id: "2".into(),
                name: "Anne $1 </script>".into(),
                defense_date: Some("2001".into()),
                title: Some("Étude".into()),
                children: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_tree_data_replaced() {
        let html = render_html(TEMPLATE, &tree(), &RenderOptions::default()).unwrap();
        assert!(!html.contains("placeholder"));
        assert!(html.contains("\"name\": \"Jean Dupont\""));
        assert!(html.contains("Étude"));
        assert!(html.contains("draw(treeData);"));
        assert!(!html.contains("centralName"));
    }

    #[test]
    fn test_injected_json_cannot_close_script() {
        let html = render_html(TEMPLATE, &tree(), &RenderOptions::default()).unwrap();
        assert!(html.contains("Anne $1 <\\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_central_name_after_d3_tag() {
        let options = RenderOptions {
            central_name: Some("Jean \"JD\" Dupont".into()),
        };
        let html = render_html(TEMPLATE, &tree(), &options).unwrap();
        let d3 = html.find("d3.min.js").unwrap();
        let central = html
            .find(r#"<script>window.centralName = "Jean \"JD\" Dupont";</script>"#)
            .unwrap();
        assert!(d3 < central);
        assert!(central < html.find("var treeData").unwrap());
    }

    #[test]
    fn test_template_without_assignment_is_error() {
        let err = render_html("<html></html>", &tree(), &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }

    #[test]
    fn test_default_template_renders() {
        let options = RenderOptions {
            central_name: Some("Root".into()),
        };
        let html = render_html(DEFAULT_TEMPLATE, &tree(), &options).unwrap();
        assert!(html.contains("Jean Dupont"));
        assert!(html.contains("window.centralName = \"Root\""));
    }

    #[test]
    fn test_render_file() {
        let dir = tempfile::tempdir().unwrap();
        let tree_path = dir.path().join("tree.json");
        let html_path = dir.path().join("tree.html");
        std::fs::write(&tree_path, serde_json::to_string(&tree()).unwrap()).unwrap();

        render_file(&tree_path, &html_path, None, &RenderOptions::default()).unwrap();
        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.contains("Jean Dupont"));
    }
}
