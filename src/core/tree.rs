use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Entry type in a file tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    File,
    Directory,
}

/// One entry of the project file tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    /// Path relative to the project root
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// List the project directory recursively
///
/// Hidden entries are skipped and siblings are sorted by name. A missing
/// project directory yields an empty tree.
pub fn build_file_tree(project_path: &Path) -> Vec<TreeNode> {
    if !project_path.is_dir() {
        return Vec::new();
    }
    build_level(project_path, project_path)
}

fn build_level(root: &Path, dir: &Path) -> Vec<TreeNode> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error building file tree at {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut nodes: Vec<TreeNode> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| {
            let path = entry.path();
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            let is_dir = path.is_dir();
            TreeNode {
                name: entry.file_name().to_string_lossy().to_string(),
                path: relative,
                node_type: if is_dir { NodeType::Directory } else { NodeType::File },
                children: if is_dir { build_level(root, &path) } else { Vec::new() },
            }
        })
        .collect();

    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    nodes
}

/// Render a tree as indented text
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut out = String::new();
    render_into(nodes, 0, &mut out);
    out
}

fn render_into(nodes: &[TreeNode], depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.name);
        if node.node_type == NodeType::Directory {
            out.push('/');
        }
        out.push('\n');
        render_into(&node.children, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::write(root.join("templates/index.html"), "").unwrap();
        fs::write(root.join("app.py"), "").unwrap();
        fs::write(root.join("requirements.txt"), "").unwrap();
        fs::write(root.join(".env"), "").unwrap();
        temp_dir
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(build_file_tree(&temp_dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_tree_sorted_and_hidden_skipped() {
        let temp_dir = create_test_tree();
        let tree = build_file_tree(temp_dir.path());

        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["app.py", "requirements.txt", "templates"]);
        assert_eq!(tree[2].node_type, NodeType::Directory);
        assert_eq!(tree[2].children[0].path, "templates/index.html");
    }

    #[test]
    fn test_render_tree() {
        let temp_dir = create_test_tree();
        let rendered = render_tree(&build_file_tree(temp_dir.path()));
        assert_eq!(rendered, "app.py\nrequirements.txt\ntemplates/\n  index.html\n");
    }

    #[test]
    fn test_tree_serialization() {
        let temp_dir = create_test_tree();
        let json = serde_json::to_string(&build_file_tree(temp_dir.path())).unwrap();
        assert!(json.contains(r#""type":"directory""#));
        assert!(json.contains(r#""path":"templates/index.html""#));
    }
}
