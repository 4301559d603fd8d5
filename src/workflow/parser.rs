//! Workflow Export Documents
//!
//! Loads and saves the editor's flat export format:
//! `{ nodes: [{id, type, position, data}], edges: [{id, source, target}] }`.
//!
//! JSON is the editor's native format. Paths ending in `.yaml`/`.yml` use the
//! same document shape in YAML. The document carries no version or schema;
//! structural checks are the validator's job, not the loader's.

use std::fs;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use super::model::Graph;

/// Errors raised while reading or writing a workflow document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read workflow file '{path}': {source}. Check that the file exists and is readable.")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write workflow file '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse workflow JSON: {0}. Check the file format.")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse workflow YAML: {0}. Check the file format.")]
    Yaml(#[from] serde_yaml::Error),
}

/// Document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from a file extension; JSON unless `.yaml`/`.yml`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parses a workflow document from a string.
pub fn parse_workflow(content: &str, format: Format) -> Result<Graph, LoadError> {
    let graph: Graph = match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    };
    debug!(
        "Parsed {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

/// Loads a workflow from a JSON or YAML export file.
///
/// # Example
///
/// ```rust,no_run
/// use hrflow::workflow::load_workflow;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let graph = load_workflow("workflow.json")?;
///     println!("Loaded {} nodes", graph.nodes.len());
///     Ok(())
/// }
/// ```
pub fn load_workflow(path: impl AsRef<Path>) -> Result<Graph, LoadError> {
    let path = path.as_ref();
    info!("Loading workflow from: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    debug!("Workflow document loaded ({} bytes)", content.len());

    parse_workflow(&content, Format::from_path(path))
}

/// Renders the export document as pretty-printed JSON.
pub fn export_json(graph: &Graph) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// Renders the export document as YAML.
pub fn export_yaml(graph: &Graph) -> Result<String, LoadError> {
    Ok(serde_yaml::to_string(graph)?)
}

/// Saves a workflow; the format follows the file extension.
pub fn save_workflow(graph: &Graph, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let content = match Format::from_path(path) {
        Format::Json => export_json(graph)?,
        Format::Yaml => export_yaml(graph)?,
    };

    fs::write(path, content).map_err(|source| LoadError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!("Workflow saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::model::{ApproverRole, Node, NodeType};
    use tempfile::tempdir;

    fn sample() -> Graph {
        Graph::new()
            .with_node(Node::start("node_0", "Leave request").at(100.0, 50.0))
            .with_node(Node::approval("node_1", "Manager sign-off", Some(ApproverRole::Manager)))
            .with_node(Node::automated("node_2", "Notify", "notify_slack", "Notify Slack"))
            .with_node(Node::end("node_3", "Leave approved"))
            .connect("node_0", "node_1")
            .connect("node_1", "node_2")
            .connect("node_2", "node_3")
    }

    #[test]
    fn test_export_json_shape() {
        let json = export_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["nodes"][0]["type"], "startNode");
        assert_eq!(value["nodes"][0]["position"]["x"], 100.0);
        assert_eq!(value["nodes"][2]["data"]["actionLabel"], "Notify Slack");
        assert_eq!(value["edges"][0]["source"], "node_0");
        assert_eq!(value["edges"][0]["target"], "node_1");
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("workflow.json");

        save_workflow(&sample(), &path).unwrap();
        assert!(path.exists());

        let loaded = load_workflow(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_save_and_load_yaml() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("workflow.yaml");

        save_workflow(&sample(), &path).unwrap();
        let loaded = load_workflow(&path).unwrap();

        assert_eq!(loaded.nodes.len(), 4);
        assert_eq!(loaded.nodes[1].node_type(), NodeType::Approval);
        assert_eq!(loaded.edges.len(), 3);
    }

    #[test]
    fn test_load_workflow_file_not_found() {
        let result = load_workflow("/nonexistent/path/workflow.json");
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_load_workflow_invalid_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_workflow(&path), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_parse_editor_export_without_positions() {
        let json = r#"{
            "nodes": [{"id": "a", "type": "startNode", "data": {"title": "Go"}}],
            "edges": []
        }"#;

        let graph = parse_workflow(json, Format::Json).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_export_matches_editor_document() {
        let json = r#"{
            "nodes": [
                {"id": "s", "type": "startNode", "position": {"x": 0.0, "y": 0.0},
                 "data": {"label": "Hire", "title": "Hire", "metadata": [], "color": "teal"}},
                {"id": "a", "type": "approvalNode", "position": {"x": 0.0, "y": 80.0},
                 "data": {"label": "A", "title": "A", "approverRole": "", "autoApproveThreshold": ""}},
                {"id": "e", "type": "endNode", "position": {"x": 0.0, "y": 160.0},
                 "data": {"label": "New end", "title": "", "extra": 7,
                          "endMessage": "", "showSummary": false}}
            ],
            "edges": [
                {"id": "edge_0", "source": "s", "target": "a"},
                {"id": "edge_1", "source": "a", "target": "e"}
            ]
        }"#;

        let graph = parse_workflow(json, Format::Json).unwrap();
        let exported: serde_json::Value =
            serde_json::from_str(&export_json(&graph).unwrap()).unwrap();
        let original: serde_json::Value = serde_json::from_str(json).unwrap();

        assert_eq!(exported, original);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Json);
    }
}
