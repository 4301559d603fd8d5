//! Automation Catalog
//!
//! Registry of the automated actions an Automated node may reference.
//! Each descriptor declares its parameters as an ordered list of names; the
//! editor renders one input per name, so parameter forms are plain data.
//!
//! # Catalog File Format
//!
//! ```yaml
//! - id: send_email
//!   label: Send Email
//!   params: [to, subject, body]
//! ```

use std::fs;
use std::path::Path;

use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflow::model::AutomatedData;

/// Stock actions offered when no catalog file is configured.
pub static BUILTIN_AUTOMATIONS: Lazy<Vec<AutomationDescriptor>> = Lazy::new(|| {
    vec![
        AutomationDescriptor::new("send_email", "Send Email", &["to", "subject", "body"]),
        AutomationDescriptor::new("generate_doc", "Generate Document", &["template", "recipient"]),
        AutomationDescriptor::new("create_ticket", "Create Ticket", &["title", "priority"]),
        AutomationDescriptor::new("notify_slack", "Notify Slack", &["channel", "message"]),
    ]
});

/// Errors raised while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Duplicate automation id '{0}' in catalog")]
    DuplicateId(String),
}

/// One invocable action and the parameters it takes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AutomationDescriptor {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub params: Vec<String>,
}

/// One input of a parameter form: a declared name and its current value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ParamField {
    pub name: String,
    pub value: String,
}

impl AutomationDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, params: &[&str]) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Builds the parameter form for a node, prefilled from its current values.
    ///
    /// Fields follow the declared parameter order; values the descriptor does
    /// not declare are left out.
    pub fn param_form(&self, node: &AutomatedData) -> Vec<ParamField> {
        self.params
            .iter()
            .map(|name| ParamField {
                name: name.clone(),
                value: node.action_params.get(name).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

impl AutomatedData {
    /// Points the node at a catalog action and caches its label.
    ///
    /// Previously entered parameter values are kept.
    pub fn select_action(&mut self, descriptor: &AutomationDescriptor) {
        self.action = descriptor.id.clone();
        self.action_label = descriptor.label.clone();
    }

    /// Sets one parameter value.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.action_params.insert(name.into(), value.into());
    }

    /// Parameter values the descriptor declares, in declaration order.
    pub fn declared_params<'a>(
        &'a self,
        descriptor: &'a AutomationDescriptor,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        descriptor.params.iter().filter_map(move |name| {
            self.action_params
                .get(name)
                .map(|value| (name.as_str(), value.as_str()))
        })
    }
}

/// Queryable registry of automation descriptors.
pub trait AutomationCatalog {
    /// All descriptors in catalog order.
    fn list_automations(&self) -> Vec<AutomationDescriptor>;

    /// Looks up a descriptor by id.
    fn find(&self, id: &str) -> Option<AutomationDescriptor> {
        self.list_automations().into_iter().find(|a| a.id == id)
    }
}

/// Catalog backed by a fixed, ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCatalog {
    automations: Vec<AutomationDescriptor>,
}

impl StaticCatalog {
    /// Creates a catalog, rejecting duplicate ids.
    pub fn new(automations: Vec<AutomationDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for automation in &automations {
            if !seen.insert(automation.id.as_str()) {
                return Err(CatalogError::DuplicateId(automation.id.clone()));
            }
        }
        Ok(Self { automations })
    }

    /// The stock catalog.
    pub fn builtin() -> Self {
        Self {
            automations: (*BUILTIN_AUTOMATIONS).clone(),
        }
    }

    /// Loads a catalog from a JSON or YAML file (by extension; JSON otherwise).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!("Loading automation catalog from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let automations: Vec<AutomationDescriptor> = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        debug!("Catalog lists {} automations", automations.len());
        Self::new(automations)
    }

    pub fn len(&self) -> usize {
        self.automations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.automations.is_empty()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AutomationCatalog for StaticCatalog {
    fn list_automations(&self) -> Vec<AutomationDescriptor> {
        self.automations.clone()
    }

    fn find(&self, id: &str) -> Option<AutomationDescriptor> {
        self.automations.iter().find(|a| a.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order() {
        let ids: Vec<String> = StaticCatalog::builtin()
            .list_automations()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["send_email", "generate_doc", "create_ticket", "notify_slack"]);
    }

    #[test]
    fn test_find_descriptor() {
        let catalog = StaticCatalog::builtin();
        let ticket = catalog.find("create_ticket").unwrap();
        assert_eq!(ticket.label, "Create Ticket");
        assert_eq!(ticket.params, vec!["title", "priority"]);
        assert!(catalog.find("launch_rocket").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = StaticCatalog::new(vec![
            AutomationDescriptor::new("a", "A", &[]),
            AutomationDescriptor::new("a", "Again", &[]),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_param_form_follows_declared_order() {
        let catalog = StaticCatalog::builtin();
        let email = catalog.find("send_email").unwrap();

        let mut node = AutomatedData::default();
        node.set_param("subject", "Welcome");
        node.set_param("legacy", "ignored");

        let form = email.param_form(&node);
        let names: Vec<&str> = form.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["to", "subject", "body"]);
        assert_eq!(form[0].value, "");
        assert_eq!(form[1].value, "Welcome");
    }

    #[test]
    fn test_select_action_caches_label() {
        let catalog = StaticCatalog::builtin();
        let slack = catalog.find("notify_slack").unwrap();

        let mut node = AutomatedData::default();
        node.set_param("channel", "#people");
        node.select_action(&slack);

        assert_eq!(node.action, "notify_slack");
        assert_eq!(node.action_label, "Notify Slack");

        let declared: Vec<(&str, &str)> = node.declared_params(&slack).collect();
        assert_eq!(declared, vec![("channel", "#people")]);
    }

    #[test]
    fn test_load_yaml_catalog() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("catalog.yaml");
        std::fs::write(
            &path,
            "- id: payroll_sync\n  label: Sync Payroll\n  params: [employee_id]\n",
        )
        .unwrap();

        let catalog = StaticCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("payroll_sync").unwrap().params, vec!["employee_id"]);
    }

    #[test]
    fn test_load_json_catalog() {
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"id": "x", "label": "X"}]"#).unwrap();

        let catalog = StaticCatalog::load(&path).unwrap();
        assert!(catalog.find("x").unwrap().params.is_empty());
    }

    #[test]
    fn test_load_missing_catalog() {
        let result = StaticCatalog::load("/nonexistent/catalog.json");
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }
}
