//! Configuration for rendering and XML serialization.
//!
//! Settings come from a TOML file (explicit path or the per-user
//! `dynasql/config.toml`) and fall back to defaults for anything missing.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::DynaResult;
use crate::transpiler::{Dialect, SqlBuilder};
use crate::xml::{XmlContext, XmlFactory};

/// Rendering and serialization settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DynaConfig {
    /// Target dialect for SQL rendering.
    pub dialect: Dialect,

    /// Put each list item and clause on its own line.
    pub pretty: bool,

    /// XML namespace policy.
    pub xml: XmlSettings,
}

/// The `[xml]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct XmlSettings {
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub qualify_elements: bool,
    pub qualify_attributes: bool,
    /// Indent written documents.
    pub indent: bool,
}

impl DynaConfig {
    /// Create a builder for fluent configuration.
    pub fn builder() -> DynaConfigBuilder {
        DynaConfigBuilder::default()
    }

    /// Location of the per-user configuration file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dynasql").join("config.toml"))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> DynaResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from an explicit file. A missing file is an error.
    pub fn load(path: &Path) -> DynaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded configuration");
        Self::from_toml(&text)
    }

    /// Load the per-user file, or defaults when there is none.
    pub fn load_default() -> DynaResult<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load `path` when given, otherwise the per-user file.
    pub fn resolve(path: Option<&Path>) -> DynaResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    /// An XML context with the default factory and this namespace policy.
    pub fn xml_context(&self) -> XmlContext {
        let mut ctx = XmlContext::new(XmlFactory::with_defaults())
            .qualify_elements(self.xml.qualify_elements)
            .qualify_attributes(self.xml.qualify_attributes)
            .indent(self.xml.indent);
        if let Some(namespace) = &self.xml.namespace {
            ctx = ctx.with_namespace(namespace.as_str(), self.xml.prefix.as_deref());
        }
        ctx
    }

    /// A fresh SQL builder for the configured dialect and layout.
    pub fn sql_builder(&self) -> SqlBuilder {
        SqlBuilder::new(self.dialect).pretty(self.pretty)
    }
}

/// Builder for [`DynaConfig`].
#[derive(Debug, Default)]
pub struct DynaConfigBuilder {
    config: DynaConfig,
}

impl DynaConfigBuilder {
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Write and expect elements in `namespace`, using `prefix` when given.
    pub fn namespace(mut self, namespace: impl Into<String>, prefix: Option<&str>) -> Self {
        self.config.xml.namespace = Some(namespace.into());
        self.config.xml.prefix = prefix.map(str::to_string);
        self
    }

    pub fn qualify_elements(mut self, qualify: bool) -> Self {
        self.config.xml.qualify_elements = qualify;
        self
    }

    pub fn qualify_attributes(mut self, qualify: bool) -> Self {
        self.config.xml.qualify_attributes = qualify;
        self
    }

    pub fn indent_xml(mut self, indent: bool) -> Self {
        self.config.xml.indent = indent;
        self
    }

    pub fn build(self) -> DynaConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DynaConfig::from_toml("").unwrap();
        assert_eq!(config, DynaConfig::default());
        assert_eq!(config.dialect, Dialect::Postgres);
        assert!(!config.pretty);
        assert_eq!(config.xml.namespace, None);
    }

    #[test]
    fn test_parse_full_file() {
        let config = DynaConfig::from_toml(
            r#"
dialect = "sqlserver"
pretty = true

[xml]
namespace = "http://schemas.dynasql.dev/statement"
prefix = "dsql"
qualify_elements = true
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            DynaConfig::builder()
                .dialect(Dialect::SqlServer)
                .pretty(true)
                .namespace("http://schemas.dynasql.dev/statement", Some("dsql"))
                .qualify_elements(true)
                .build()
        );
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        assert!(DynaConfig::from_toml("dialect = \"db2\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = Path::new("/nonexistent/dynasql/config.toml");
        assert!(DynaConfig::load(path).is_err());
    }

    #[test]
    fn test_xml_context_carries_namespace_policy() {
        let ctx = DynaConfig::builder()
            .namespace("urn:dynasql", Some("d"))
            .qualify_elements(true)
            .build()
            .xml_context();
        assert_eq!(ctx.namespace(), Some("urn:dynasql"));
        assert_eq!(ctx.element_name("Select"), "d:Select");
        assert_eq!(ctx.attribute_name("Name"), "Name");
    }
}
