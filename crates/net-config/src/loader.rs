//! Configuration document loading

use std::path::Path;

use dpcfg_types::Config;

use crate::error::ConfigError;
use crate::Result;

/// Document encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from the file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Parse a configuration document. An empty document is an empty configuration.
pub fn load_str(doc: &str, format: Format) -> Result<Config> {
    if doc.trim().is_empty() {
        log::debug!("empty configuration document");
        return Ok(Config::default());
    }
    let config = match format {
        Format::Yaml => serde_yaml::from_str(doc)?,
        Format::Json => serde_json::from_str(doc)?,
    };
    Ok(config)
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let doc = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_str(&doc, Format::from_path(path))?;
    log::debug!(
        "loaded {}: {} interfaces, {} loopbacks",
        path.display(),
        config.interfaces.len(),
        config.loopbacks.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    const YAML_DOC: &str = r#"
interfaces:
  xe0:
    mtu: 9000
    lcp: e0
  xe0.100:
    encapsulation:
      dot1q: 100
      exact-match: true
loopbacks:
  loop0:
    lcp: lo0
    addresses: ["10.0.0.1/32"]
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.conf")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Yaml);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML_DOC.as_bytes()).unwrap();

        let config = load_file(file.path()).unwrap();
        let names: Vec<&str> = config.interfaces.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["xe0", "xe0.100"]);
        assert_eq!(config.interfaces["xe0"].mtu, Some(9000));
        assert_eq!(config.loopbacks["loop0"].lcp.as_deref(), Some("lo0"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"interfaces": {"xe0": {"l2xc": "xe1"}, "xe1": {}}}"#,
        )
        .unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.interfaces["xe0"].l2xc.as_deref(), Some("xe1"));
        assert!(config.loopbacks.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let config = load_str("  \n", Format::Yaml).unwrap();
        assert!(config.interfaces.is_empty());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            load_str("interfaces: [", Format::Yaml),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            load_str("{", Format::Json),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            load_file("/nonexistent/dpcfg.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
