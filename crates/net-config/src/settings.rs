//! Layered validation policy settings
//!
//! Built-in defaults, then an optional settings file, then `DPCFG_*` environment
//! variables. Command-line flags are applied by the caller on top of the result.

use std::path::Path;

use dpcfg_types::ValidationPolicy;

use crate::Result;

/// Prefix for environment overrides, e.g. `DPCFG_ALLOW_RECIPROCAL_L2XC=true`
pub const ENV_PREFIX: &str = "DPCFG";

pub fn load_policy(path: Option<&Path>) -> Result<ValidationPolicy> {
    let defaults = ValidationPolicy::default();
    let mut builder = config::Config::builder()
        .set_default("default_mtu", i64::from(defaults.default_mtu))?
        .set_default(
            "exact_match_requires_inner",
            defaults.exact_match_requires_inner,
        )?
        .set_default("allow_reciprocal_l2xc", defaults.allow_reciprocal_l2xc)?;

    if let Some(path) = path {
        log::debug!("reading validation settings from {}", path.display());
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    let policy: ValidationPolicy = builder.build()?.try_deserialize()?;
    log::debug!("validation policy: {:?}", policy);
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use tempfile::TempDir;

    // Environment variables are process-wide, so every layer is exercised in one test.
    #[test]
    fn test_policy_layering() {
        let policy = load_policy(None).unwrap();
        assert_eq!(policy, ValidationPolicy::default());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dpcfg.yaml");
        std::fs::write(&path, "default_mtu: 9000\nexact_match_requires_inner: true\n").unwrap();

        let policy = load_policy(Some(path.as_path())).unwrap();
        assert_eq!(policy.default_mtu, 9000);
        assert!(policy.exact_match_requires_inner);
        assert!(!policy.allow_reciprocal_l2xc);

        std::env::set_var("DPCFG_DEFAULT_MTU", "1600");
        let policy = load_policy(Some(path.as_path()));
        std::env::remove_var("DPCFG_DEFAULT_MTU");
        let policy = policy.unwrap();
        assert_eq!(policy.default_mtu, 1600);
        assert!(policy.exact_match_requires_inner);

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            load_policy(Some(missing.as_path())),
            Err(ConfigError::Settings(_))
        ));
    }
}
