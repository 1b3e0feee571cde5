//! Declarative rule definitions: the YAML manifest format.
//!
//! Config and build-descriptor rules are pure data and are declared here;
//! composites enumerate other rules by name. Source rules need executable
//! matchers (semantic type information), so the manifest can only reference
//! them - they are registered programmatically and included by name.
//!
//! ```yaml
//! rules:
//!   - name: quarkus.rename-dev-instrumentation-property
//!     description: Move the instrumentation toggle to the live-reload namespace.
//!     change-property-key:
//!       old-key: quarkus\.dev\.instrumentation
//!       new-key: quarkus.live-reload.instrumentation
//!
//!   - name: quarkus.quarkus2-migration
//!     description: Quarkus 1.x to 2.x aggregate migration.
//!     include:
//!       - quarkus.rename-dev-instrumentation-property
//! ```

use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::ActivationError;
use crate::rule::{BuildRule, ConfigRule, Precondition, Rule};
use crate::rules::pom::{AddPluginGoal, ChangeTagValue, RemovePlugin, SetPluginExtensions};
use crate::rules::props::{
    AddProperty, ChangePropertyKey, ChangePropertyValue, DeleteProperty, ProfileScope,
};

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub rules: Vec<ManifestRule>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestRule {
    pub name: String,
    pub description: String,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub preconditions: Vec<PreconditionDef>,
    #[serde(flatten)]
    pub body: RuleBody,
}

/// Applicability tests expressible as data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreconditionDef {
    #[serde(rename_all = "kebab-case")]
    HasProperty { key: String },
    #[serde(rename_all = "kebab-case")]
    HasPlugin {
        group_id: String,
        artifact_id: String,
    },
    #[serde(rename_all = "kebab-case")]
    UsesType { fqn: String },
}

impl PreconditionDef {
    fn compile(&self) -> Result<Precondition, ActivationError> {
        match self {
            PreconditionDef::HasProperty { key } => Ok(Precondition::HasProperty {
                key: anchored(key)?,
            }),
            PreconditionDef::HasPlugin {
                group_id,
                artifact_id,
            } => Ok(Precondition::HasPlugin {
                group_id: group_id.clone(),
                artifact_id: artifact_id.clone(),
            }),
            PreconditionDef::UsesType { fqn } => Ok(Precondition::UsesType { fqn: fqn.clone() }),
        }
    }
}

/// One rule body: a composite (`include`) or a data-only primitive.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleBody {
    Include(Vec<String>),
    #[serde(rename_all = "kebab-case")]
    ChangePropertyKey {
        old_key: String,
        new_key: String,
        profile: Option<String>,
        change_all_profiles: Option<bool>,
    },
    #[serde(rename_all = "kebab-case")]
    ChangePropertyValue {
        key: String,
        old_value: Option<String>,
        new_value: String,
        profile: Option<String>,
        change_all_profiles: Option<bool>,
    },
    #[serde(rename_all = "kebab-case")]
    AddProperty { key: String, value: String },
    #[serde(rename_all = "kebab-case")]
    DeleteProperty {
        key: String,
        profile: Option<String>,
        change_all_profiles: Option<bool>,
    },
    #[serde(rename_all = "kebab-case")]
    AddPluginGoal {
        group_id: String,
        artifact_id: String,
        goal: String,
    },
    #[serde(rename_all = "kebab-case")]
    SetPluginExtensions {
        group_id: String,
        artifact_id: String,
        value: bool,
    },
    #[serde(rename_all = "kebab-case")]
    RemovePlugin {
        group_id: String,
        artifact_id: String,
    },
    #[serde(rename_all = "kebab-case")]
    ChangeTagValue {
        path: String,
        old_value: Option<String>,
        new_value: String,
    },
}

fn anchored(pattern: &str) -> Result<Regex, ActivationError> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| ActivationError::Manifest(format!("bad key pattern '{}': {}", pattern, e)))
}

fn bad(name: &str, err: impl std::fmt::Display) -> ActivationError {
    ActivationError::Manifest(format!("rule '{}': {}", name, err))
}

/// Parse a YAML manifest.
pub fn parse_manifest(text: &str) -> Result<Manifest, ActivationError> {
    serde_yaml::from_str(text).map_err(|e| ActivationError::Manifest(e.to_string()))
}

/// Parse a manifest and register every entry into the catalog.
pub fn register_manifest(catalog: &mut Catalog, text: &str) -> Result<(), ActivationError> {
    let manifest = parse_manifest(text)?;
    for entry in manifest.rules {
        register_entry(catalog, entry)?;
    }
    Ok(())
}

fn register_entry(catalog: &mut Catalog, entry: ManifestRule) -> Result<(), ActivationError> {
    let ManifestRule {
        name,
        description,
        preconditions,
        body,
    } = entry;

    if let RuleBody::Include(includes) = body {
        if !preconditions.is_empty() {
            return Err(bad(&name, "composites cannot declare preconditions"));
        }
        return catalog.register_composite(name, description, includes);
    }

    let precondition = compile_preconditions(&name, &preconditions)?;
    let rule = build_primitive(&name, &description, body, precondition)?;
    catalog.register_rule(rule)
}

fn compile_preconditions(
    name: &str,
    defs: &[PreconditionDef],
) -> Result<Option<Precondition>, ActivationError> {
    let mut compiled = Vec::with_capacity(defs.len());
    for def in defs {
        compiled.push(def.compile().map_err(|e| bad(name, e))?);
    }
    Ok(match compiled.len() {
        0 => None,
        1 => compiled.pop(),
        _ => Some(Precondition::AllOf(compiled)),
    })
}

fn build_primitive(
    name: &str,
    description: &str,
    body: RuleBody,
    precondition: Option<Precondition>,
) -> Result<Arc<dyn Rule>, ActivationError> {
    let rule: Arc<dyn Rule> = match body {
        RuleBody::Include(_) => unreachable!("composites handled by the caller"),
        RuleBody::ChangePropertyKey {
            old_key,
            new_key,
            profile,
            change_all_profiles,
        } => {
            let visitor = ChangePropertyKey::new(&old_key, new_key)
                .map_err(|e| bad(name, e))?
                .with_scope(ProfileScope::from_options(profile, change_all_profiles));
            config_rule(name, description, precondition, visitor)
        }
        RuleBody::ChangePropertyValue {
            key,
            old_value,
            new_value,
            profile,
            change_all_profiles,
        } => {
            let visitor = ChangePropertyValue::new(&key, old_value, new_value)
                .map_err(|e| bad(name, e))?
                .with_scope(ProfileScope::from_options(profile, change_all_profiles));
            config_rule(name, description, precondition, visitor)
        }
        RuleBody::AddProperty { key, value } => {
            config_rule(name, description, precondition, AddProperty { key, value })
        }
        RuleBody::DeleteProperty {
            key,
            profile,
            change_all_profiles,
        } => {
            let visitor = DeleteProperty::new(&key)
                .map_err(|e| bad(name, e))?
                .with_scope(ProfileScope::from_options(profile, change_all_profiles));
            config_rule(name, description, precondition, visitor)
        }
        RuleBody::AddPluginGoal {
            group_id,
            artifact_id,
            goal,
        } => build_rule(
            name,
            description,
            precondition,
            AddPluginGoal {
                group_id,
                artifact_id,
                goal,
            },
        ),
        RuleBody::SetPluginExtensions {
            group_id,
            artifact_id,
            value,
        } => build_rule(
            name,
            description,
            precondition,
            SetPluginExtensions {
                group_id,
                artifact_id,
                value,
            },
        ),
        RuleBody::RemovePlugin {
            group_id,
            artifact_id,
        } => build_rule(
            name,
            description,
            precondition,
            RemovePlugin {
                group_id,
                artifact_id,
            },
        ),
        RuleBody::ChangeTagValue {
            path,
            old_value,
            new_value,
        } => {
            let visitor =
                ChangeTagValue::from_path(&path, old_value, new_value).map_err(|e| bad(name, e))?;
            build_rule(name, description, precondition, visitor)
        }
    };
    Ok(rule)
}

fn config_rule<T>(
    name: &str,
    description: &str,
    precondition: Option<Precondition>,
    visitor: T,
) -> Arc<dyn Rule>
where
    T: crate::rule::TreeRule<crate::tree::PropsNode> + Send + Sync + 'static,
{
    let mut rule = ConfigRule::new(name, description, visitor);
    if let Some(pre) = precondition {
        rule = rule.with_precondition(pre);
    }
    Arc::new(rule)
}

fn build_rule<T>(
    name: &str,
    description: &str,
    precondition: Option<Precondition>,
    visitor: T,
) -> Arc<dyn Rule>
where
    T: crate::rule::TreeRule<crate::tree::PomNode> + Send + Sync + 'static,
{
    let mut rule = BuildRule::new(name, description, visitor);
    if let Some(pre) = precondition {
        rule = rule.with_precondition(pre);
    }
    Arc::new(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
rules:
  - name: demo.rename-key
    description: Rename a property key.
    change-property-key:
      old-key: quarkus\.dev\.instrumentation
      new-key: quarkus.live-reload.instrumentation

  - name: demo.add-goal
    description: Add a plugin goal.
    preconditions:
      - has-plugin:
          group-id: io.quarkus
          artifact-id: quarkus-maven-plugin
    add-plugin-goal:
      group-id: io.quarkus
      artifact-id: quarkus-maven-plugin
      goal: generate-code

  - name: demo.all
    description: Everything above.
    include:
      - demo.rename-key
      - demo.add-goal
"#;

    #[test]
    fn test_manifest_round_trip_into_catalog() {
        let mut catalog = Catalog::new();
        register_manifest(&mut catalog, SAMPLE).unwrap();
        assert!(catalog.contains("demo.rename-key"));
        assert!(catalog.contains("demo.add-goal"));
        let active = catalog.activate(&["demo.all".into()]).unwrap();
        let names: Vec<&str> = active.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["demo.rename-key", "demo.add-goal"]);
        assert!(active[1].precondition().is_some());
    }

    #[test]
    fn test_profile_options_parse() {
        let text = r#"
rules:
  - name: demo.scoped
    description: Scoped rename.
    change-property-key:
      old-key: a\.b
      new-key: c.d
      profile: dev
"#;
        let manifest = parse_manifest(text).unwrap();
        match &manifest.rules[0].body {
            RuleBody::ChangePropertyKey { profile, .. } => {
                assert_eq!(profile.as_deref(), Some("dev"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_bad_regex_is_a_manifest_error() {
        let text = r#"
rules:
  - name: demo.broken
    description: Broken pattern.
    change-property-key:
      old-key: "("
      new-key: x
"#;
        let mut catalog = Catalog::new();
        let err = register_manifest(&mut catalog, text).unwrap_err();
        assert!(matches!(err, ActivationError::Manifest(_)));
    }

    #[test]
    fn test_composite_with_preconditions_rejected() {
        let text = r#"
rules:
  - name: demo.bad
    description: Composite with precondition.
    preconditions:
      - has-property:
          key: x
    include: [a]
"#;
        let mut catalog = Catalog::new();
        let err = register_manifest(&mut catalog, text).unwrap_err();
        assert!(matches!(err, ActivationError::Manifest(_)));
    }

    #[test]
    fn test_missing_body_rejected() {
        let text = r#"
rules:
  - name: demo.empty
    description: No body at all.
"#;
        let err = parse_manifest(text).unwrap_err();
        assert!(matches!(err, ActivationError::Manifest(_)));
    }
}
