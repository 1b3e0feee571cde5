//! Built-in Quarkus migration catalog.
//!
//! A representative slice of the 1.x → 2.x catalog, enough to migrate the
//! common shapes: configuration key/value moves, quarkus-maven-plugin
//! defaults, the Avro plugin removal, and the Mutiny/gRPC source rewrites.
//! The data-only rules live in `quarkus.yml` next to this module; the
//! source rules need executable matchers and are registered here.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::ActivationError;
use crate::manifest::register_manifest;
use crate::rule::{Precondition, Rule, SourceRule};
use crate::rules::java::{ChangeType, RenameMethod};

const MANIFEST: &str = include_str!("quarkus.yml");

const GRPC_SERVICE: &str = "io.quarkus.grpc.runtime.annotations.GrpcService";
const GRPC_CLIENT: &str = "io.quarkus.grpc.GrpcClient";

fn source_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(SourceRule::new(
            "quarkus.mutiny-multi-apply-to-transform",
            "Replace deprecated Multi pipeline-stage apply(..) with transform(..).",
            RenameMethod {
                receiver_type: "io.smallrye.mutiny.groups.MultiOnItem".into(),
                method_name: "apply".into(),
                new_name: "transform".into(),
            },
        )),
        Arc::new(SourceRule::new(
            "quarkus.mutiny-uni-apply-to-transform",
            "Replace deprecated Uni pipeline-stage apply(..) with transform(..).",
            RenameMethod {
                receiver_type: "io.smallrye.mutiny.groups.UniOnItem".into(),
                method_name: "apply".into(),
                new_name: "transform".into(),
            },
        )),
        Arc::new(
            SourceRule::new(
                "quarkus.grpc-service-to-grpc-client",
                "Replace @GrpcService injection points with @GrpcClient.",
                ChangeType::new(GRPC_SERVICE, GRPC_CLIENT),
            )
            .with_precondition(Precondition::UsesType {
                fqn: GRPC_SERVICE.to_string(),
            }),
        ),
    ]
}

/// Build the built-in catalog: coded source rules plus the declarative
/// manifest. Callers merge their own manifests on top before activation.
pub fn builtin() -> Result<Catalog, ActivationError> {
    let mut catalog = Catalog::new();
    for rule in source_rules() {
        catalog.register_rule(rule)?;
    }
    register_manifest(&mut catalog, MANIFEST)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin().unwrap();
        assert!(catalog.contains("quarkus.quarkus2-migration"));
        assert!(catalog.contains("quarkus.rename-dev-instrumentation-property"));
        assert!(catalog.contains("quarkus.mutiny-multi-apply-to-transform"));
    }

    #[test]
    fn test_aggregate_activates_every_reference() {
        let catalog = builtin().unwrap();
        let active = catalog
            .activate(&["quarkus.quarkus2-migration".into()])
            .unwrap();
        let names: Vec<&str> = active.iter().map(|r| r.name()).collect();
        // Composites flattened away, one entry per executable rule.
        assert!(names.contains(&"quarkus.add-maven-plugin-goal-generate-code"));
        assert!(names.contains(&"quarkus.grpc-service-to-grpc-client"));
        assert_eq!(
            names.len(),
            names
                .iter()
                .collect::<std::collections::HashSet<_>>()
                .len()
        );
    }

    #[test]
    fn test_activation_is_deterministic() {
        let catalog = builtin().unwrap();
        let a: Vec<String> = catalog
            .activate(&["quarkus.quarkus2-migration".into()])
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        let b: Vec<String> = catalog
            .activate(&["quarkus.quarkus2-migration".into()])
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(a, b);
    }
}
