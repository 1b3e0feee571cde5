//! End-to-end migration tests over the built-in Quarkus catalog.
//!
//! These cover the engine's observable guarantees: the three document
//! kinds migrate text-to-text (or tree-to-tree for source), a second run
//! over migrated output is always a no-op, activation failures happen
//! before any document is touched, and unchanged documents are never
//! emitted.

use harrow_core::{
    migrate_document, parse_pom, parse_properties, quarkus, write_pom, write_properties, Document,
    DocumentBody, JavaNode, MigrationOptions, PomNode, SourceFile, TreeNode, TypeTable,
};

fn activate(names: &[&str]) -> Vec<std::sync::Arc<dyn harrow_core::Rule>> {
    let catalog = quarkus::builtin().unwrap();
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    catalog.activate(&names).unwrap()
}

fn config_doc(text: &str) -> Document {
    Document::config("src/main/resources/application.properties", parse_properties(text).unwrap())
}

fn build_doc(text: &str) -> Document {
    Document::build("pom.xml", parse_pom(text).unwrap())
}

#[test]
fn test_property_key_migrates_in_one_pass() {
    let rules = activate(&["quarkus.quarkus2-migration"]);
    let doc = config_doc("quarkus.dev.instrumentation=true\n");

    let outcome = migrate_document(&doc, &rules, &MigrationOptions::default());
    assert!(outcome.converged);
    let migrated = outcome.change.document().expect("document changed");
    match &migrated.body {
        DocumentBody::Config(root) => {
            assert_eq!(
                write_properties(root),
                "quarkus.live-reload.instrumentation=true\n"
            );
        }
        _ => unreachable!(),
    }
    assert_eq!(
        outcome.change.rules(),
        ["quarkus.rename-dev-instrumentation-property"]
    );

    // A second full run over the output is a no-op.
    let second = migrate_document(migrated, &rules, &MigrationOptions::default());
    assert!(!second.change.is_changed());
}

#[test]
fn test_profile_prefixed_keys_migrate_too() {
    let rules = activate(&["quarkus.rename-dev-instrumentation-property"]);
    let doc = config_doc("%dev.quarkus.dev.instrumentation=true\n");
    let outcome = migrate_document(&doc, &rules, &MigrationOptions::default());
    let migrated = outcome.change.document().unwrap();
    match &migrated.body {
        DocumentBody::Config(root) => assert_eq!(
            write_properties(root),
            "%dev.quarkus.live-reload.instrumentation=true\n"
        ),
        _ => unreachable!(),
    }
}

#[test]
fn test_untouched_layout_survives_migration() {
    let rules = activate(&["quarkus.quarkus2-migration"]);
    let doc = config_doc(
        "# dev settings\nquarkus.dev.instrumentation=true\n\nquarkus.http.port = 8080\n",
    );
    let outcome = migrate_document(&doc, &rules, &MigrationOptions::default());
    let migrated = outcome.change.document().unwrap();
    match &migrated.body {
        DocumentBody::Config(root) => assert_eq!(
            write_properties(root),
            "# dev settings\nquarkus.live-reload.instrumentation=true\n\nquarkus.http.port = 8080\n"
        ),
        _ => unreachable!(),
    }
}

const BARE_PLUGIN_POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <groupId>org.acme</groupId>
  <artifactId>getting-started</artifactId>
  <build>
    <plugins>
      <plugin>
        <groupId>io.quarkus</groupId>
        <artifactId>quarkus-maven-plugin</artifactId>
        <version>${quarkus-plugin.version}</version>
      </plugin>
    </plugins>
  </build>
</project>
"#;

fn find_quarkus_plugin(root: &PomNode) -> &PomNode {
    let mut found = None;
    root.visit_preorder(&mut |n| {
        if harrow_core::rules::pom::is_plugin(n, "io.quarkus", "quarkus-maven-plugin")
            && found.is_none()
        {
            found = Some(n);
        }
    });
    found.expect("quarkus-maven-plugin present")
}

fn plugin_goals(plugin: &PomNode) -> Vec<String> {
    let mut goals = Vec::new();
    plugin.visit_preorder(&mut |n| {
        if n.is_element_named("goal") {
            if let Some(text) = n.text_content() {
                goals.push(text.trim().to_string());
            }
        }
    });
    goals
}

#[test]
fn test_maven_plugin_gains_goals_and_extensions() {
    let rules = activate(&["quarkus.configure-maven-plugin-with-reasonable-defaults"]);
    let doc = build_doc(BARE_PLUGIN_POM);

    let outcome = migrate_document(&doc, &rules, &MigrationOptions::default());
    assert!(outcome.converged);
    let migrated = outcome.change.document().expect("document changed");
    let root = match &migrated.body {
        DocumentBody::Build(file) => &file.root,
        _ => unreachable!(),
    };
    let plugin = find_quarkus_plugin(root);
    assert_eq!(plugin_goals(plugin), vec!["build", "generate-code", "generate-code-tests"]);
    assert_eq!(plugin.child_text("extensions").as_deref(), Some("true"));

    // The serialized output stays well-formed and parseable.
    let text = write_pom(match &migrated.body {
        DocumentBody::Build(file) => file,
        _ => unreachable!(),
    });
    assert!(text.contains("<goal>generate-code-tests</goal>"));
    assert!(text.contains("<extensions>true</extensions>"));
    let reparsed = parse_pom(&text).unwrap();
    assert!(reparsed.root.structural_eq(root));

    // Re-running the rule set on the output is a no-op.
    let second = migrate_document(migrated, &rules, &MigrationOptions::default());
    assert!(!second.change.is_changed());
}

#[test]
fn test_existing_goals_are_kept_and_augmented() {
    let pom = r#"<project>
  <build>
    <plugins>
      <plugin>
        <groupId>io.quarkus</groupId>
        <artifactId>quarkus-maven-plugin</artifactId>
        <executions>
          <execution>
            <goals>
              <goal>build</goal>
            </goals>
          </execution>
        </executions>
      </plugin>
    </plugins>
  </build>
</project>
"#;
    let rules = activate(&["quarkus.configure-maven-plugin-with-reasonable-defaults"]);
    let outcome = migrate_document(&build_doc(pom), &rules, &MigrationOptions::default());
    let migrated = outcome.change.document().unwrap();
    let root = match &migrated.body {
        DocumentBody::Build(file) => &file.root,
        _ => unreachable!(),
    };
    assert_eq!(
        plugin_goals(find_quarkus_plugin(root)),
        vec!["build", "generate-code", "generate-code-tests"]
    );
}

#[test]
fn test_plugin_rules_skip_descriptors_without_the_plugin() {
    let pom = "<project><build><plugins/></build></project>\n";
    let rules = activate(&["quarkus.configure-maven-plugin-with-reasonable-defaults"]);
    let outcome = migrate_document(&build_doc(pom), &rules, &MigrationOptions::default());
    assert!(!outcome.change.is_changed());
    assert_eq!(outcome.passes, 1);
}

#[test]
fn test_avro_plugin_removed() {
    let pom = r#"<project>
  <build>
    <plugins>
      <plugin>
        <groupId>org.apache.avro</groupId>
        <artifactId>avro-maven-plugin</artifactId>
      </plugin>
    </plugins>
  </build>
</project>
"#;
    let rules = activate(&["quarkus.remove-avro-maven-plugin"]);
    let outcome = migrate_document(&build_doc(pom), &rules, &MigrationOptions::default());
    let migrated = outcome.change.document().unwrap();
    match &migrated.body {
        DocumentBody::Build(file) => {
            let mut plugins = 0;
            file.root.visit_preorder(&mut |n| {
                if n.is_element_named("plugin") {
                    plugins += 1;
                }
            });
            assert_eq!(plugins, 0);
        }
        _ => unreachable!(),
    }
}

/// `multi.onItem().apply(fn)` wired into a small compilation unit, with the
/// stage type resolved for the `onItem()` call.
fn mutiny_source() -> Document {
    let multi = JavaNode::ident("multi").unwrap();
    let on_item = JavaNode::invocation(Some(multi), "onItem", vec![]).unwrap();
    let types = TypeTable::new().with_node_type(on_item.id(), "io.smallrye.mutiny.groups.MultiOnItem");
    let mapper = JavaNode::lambda(
        vec!["item".to_string()],
        JavaNode::invocation(Some(JavaNode::ident("item").unwrap()), "toUpperCase", vec![]).unwrap(),
    )
    .unwrap();
    let apply = JavaNode::invocation(Some(on_item), "apply", vec![mapper]).unwrap();
    let method = JavaNode::method("pipeline", vec![], vec![], vec![apply]).unwrap();
    let unit = JavaNode::compilation_unit(
        Some("org.acme"),
        vec![JavaNode::import("io.smallrye.mutiny.Multi").unwrap()],
        vec![JavaNode::class("Pipelines", vec![], vec![method]).unwrap()],
    )
    .unwrap();
    Document::source("src/main/java/org/acme/Pipelines.java", SourceFile::new(unit, types))
}

fn invocation_names(doc: &Document) -> Vec<String> {
    let mut names = Vec::new();
    match &doc.body {
        DocumentBody::Source(file) => file.unit.visit_preorder(&mut |n| {
            if let JavaNode::MethodInvocation { name, .. } = n {
                names.push(name.clone());
            }
        }),
        _ => unreachable!(),
    }
    names
}

#[test]
fn test_pipeline_apply_becomes_transform() {
    let rules = activate(&["quarkus.quarkus2-migration"]);
    let outcome = migrate_document(&mutiny_source(), &rules, &MigrationOptions::default());
    assert!(outcome.converged);
    let migrated = outcome.change.document().expect("document changed");
    assert_eq!(
        invocation_names(migrated),
        vec!["transform", "onItem", "toUpperCase"]
    );
    assert_eq!(
        outcome.change.rules(),
        ["quarkus.mutiny-multi-apply-to-transform"]
    );

    // Migrated code has no matching apply(..) left; the rule set is inert.
    let second = migrate_document(migrated, &rules, &MigrationOptions::default());
    assert!(!second.change.is_changed());
}

#[test]
fn test_grpc_annotation_swap_spans_import_and_usage() {
    let annotation = JavaNode::annotation("GrpcService", vec![]).unwrap();
    let field = JavaNode::field("greeter", "GreeterGrpc", vec![annotation]).unwrap();
    let unit = JavaNode::compilation_unit(
        Some("org.acme"),
        vec![JavaNode::import("io.quarkus.grpc.runtime.annotations.GrpcService").unwrap()],
        vec![JavaNode::class("GreeterResource", vec![], vec![field]).unwrap()],
    )
    .unwrap();
    let doc = Document::source(
        "src/main/java/org/acme/GreeterResource.java",
        SourceFile::new(unit, TypeTable::new()),
    );

    let rules = activate(&["quarkus.quarkus2-migration"]);
    let outcome = migrate_document(&doc, &rules, &MigrationOptions::default());
    let migrated = outcome.change.document().expect("document changed");
    match &migrated.body {
        DocumentBody::Source(file) => {
            let mut imports = Vec::new();
            let mut annotations = Vec::new();
            file.unit.visit_preorder(&mut |n| {
                if let Some(p) = n.import_path() {
                    imports.push(p.to_string());
                }
                if let JavaNode::Annotation { name, .. } = n {
                    annotations.push(name.clone());
                }
            });
            assert_eq!(imports, vec!["io.quarkus.grpc.GrpcClient"]);
            assert_eq!(annotations, vec!["GrpcClient"]);
        }
        _ => unreachable!(),
    }

    let second = migrate_document(migrated, &rules, &MigrationOptions::default());
    assert!(!second.change.is_changed());
}

#[test]
fn test_full_catalog_is_idempotent_across_kinds() {
    let rules = activate(&["quarkus.quarkus2-migration"]);
    let opts = MigrationOptions::default();
    let docs = vec![
        config_doc("quarkus.dev.instrumentation=true\nquarkus.package.type=uber-jar\n"),
        build_doc(BARE_PLUGIN_POM),
        mutiny_source(),
    ];
    for doc in docs {
        let first = migrate_document(&doc, &rules, &opts);
        assert!(first.converged, "{} should converge", doc.origin);
        let migrated = first.change.document().expect("each sample changes once");
        let second = migrate_document(migrated, &rules, &opts);
        assert!(
            !second.change.is_changed(),
            "{} should be a fixed point",
            doc.origin
        );
    }
}

#[test]
fn test_unchanged_documents_are_not_emitted() {
    let rules = activate(&["quarkus.quarkus2-migration"]);
    let docs = vec![
        config_doc("greeting.message=hello\n"),
        build_doc("<project><build><plugins/></build></project>\n"),
    ];
    let outcomes = harrow_core::migrate(&docs, &rules, &MigrationOptions::default());
    for outcome in outcomes {
        assert!(!outcome.change.is_changed());
        assert!(outcome.change.document().is_none());
    }
}

#[test]
fn test_cyclic_composite_fails_activation_with_zero_rewrites() {
    let mut catalog = quarkus::builtin().unwrap();
    catalog
        .register_composite("broken.loop", "cycle", vec!["broken.loop2".into()])
        .unwrap();
    catalog
        .register_composite("broken.loop2", "cycle", vec!["broken.loop".into()])
        .unwrap();
    let err = catalog.activate(&["broken.loop".into()]).unwrap_err();
    assert!(matches!(
        err,
        harrow_core::ActivationError::CyclicComposite { .. }
    ));
    // Activation failed before any document was processed; nothing to
    // migrate with, so by construction zero rewrites happened.
}

#[test]
fn test_unknown_rule_names_the_offender() {
    let catalog = quarkus::builtin().unwrap();
    let err = catalog
        .activate(&["quarkus.no-such-rule".into()])
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown rule 'quarkus.no-such-rule'");
}
