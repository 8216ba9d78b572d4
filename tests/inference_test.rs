//! Stack inference and file introspection integration tests

use upg::stack::{
    BuildToolId, CicdId, Dimension, DimensionValue, FrameworkId, LanguageId, PackagingId,
    PartialStack,
};
use upg::{FileIntrospector, GenerateOptions, ProjectAssembler, ProjectFiles, StackInferrer};
use yare::parameterized;

fn files(entries: &[(&str, &str)]) -> ProjectFiles {
    entries
        .iter()
        .map(|(p, c)| (p.to_string(), c.to_string()))
        .collect()
}

#[test]
fn test_cargo_axum_project() {
    let inferred = StackInferrer::default().infer(&files(&[(
        "Cargo.toml",
        "[package]\nname = \"api\"\nversion = \"0.1.0\"\n\n[dependencies]\naxum = \"0.7\"\n",
    )]));

    assert_eq!(inferred.stack.language, LanguageId::Rust);
    assert_eq!(inferred.stack.framework, FrameworkId::Axum);
    for dimension in Dimension::RESOLUTION_ORDER {
        assert!(
            inferred.confidence(dimension) > 0.0,
            "{dimension} has no confidence"
        );
    }
}

#[parameterized(
    placeholder = { "...axum..." },
    truncated = { "[package]\nname = \"api\"\n\n[dependencies]\naxum = { version = \"0.7\", features = [\"macros\"" },
)]
fn test_unparsable_cargo_manifest(content: &str) {
    let inferred = StackInferrer::default().infer(&files(&[("Cargo.toml", content)]));

    assert_eq!(inferred.stack.language, LanguageId::Rust);
    assert_eq!(inferred.stack.framework, FrameworkId::Axum);
    assert_eq!(inferred.stack.build_tool, BuildToolId::Cargo);
    assert!(inferred.confidence(Dimension::Language) > 0.9);
    assert!(inferred.confidence(Dimension::Framework) > 0.5);
}

#[test]
fn test_inference_is_pure() {
    let project = files(&[
        ("package.json", r#"{"name":"web","dependencies":{"express":"^4.19.0"}}"#),
        ("src/index.js", "import express from 'express';\n"),
    ]);
    let inferrer = StackInferrer::default();
    assert_eq!(inferrer.infer(&project), inferrer.infer(&project));
}

#[parameterized(
    rust = { LanguageId::Rust, BuildToolId::Cargo },
    go = { LanguageId::Go, BuildToolId::GoModules },
)]
#[test_macro(tokio::test)]
async fn test_generated_project_infers_back(language: LanguageId, build_tool: BuildToolId) {
    let overrides = PartialStack::from_values([
        DimensionValue::Language(language),
        DimensionValue::BuildTool(build_tool),
        DimensionValue::Packaging(PackagingId::Docker),
        DimensionValue::Cicd(CicdId::None),
    ]);
    let project = ProjectAssembler::standard()
        .generate(321, &GenerateOptions::with_overrides(overrides))
        .await
        .unwrap();

    let inferred = StackInferrer::default().infer(&project.files);
    assert_eq!(inferred.stack.language, language);
    assert_eq!(inferred.stack.build_tool, build_tool);
    assert_eq!(inferred.stack.packaging, PackagingId::Docker);
}

#[test]
fn test_introspector_reads_cargo_project() {
    let project = files(&[
        (
            "Cargo.toml",
            "[package]\nname = \"svc\"\n\n[dependencies]\ntokio = \"1\"\n",
        ),
        ("src/main.rs", "fn main() {}\n"),
        ("Dockerfile", "FROM rust:1.83\nEXPOSE 8080\n"),
    ]);
    let introspector = FileIntrospector::for_build_tool(&project, BuildToolId::Cargo);

    assert!(!introspector.is_degraded());
    assert_eq!(introspector.manifest_path(), Some("Cargo.toml"));
    assert_eq!(
        introspector.get_build_command().as_deref(),
        Some("cargo build --release")
    );
    assert_eq!(introspector.get_entry_point().as_deref(), Some("src/main.rs"));
    let ports: Vec<u16> = introspector
        .get_exposed_ports()
        .iter()
        .map(|p| p.port)
        .collect();
    assert_eq!(ports, vec![8080]);
}

#[test]
fn test_introspector_degrades_on_garbage_manifest() {
    let project = files(&[("package.json", "{ this is not json")]);
    let introspector = FileIntrospector::new(&project);

    assert!(introspector.is_degraded());
    assert!(introspector.get_manifest().dependencies.is_empty());
    assert!(introspector.has_file("package.json"));
}
