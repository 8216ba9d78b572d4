//! Pass 1 integration tests
//!
//! Covers the public generation contract:
//! - Determinism per seed
//! - Validity of every resolved stack
//! - Caller overrides

use upg::assembler::fingerprint;
use upg::stack::{
    ArchetypeId, CicdId, DimensionValue, FrameworkId, LanguageId, PackagingId, PartialStack,
};
use upg::{GenerateOptions, ProjectAssembler, UpgError};
use yare::parameterized;

async fn generate(seed: u64, overrides: PartialStack) -> upg::Result<upg::GeneratedProject> {
    ProjectAssembler::standard()
        .generate(seed, &GenerateOptions::with_overrides(overrides))
        .await
}

#[parameterized(
    small = { 1 },
    medium = { 4242 },
    scenario = { 82910 },
    large = { 4_000_000_000 },
)]
#[test_macro(tokio::test)]
async fn test_same_seed_same_bytes(seed: u64) {
    let first = generate(seed, PartialStack::new()).await.unwrap();
    let second = generate(seed, PartialStack::new()).await.unwrap();

    assert_eq!(first.stack, second.stack);
    assert_eq!(first.files, second.files);
    assert_eq!(first.name, second.name);
    assert_eq!(first.metadata.fingerprint, second.metadata.fingerprint);
}

#[tokio::test]
async fn test_every_generated_stack_validates() {
    let assembler = ProjectAssembler::standard();
    for seed in 1..=60 {
        let project = assembler
            .generate(seed, &GenerateOptions::default())
            .await
            .unwrap_or_else(|e| panic!("seed {seed} failed: {e}"));
        let result = assembler.solver().validate(&project.stack.to_partial());
        assert!(result.valid, "seed {seed}: {:?}", result.violations);
        assert!(!project.files.is_empty(), "seed {seed} produced no files");
    }
}

#[tokio::test]
async fn test_backend_rust_picks_rust_web_framework() {
    let project = generate(
        82910,
        PartialStack::from_values([
            DimensionValue::Archetype(ArchetypeId::Backend),
            DimensionValue::Language(LanguageId::Rust),
        ]),
    )
    .await
    .unwrap();

    assert!(matches!(
        project.stack.framework,
        FrameworkId::Axum | FrameworkId::Actix
    ));
    assert!(project.files.contains_key("Cargo.toml"));
    assert!(project.id.starts_with("rust-"));
    assert!(project.id.ends_with("-82910"));
}

#[tokio::test]
async fn test_overrides_are_kept() {
    let project = generate(
        9,
        PartialStack::from_values([
            DimensionValue::Language(LanguageId::Go),
            DimensionValue::Packaging(PackagingId::Docker),
            DimensionValue::Cicd(CicdId::GitlabCi),
        ]),
    )
    .await
    .unwrap();

    assert_eq!(project.stack.language, LanguageId::Go);
    assert_eq!(project.stack.packaging, PackagingId::Docker);
    assert_eq!(project.stack.cicd, CicdId::GitlabCi);
    assert!(project.files.contains_key("go.mod"));
    assert!(project.files.contains_key("Dockerfile"));
}

#[tokio::test]
async fn test_invalid_overrides_fail_with_seed_and_reason() {
    let err = generate(
        17,
        PartialStack::from_values([
            DimensionValue::Framework(FrameworkId::Django),
            DimensionValue::Language(LanguageId::Go),
        ]),
    )
    .await
    .unwrap_err();

    assert_eq!(err.seed(), 17);
    assert!(matches!(err, UpgError::Validation { .. }));
    assert!(err.to_string().contains("seed 17"));
    assert!(!err.violations().is_empty());
}

#[tokio::test]
async fn test_fingerprint_covers_files() {
    let project = generate(55, PartialStack::new()).await.unwrap();
    assert_eq!(project.metadata.fingerprint, fingerprint(&project.files));
    assert_eq!(project.metadata.upg_version, upg::VERSION);
    assert!(!project.metadata.strategies_applied.is_empty());
}

#[tokio::test]
async fn test_base_files_always_present() {
    for seed in [3, 30, 300] {
        let project = generate(seed, PartialStack::new()).await.unwrap();
        for path in ["README.md", ".gitignore", "LICENSE"] {
            assert!(project.files.contains_key(path), "seed {seed} missing {path}");
        }
    }
}
