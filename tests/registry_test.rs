//! Registry manifest integration tests

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use upg::registry::MANIFEST_VERSION;
use upg::{GenerateOptions, ProjectAssembler, RegistryEntry, RegistryManifest};

async fn entries(seeds: impl IntoIterator<Item = u64>, secs: i64) -> Vec<RegistryEntry> {
    let assembler = ProjectAssembler::standard();
    let at = Utc.timestamp_opt(secs, 0).unwrap();
    let mut out = Vec::new();
    for seed in seeds {
        let project = assembler
            .generate(seed, &GenerateOptions::default())
            .await
            .unwrap();
        out.push(RegistryEntry::from_project(&project, at));
    }
    out
}

#[tokio::test]
async fn test_entry_mirrors_project() {
    let project = ProjectAssembler::standard()
        .generate(41, &GenerateOptions::default())
        .await
        .unwrap();
    let entry = RegistryEntry::from_project(&project, Utc::now());

    assert_eq!(entry.seed, 41);
    assert_eq!(entry.id, project.id);
    assert_eq!(entry.license, "MIT");
    assert_eq!(entry.stack, project.stack);
    assert_eq!(entry.files, project.file_paths());
    assert_eq!(entry.upg_version, upg::VERSION);
}

#[tokio::test]
async fn test_sweep_merge_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifests").join("generated.json");
    let t0 = Utc.timestamp_opt(0, 0).unwrap();

    let mut manifest = RegistryManifest::load_or_new(&path, t0).unwrap();
    manifest.merge(entries([30, 10, 20], 100).await, Utc.timestamp_opt(100, 0).unwrap());
    manifest.save(&path).unwrap();

    let mut reloaded = RegistryManifest::load_or_new(&path, t0).unwrap();
    assert_eq!(reloaded, manifest);

    reloaded.merge(entries([20, 40], 200).await, Utc.timestamp_opt(200, 0).unwrap());
    let seeds: Vec<u64> = reloaded.entries.iter().map(|e| e.seed).collect();
    assert_eq!(seeds, vec![10, 20, 30, 40]);
    assert_eq!(reloaded.total_entries, 4);
    assert_eq!(reloaded.version, MANIFEST_VERSION);
    assert_eq!(
        reloaded.find(20).map(|e| e.validated_at),
        Some(Utc.timestamp_opt(200, 0).unwrap())
    );
}

#[tokio::test]
async fn test_manifest_json_shape() {
    let mut manifest = RegistryManifest::new(Utc.timestamp_opt(0, 0).unwrap());
    manifest.merge(entries([7], 0).await, Utc.timestamp_opt(0, 0).unwrap());

    let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
    assert_eq!(json["totalEntries"], 1);
    let entry = &json["entries"][0];
    for key in ["seed", "id", "license", "stack", "files", "validatedAt", "upgVersion"] {
        assert!(entry.get(key).is_some(), "missing {key}");
    }
    assert!(entry["stack"].get("buildTool").is_some());
}
