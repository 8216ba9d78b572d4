//! Tag-triggered release workflow and a changelog.

use super::ci::pipeline_steps;
use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::stack::{CicdId, TechStack};
use crate::strategies::Toolchain;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

pub struct ReleaseStrategy;

#[async_trait]
impl EnrichmentStrategy for ReleaseStrategy {
    fn id(&self) -> &str {
        "release"
    }

    fn name(&self) -> &str {
        "Release workflow"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn matches(&self, _stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.release
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let chain = Toolchain::for_stack(&stack, ctx.project_name);

        ctx.write_if_absent(
            "CHANGELOG.md",
            format!(
                "# Changelog\n\nAll notable changes to {} are documented here.\nThe format follows Keep a Changelog and the project uses semantic versioning.\n\n## [Unreleased]\n\n## [0.1.0]\n\n### Added\n\n- Initial {} {} scaffold.\n",
                ctx.project_name,
                stack.framework.name(),
                stack.archetype.name().to_lowercase(),
            ),
        );

        match stack.cicd {
            CicdId::GithubActions => {
                let workflow = github_release(&chain);
                ctx.write(
                    ".github/workflows/release.yml",
                    serde_yaml::to_string(&workflow).context("rendering release workflow")?,
                );
            }
            CicdId::GitlabCi if ctx.has_file(".gitlab-ci.yml") => {
                ctx.append(
                    ".gitlab-ci.yml",
                    "\nrelease:\n  stage: deploy\n  image: registry.gitlab.com/gitlab-org/release-cli:latest\n  rules:\n    - if: $CI_COMMIT_TAG\n  script:\n    - echo \"Releasing $CI_COMMIT_TAG\"\n  release:\n    tag_name: $CI_COMMIT_TAG\n    description: CHANGELOG.md\n",
                );
            }
            _ => {}
        }
        Ok(())
    }
}

fn github_release(chain: &Toolchain) -> serde_json::Value {
    let mut steps = vec![json!({ "uses": "actions/checkout@v4" })];
    steps.extend(
        pipeline_steps(chain)
            .into_iter()
            .filter(|step| step.stage == "build")
            .map(|step| json!({ "name": step.name, "run": step.run })),
    );
    let mut publish = json!({
        "uses": "softprops/action-gh-release@v2",
        "with": { "generate_release_notes": true },
    });
    if !chain.artifacts.is_empty() {
        publish["with"]["files"] = json!(chain.artifacts.join("\n"));
    }
    steps.push(publish);

    json!({
        "name": "Release",
        "on": { "push": { "tags": ["v*"] } },
        "permissions": { "contents": "write" },
        "jobs": {
            "release": {
                "runs-on": "ubuntu-latest",
                "container": chain.build_image,
                "steps": steps,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    #[test]
    fn test_release_publishes_artifacts() {
        let stack = TechStack {
            archetype: ArchetypeId::Cli,
            language: LanguageId::Go,
            runtime: RuntimeId::Go,
            framework: FrameworkId::Cobra,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::None,
            packaging: PackagingId::None,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::GoModules,
            styling: StylingId::None,
            testing: TestingId::GoTest,
        };
        let chain = Toolchain::for_stack(&stack, "tool");
        let workflow = github_release(&chain);
        let steps = workflow["jobs"]["release"]["steps"].as_array().unwrap();
        assert_eq!(steps.last().unwrap()["with"]["files"], "bin/tool");
        assert!(steps.iter().all(|s| s["run"] != "go test ./..."));
        assert_eq!(workflow["on"]["push"]["tags"][0], "v*");
    }
}
