//! CI pipeline for the stack's provider, driven by the toolchain commands.

use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::stack::{CicdId, TechStack};
use crate::strategies::Toolchain;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct CiStrategy;

#[async_trait]
impl EnrichmentStrategy for CiStrategy {
    fn id(&self) -> &str {
        "ci"
    }

    fn name(&self) -> &str {
        "CI pipeline"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn matches(&self, stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.cicd && stack.cicd != CicdId::None
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let chain = Toolchain::for_stack(ctx.stack, ctx.project_name);
        let steps = pipeline_steps(&chain);

        let (path, content) = match ctx.stack.cicd {
            CicdId::GithubActions => (
                ".github/workflows/ci.yml",
                render(&github_actions(&chain, &steps))?,
            ),
            CicdId::GitlabCi => (".gitlab-ci.yml", render(&gitlab_ci(&chain, &steps))?),
            CicdId::CircleCi => (".circleci/config.yml", render(&circle_ci(&chain, &steps))?),
            CicdId::AzurePipelines => (
                "azure-pipelines.yml",
                render(&azure_pipelines(&chain, &steps))?,
            ),
            CicdId::Jenkins => ("Jenkinsfile", jenkinsfile(&chain, &steps)),
            CicdId::None => return Ok(()),
        };
        ctx.write(path, content);
        Ok(())
    }
}

/// A named shell step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub stage: &'static str,
    pub name: String,
    pub run: String,
}

pub(crate) fn pipeline_steps(chain: &Toolchain) -> Vec<Step> {
    let mut steps = Vec::new();
    for run in &chain.install {
        steps.push(Step {
            stage: "build",
            name: "Install".into(),
            run: run.clone(),
        });
    }
    for run in &chain.build {
        steps.push(Step {
            stage: "build",
            name: "Build".into(),
            run: run.clone(),
        });
    }
    if !chain.test.is_empty() {
        steps.push(Step {
            stage: "test",
            name: "Test".into(),
            run: chain.test.clone(),
        });
    }
    steps
}

fn render(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).context("rendering CI pipeline")
}

fn github_actions(chain: &Toolchain, steps: &[Step]) -> Value {
    let mut job_steps = vec![json!({ "uses": "actions/checkout@v4" })];
    job_steps.extend(
        steps
            .iter()
            .map(|step| json!({ "name": step.name, "run": step.run })),
    );
    json!({
        "name": "CI",
        "on": {
            "push": { "branches": ["main"] },
            "pull_request": {},
        },
        "jobs": {
            "build": {
                "runs-on": "ubuntu-latest",
                "container": chain.build_image,
                "steps": job_steps,
            },
        },
    })
}

fn gitlab_ci(chain: &Toolchain, steps: &[Step]) -> Value {
    let script = |stage: &str| -> Vec<String> {
        steps
            .iter()
            .filter(|step| step.stage == "build" || step.stage == stage)
            .map(|step| step.run.clone())
            .collect()
    };
    let mut pipeline = json!({
        "image": chain.build_image,
        "stages": ["build"],
        "build": { "stage": "build", "script": script("build") },
    });
    if steps.iter().any(|step| step.stage == "test") {
        pipeline["stages"] = json!(["build", "test"]);
        pipeline["test"] = json!({ "stage": "test", "script": script("test") });
    }
    pipeline
}

fn circle_ci(chain: &Toolchain, steps: &[Step]) -> Value {
    let mut job_steps = vec![json!("checkout")];
    job_steps.extend(
        steps
            .iter()
            .map(|step| json!({ "run": { "name": step.name, "command": step.run } })),
    );
    json!({
        "version": 2.1,
        "jobs": {
            "build": {
                "docker": [{ "image": chain.build_image }],
                "steps": job_steps,
            },
        },
        "workflows": {
            "ci": { "jobs": ["build"] },
        },
    })
}

fn azure_pipelines(chain: &Toolchain, steps: &[Step]) -> Value {
    let job_steps: Vec<Value> = steps
        .iter()
        .map(|step| json!({ "script": step.run, "displayName": step.name }))
        .collect();
    json!({
        "trigger": ["main"],
        "pool": { "vmImage": "ubuntu-latest" },
        "container": chain.build_image,
        "steps": job_steps,
    })
}

fn jenkinsfile(chain: &Toolchain, steps: &[Step]) -> String {
    let mut out = format!(
        "pipeline {{\n    agent {{\n        docker {{ image '{}' }}\n    }}\n    stages {{\n",
        chain.build_image
    );
    for stage in ["build", "test"] {
        let commands: Vec<&Step> = steps.iter().filter(|step| step.stage == stage).collect();
        if commands.is_empty() {
            continue;
        }
        let title = if stage == "build" { "Build" } else { "Test" };
        out.push_str(&format!("        stage('{title}') {{\n            steps {{\n"));
        for step in commands {
            out.push_str(&format!("                sh '{}'\n", step.run.replace('\'', "\\'")));
        }
        out.push_str("            }\n        }\n");
    }
    out.push_str("    }\n}\n");
    out
}
