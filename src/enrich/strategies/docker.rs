//! Production container image: multi-stage build, non-root user, healthcheck.

use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::stack::TechStack;
use crate::strategies::packaging::{dockerignore, render_dockerfile};
use crate::strategies::Toolchain;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub struct DockerProductionStrategy;

#[async_trait]
impl EnrichmentStrategy for DockerProductionStrategy {
    fn id(&self) -> &str {
        "docker-prod"
    }

    fn name(&self) -> &str {
        "Production Dockerfile"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn matches(&self, stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.docker_prod && stack.packaging.uses_container()
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let mut chain = Toolchain::for_stack(ctx.stack, ctx.project_name);
        if let Some(port) = ctx.source.get_exposed_ports().first() {
            if chain.port.is_some() && chain.port != Some(port.port) {
                debug!(port = port.port, "Using port found in project sources");
                chain.port = Some(port.port);
            }
        }

        ctx.write("Dockerfile", render_dockerfile(&chain, true));
        ctx.write_if_absent(".dockerignore", dockerignore(ctx.stack.language));
        Ok(())
    }
}
