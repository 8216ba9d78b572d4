crate::define_id_enum! {
    TransportId {
        Rest => "rest" : "REST" | "http",
        Graphql => "graphql" : "GraphQL",
        Grpc => "grpc" : "gRPC",
        Websocket => "websocket" : "WebSocket" | "ws",
        Trpc => "trpc" : "tRPC",
        None => "none" : "None",
    }
}

crate::define_id_enum! {
    PackagingId {
        Docker => "docker" : "Docker" | "dockerfile",
        DockerCompose => "docker-compose" : "Docker Compose" | "compose",
        Kubernetes => "kubernetes" : "Kubernetes" | "k8s",
        Serverless => "serverless" : "Serverless" | "lambda",
        None => "none" : "None",
    }
}

crate::define_id_enum! {
    CicdId {
        GithubActions => "github-actions" : "GitHub Actions" | "github",
        GitlabCi => "gitlab-ci" : "GitLab CI" | "gitlab",
        CircleCi => "circleci" : "CircleCI",
        Jenkins => "jenkins" : "Jenkins",
        AzurePipelines => "azure-pipelines" : "Azure Pipelines" | "azure",
        None => "none" : "None",
    }
}

impl PackagingId {
    pub fn uses_container(&self) -> bool {
        matches!(
            self,
            PackagingId::Docker | PackagingId::DockerCompose | PackagingId::Kubernetes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cicd_names() {
        assert_eq!(CicdId::GithubActions.as_str(), "github-actions");
        assert_eq!(CicdId::from_name("gitlab"), Some(CicdId::GitlabCi));
    }

    #[test]
    fn test_packaging_container() {
        assert!(PackagingId::Kubernetes.uses_container());
        assert!(!PackagingId::Serverless.uses_container());
        assert!(!PackagingId::None.uses_container());
    }
}
