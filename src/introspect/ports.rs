//! Listening-port discovery across Dockerfiles, env files, compose files and
//! source code.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortInfo {
    pub port: u16,
    pub source: PortSource,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortSource {
    Dockerfile,
    EnvFile,
    ComposeFile,
    /// A listen call or port setting in source or config, named by pattern.
    CodePattern(String),
}

impl std::fmt::Display for PortSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSource::Dockerfile => f.write_str("Dockerfile"),
            PortSource::EnvFile => f.write_str("env file"),
            PortSource::ComposeFile => f.write_str("compose file"),
            PortSource::CodePattern(pattern) => write!(f, "code: {pattern}"),
        }
    }
}

/// Parses `EXPOSE` directives. Every port on the line counts.
pub fn parse_expose(content: &str, seen: &mut HashSet<u16>) -> Vec<PortInfo> {
    let mut ports = Vec::new();
    let Ok(expose_re) = Regex::new(r"(?mi)^\s*EXPOSE\s+(.+)$") else {
        return ports;
    };

    for cap in expose_re.captures_iter(content) {
        let Some(args) = cap.get(1) else { continue };
        for token in args.as_str().split_whitespace() {
            let number = token.split('/').next().unwrap_or(token);
            if let Ok(port) = number.parse::<u16>() {
                if seen.insert(port) {
                    ports.push(PortInfo {
                        port,
                        source: PortSource::Dockerfile,
                        confidence: 1.0,
                    });
                }
            }
        }
    }

    ports
}

/// `PORT=8080` style assignments in dotenv files.
pub fn parse_env_ports(content: &str, seen: &mut HashSet<u16>) -> Vec<PortInfo> {
    let mut ports = Vec::new();
    let Ok(env_re) = Regex::new(r"(?m)^\s*(?:export\s+)?[A-Z_]*PORT\s*=\s*(\d{2,5})\s*$") else {
        return ports;
    };

    for cap in env_re.captures_iter(content) {
        if let Some(port) = cap.get(1).and_then(|m| m.as_str().parse::<u16>().ok()) {
            if seen.insert(port) {
                ports.push(PortInfo {
                    port,
                    source: PortSource::EnvFile,
                    confidence: 0.9,
                });
            }
        }
    }

    ports
}

/// Container-side ports from compose `ports:` mappings (`"8080:3000"` -> 3000).
pub fn parse_compose_ports(content: &str, seen: &mut HashSet<u16>) -> Vec<PortInfo> {
    let mut ports = Vec::new();
    let Ok(doc) = serde_yaml::from_str::<serde_yaml::Value>(content) else {
        return ports;
    };
    let Some(services) = doc.get("services").and_then(|s| s.as_mapping()) else {
        return ports;
    };

    for service in services.values() {
        let Some(mappings) = service.get("ports").and_then(|p| p.as_sequence()) else {
            continue;
        };
        for mapping in mappings {
            let text = match mapping {
                serde_yaml::Value::String(s) => s.clone(),
                serde_yaml::Value::Number(n) => n.to_string(),
                _ => continue,
            };
            let container = text.rsplit(':').next().unwrap_or(&text);
            let container = container.split('/').next().unwrap_or(container);
            if let Ok(port) = container.parse::<u16>() {
                if seen.insert(port) {
                    ports.push(PortInfo {
                        port,
                        source: PortSource::ComposeFile,
                        confidence: 0.9,
                    });
                }
            }
        }
    }

    ports
}

/// Listen patterns shared by every ecosystem; group 1 is the port.
pub const LISTEN_PATTERNS: &[(&str, &str)] = &[
    (r"\.listen\(\s*(\d{4,5})", "listen()"),
    (r"\blisten\(\s*\{[^}]*port:\s*(\d{4,5})", "listen({ port })"),
    (r"PORT\s*(?:\|\||\?\?|or)\s*(\d{4,5})", "PORT fallback"),
    (r#"getenv\(\s*["']PORT["']\s*,\s*["']?(\d{4,5})"#, "getenv(PORT)"),
    (r"\bport\s*=\s*(\d{4,5})", "port="),
    (r"--port[ =](\d{4,5})", "--port"),
    (r#"["'](?:0\.0\.0\.0|127\.0\.0\.1|localhost)?:(\d{4,5})["']"#, "address literal"),
    (r"\.bind\([^,)]*:(\d{4,5})", "bind()"),
    (r"server\.port\s*[=:]\s*(\d{4,5})", "server.port"),
    (r"http://(?:\*|\+|0\.0\.0\.0|localhost):(\d{4,5})", "url binding"),
    (r"port:\s*(\d{4,5})", "port:"),
];

/// Scans source or config content with [`LISTEN_PATTERNS`]. Privileged
/// ports are ignored here since they are usually documentation noise.
pub fn parse_listen_patterns(content: &str, seen: &mut HashSet<u16>) -> Vec<PortInfo> {
    let mut ports = Vec::new();

    for (pattern, pattern_name) in LISTEN_PATTERNS {
        let re = match Regex::new(pattern) {
            Ok(r) => r,
            Err(_) => continue,
        };

        for cap in re.captures_iter(content) {
            if let Some(port) = cap.get(1).and_then(|m| m.as_str().parse::<u16>().ok()) {
                if port >= 1024 && seen.insert(port) {
                    ports.push(PortInfo {
                        port,
                        source: PortSource::CodePattern(pattern_name.to_string()),
                        confidence: 0.8,
                    });
                }
            }
        }
    }

    ports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expose() {
        let mut seen = HashSet::new();
        let ports = parse_expose(
            "FROM node:20\nEXPOSE 3000\nEXPOSE 8080/tcp 9090\nCMD [\"node\", \"server.js\"]\n",
            &mut seen,
        );
        let numbers: Vec<u16> = ports.iter().map(|p| p.port).collect();
        assert_eq!(numbers, vec![3000, 8080, 9090]);
        assert!(ports.iter().all(|p| p.source == PortSource::Dockerfile));
    }

    #[test]
    fn test_env_ports() {
        let mut seen = HashSet::new();
        let ports = parse_env_ports(
            "DATABASE_URL=postgres://localhost:5432\nPORT=8080\nSERVER_PORT=3000\n",
            &mut seen,
        );
        assert_eq!(ports.len(), 2);
        assert!(ports.iter().any(|p| p.port == 8080));
        assert!(ports.iter().any(|p| p.port == 3000));
    }

    #[test]
    fn test_compose_container_side() {
        let mut seen = HashSet::new();
        let ports = parse_compose_ports(
            "services:\n  app:\n    ports:\n      - \"8081:3000\"\n  db:\n    image: postgres\n",
            &mut seen,
        );
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, 3000);
    }

    #[test]
    fn test_listen_patterns() {
        let mut seen = HashSet::new();
        let ports = parse_listen_patterns(
            "const port = Number(process.env.PORT || 3000);\napp.listen(port);\n",
            &mut seen,
        );
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, 3000);

        let ports = parse_listen_patterns(
            "let listener = TcpListener::bind(\"0.0.0.0:8080\").await?;\n",
            &mut seen,
        );
        assert_eq!(ports[0].port, 8080);
    }

    #[test]
    fn test_privileged_ports_skipped_in_code() {
        let mut seen = HashSet::new();
        assert!(parse_listen_patterns("app.listen(80)", &mut seen).is_empty());
        assert_eq!(parse_expose("EXPOSE 80\n", &mut seen).len(), 1);
    }
}
