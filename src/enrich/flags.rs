use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much Pass 2 adds. Each depth is a superset of the one before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichDepth {
    Minimal,
    #[default]
    Standard,
    Full,
}

impl EnrichDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichDepth::Minimal => "minimal",
            EnrichDepth::Standard => "standard",
            EnrichDepth::Full => "full",
        }
    }
}

impl fmt::Display for EnrichDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrichDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" | "min" => Ok(EnrichDepth::Minimal),
            "standard" | "std" => Ok(EnrichDepth::Standard),
            "full" | "max" => Ok(EnrichDepth::Full),
            other => Err(format!(
                "unknown enrichment depth '{other}', expected minimal, standard or full"
            )),
        }
    }
}

/// One toggle of [`EnrichmentFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnrichmentFlag {
    Cicd,
    Release,
    FillLogic,
    Tests,
    DockerProd,
    Linting,
    EnvFiles,
    Docs,
}

impl EnrichmentFlag {
    pub const ALL: [EnrichmentFlag; 8] = [
        EnrichmentFlag::Cicd,
        EnrichmentFlag::Release,
        EnrichmentFlag::FillLogic,
        EnrichmentFlag::Tests,
        EnrichmentFlag::DockerProd,
        EnrichmentFlag::Linting,
        EnrichmentFlag::EnvFiles,
        EnrichmentFlag::Docs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentFlag::Cicd => "cicd",
            EnrichmentFlag::Release => "release",
            EnrichmentFlag::FillLogic => "fillLogic",
            EnrichmentFlag::Tests => "tests",
            EnrichmentFlag::DockerProd => "dockerProd",
            EnrichmentFlag::Linting => "linting",
            EnrichmentFlag::EnvFiles => "envFiles",
            EnrichmentFlag::Docs => "docs",
        }
    }

    /// Accepts camelCase and kebab-case spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace(['-', '_'], "").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str().to_lowercase() == normalized)
    }
}

impl fmt::Display for EnrichmentFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which enrichment concerns run in Pass 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichmentFlags {
    pub cicd: bool,
    pub release: bool,
    pub fill_logic: bool,
    pub tests: bool,
    pub docker_prod: bool,
    pub linting: bool,
    pub env_files: bool,
    pub docs: bool,
}

impl EnrichmentFlags {
    /// Every flag off.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_depth(depth: EnrichDepth) -> Self {
        let mut flags = Self::none();
        for flag in Self::preset(depth) {
            flags.set(*flag, true);
        }
        flags
    }

    /// Flags a depth turns on.
    pub fn preset(depth: EnrichDepth) -> &'static [EnrichmentFlag] {
        use EnrichmentFlag::*;
        match depth {
            EnrichDepth::Minimal => &[Cicd, Linting, EnvFiles],
            EnrichDepth::Standard => &[Cicd, Linting, EnvFiles, Tests, DockerProd, Docs],
            EnrichDepth::Full => &EnrichmentFlag::ALL,
        }
    }

    /// Depth preset with per-flag overrides applied in order.
    pub fn with_overrides(depth: EnrichDepth, overrides: &[(EnrichmentFlag, bool)]) -> Self {
        let mut flags = Self::from_depth(depth);
        for (flag, on) in overrides {
            flags.set(*flag, *on);
        }
        flags
    }

    pub fn only(flag: EnrichmentFlag) -> Self {
        let mut flags = Self::none();
        flags.set(flag, true);
        flags
    }

    pub fn set(&mut self, flag: EnrichmentFlag, on: bool) {
        *self.slot(flag) = on;
    }

    pub fn is_set(&self, flag: EnrichmentFlag) -> bool {
        match flag {
            EnrichmentFlag::Cicd => self.cicd,
            EnrichmentFlag::Release => self.release,
            EnrichmentFlag::FillLogic => self.fill_logic,
            EnrichmentFlag::Tests => self.tests,
            EnrichmentFlag::DockerProd => self.docker_prod,
            EnrichmentFlag::Linting => self.linting,
            EnrichmentFlag::EnvFiles => self.env_files,
            EnrichmentFlag::Docs => self.docs,
        }
    }

    pub fn enabled(&self) -> Vec<EnrichmentFlag> {
        EnrichmentFlag::ALL
            .into_iter()
            .filter(|flag| self.is_set(*flag))
            .collect()
    }

    fn slot(&mut self, flag: EnrichmentFlag) -> &mut bool {
        match flag {
            EnrichmentFlag::Cicd => &mut self.cicd,
            EnrichmentFlag::Release => &mut self.release,
            EnrichmentFlag::FillLogic => &mut self.fill_logic,
            EnrichmentFlag::Tests => &mut self.tests,
            EnrichmentFlag::DockerProd => &mut self.docker_prod,
            EnrichmentFlag::Linting => &mut self.linting,
            EnrichmentFlag::EnvFiles => &mut self.env_files,
            EnrichmentFlag::Docs => &mut self.docs,
        }
    }
}

impl From<EnrichDepth> for EnrichmentFlags {
    fn from(depth: EnrichDepth) -> Self {
        Self::from_depth(depth)
    }
}

impl fmt::Display for EnrichmentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.enabled().iter().map(|flag| flag.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        minimal = { EnrichDepth::Minimal, 3 },
        standard = { EnrichDepth::Standard, 6 },
        full = { EnrichDepth::Full, 8 },
    )]
    fn test_depth_presets(depth: EnrichDepth, enabled: usize) {
        assert_eq!(EnrichmentFlags::from_depth(depth).enabled().len(), enabled);
    }

    #[test]
    fn test_presets_are_nested() {
        let minimal = EnrichmentFlags::from_depth(EnrichDepth::Minimal).enabled();
        let standard = EnrichmentFlags::from_depth(EnrichDepth::Standard).enabled();
        let full = EnrichmentFlags::from_depth(EnrichDepth::Full).enabled();
        assert!(minimal.iter().all(|f| standard.contains(f)));
        assert!(standard.iter().all(|f| full.contains(f)));
    }

    #[test]
    fn test_overrides_win_over_preset() {
        let flags = EnrichmentFlags::with_overrides(
            EnrichDepth::Minimal,
            &[(EnrichmentFlag::Linting, false), (EnrichmentFlag::Docs, true)],
        );
        assert!(flags.cicd);
        assert!(!flags.linting);
        assert!(flags.docs);
        assert_eq!(flags.to_string(), "[cicd, envFiles, docs]");
    }

    #[test]
    fn test_flag_names() {
        assert_eq!(EnrichmentFlag::from_name("fill-logic"), Some(EnrichmentFlag::FillLogic));
        assert_eq!(EnrichmentFlag::from_name("dockerProd"), Some(EnrichmentFlag::DockerProd));
        assert_eq!(EnrichmentFlag::from_name("env_files"), Some(EnrichmentFlag::EnvFiles));
        assert_eq!(EnrichmentFlag::from_name("lint-all"), None);
    }

    #[test]
    fn test_depth_parse_and_serde() {
        assert_eq!("FULL".parse::<EnrichDepth>(), Ok(EnrichDepth::Full));
        assert!("deep".parse::<EnrichDepth>().is_err());
        let json = serde_json::to_string(&EnrichmentFlags::only(EnrichmentFlag::FillLogic)).unwrap();
        assert!(json.contains("\"fillLogic\":true"));
        assert!(json.contains("\"cicd\":false"));
    }
}
