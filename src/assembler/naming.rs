//! Reproducible project slugs.

use crate::rng::SeededRng;

const ADJECTIVES: &[&str] = &[
    "amber", "bold", "brave", "bright", "calm", "clever", "cosmic", "crisp", "daring", "eager",
    "fluent", "gentle", "golden", "hidden", "humble", "keen", "lively", "lucky", "mellow",
    "misty", "nimble", "noble", "quiet", "rapid", "rustic", "silent", "solar", "steady", "swift",
    "tidy", "vivid", "witty",
];

const NOUNS: &[&str] = &[
    "badger", "beacon", "canyon", "comet", "falcon", "fjord", "forest", "harbor", "heron",
    "island", "lantern", "meadow", "nebula", "orchid", "otter", "pine", "quartz", "raven",
    "reef", "river", "sparrow", "summit", "thicket", "tundra", "valley", "willow", "wren",
    "zephyr",
];

const SUFFIX_LEN: usize = 4;

/// `adjective-noun-xxxx`, drawn from `rng`.
pub fn project_name(rng: &mut SeededRng) -> String {
    let adjective = rng.pick(ADJECTIVES).copied().unwrap_or("fresh");
    let noun = rng.pick(NOUNS).copied().unwrap_or("project");
    format!("{adjective}-{noun}-{}", rng.string(SUFFIX_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_name_shape() {
        let pattern = Regex::new(r"^[a-z]+-[a-z]+-[a-z0-9]{4}$").unwrap();
        for seed in 0..50 {
            let name = project_name(&mut SeededRng::new(seed));
            assert!(pattern.is_match(&name), "{name}");
        }
    }

    #[test]
    fn test_name_is_reproducible() {
        assert_eq!(
            project_name(&mut SeededRng::new(99)),
            project_name(&mut SeededRng::new(99))
        );
    }
}
