crate::define_id_enum! {
    LanguageId {
        TypeScript => "typescript" : "TypeScript" | "ts",
        JavaScript => "javascript" : "JavaScript" | "js" | "node",
        Python => "python" : "Python" | "py",
        Rust => "rust" : "Rust" | "rs",
        Go => "go" : "Go" | "golang",
        Java => "java" : "Java",
        Kotlin => "kotlin" : "Kotlin" | "kt",
        CSharp => "csharp" : "C#" | "c#" | "dotnet",
        Ruby => "ruby" : "Ruby" | "rb",
        Php => "php" : "PHP",
        Elixir => "elixir" : "Elixir" | "ex",
        Swift => "swift" : "Swift",
        Dart => "dart" : "Dart",
        Cpp => "cpp" : "C++" | "c++" | "cxx",
    }
}

impl LanguageId {
    /// Source file extensions, most characteristic first.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageId::TypeScript => &["ts", "tsx", "mts"],
            LanguageId::JavaScript => &["js", "jsx", "mjs", "cjs"],
            LanguageId::Python => &["py"],
            LanguageId::Rust => &["rs"],
            LanguageId::Go => &["go"],
            LanguageId::Java => &["java"],
            LanguageId::Kotlin => &["kt", "kts"],
            LanguageId::CSharp => &["cs"],
            LanguageId::Ruby => &["rb"],
            LanguageId::Php => &["php"],
            LanguageId::Elixir => &["ex", "exs"],
            LanguageId::Swift => &["swift"],
            LanguageId::Dart => &["dart"],
            LanguageId::Cpp => &["cpp", "cc", "cxx", "hpp", "h"],
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, LanguageId::TypeScript | LanguageId::JavaScript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_id_serialization() {
        assert_eq!(
            serde_json::to_string(&LanguageId::CSharp).unwrap(),
            "\"csharp\""
        );
        assert_eq!(serde_json::to_string(&LanguageId::Cpp).unwrap(), "\"cpp\"");
    }

    #[test]
    fn test_language_id_name() {
        assert_eq!(LanguageId::CSharp.name(), "C#");
        assert_eq!(LanguageId::TypeScript.name(), "TypeScript");
    }

    #[test]
    fn test_from_name_with_aliases() {
        assert_eq!(LanguageId::from_name("golang"), Some(LanguageId::Go));
        assert_eq!(LanguageId::from_name("TS"), Some(LanguageId::TypeScript));
        assert_eq!(LanguageId::from_name("c++"), Some(LanguageId::Cpp));
        assert_eq!(LanguageId::from_name("cobol"), None);
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(LanguageId::Rust.to_string(), "rust");
        assert_eq!("Kotlin".parse::<LanguageId>(), Ok(LanguageId::Kotlin));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(LanguageId::Rust.extensions(), &["rs"]);
        assert!(LanguageId::TypeScript.extensions().contains(&"tsx"));
    }
}
