crate::define_id_enum! {
    RuntimeId {
        Node => "node" : "Node.js" | "nodejs",
        Bun => "bun" : "Bun",
        Deno => "deno" : "Deno",
        CPython => "cpython" : "CPython" | "python",
        Jvm => "jvm" : "JVM" | "java",
        DotNet => "dotnet" : ".NET" | "clr",
        Go => "go" : "Go Runtime" | "golang",
        Native => "native" : "Native" | "llvm",
        Ruby => "ruby" : "Ruby (MRI)" | "mri" | "cruby",
        Php => "php" : "PHP-FPM" | "php-fpm",
        Beam => "beam" : "BEAM" | "erlang",
        DartVm => "dart-vm" : "Dart VM" | "dart",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_serialization() {
        assert_eq!(serde_json::to_string(&RuntimeId::DartVm).unwrap(), "\"dart-vm\"");
        let parsed: RuntimeId = serde_json::from_str("\"beam\"").unwrap();
        assert_eq!(parsed, RuntimeId::Beam);
    }

    #[test]
    fn test_from_name_with_aliases() {
        assert_eq!(RuntimeId::from_name("JVM"), Some(RuntimeId::Jvm));
        assert_eq!(RuntimeId::from_name("java"), Some(RuntimeId::Jvm));
        assert_eq!(RuntimeId::from_name(".NET"), Some(RuntimeId::DotNet));
        assert_eq!(RuntimeId::from_name("nodejs"), Some(RuntimeId::Node));
        assert_eq!(RuntimeId::from_name("unknown"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", RuntimeId::Jvm), "jvm");
        assert_eq!(RuntimeId::DotNet.name(), ".NET");
    }
}
