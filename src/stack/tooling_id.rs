crate::define_id_enum! {
    BuildToolId {
        Npm => "npm" : "npm",
        Pnpm => "pnpm" : "pnpm",
        Yarn => "yarn" : "Yarn",
        Bun => "bun" : "Bun",
        Deno => "deno" : "Deno",
        Pip => "pip" : "pip",
        Poetry => "poetry" : "Poetry",
        Uv => "uv" : "uv",
        Cargo => "cargo" : "Cargo",
        GoModules => "go-modules" : "Go Modules" | "gomod" | "go-mod",
        Maven => "maven" : "Maven" | "mvn",
        Gradle => "gradle" : "Gradle",
        DotnetCli => "dotnet-cli" : ".NET CLI" | "dotnet",
        Bundler => "bundler" : "Bundler",
        Composer => "composer" : "Composer",
        Mix => "mix" : "Mix",
        SwiftPm => "swift-pm" : "Swift Package Manager" | "spm",
        Pub => "pub" : "pub",
        CMake => "cmake" : "CMake",
        Meson => "meson" : "Meson",
    }
}

crate::define_id_enum! {
    StylingId {
        Tailwind => "tailwind" : "Tailwind CSS" | "tailwindcss",
        CssModules => "css-modules" : "CSS Modules",
        StyledComponents => "styled-components" : "styled-components",
        Sass => "sass" : "Sass" | "scss",
        None => "none" : "None",
    }
}

crate::define_id_enum! {
    TestingId {
        Jest => "jest" : "Jest",
        Vitest => "vitest" : "Vitest",
        Mocha => "mocha" : "Mocha",
        Pytest => "pytest" : "pytest",
        Unittest => "unittest" : "unittest",
        CargoTest => "cargo-test" : "cargo test",
        GoTest => "go-test" : "go test",
        Junit => "junit" : "JUnit",
        Kotest => "kotest" : "Kotest",
        Xunit => "xunit" : "xUnit",
        Nunit => "nunit" : "NUnit",
        Rspec => "rspec" : "RSpec",
        Minitest => "minitest" : "Minitest",
        Phpunit => "phpunit" : "PHPUnit",
        Pest => "pest" : "Pest",
        ExUnit => "exunit" : "ExUnit",
        XcTest => "xctest" : "XCTest",
        DartTest => "dart-test" : "package:test" | "flutter-test",
        GoogleTest => "gtest" : "GoogleTest" | "googletest",
        Catch2 => "catch2" : "Catch2",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tool_aliases() {
        assert_eq!(BuildToolId::from_name("gomod"), Some(BuildToolId::GoModules));
        assert_eq!(BuildToolId::from_name("mvn"), Some(BuildToolId::Maven));
    }

    #[test]
    fn test_testing_serialization() {
        assert_eq!(
            serde_json::to_string(&TestingId::CargoTest).unwrap(),
            "\"cargo-test\""
        );
    }

    #[test]
    fn test_styling_all_variants() {
        assert_eq!(StylingId::all_variants().len(), 5);
        assert!(StylingId::all_variants().contains(&StylingId::None));
    }
}
