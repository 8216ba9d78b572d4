//! Swift, Dart and C++ projects.

use super::common::{module_name, pascal_case};
use crate::stack::{ArchetypeId, BuildToolId, FrameworkId, LanguageId, OrmId, TechStack, TestingId};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct SwiftStrategy;

#[async_trait]
impl GenerationStrategy for SwiftStrategy {
    fn id(&self) -> &str {
        "swift"
    }

    fn name(&self) -> &str {
        "Swift package"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Swift
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let product = pascal_case(ctx.project_name);

        ctx.write("Package.swift", package_swift(&product, &stack));
        let source = match stack.framework {
            FrameworkId::Vapor => format!(
                "import Vapor\n\n@main\nstruct Entry {{\n    static func main() async throws {{\n        let app = try await Application.make(.detect())\n        app.http.server.configuration.hostname = \"0.0.0.0\"\n        app.http.server.configuration.port = 8080\n        app.get(\"health\") {{ _ in [\"status\": \"ok\", \"service\": \"{}\"] }}\n        try await app.execute()\n        try await app.asyncShutdown()\n    }}\n}}\n",
                ctx.project_name
            ),
            FrameworkId::SwiftUi => format!(
                "import SwiftUI\n\n@main\nstruct {product}App: App {{\n    var body: some Scene {{\n        WindowGroup {{\n            Text(\"{}\")\n                .padding()\n        }}\n    }}\n}}\n",
                ctx.project_name
            ),
            _ if stack.archetype == ArchetypeId::Library => {
                "public enum Greeter {\n    public static func greet(_ who: String) -> String {\n        \"Hello, \\(who)!\"\n    }\n}\n".to_string()
            }
            _ => format!("print(\"Hello from {}!\")\n", ctx.project_name),
        };
        let file = if stack.archetype == ArchetypeId::Library {
            "Greeter.swift"
        } else if matches!(stack.framework, FrameworkId::Vapor | FrameworkId::SwiftUi) {
            "App.swift"
        } else {
            "main.swift"
        };
        ctx.write(format!("Sources/{product}/{file}"), source);
        ctx.write(
            format!("Tests/{product}Tests/{product}Tests.swift"),
            format!(
                "import XCTest\n\nfinal class {product}Tests: XCTestCase {{\n    func testArithmetic() {{\n        XCTAssertEqual(1 + 1, 2)\n    }}\n}}\n"
            ),
        );
        Ok(())
    }
}

fn package_swift(product: &str, stack: &TechStack) -> String {
    let mut package_deps = Vec::new();
    let mut target_deps = Vec::new();
    if stack.framework == FrameworkId::Vapor {
        package_deps.push(".package(url: \"https://github.com/vapor/vapor.git\", from: \"4.106.0\")");
        target_deps.push(".product(name: \"Vapor\", package: \"vapor\")");
    }
    if stack.orm == OrmId::Fluent {
        package_deps.push(".package(url: \"https://github.com/vapor/fluent.git\", from: \"4.12.0\")");
        target_deps.push(".product(name: \"Fluent\", package: \"fluent\")");
    }

    let platforms = match stack.framework {
        FrameworkId::SwiftUi => "\n    platforms: [.macOS(.v14), .iOS(.v17)],",
        FrameworkId::Vapor => "\n    platforms: [.macOS(.v13)],",
        _ => "",
    };
    let product_decl = if stack.archetype == ArchetypeId::Library {
        format!(".library(name: \"{product}\", targets: [\"{product}\"])")
    } else {
        format!(".executable(name: \"{product}\", targets: [\"{product}\"])")
    };
    let target_kind = if stack.archetype == ArchetypeId::Library {
        ".target"
    } else {
        ".executableTarget"
    };

    format!(
        "// swift-tools-version:5.10\nimport PackageDescription\n\nlet package = Package(\n    name: \"{product}\",{platforms}\n    products: [{product_decl}],\n    dependencies: [{}],\n    targets: [\n        {target_kind}(name: \"{product}\", dependencies: [{}]),\n        .testTarget(name: \"{product}Tests\", dependencies: [\"{product}\"]),\n    ]\n)\n",
        package_deps.join(", "),
        target_deps.join(", ")
    )
}

pub struct DartStrategy;

#[async_trait]
impl GenerationStrategy for DartStrategy {
    fn id(&self) -> &str {
        "dart"
    }

    fn name(&self) -> &str {
        "Dart package"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Dart
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let package = module_name(ctx.project_name);
        let flutter = stack.framework == FrameworkId::Flutter;

        ctx.write("pubspec.yaml", pubspec(&package, &stack));
        ctx.write(
            "analysis_options.yaml",
            if flutter {
                "include: package:flutter_lints/flutter.yaml\n"
            } else {
                "include: package:lints/recommended.yaml\n"
            },
        );

        if flutter {
            ctx.write(
                "lib/main.dart",
                format!(
                    "import 'package:flutter/material.dart';\n\nvoid main() => runApp(const App());\n\nclass App extends StatelessWidget {{\n  const App({{super.key}});\n\n  @override\n  Widget build(BuildContext context) {{\n    return const MaterialApp(\n      home: Scaffold(body: Center(child: Text('{}'))),\n    );\n  }}\n}}\n",
                    ctx.project_name
                ),
            );
            ctx.write(
                "test/widget_test.dart",
                format!(
                    "import 'package:flutter_test/flutter_test.dart';\nimport 'package:{package}/main.dart';\n\nvoid main() {{\n  testWidgets('renders title', (tester) async {{\n    await tester.pumpWidget(const App());\n    expect(find.text('{}'), findsOneWidget);\n  }});\n}}\n",
                    ctx.project_name
                ),
            );
        } else {
            ctx.write(
                format!("lib/{package}.dart"),
                "String greet(String who) => 'Hello, $who!';\n",
            );
            if stack.archetype != ArchetypeId::Library {
                ctx.write(
                    "bin/main.dart",
                    format!(
                        "import 'package:{package}/{package}.dart';\n\nvoid main(List<String> args) {{\n  print(greet(args.isEmpty ? 'world' : args.first));\n}}\n"
                    ),
                );
            }
            ctx.write(
                format!("test/{package}_test.dart"),
                format!(
                    "import 'package:test/test.dart';\nimport 'package:{package}/{package}.dart';\n\nvoid main() {{\n  test('greet', () {{\n    expect(greet('world'), 'Hello, world!');\n  }});\n}}\n"
                ),
            );
        }
        Ok(())
    }
}

fn pubspec(package: &str, stack: &TechStack) -> String {
    let flutter = stack.framework == FrameworkId::Flutter;
    let mut out = format!(
        "name: {package}\ndescription: Generated {} project.\nversion: 0.1.0\npublish_to: none\n\nenvironment:\n  sdk: \">=3.5.0 <4.0.0\"\n\ndependencies:\n",
        stack.archetype.as_str()
    );
    if flutter {
        out.push_str("  flutter:\n    sdk: flutter\n");
    }
    if stack.orm == OrmId::Drift {
        out.push_str("  drift: ^2.21.0\n");
    }
    if !flutter && stack.orm != OrmId::Drift {
        out.push_str("  path: ^1.9.0\n");
    }
    out.push_str("\ndev_dependencies:\n");
    if flutter {
        out.push_str("  flutter_test:\n    sdk: flutter\n  flutter_lints: ^4.0.0\n");
    } else {
        out.push_str("  lints: ^4.0.0\n  test: ^1.25.0\n");
    }
    if flutter {
        out.push_str("\nflutter:\n  uses-material-design: true\n");
    }
    out
}

pub struct CppStrategy;

#[async_trait]
impl GenerationStrategy for CppStrategy {
    fn id(&self) -> &str {
        "cpp"
    }

    fn name(&self) -> &str {
        "C++ project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Cpp
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let name = ctx.project_name;

        match stack.build_tool {
            BuildToolId::Meson => ctx.write("meson.build", meson_build(name, &stack)),
            _ => ctx.write("CMakeLists.txt", cmake_lists(name, &stack)),
        }

        ctx.write(
            "src/greet.hpp",
            "#pragma once\n\n#include <string>\n\nstd::string greet(const std::string& who);\n",
        );
        ctx.write(
            "src/greet.cpp",
            "#include \"greet.hpp\"\n\nstd::string greet(const std::string& who) {\n    return \"Hello, \" + who + \"!\";\n}\n",
        );
        let main = if stack.framework == FrameworkId::Raylib {
            format!(
                "#include \"raylib.h\"\n\nint main() {{\n    InitWindow(800, 450, \"{name}\");\n    SetTargetFPS(60);\n    while (!WindowShouldClose()) {{\n        BeginDrawing();\n        ClearBackground(RAYWHITE);\n        DrawText(\"{name}\", 190, 200, 20, DARKGRAY);\n        EndDrawing();\n    }}\n    CloseWindow();\n    return 0;\n}}\n"
            )
        } else {
            "#include <iostream>\n\n#include \"greet.hpp\"\n\nint main(int argc, char** argv) {\n    std::cout << greet(argc > 1 ? argv[1] : \"world\") << std::endl;\n    return 0;\n}\n".to_string()
        };
        if stack.archetype != ArchetypeId::Library {
            ctx.write("src/main.cpp", main);
        }

        let test = match stack.testing {
            TestingId::Catch2 => "#include <catch2/catch_test_macros.hpp>\n\n#include \"greet.hpp\"\n\nTEST_CASE(\"greet\") {\n    REQUIRE(greet(\"world\") == \"Hello, world!\");\n}\n",
            _ => "#include <gtest/gtest.h>\n\n#include \"greet.hpp\"\n\nTEST(Greet, World) {\n    EXPECT_EQ(greet(\"world\"), \"Hello, world!\");\n}\n",
        };
        ctx.write("tests/greet_test.cpp", test);
        Ok(())
    }
}

fn cmake_lists(name: &str, stack: &TechStack) -> String {
    let mut out = format!(
        "cmake_minimum_required(VERSION 3.24)\nproject({name} LANGUAGES CXX)\n\nset(CMAKE_CXX_STANDARD 20)\nset(CMAKE_CXX_STANDARD_REQUIRED ON)\n\ninclude(FetchContent)\n\nadd_library({name}_core src/greet.cpp)\ntarget_include_directories({name}_core PUBLIC src)\n"
    );
    if stack.framework == FrameworkId::Raylib {
        out.push_str("\nFetchContent_Declare(raylib GIT_REPOSITORY https://github.com/raysan5/raylib.git GIT_TAG 5.0)\nFetchContent_MakeAvailable(raylib)\n");
    }
    if stack.archetype != ArchetypeId::Library {
        out.push_str(&format!(
            "\nadd_executable({name} src/main.cpp)\ntarget_link_libraries({name} PRIVATE {name}_core"
        ));
        if stack.framework == FrameworkId::Raylib {
            out.push_str(" raylib");
        }
        out.push_str(")\n");
    }

    let (fetch, target) = match stack.testing {
        TestingId::Catch2 => (
            "FetchContent_Declare(Catch2 GIT_REPOSITORY https://github.com/catchorg/Catch2.git GIT_TAG v3.7.1)\nFetchContent_MakeAvailable(Catch2)\n",
            "Catch2::Catch2WithMain",
        ),
        _ => (
            "FetchContent_Declare(googletest GIT_REPOSITORY https://github.com/google/googletest.git GIT_TAG v1.15.2)\nFetchContent_MakeAvailable(googletest)\n",
            "GTest::gtest_main",
        ),
    };
    out.push_str(&format!(
        "\nenable_testing()\n{fetch}add_executable({name}_tests tests/greet_test.cpp)\ntarget_link_libraries({name}_tests PRIVATE {name}_core {target})\nadd_test(NAME {name}_tests COMMAND {name}_tests)\n"
    ));
    out
}

fn meson_build(name: &str, stack: &TechStack) -> String {
    let mut out = format!(
        "project('{name}', 'cpp', version : '0.1.0', default_options : ['cpp_std=c++20'])\n\ncore = static_library('{name}_core', 'src/greet.cpp')\n"
    );
    if stack.archetype != ArchetypeId::Library {
        let extra = if stack.framework == FrameworkId::Raylib {
            ", dependencies : dependency('raylib')"
        } else {
            ""
        };
        out.push_str(&format!(
            "executable('{name}', 'src/main.cpp', link_with : core{extra})\n"
        ));
    }
    let test_dep = match stack.testing {
        TestingId::Catch2 => "dependency('catch2-with-main')",
        _ => "dependency('gtest', main : true)",
    };
    out.push_str(&format!(
        "\ntests = executable('{name}_tests', 'tests/greet_test.cpp', include_directories : include_directories('src'), link_with : core, dependencies : {test_dep})\ntest('{name}_tests', tests)\n"
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn stack(language: LanguageId, framework: FrameworkId, build_tool: BuildToolId) -> TechStack {
        TechStack {
            archetype: ArchetypeId::Cli,
            language,
            runtime: RuntimeId::Native,
            framework,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::None,
            packaging: PackagingId::None,
            cicd: CicdId::GithubActions,
            build_tool,
            styling: StylingId::None,
            testing: TestingId::GoogleTest,
        }
    }

    #[test]
    fn test_cmake_declares_executable_and_tests() {
        let cmake = cmake_lists("calm-heron", &stack(LanguageId::Cpp, FrameworkId::Stdlib, BuildToolId::CMake));
        assert!(cmake.contains("add_executable(calm-heron src/main.cpp)"));
        assert!(cmake.contains("GTest::gtest_main"));
    }

    #[test]
    fn test_pubspec_is_yaml() {
        let mut s = stack(LanguageId::Dart, FrameworkId::Flutter, BuildToolId::Pub);
        s.archetype = ArchetypeId::Mobile;
        s.runtime = RuntimeId::DartVm;
        s.testing = TestingId::DartTest;
        let parsed: serde_yaml::Value = serde_yaml::from_str(&pubspec("calm_heron", &s)).unwrap();
        assert_eq!(parsed["name"].as_str(), Some("calm_heron"));
        assert_eq!(parsed["dependencies"]["flutter"]["sdk"].as_str(), Some("flutter"));
    }

    #[test]
    fn test_package_swift_library_product() {
        let mut s = stack(LanguageId::Swift, FrameworkId::Stdlib, BuildToolId::SwiftPm);
        s.archetype = ArchetypeId::Library;
        let manifest = package_swift("CalmHeron", &s);
        assert!(manifest.contains(".library(name: \"CalmHeron\""));
        assert!(manifest.contains(".target(name: \"CalmHeron\""));
    }
}
