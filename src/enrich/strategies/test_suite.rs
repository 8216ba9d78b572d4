//! Extra test suite in the stack's testing framework.
//!
//! Cases are drawn from the enrichment RNG so different seeds get different
//! fixtures. Each suite is self-contained and does not import project code.

use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::stack::{LanguageId, TechStack, TestingId};
use crate::strategies::common::{module_name, pascal_case};
use anyhow::Result;
use async_trait::async_trait;

pub struct TestSuiteStrategy;

#[async_trait]
impl EnrichmentStrategy for TestSuiteStrategy {
    fn id(&self) -> &str {
        "tests"
    }

    fn name(&self) -> &str {
        "Test suite"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn matches(&self, _stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.tests
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let cases: Vec<Case> = (0..3)
            .map(|_| {
                let a = ctx.rng.int(1, 999);
                let b = ctx.rng.int(1, 999);
                Case { a, b, sum: a + b }
            })
            .collect();
        let (path, body) = suite(ctx.stack, ctx.project_name, &cases);
        ctx.write(path, body);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Case {
    a: i64,
    b: i64,
    sum: i64,
}

fn lines(cases: &[Case], f: impl Fn(&Case) -> String) -> String {
    cases.iter().map(f).collect::<Vec<_>>().join("\n")
}

fn suite(stack: &TechStack, project_name: &str, cases: &[Case]) -> (String, String) {
    let node_ext = if stack.language == LanguageId::TypeScript {
        "ts"
    } else {
        "js"
    };

    let (path, body) = match stack.testing {
        TestingId::Jest | TestingId::Vitest => {
            let header = if stack.testing == TestingId::Vitest {
                "import { describe, it, expect } from 'vitest';\n\n"
            } else {
                ""
            };
            let body = lines(cases, |c| {
                format!("  it('adds {} and {}', () => {{\n    expect(add({}, {})).toBe({});\n  }});", c.a, c.b, c.a, c.b, c.sum)
            });
            let signature = if node_ext == "ts" {
                "const add = (a: number, b: number): number => a + b;"
            } else {
                "const add = (a, b) => a + b;"
            };
            (
                format!("tests/arithmetic.test.{node_ext}"),
                format!("{header}{signature}\n\ndescribe('arithmetic', () => {{\n{body}\n}});\n"),
            )
        }
        TestingId::Mocha => {
            let body = lines(cases, |c| {
                format!("  it('adds {} and {}', () => {{\n    assert.equal({} + {}, {});\n  }});", c.a, c.b, c.a, c.b, c.sum)
            });
            (
                format!("test/arithmetic.spec.{node_ext}"),
                format!("import assert from 'node:assert/strict';\n\ndescribe('arithmetic', () => {{\n{body}\n}});\n"),
            )
        }
        TestingId::Pytest => {
            let params = lines(cases, |c| format!("        ({}, {}, {}),", c.a, c.b, c.sum));
            (
                "tests/test_arithmetic.py".into(),
                format!("import pytest\n\n\n@pytest.mark.parametrize(\n    \"a, b, expected\",\n    [\n{params}\n    ],\n)\ndef test_add(a, b, expected):\n    assert a + b == expected\n"),
            )
        }
        TestingId::Unittest => {
            let body = lines(cases, |c| format!("        self.assertEqual({} + {}, {})", c.a, c.b, c.sum));
            (
                "tests/test_arithmetic.py".into(),
                format!("import unittest\n\n\nclass ArithmeticTest(unittest.TestCase):\n    def test_add(self):\n{body}\n\n\nif __name__ == \"__main__\":\n    unittest.main()\n"),
            )
        }
        TestingId::CargoTest => {
            let body = lines(cases, |c| format!("    assert_eq!({} + {}, {});", c.a, c.b, c.sum));
            (
                "tests/arithmetic.rs".into(),
                format!("#[test]\nfn adds() {{\n{body}\n}}\n"),
            )
        }
        TestingId::GoTest => {
            let body = lines(cases, |c| format!("\t\t{{{}, {}, {}}},", c.a, c.b, c.sum));
            (
                "internal/arithmetic/arithmetic_test.go".into(),
                format!("package arithmetic\n\nimport \"testing\"\n\nfunc TestAdd(t *testing.T) {{\n\tcases := []struct{{ a, b, want int }}{{\n{body}\n\t}}\n\tfor _, c := range cases {{\n\t\tif got := c.a + c.b; got != c.want {{\n\t\t\tt.Fatalf(\"%d + %d = %d, want %d\", c.a, c.b, got, c.want)\n\t\t}}\n\t}}\n}}\n"),
            )
        }
        TestingId::Junit if stack.language == LanguageId::Kotlin => {
            let body = lines(cases, |c| format!("        assertEquals({}, {} + {})", c.sum, c.a, c.b));
            (
                "src/test/kotlin/ArithmeticTest.kt".into(),
                format!("import kotlin.test.Test\nimport kotlin.test.assertEquals\n\nclass ArithmeticTest {{\n    @Test\n    fun adds() {{\n{body}\n    }}\n}}\n"),
            )
        }
        TestingId::Junit => {
            let body = lines(cases, |c| format!("        assertEquals({}, {} + {});", c.sum, c.a, c.b));
            (
                "src/test/java/ArithmeticTest.java".into(),
                format!("import static org.junit.jupiter.api.Assertions.assertEquals;\n\nimport org.junit.jupiter.api.Test;\n\nclass ArithmeticTest {{\n    @Test\n    void adds() {{\n{body}\n    }}\n}}\n"),
            )
        }
        TestingId::Kotest => {
            let body = lines(cases, |c| format!("        ({} + {}) shouldBe {}", c.a, c.b, c.sum));
            (
                "src/test/kotlin/ArithmeticTest.kt".into(),
                format!("import io.kotest.core.spec.style.StringSpec\nimport io.kotest.matchers.shouldBe\n\nclass ArithmeticTest : StringSpec({{\n    \"adds\" {{\n{body}\n    }}\n}})\n"),
            )
        }
        TestingId::Xunit | TestingId::Nunit => {
            let assembly = pascal_case(project_name);
            let (attr, assert) = if stack.testing == TestingId::Xunit {
                ("[Fact]", "Assert.Equal")
            } else {
                ("[Test]", "Assert.AreEqual")
            };
            let body = lines(cases, |c| format!("        {assert}({}, {} + {});", c.sum, c.a, c.b));
            let using = if stack.testing == TestingId::Xunit {
                "using Xunit;"
            } else {
                "using NUnit.Framework;"
            };
            (
                format!("tests/{assembly}.Tests/ArithmeticTests.cs"),
                format!("{using}\n\nnamespace {assembly}.Tests;\n\npublic class ArithmeticTests\n{{\n    {attr}\n    public void Adds()\n    {{\n{body}\n    }}\n}}\n"),
            )
        }
        TestingId::Rspec => {
            let body = lines(cases, |c| format!("    expect({} + {}).to eq({})", c.a, c.b, c.sum));
            (
                "spec/arithmetic_spec.rb".into(),
                format!("RSpec.describe \"arithmetic\" do\n  it \"adds\" do\n{body}\n  end\nend\n"),
            )
        }
        TestingId::Minitest => {
            let body = lines(cases, |c| format!("    assert_equal {}, {} + {}", c.sum, c.a, c.b));
            (
                "test/arithmetic_test.rb".into(),
                format!("require \"minitest/autorun\"\n\nclass ArithmeticTest < Minitest::Test\n  def test_adds\n{body}\n  end\nend\n"),
            )
        }
        TestingId::Phpunit => {
            let body = lines(cases, |c| format!("        $this->assertSame({}, {} + {});", c.sum, c.a, c.b));
            (
                "tests/ArithmeticTest.php".into(),
                format!("<?php\n\nuse PHPUnit\\Framework\\TestCase;\n\nfinal class ArithmeticTest extends TestCase\n{{\n    public function testAdds(): void\n    {{\n{body}\n    }}\n}}\n"),
            )
        }
        TestingId::Pest => {
            let body = lines(cases, |c| format!("    expect({} + {})->toBe({});", c.a, c.b, c.sum));
            (
                "tests/ArithmeticTest.php".into(),
                format!("<?php\n\ntest('adds', function () {{\n{body}\n}});\n"),
            )
        }
        TestingId::ExUnit => {
            let module = pascal_case(project_name);
            let body = lines(cases, |c| format!("    assert {} + {} == {}", c.a, c.b, c.sum));
            (
                "test/arithmetic_test.exs".into(),
                format!("defmodule {module}.ArithmeticTest do\n  use ExUnit.Case, async: true\n\n  test \"adds\" do\n{body}\n  end\nend\n"),
            )
        }
        TestingId::XcTest => {
            let product = pascal_case(project_name);
            let body = lines(cases, |c| format!("        XCTAssertEqual({} + {}, {})", c.a, c.b, c.sum));
            (
                format!("Tests/{product}Tests/ArithmeticTests.swift"),
                format!("import XCTest\n\nfinal class ArithmeticTests: XCTestCase {{\n    func testAdds() {{\n{body}\n    }}\n}}\n"),
            )
        }
        TestingId::DartTest => {
            let import = if stack.framework == crate::stack::FrameworkId::Flutter {
                "package:flutter_test/flutter_test.dart"
            } else {
                "package:test/test.dart"
            };
            let body = lines(cases, |c| format!("    expect({} + {}, equals({}));", c.a, c.b, c.sum));
            (
                "test/arithmetic_test.dart".into(),
                format!("import '{import}';\n\nvoid main() {{\n  test('adds', () {{\n{body}\n  }});\n}}\n"),
            )
        }
        TestingId::GoogleTest => {
            let body = lines(cases, |c| format!("    EXPECT_EQ({} + {}, {});", c.a, c.b, c.sum));
            (
                "tests/arithmetic_test.cpp".into(),
                format!("#include <gtest/gtest.h>\n\nTEST(Arithmetic, Adds) {{\n{body}\n}}\n"),
            )
        }
        TestingId::Catch2 => {
            let body = lines(cases, |c| format!("    REQUIRE({} + {} == {});", c.a, c.b, c.sum));
            (
                "tests/arithmetic_test.cpp".into(),
                format!("#include <catch2/catch_test_macros.hpp>\n\nTEST_CASE(\"adds\", \"[arithmetic]\") {{\n{body}\n}}\n"),
            )
        }
    };
    (path, annotate(&body, project_name, stack.language))
}

/// Leading comment naming the project, in the language's comment syntax.
fn annotate(body: &str, project_name: &str, language: LanguageId) -> String {
    let marker = match language {
        LanguageId::Python | LanguageId::Ruby | LanguageId::Elixir => "#",
        LanguageId::Php => return body.to_string(),
        _ => "//",
    };
    format!("{marker} Generated tests for {}.\n{body}", module_name(project_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;
    use yare::parameterized;

    fn stack(language: LanguageId, testing: TestingId) -> TechStack {
        TechStack {
            archetype: ArchetypeId::Library,
            language,
            runtime: RuntimeId::Native,
            framework: FrameworkId::Stdlib,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::None,
            packaging: PackagingId::None,
            cicd: CicdId::None,
            build_tool: BuildToolId::Cargo,
            styling: StylingId::None,
            testing,
        }
    }

    const CASES: [Case; 1] = [Case { a: 2, b: 40, sum: 42 }];

    #[parameterized(
        vitest = { LanguageId::TypeScript, TestingId::Vitest, "tests/arithmetic.test.ts" },
        mocha = { LanguageId::JavaScript, TestingId::Mocha, "test/arithmetic.spec.js" },
        pytest = { LanguageId::Python, TestingId::Pytest, "tests/test_arithmetic.py" },
        cargo = { LanguageId::Rust, TestingId::CargoTest, "tests/arithmetic.rs" },
        go = { LanguageId::Go, TestingId::GoTest, "internal/arithmetic/arithmetic_test.go" },
        junit_kotlin = { LanguageId::Kotlin, TestingId::Junit, "src/test/kotlin/ArithmeticTest.kt" },
        xunit = { LanguageId::CSharp, TestingId::Xunit, "tests/CalmHeron.Tests/ArithmeticTests.cs" },
        xctest = { LanguageId::Swift, TestingId::XcTest, "Tests/CalmHeronTests/ArithmeticTests.swift" },
    )]
    fn test_suite_paths(language: LanguageId, testing: TestingId, path: &str) {
        let (actual, body) = suite(&stack(language, testing), "calm-heron", &CASES);
        assert_eq!(actual, path);
        assert!(body.contains("42"));
    }

    #[test]
    fn test_php_keeps_open_tag_first() {
        let (_, body) = suite(&stack(LanguageId::Php, TestingId::Pest), "calm-heron", &CASES);
        assert!(body.starts_with("<?php"));
    }

    #[test]
    fn test_comment_syntax() {
        let (_, body) = suite(&stack(LanguageId::Ruby, TestingId::Rspec), "calm-heron", &CASES);
        assert!(body.starts_with("# Generated tests for calm_heron."));
    }
}
