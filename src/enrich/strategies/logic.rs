//! Domain logic filler: one entity type with validation, in the project's
//! language. The entity and its limits are drawn from the enrichment RNG.

use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::stack::{LanguageId, TechStack};
use crate::strategies::common::{module_name, pascal_case};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Int,
    Bool,
}

#[derive(Debug, Clone, Copy)]
struct EntityShape {
    name: &'static str,
    fields: &'static [(&'static str, FieldKind)],
}

use FieldKind::{Bool, Int, Text};

const ENTITIES: &[EntityShape] = &[
    EntityShape { name: "invoice", fields: &[("number", Text), ("amount_cents", Int), ("paid", Bool)] },
    EntityShape { name: "booking", fields: &[("guest_name", Text), ("nights", Int), ("confirmed", Bool)] },
    EntityShape { name: "shipment", fields: &[("tracking_code", Text), ("weight_grams", Int), ("delivered", Bool)] },
    EntityShape { name: "ticket", fields: &[("title", Text), ("priority", Int), ("resolved", Bool)] },
    EntityShape { name: "recipe", fields: &[("title", Text), ("servings", Int), ("vegetarian", Bool)] },
    EntityShape { name: "subscription", fields: &[("plan", Text), ("seats", Int), ("active", Bool)] },
    EntityShape { name: "review", fields: &[("author", Text), ("rating", Int), ("verified", Bool)] },
    EntityShape { name: "task", fields: &[("summary", Text), ("estimate_hours", Int), ("done", Bool)] },
];

/// Entity plus the drawn upper bound for its integer field.
#[derive(Debug, Clone, Copy)]
struct Entity {
    shape: EntityShape,
    max: i64,
}

impl Entity {
    fn snake(&self) -> &'static str {
        self.shape.name
    }

    fn pascal(&self) -> String {
        pascal_case(self.shape.name)
    }

    fn text_field(&self) -> &'static str {
        self.field(Text)
    }

    fn int_field(&self) -> &'static str {
        self.field(Int)
    }

    fn field(&self, kind: FieldKind) -> &'static str {
        self.shape
            .fields
            .iter()
            .find(|(_, k)| *k == kind)
            .map_or("value", |(name, _)| *name)
    }
}

fn camel(snake: &str) -> String {
    let pascal = pascal_case(snake);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub struct DomainLogicStrategy;

#[async_trait]
impl EnrichmentStrategy for DomainLogicStrategy {
    fn id(&self) -> &str {
        "logic"
    }

    fn name(&self) -> &str {
        "Domain logic"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, _stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.fill_logic
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let shape = *ctx.rng.pick(ENTITIES)?;
        let max = ctx.rng.int(10, 10_000);
        let entity = Entity { shape, max };

        let stack = *ctx.stack;
        let (path, source) = render(&stack, ctx.project_name, &entity);
        ctx.write(path, source);

        if stack.language == LanguageId::Rust {
            let (root, line) = if ctx.has_file("src/lib.rs") {
                ("src/lib.rs", format!("\npub mod {};\n", entity.snake()))
            } else {
                ("src/main.rs", format!("\n#[allow(dead_code)]\nmod {};\n", entity.snake()))
            };
            if ctx.has_file(root) {
                ctx.append(root, &line);
            }
        }
        Ok(())
    }
}

fn render(stack: &TechStack, project_name: &str, entity: &Entity) -> (String, String) {
    let snake = entity.snake();
    let pascal = entity.pascal();
    let module = module_name(project_name);
    let text = entity.text_field();
    let int = entity.int_field();
    let max = entity.max;

    match stack.language {
        LanguageId::TypeScript => {
            let fields = ts_fields(entity, true);
            (
                format!("src/domain/{snake}.ts"),
                format!(
                    "export interface {pascal} {{\n{fields}}}\n\nexport const MAX_{upper} = {max};\n\nexport function validate{pascal}(value: {pascal}): string[] {{\n  const errors: string[] = [];\n  if (value.{text_c}.trim() === '') errors.push('{text} is required');\n  if (value.{int_c} < 0 || value.{int_c} > MAX_{upper}) errors.push('{int} out of range');\n  return errors;\n}}\n",
                    upper = int.to_uppercase(),
                    text_c = camel(text),
                    int_c = camel(int),
                ),
            )
        }
        LanguageId::JavaScript => (
            format!("src/domain/{snake}.js"),
            format!(
                "export const MAX_{upper} = {max};\n\n/**\n * @param {{{{ {doc} }}}} value\n * @returns {{string[]}}\n */\nexport function validate{pascal}(value) {{\n  const errors = [];\n  if (!value.{text_c} || value.{text_c}.trim() === '') errors.push('{text} is required');\n  if (value.{int_c} < 0 || value.{int_c} > MAX_{upper}) errors.push('{int} out of range');\n  return errors;\n}}\n",
                upper = int.to_uppercase(),
                doc = ts_fields(entity, false),
                text_c = camel(text),
                int_c = camel(int),
            ),
        ),
        LanguageId::Python => {
            let fields: String = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("    {name}: {}\n", py_type(*kind)))
                .collect();
            (
                format!("{module}/{snake}.py"),
                format!(
                    "from dataclasses import dataclass\n\nMAX_{upper} = {max}\n\n\n@dataclass\nclass {pascal}:\n{fields}\n    def validate(self) -> list[str]:\n        errors = []\n        if not self.{text}.strip():\n            errors.append(\"{text} is required\")\n        if not 0 <= self.{int} <= MAX_{upper}:\n            errors.append(\"{int} out of range\")\n        return errors\n",
                    upper = int.to_uppercase(),
                ),
            )
        }
        LanguageId::Rust => {
            let fields: String = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("    pub {name}: {},\n", rust_type(*kind)))
                .collect();
            (
                format!("src/{snake}.rs"),
                format!(
                    "pub const MAX_{upper}: i64 = {max};\n\n#[derive(Debug, Clone, PartialEq)]\npub struct {pascal} {{\n{fields}}}\n\nimpl {pascal} {{\n    pub fn validate(&self) -> Vec<String> {{\n        let mut errors = Vec::new();\n        if self.{text}.trim().is_empty() {{\n            errors.push(\"{text} is required\".to_string());\n        }}\n        if !(0..=MAX_{upper}).contains(&self.{int}) {{\n            errors.push(\"{int} out of range\".to_string());\n        }}\n        errors\n    }}\n}}\n",
                    upper = int.to_uppercase(),
                ),
            )
        }
        LanguageId::Go => {
            let fields: String = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| {
                    format!("\t{} {} `json:\"{name}\"`\n", pascal_case(name), go_type(*kind))
                })
                .collect();
            (
                format!("internal/{snake}/{snake}.go"),
                format!(
                    "package {snake}\n\nimport \"strings\"\n\nconst Max{int_p} = {max}\n\ntype {pascal} struct {{\n{fields}}}\n\n// Validate returns every problem with the value.\nfunc (v {pascal}) Validate() []string {{\n\tvar errs []string\n\tif strings.TrimSpace(v.{text_p}) == \"\" {{\n\t\terrs = append(errs, \"{text} is required\")\n\t}}\n\tif v.{int_p} < 0 || v.{int_p} > Max{int_p} {{\n\t\terrs = append(errs, \"{int} out of range\")\n\t}}\n\treturn errs\n}}\n",
                    int_p = pascal_case(int),
                    text_p = pascal_case(text),
                ),
            )
        }
        LanguageId::Java => {
            let package = format!("com.example.{module}.domain");
            let params = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("{} {}", java_type(*kind), camel(name)))
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("src/main/java/{}/{pascal}.java", package.replace('.', "/")),
                format!(
                    "package {package};\n\nimport java.util.ArrayList;\nimport java.util.List;\n\npublic record {pascal}({params}) {{\n    public static final long MAX_{upper} = {max}L;\n\n    public List<String> validate() {{\n        List<String> errors = new ArrayList<>();\n        if ({text_c} == null || {text_c}.isBlank()) {{\n            errors.add(\"{text} is required\");\n        }}\n        if ({int_c} < 0 || {int_c} > MAX_{upper}) {{\n            errors.add(\"{int} out of range\");\n        }}\n        return errors;\n    }}\n}}\n",
                    upper = int.to_uppercase(),
                    text_c = camel(text),
                    int_c = camel(int),
                ),
            )
        }
        LanguageId::Kotlin => {
            let package = format!("com.example.{module}.domain");
            let params = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("    val {}: {},\n", camel(name), kotlin_type(*kind)))
                .collect::<String>();
            (
                format!("src/main/kotlin/{}/{pascal}.kt", package.replace('.', "/")),
                format!(
                    "package {package}\n\nconst val MAX_{upper}: Long = {max}\n\ndata class {pascal}(\n{params}) {{\n    fun validate(): List<String> = buildList {{\n        if ({text_c}.isBlank()) add(\"{text} is required\")\n        if ({int_c} !in 0..MAX_{upper}) add(\"{int} out of range\")\n    }}\n}}\n",
                    upper = int.to_uppercase(),
                    text_c = camel(text),
                    int_c = camel(int),
                ),
            )
        }
        LanguageId::CSharp => {
            let assembly = pascal_case(project_name);
            let params = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("{} {}", cs_type(*kind), pascal_case(name)))
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("Domain/{pascal}.cs"),
                format!(
                    "namespace {assembly}.Domain;\n\npublic record {pascal}({params})\n{{\n    public const long Max{int_p} = {max};\n\n    public IReadOnlyList<string> Validate()\n    {{\n        var errors = new List<string>();\n        if (string.IsNullOrWhiteSpace({text_p})) errors.Add(\"{text} is required\");\n        if ({int_p} < 0 || {int_p} > Max{int_p}) errors.Add(\"{int} out of range\");\n        return errors;\n    }}\n}}\n",
                    int_p = pascal_case(int),
                    text_p = pascal_case(text),
                ),
            )
        }
        LanguageId::Ruby => {
            let attrs = entity
                .shape
                .fields
                .iter()
                .map(|(name, _)| format!(":{name}"))
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("lib/{snake}.rb"),
                format!(
                    "{pascal} = Struct.new({attrs}, keyword_init: true) do\n  def validate\n    errors = []\n    errors << \"{text} is required\" if {text}.to_s.strip.empty?\n    errors << \"{int} out of range\" unless (0..{max}).cover?({int}.to_i)\n    errors\n  end\nend\n"
                ),
            )
        }
        LanguageId::Php => {
            let params = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("        public readonly {} ${},\n", php_type(*kind), camel(name)))
                .collect::<String>();
            (
                format!("src/Domain/{pascal}.php"),
                format!(
                    "<?php\n\ndeclare(strict_types=1);\n\nnamespace App\\Domain;\n\nfinal class {pascal}\n{{\n    public const MAX_{upper} = {max};\n\n    public function __construct(\n{params}    ) {{\n    }}\n\n    /** @return list<string> */\n    public function validate(): array\n    {{\n        $errors = [];\n        if (trim($this->{text_c}) === '') {{\n            $errors[] = '{text} is required';\n        }}\n        if ($this->{int_c} < 0 || $this->{int_c} > self::MAX_{upper}) {{\n            $errors[] = '{int} out of range';\n        }}\n        return $errors;\n    }}\n}}\n",
                    upper = int.to_uppercase(),
                    text_c = camel(text),
                    int_c = camel(int),
                ),
            )
        }
        LanguageId::Elixir => {
            let app_module = pascal_case(project_name);
            let keys = entity
                .shape
                .fields
                .iter()
                .map(|(name, _)| format!(":{name}"))
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("lib/{module}/{snake}.ex"),
                format!(
                    "defmodule {app_module}.{pascal} do\n  @moduledoc false\n\n  defstruct [{keys}]\n\n  @max_{int} {max}\n\n  def validate(%__MODULE__{{}} = value) do\n    []\n    |> check(String.trim(value.{text} || \"\") == \"\", \"{text} is required\")\n    |> check(value.{int} < 0 or value.{int} > @max_{int}, \"{int} out of range\")\n    |> Enum.reverse()\n  end\n\n  defp check(errors, true, message), do: [message | errors]\n  defp check(errors, false, _message), do: errors\nend\n"
                ),
            )
        }
        LanguageId::Swift => {
            let product = pascal_case(project_name);
            let fields = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("    public var {}: {}\n", camel(name), swift_type(*kind)))
                .collect::<String>();
            (
                format!("Sources/{product}/{pascal}.swift"),
                format!(
                    "public struct {pascal}: Equatable {{\n    public static let max{int_p} = {max}\n\n{fields}\n    public func validate() -> [String] {{\n        var errors: [String] = []\n        if {text_c}.trimmingCharacters(in: .whitespaces).isEmpty {{\n            errors.append(\"{text} is required\")\n        }}\n        if !(0...Self.max{int_p}).contains({int_c}) {{\n            errors.append(\"{int} out of range\")\n        }}\n        return errors\n    }}\n}}\n",
                    int_p = pascal_case(int),
                    text_c = camel(text),
                    int_c = camel(int),
                ),
            )
        }
        LanguageId::Dart => {
            let fields = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("  final {} {};\n", dart_type(*kind), camel(name)))
                .collect::<String>();
            let ctor = entity
                .shape
                .fields
                .iter()
                .map(|(name, _)| format!("required this.{}", camel(name)))
                .collect::<Vec<_>>()
                .join(", ");
            (
                format!("lib/src/{snake}.dart"),
                format!(
                    "const max{int_p} = {max};\n\nclass {pascal} {{\n{fields}\n  const {pascal}({{{ctor}}});\n\n  List<String> validate() {{\n    final errors = <String>[];\n    if ({text_c}.trim().isEmpty) errors.add('{text} is required');\n    if ({int_c} < 0 || {int_c} > max{int_p}) errors.add('{int} out of range');\n    return errors;\n  }}\n}}\n",
                    int_p = pascal_case(int),
                    text_c = camel(text),
                    int_c = camel(int),
                ),
            )
        }
        LanguageId::Cpp => {
            let fields = entity
                .shape
                .fields
                .iter()
                .map(|(name, kind)| format!("    {} {};\n", cpp_type(*kind), name))
                .collect::<String>();
            (
                format!("src/{snake}.hpp"),
                format!(
                    "#pragma once\n\n#include <string>\n#include <vector>\n\nconstexpr long kMax{int_p} = {max};\n\nstruct {pascal} {{\n{fields}\n    std::vector<std::string> validate() const {{\n        std::vector<std::string> errors;\n        if ({text}.find_first_not_of(\" \\t\") == std::string::npos) errors.emplace_back(\"{text} is required\");\n        if ({int} < 0 || {int} > kMax{int_p}) errors.emplace_back(\"{int} out of range\");\n        return errors;\n    }}\n}};\n",
                    int_p = pascal_case(int),
                ),
            )
        }
    }
}

fn ts_fields(entity: &Entity, typed: bool) -> String {
    let fields = entity.shape.fields.iter().map(|(name, kind)| {
        let ty = match kind {
            Text => "string",
            Int => "number",
            Bool => "boolean",
        };
        (camel(name), ty)
    });
    if typed {
        fields.map(|(name, ty)| format!("  {name}: {ty};\n")).collect()
    } else {
        fields
            .map(|(name, ty)| format!("{name}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn py_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "str",
        Int => "int",
        Bool => "bool",
    }
}

fn rust_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "String",
        Int => "i64",
        Bool => "bool",
    }
}

fn go_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "string",
        Int => "int64",
        Bool => "bool",
    }
}

fn java_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "String",
        Int => "long",
        Bool => "boolean",
    }
}

fn kotlin_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "String",
        Int => "Long",
        Bool => "Boolean",
    }
}

fn cs_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "string",
        Int => "long",
        Bool => "bool",
    }
}

fn php_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "string",
        Int => "int",
        Bool => "bool",
    }
}

fn swift_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "String",
        Int => "Int",
        Bool => "Bool",
    }
}

fn dart_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "String",
        Int => "int",
        Bool => "bool",
    }
}

fn cpp_type(kind: FieldKind) -> &'static str {
    match kind {
        Text => "std::string",
        Int => "long",
        Bool => "bool",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn stack(language: LanguageId) -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
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
            testing: TestingId::CargoTest,
        }
    }

    fn invoice() -> Entity {
        Entity { shape: ENTITIES[0], max: 500 }
    }

    #[test]
    fn test_every_language_renders_entity() {
        for language in LanguageId::all_variants() {
            let (path, source) = render(&stack(*language), "calm-heron", &invoice());
            assert!(path.to_lowercase().contains("invoice"), "{language}: {path}");
            assert!(source.contains("500"), "{language}");
            assert!(source.contains("number is required"), "{language}");
        }
    }

    #[test]
    fn test_rust_entity() {
        let (path, source) = render(&stack(LanguageId::Rust), "calm-heron", &invoice());
        assert_eq!(path, "src/invoice.rs");
        assert!(source.contains("pub struct Invoice {"));
        assert!(source.contains("pub amount_cents: i64,"));
        assert!(source.contains("pub const MAX_AMOUNT_CENTS: i64 = 500;"));
    }

    #[test]
    fn test_java_package_path() {
        let (path, source) = render(&stack(LanguageId::Java), "calm-heron", &invoice());
        assert_eq!(path, "src/main/java/com/example/calm_heron/domain/Invoice.java");
        assert!(source.contains("public record Invoice(String number, long amountCents, boolean paid)"));
    }

    #[test]
    fn test_camel() {
        assert_eq!(camel("amount_cents"), "amountCents");
        assert_eq!(camel("title"), "title");
    }
}
