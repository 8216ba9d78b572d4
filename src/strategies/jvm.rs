//! Java and Kotlin projects on Maven or Gradle.

use super::common::{module_name, pascal_case};
use crate::stack::{BuildToolId, DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TestingId};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct JvmStrategy;

#[async_trait]
impl GenerationStrategy for JvmStrategy {
    fn id(&self) -> &str {
        "jvm"
    }

    fn name(&self) -> &str {
        "JVM project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        matches!(stack.language, LanguageId::Java | LanguageId::Kotlin)
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let package = format!("com.example.{}", module_name(ctx.project_name));
        let package_dir = package.replace('.', "/");
        let class = pascal_case(ctx.project_name);
        let kotlin = stack.language == LanguageId::Kotlin;
        let deps = dependencies(&stack);

        match stack.build_tool {
            BuildToolId::Maven => ctx.write("pom.xml", pom_xml(ctx.project_name, &stack, &deps)),
            _ => {
                ctx.write(
                    "settings.gradle.kts",
                    format!("rootProject.name = \"{}\"\n", ctx.project_name),
                );
                ctx.write("build.gradle.kts", gradle_kts(&stack, &deps));
            }
        }

        let (src_root, test_root, ext) = if kotlin {
            ("src/main/kotlin", "src/test/kotlin", "kt")
        } else {
            ("src/main/java", "src/test/java", "java")
        };

        ctx.write(
            format!("{src_root}/{package_dir}/{class}.{ext}"),
            main_source(&package, &class, ctx.project_name, &stack),
        );
        ctx.write(
            format!("{test_root}/{package_dir}/{class}Test.{ext}"),
            test_source(&package, &class, &stack),
        );

        if stack.framework == FrameworkId::SpringBoot {
            ctx.write(
                "src/main/resources/application.properties",
                application_properties(ctx.project_name, &stack),
            );
        }
        if stack.framework == FrameworkId::JetpackCompose {
            ctx.write(
                "src/main/AndroidManifest.xml",
                format!(
                    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\">\n    <application android:label=\"{}\">\n        <activity android:name=\".{class}\" android:exported=\"true\">\n            <intent-filter>\n                <action android:name=\"android.intent.action.MAIN\" />\n                <category android:name=\"android.intent.category.LAUNCHER\" />\n            </intent-filter>\n        </activity>\n    </application>\n</manifest>\n",
                    ctx.project_name
                ),
            );
        }
        Ok(())
    }
}

/// (group, artifact, version, scope)
type Coordinate = (&'static str, &'static str, &'static str, &'static str);

fn dependencies(stack: &TechStack) -> Vec<Coordinate> {
    let mut deps: Vec<Coordinate> = Vec::new();
    match stack.framework {
        FrameworkId::SpringBoot => {
            deps.push(("org.springframework.boot", "spring-boot-starter-web", "3.3.4", "compile"));
            deps.push(("org.springframework.boot", "spring-boot-starter-test", "3.3.4", "test"));
            if stack.orm == OrmId::Hibernate {
                deps.push((
                    "org.springframework.boot",
                    "spring-boot-starter-data-jpa",
                    "3.3.4",
                    "compile",
                ));
            }
        }
        FrameworkId::Quarkus => {
            deps.push(("io.quarkus", "quarkus-rest", "3.15.1", "compile"));
            deps.push(("io.quarkus", "quarkus-junit5", "3.15.1", "test"));
            if stack.orm == OrmId::Hibernate {
                deps.push(("io.quarkus", "quarkus-hibernate-orm-panache", "3.15.1", "compile"));
            }
        }
        FrameworkId::Ktor => {
            deps.push(("io.ktor", "ktor-server-netty-jvm", "2.3.12", "compile"));
            deps.push(("io.ktor", "ktor-server-test-host-jvm", "2.3.12", "test"));
        }
        FrameworkId::JetpackCompose => {
            deps.push(("androidx.activity", "activity-compose", "1.9.2", "compile"));
            deps.push(("androidx.compose.material3", "material3", "1.3.0", "compile"));
        }
        _ => {}
    }
    if stack.orm == OrmId::Exposed {
        deps.push(("org.jetbrains.exposed", "exposed-core", "0.55.0", "compile"));
        deps.push(("org.jetbrains.exposed", "exposed-jdbc", "0.55.0", "compile"));
    }
    if stack.orm == OrmId::Hibernate
        && !matches!(stack.framework, FrameworkId::SpringBoot | FrameworkId::Quarkus)
    {
        deps.push(("org.hibernate.orm", "hibernate-core", "6.6.1.Final", "compile"));
    }
    match stack.database {
        DatabaseId::Postgres => deps.push(("org.postgresql", "postgresql", "42.7.4", "runtime")),
        DatabaseId::Mysql => deps.push(("com.mysql", "mysql-connector-j", "9.0.0", "runtime")),
        DatabaseId::Sqlite => deps.push(("org.xerial", "sqlite-jdbc", "3.46.1.3", "runtime")),
        _ => {}
    }
    match stack.testing {
        TestingId::Kotest => deps.push(("io.kotest", "kotest-runner-junit5", "5.9.1", "test")),
        _ => deps.push(("org.junit.jupiter", "junit-jupiter", "5.11.2", "test")),
    }
    deps
}

fn pom_xml(name: &str, stack: &TechStack, deps: &[Coordinate]) -> String {
    let mut dep_xml = String::new();
    for (group, artifact, version, scope) in deps {
        dep_xml.push_str(&format!(
            "    <dependency>\n      <groupId>{group}</groupId>\n      <artifactId>{artifact}</artifactId>\n      <version>{version}</version>\n"
        ));
        if *scope != "compile" {
            dep_xml.push_str(&format!("      <scope>{scope}</scope>\n"));
        }
        dep_xml.push_str("    </dependency>\n");
    }

    let kotlin_plugin = if stack.language == LanguageId::Kotlin {
        "      <plugin>\n        <groupId>org.jetbrains.kotlin</groupId>\n        <artifactId>kotlin-maven-plugin</artifactId>\n        <version>2.0.21</version>\n      </plugin>\n"
    } else {
        ""
    };
    let boot_plugin = if stack.framework == FrameworkId::SpringBoot {
        "      <plugin>\n        <groupId>org.springframework.boot</groupId>\n        <artifactId>spring-boot-maven-plugin</artifactId>\n        <version>3.3.4</version>\n      </plugin>\n"
    } else {
        ""
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <modelVersion>4.0.0</modelVersion>\n  <groupId>com.example</groupId>\n  <artifactId>{name}</artifactId>\n  <version>0.1.0</version>\n  <packaging>jar</packaging>\n\n  <properties>\n    <maven.compiler.release>21</maven.compiler.release>\n    <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>\n  </properties>\n\n  <dependencies>\n{dep_xml}  </dependencies>\n\n  <build>\n    <finalName>{name}</finalName>\n    <plugins>\n{kotlin_plugin}{boot_plugin}      <plugin>\n        <groupId>org.apache.maven.plugins</groupId>\n        <artifactId>maven-surefire-plugin</artifactId>\n        <version>3.5.1</version>\n      </plugin>\n    </plugins>\n  </build>\n</project>\n"
    )
}

fn gradle_kts(stack: &TechStack, deps: &[Coordinate]) -> String {
    let mut plugins = Vec::new();
    match stack.language {
        LanguageId::Kotlin if stack.framework == FrameworkId::JetpackCompose => {
            plugins.push("id(\"com.android.application\") version \"8.7.0\"".to_string());
            plugins.push("kotlin(\"android\") version \"2.0.21\"".to_string());
        }
        LanguageId::Kotlin => plugins.push("kotlin(\"jvm\") version \"2.0.21\"".to_string()),
        _ => plugins.push("java".to_string()),
    }
    match stack.framework {
        FrameworkId::SpringBoot => {
            plugins.push("id(\"org.springframework.boot\") version \"3.3.4\"".to_string())
        }
        FrameworkId::Quarkus => plugins.push("id(\"io.quarkus\") version \"3.15.1\"".to_string()),
        FrameworkId::Ktor => plugins.push("id(\"io.ktor.plugin\") version \"2.3.12\"".to_string()),
        _ => {}
    }
    if stack.framework != FrameworkId::JetpackCompose {
        plugins.push("application".to_string());
    }

    let mut out = String::from("plugins {\n");
    for plugin in plugins {
        out.push_str(&format!("    {plugin}\n"));
    }
    out.push_str("}\n\ngroup = \"com.example\"\nversion = \"0.1.0\"\n\nrepositories {\n    mavenCentral()\n    google()\n}\n\ndependencies {\n");
    for (group, artifact, version, scope) in deps {
        let configuration = match *scope {
            "test" => "testImplementation",
            "runtime" => "runtimeOnly",
            _ => "implementation",
        };
        out.push_str(&format!(
            "    {configuration}(\"{group}:{artifact}:{version}\")\n"
        ));
    }
    out.push_str("}\n\ntasks.withType<Test> {\n    useJUnitPlatform()\n}\n");
    if stack.framework != FrameworkId::JetpackCompose {
        out.push_str("\ntasks.withType<Jar> {\n    archiveFileName.set(\"${rootProject.name}.jar\")\n}\n");
    }
    out
}

fn application_properties(name: &str, stack: &TechStack) -> String {
    let mut out = format!("spring.application.name={name}\nserver.port=8080\n");
    match stack.database {
        DatabaseId::Postgres => out.push_str(
            "spring.datasource.url=${DATABASE_URL:jdbc:postgresql://localhost:5432/app}\n",
        ),
        DatabaseId::Mysql => out.push_str(
            "spring.datasource.url=${DATABASE_URL:jdbc:mysql://localhost:3306/app}\n",
        ),
        DatabaseId::Sqlite => {
            out.push_str("spring.datasource.url=${DATABASE_URL:jdbc:sqlite:app.db}\n")
        }
        _ => {}
    }
    out
}

fn main_source(package: &str, class: &str, name: &str, stack: &TechStack) -> String {
    let kotlin = stack.language == LanguageId::Kotlin;
    match (stack.framework, kotlin) {
        (FrameworkId::SpringBoot, false) => format!(
            "package {package};\n\nimport java.util.Map;\nimport org.springframework.boot.SpringApplication;\nimport org.springframework.boot.autoconfigure.SpringBootApplication;\nimport org.springframework.web.bind.annotation.GetMapping;\nimport org.springframework.web.bind.annotation.RestController;\n\n@SpringBootApplication\n@RestController\npublic class {class} {{\n\n    @GetMapping(\"/health\")\n    public Map<String, String> health() {{\n        return Map.of(\"status\", \"ok\", \"service\", \"{name}\");\n    }}\n\n    public static void main(String[] args) {{\n        SpringApplication.run({class}.class, args);\n    }}\n}}\n"
        ),
        (FrameworkId::SpringBoot, true) => format!(
            "package {package}\n\nimport org.springframework.boot.autoconfigure.SpringBootApplication\nimport org.springframework.boot.runApplication\nimport org.springframework.web.bind.annotation.GetMapping\nimport org.springframework.web.bind.annotation.RestController\n\n@SpringBootApplication\n@RestController\nclass {class} {{\n    @GetMapping(\"/health\")\n    fun health() = mapOf(\"status\" to \"ok\", \"service\" to \"{name}\")\n}}\n\nfun main(args: Array<String>) {{\n    runApplication<{class}>(*args)\n}}\n"
        ),
        (FrameworkId::Quarkus, false) => format!(
            "package {package};\n\nimport jakarta.ws.rs.GET;\nimport jakarta.ws.rs.Path;\nimport java.util.Map;\n\n@Path(\"/health\")\npublic class {class} {{\n\n    @GET\n    public Map<String, String> health() {{\n        return Map.of(\"status\", \"ok\", \"service\", \"{name}\");\n    }}\n}}\n"
        ),
        (FrameworkId::Quarkus, true) => format!(
            "package {package}\n\nimport jakarta.ws.rs.GET\nimport jakarta.ws.rs.Path\n\n@Path(\"/health\")\nclass {class} {{\n    @GET\n    fun health() = mapOf(\"status\" to \"ok\", \"service\" to \"{name}\")\n}}\n"
        ),
        (FrameworkId::Ktor, _) => format!(
            "package {package}\n\nimport io.ktor.server.application.*\nimport io.ktor.server.engine.*\nimport io.ktor.server.netty.*\nimport io.ktor.server.response.*\nimport io.ktor.server.routing.*\n\nobject {class} {{\n    const val NAME = \"{name}\"\n}}\n\nfun Application.module() {{\n    routing {{\n        get(\"/health\") {{ call.respondText(\"ok\") }}\n    }}\n}}\n\nfun main() {{\n    embeddedServer(Netty, port = 8080, module = Application::module).start(wait = true)\n}}\n"
        ),
        (FrameworkId::JetpackCompose, _) => format!(
            "package {package}\n\nimport android.os.Bundle\nimport androidx.activity.ComponentActivity\nimport androidx.activity.compose.setContent\nimport androidx.compose.material3.Text\n\nclass {class} : ComponentActivity() {{\n    override fun onCreate(savedInstanceState: Bundle?) {{\n        super.onCreate(savedInstanceState)\n        setContent {{ Text(\"{name}\") }}\n    }}\n}}\n"
        ),
        (_, true) => format!(
            "package {package}\n\nobject {class} {{\n    fun greet(who: String): String = \"Hello, $who!\"\n}}\n"
        ),
        (_, false) => format!(
            "package {package};\n\npublic final class {class} {{\n\n    private {class}() {{}}\n\n    public static String greet(String who) {{\n        return \"Hello, \" + who + \"!\";\n    }}\n}}\n"
        ),
    }
}

fn test_source(package: &str, class: &str, stack: &TechStack) -> String {
    let kotlin = stack.language == LanguageId::Kotlin;
    if stack.testing == TestingId::Kotest {
        return format!(
            "package {package}\n\nimport io.kotest.core.spec.style.StringSpec\nimport io.kotest.matchers.shouldBe\n\nclass {class}Test : StringSpec({{\n    \"arithmetic works\" {{\n        (1 + 1) shouldBe 2\n    }}\n}})\n"
        );
    }
    if kotlin {
        format!(
            "package {package}\n\nimport org.junit.jupiter.api.Assertions.assertEquals\nimport org.junit.jupiter.api.Test\n\nclass {class}Test {{\n    @Test\n    fun arithmeticWorks() {{\n        assertEquals(2, 1 + 1)\n    }}\n}}\n"
        )
    } else {
        format!(
            "package {package};\n\nimport static org.junit.jupiter.api.Assertions.assertEquals;\n\nimport org.junit.jupiter.api.Test;\n\nclass {class}Test {{\n\n    @Test\n    void arithmeticWorks() {{\n        assertEquals(2, 1 + 1);\n    }}\n}}\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn spring_stack() -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Java,
            runtime: RuntimeId::Jvm,
            framework: FrameworkId::SpringBoot,
            database: DatabaseId::Postgres,
            orm: OrmId::Hibernate,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::Maven,
            styling: StylingId::None,
            testing: TestingId::Junit,
        }
    }

    #[test]
    fn test_pom_is_well_formed_xml() {
        let stack = spring_stack();
        let pom = pom_xml("calm-heron-ab12", &stack, &dependencies(&stack));
        let doc = roxmltree::Document::parse(&pom).unwrap();
        let artifacts: Vec<&str> = doc
            .descendants()
            .filter(|n| n.has_tag_name("artifactId"))
            .filter_map(|n| n.text())
            .collect();
        assert!(artifacts.contains(&"spring-boot-starter-web"));
        assert!(artifacts.contains(&"postgresql"));
        assert!(artifacts.contains(&"spring-boot-starter-data-jpa"));
    }

    #[test]
    fn test_gradle_uses_configurations() {
        let mut stack = spring_stack();
        stack.language = LanguageId::Kotlin;
        stack.build_tool = BuildToolId::Gradle;
        let gradle = gradle_kts(&stack, &dependencies(&stack));
        assert!(gradle.contains("kotlin(\"jvm\")"));
        assert!(gradle.contains("runtimeOnly(\"org.postgresql:postgresql:42.7.4\")"));
        assert!(gradle.contains("testImplementation(\"org.junit.jupiter:junit-jupiter:5.11.2\")"));
    }
}
