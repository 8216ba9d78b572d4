//! TypeScript and JavaScript projects on Node.js, Bun and Deno.

use super::toolchain::node_entry;
use crate::stack::{
    ArchetypeId, BuildToolId, DatabaseId, FrameworkId, LanguageId, OrmId, RuntimeId, StylingId,
    TechStack, TestingId, TransportId,
};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

pub struct NodeStrategy;

#[async_trait]
impl GenerationStrategy for NodeStrategy {
    fn id(&self) -> &str {
        "node"
    }

    fn name(&self) -> &str {
        "Node.js / TypeScript project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language.is_node()
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let ts = stack.language == LanguageId::TypeScript;
        let ext = if ts { "ts" } else { "js" };

        if stack.runtime == RuntimeId::Deno {
            let deno = deno_json(&stack);
            ctx.write(
                "deno.json",
                serde_json::to_string_pretty(&deno).context("serializing deno.json")?,
            );
        } else {
            let package = package_json(ctx.project_name, &stack);
            ctx.write(
                "package.json",
                serde_json::to_string_pretty(&package).context("serializing package.json")?,
            );
        }

        if ts && stack.runtime != RuntimeId::Deno {
            ctx.write("tsconfig.json", tsconfig(&stack));
        }

        let entry = node_entry(&stack);
        ctx.write(entry.clone(), entry_source(ctx.project_name, &stack));

        if stack.framework == FrameworkId::Svelte {
            ctx.write(
                "src/App.svelte",
                format!("<script>\n  let name = '{}';\n</script>\n\n<h1>{{name}}</h1>\n", ctx.project_name),
            );
        }

        if uses_vite(stack.framework) {
            ctx.write(format!("vite.config.{ext}"), vite_config(stack.framework));
            ctx.write("index.html", index_html(ctx.project_name, &entry));
        }

        if stack.styling == StylingId::Tailwind {
            ctx.write(
                "tailwind.config.js",
                "/** @type {import('tailwindcss').Config} */\nexport default {\n  content: ['./index.html', './src/**/*.{js,ts,jsx,tsx,vue,svelte}'],\n  theme: { extend: {} },\n  plugins: [],\n};\n",
            );
            ctx.write(
                "postcss.config.js",
                "export default {\n  plugins: { tailwindcss: {}, autoprefixer: {} },\n};\n",
            );
        }

        let (test_path, test_body) = test_file(&stack, ext);
        ctx.write(test_path, test_body);
        Ok(())
    }
}

fn uses_vite(framework: FrameworkId) -> bool {
    matches!(
        framework,
        FrameworkId::React
            | FrameworkId::Vue
            | FrameworkId::Svelte
            | FrameworkId::Solid
            | FrameworkId::Phaser
    )
}

fn scripts(stack: &TechStack) -> Map<String, Value> {
    let ts = stack.language == LanguageId::TypeScript;
    let entry = node_entry(stack);
    let mut scripts = Map::new();
    let mut set = |k: &str, v: String| {
        scripts.insert(k.to_string(), Value::String(v));
    };

    match stack.framework {
        FrameworkId::NextJs => {
            set("dev", "next dev".into());
            set("build", "next build".into());
            set("start", "next start".into());
        }
        FrameworkId::Nuxt => {
            set("dev", "nuxt dev".into());
            set("build", "nuxt build".into());
            set("start", "node .output/server/index.mjs".into());
        }
        FrameworkId::SvelteKit => {
            set("dev", "vite dev".into());
            set("build", "vite build".into());
            set("start", "node build".into());
        }
        FrameworkId::Remix => {
            set("dev", "remix vite:dev".into());
            set("build", "remix vite:build".into());
            set("start", "remix-serve ./build/server/index.js".into());
        }
        FrameworkId::Angular => {
            set("dev", "ng serve".into());
            set("build", "ng build".into());
        }
        FrameworkId::ReactNative => {
            set("start", "expo start".into());
            set("android", "expo run:android".into());
            set("ios", "expo run:ios".into());
        }
        FrameworkId::Electron => {
            if ts {
                set("build", "tsc".into());
                set("start", "tsc && electron dist/main.js".into());
            } else {
                set("start", "electron src/main.js".into());
            }
        }
        fw if uses_vite(fw) => {
            set("dev", "vite".into());
            set("build", "vite build".into());
            set("preview", "vite preview".into());
        }
        _ => {
            if stack.runtime == RuntimeId::Bun {
                set("dev", format!("bun --watch {entry}"));
                set("start", format!("bun {entry}"));
            } else if ts {
                set("dev", format!("tsx watch {entry}"));
                set("build", "tsc".into());
                set("start", "node dist/index.js".into());
            } else {
                set("dev", format!("node --watch {entry}"));
                set("start", format!("node {entry}"));
            }
        }
    }

    let test = match stack.testing {
        TestingId::Jest => "jest",
        TestingId::Mocha => "mocha",
        _ => "vitest run",
    };
    set("test", test.into());
    if stack.orm == OrmId::Prisma {
        set("db:generate", "prisma generate".into());
        set("db:migrate", "prisma migrate dev".into());
    }
    if stack.orm == OrmId::Drizzle {
        set("db:generate", "drizzle-kit generate".into());
    }
    scripts
}

fn dependencies(stack: &TechStack) -> (Map<String, Value>, Map<String, Value>) {
    let ts = stack.language == LanguageId::TypeScript;
    let mut deps = Map::new();
    let mut dev = Map::new();
    let add = |m: &mut Map<String, Value>, name: &str, version: &str| {
        m.insert(name.to_string(), Value::String(version.to_string()));
    };

    match stack.framework {
        FrameworkId::Express => {
            add(&mut deps, "express", "^4.21.0");
            if ts {
                add(&mut dev, "@types/express", "^4.17.21");
            }
        }
        FrameworkId::Fastify => add(&mut deps, "fastify", "^5.0.0"),
        FrameworkId::NestJs => {
            add(&mut deps, "@nestjs/common", "^10.4.0");
            add(&mut deps, "@nestjs/core", "^10.4.0");
            add(&mut deps, "@nestjs/platform-express", "^10.4.0");
            add(&mut deps, "reflect-metadata", "^0.2.2");
            add(&mut deps, "rxjs", "^7.8.1");
        }
        FrameworkId::Hono => {
            add(&mut deps, "hono", "^4.6.0");
            if stack.runtime == RuntimeId::Node {
                add(&mut deps, "@hono/node-server", "^1.13.0");
            }
        }
        FrameworkId::React => {
            add(&mut deps, "react", "^18.3.1");
            add(&mut deps, "react-dom", "^18.3.1");
            add(&mut dev, "vite", "^5.4.0");
            add(&mut dev, "@vitejs/plugin-react", "^4.3.0");
            if ts {
                add(&mut dev, "@types/react", "^18.3.0");
                add(&mut dev, "@types/react-dom", "^18.3.0");
            }
        }
        FrameworkId::Vue => {
            add(&mut deps, "vue", "^3.5.0");
            add(&mut dev, "vite", "^5.4.0");
            add(&mut dev, "@vitejs/plugin-vue", "^5.1.0");
        }
        FrameworkId::Svelte => {
            add(&mut deps, "svelte", "^5.0.0");
            add(&mut dev, "vite", "^5.4.0");
            add(&mut dev, "@sveltejs/vite-plugin-svelte", "^4.0.0");
        }
        FrameworkId::Solid => {
            add(&mut deps, "solid-js", "^1.9.0");
            add(&mut dev, "vite", "^5.4.0");
            add(&mut dev, "vite-plugin-solid", "^2.10.0");
        }
        FrameworkId::Angular => {
            add(&mut deps, "@angular/core", "^18.2.0");
            add(&mut deps, "@angular/common", "^18.2.0");
            add(&mut deps, "@angular/platform-browser", "^18.2.0");
            add(&mut deps, "rxjs", "^7.8.1");
            add(&mut deps, "zone.js", "^0.14.10");
            add(&mut dev, "@angular/cli", "^18.2.0");
            add(&mut dev, "@angular/compiler-cli", "^18.2.0");
        }
        FrameworkId::NextJs => {
            add(&mut deps, "next", "^14.2.0");
            add(&mut deps, "react", "^18.3.1");
            add(&mut deps, "react-dom", "^18.3.1");
        }
        FrameworkId::Nuxt => add(&mut deps, "nuxt", "^3.13.0"),
        FrameworkId::SvelteKit => {
            add(&mut deps, "@sveltejs/kit", "^2.7.0");
            add(&mut deps, "svelte", "^5.0.0");
            add(&mut dev, "@sveltejs/adapter-node", "^5.2.0");
            add(&mut dev, "vite", "^5.4.0");
        }
        FrameworkId::Remix => {
            add(&mut deps, "@remix-run/node", "^2.13.0");
            add(&mut deps, "@remix-run/react", "^2.13.0");
            add(&mut deps, "@remix-run/serve", "^2.13.0");
            add(&mut deps, "react", "^18.3.1");
            add(&mut deps, "react-dom", "^18.3.1");
            add(&mut dev, "@remix-run/dev", "^2.13.0");
        }
        FrameworkId::Commander => add(&mut deps, "commander", "^12.1.0"),
        FrameworkId::ReactNative => {
            add(&mut deps, "expo", "^51.0.0");
            add(&mut deps, "react", "^18.2.0");
            add(&mut deps, "react-native", "^0.74.0");
        }
        FrameworkId::Electron => add(&mut dev, "electron", "^32.0.0"),
        FrameworkId::Phaser => {
            add(&mut deps, "phaser", "^3.85.0");
            add(&mut dev, "vite", "^5.4.0");
        }
        _ => {}
    }

    match stack.orm {
        OrmId::Prisma => {
            add(&mut deps, "@prisma/client", "^5.20.0");
            add(&mut dev, "prisma", "^5.20.0");
        }
        OrmId::Drizzle => {
            add(&mut deps, "drizzle-orm", "^0.34.0");
            add(&mut dev, "drizzle-kit", "^0.25.0");
        }
        OrmId::TypeOrm => {
            add(&mut deps, "typeorm", "^0.3.20");
            add(&mut deps, "reflect-metadata", "^0.2.2");
        }
        OrmId::Sequelize => add(&mut deps, "sequelize", "^6.37.0"),
        OrmId::Mongoose => add(&mut deps, "mongoose", "^8.7.0"),
        _ => {}
    }

    match stack.database {
        DatabaseId::Postgres => add(&mut deps, "pg", "^8.13.0"),
        DatabaseId::Mysql => add(&mut deps, "mysql2", "^3.11.0"),
        DatabaseId::Sqlite => add(&mut deps, "better-sqlite3", "^11.3.0"),
        DatabaseId::Mongodb if stack.orm != OrmId::Mongoose => {
            add(&mut deps, "mongodb", "^6.9.0")
        }
        DatabaseId::Redis => add(&mut deps, "ioredis", "^5.4.0"),
        _ => {}
    }

    match stack.transport {
        TransportId::Graphql => {
            add(&mut deps, "graphql", "^16.9.0");
            add(&mut deps, "graphql-yoga", "^5.7.0");
        }
        TransportId::Trpc => {
            add(&mut deps, "@trpc/server", "^10.45.0");
            add(&mut deps, "zod", "^3.23.0");
        }
        TransportId::Websocket => add(&mut deps, "ws", "^8.18.0"),
        TransportId::Grpc => {
            add(&mut deps, "@grpc/grpc-js", "^1.12.0");
            add(&mut deps, "@grpc/proto-loader", "^0.7.13");
        }
        _ => {}
    }

    match stack.styling {
        StylingId::Tailwind => {
            add(&mut dev, "tailwindcss", "^3.4.0");
            add(&mut dev, "postcss", "^8.4.0");
            add(&mut dev, "autoprefixer", "^10.4.0");
        }
        StylingId::Sass => add(&mut dev, "sass", "^1.79.0"),
        StylingId::StyledComponents => add(&mut deps, "styled-components", "^6.1.0"),
        _ => {}
    }

    match stack.testing {
        TestingId::Jest => {
            add(&mut dev, "jest", "^29.7.0");
            if ts {
                add(&mut dev, "ts-jest", "^29.2.0");
                add(&mut dev, "@types/jest", "^29.5.0");
            }
        }
        TestingId::Mocha => {
            add(&mut dev, "mocha", "^10.7.0");
            add(&mut dev, "chai", "^5.1.0");
        }
        _ => add(&mut dev, "vitest", "^2.1.0"),
    }

    if ts {
        add(&mut dev, "typescript", "^5.6.0");
        add(&mut dev, "@types/node", "^22.7.0");
        if !uses_vite(stack.framework) && stack.runtime == RuntimeId::Node {
            add(&mut dev, "tsx", "^4.19.0");
        }
    }

    (deps, dev)
}

fn package_json(name: &str, stack: &TechStack) -> Value {
    let (deps, dev) = dependencies(stack);
    let mut package = json!({
        "name": name,
        "version": "0.1.0",
        "private": true,
        "type": "module",
        "scripts": scripts(stack),
        "dependencies": deps,
        "devDependencies": dev,
    });
    if stack.archetype == ArchetypeId::Cli {
        let mut bin = Map::new();
        bin.insert(name.to_string(), json!(node_bin_path(stack)));
        package["bin"] = Value::Object(bin);
    }
    if stack.archetype == ArchetypeId::Library {
        package["main"] = json!("dist/index.js");
        package["types"] = json!("dist/index.d.ts");
        package["private"] = json!(false);
    }
    if stack.build_tool == BuildToolId::Pnpm {
        package["packageManager"] = json!("pnpm@9.12.0");
    }
    package
}

fn node_bin_path(stack: &TechStack) -> &'static str {
    if stack.language == LanguageId::TypeScript {
        "dist/index.js"
    } else {
        "src/index.js"
    }
}

fn deno_json(stack: &TechStack) -> Value {
    let entry = node_entry(stack);
    let mut imports = Map::new();
    match stack.framework {
        FrameworkId::Hono => {
            imports.insert("hono".into(), json!("jsr:@hono/hono@^4.6.0"));
        }
        FrameworkId::Express => {
            imports.insert("express".into(), json!("npm:express@^4.21.0"));
        }
        FrameworkId::Fastify => {
            imports.insert("fastify".into(), json!("npm:fastify@^5.0.0"));
        }
        FrameworkId::Commander => {
            imports.insert("commander".into(), json!("npm:commander@^12.1.0"));
        }
        _ => {}
    }
    imports.insert("vitest".into(), json!("npm:vitest@^2.1.0"));
    json!({
        "tasks": {
            "dev": format!("deno run -A --watch {entry}"),
            "start": format!("deno run -A {entry}"),
            "test": "deno run -A npm:vitest run",
        },
        "imports": imports,
    })
}

fn tsconfig(stack: &TechStack) -> String {
    let jsx = matches!(
        stack.framework,
        FrameworkId::React | FrameworkId::NextJs | FrameworkId::Remix | FrameworkId::ReactNative
    );
    let solid = stack.framework == FrameworkId::Solid;
    let mut options = json!({
        "target": "ES2022",
        "module": "ESNext",
        "moduleResolution": "Bundler",
        "strict": true,
        "esModuleInterop": true,
        "skipLibCheck": true,
        "outDir": "dist",
        "rootDir": ".",
        "declaration": stack.archetype == ArchetypeId::Library,
    });
    if jsx {
        options["jsx"] = json!("react-jsx");
    }
    if solid {
        options["jsx"] = json!("preserve");
        options["jsxImportSource"] = json!("solid-js");
    }
    if matches!(stack.framework, FrameworkId::NestJs) || stack.orm == OrmId::TypeOrm {
        options["experimentalDecorators"] = json!(true);
        options["emitDecoratorMetadata"] = json!(true);
    }
    let config = json!({
        "compilerOptions": options,
        "include": ["src", "tests", "test"],
    });
    serde_json::to_string_pretty(&config).unwrap_or_default()
}

fn entry_source(name: &str, stack: &TechStack) -> String {
    let ts = stack.language == LanguageId::TypeScript;
    let port_type = if ts { ": number" } else { "" };
    match stack.framework {
        FrameworkId::Express => format!(
            "import express from 'express';\n\nexport const app = express();\napp.use(express.json());\n\napp.get('/health', (_req, res) => {{\n  res.json({{ status: 'ok', service: '{name}' }});\n}});\n\nconst port{port_type} = Number(process.env.PORT ?? 3000);\nif (process.env.NODE_ENV !== 'test') {{\n  app.listen(port, () => console.log(`{name} listening on ${{port}}`));\n}}\n"
        ),
        FrameworkId::Fastify => format!(
            "import Fastify from 'fastify';\n\nexport const app = Fastify({{ logger: true }});\n\napp.get('/health', async () => ({{ status: 'ok', service: '{name}' }}));\n\nconst port{port_type} = Number(process.env.PORT ?? 3000);\nif (process.env.NODE_ENV !== 'test') {{\n  app.listen({{ port, host: '0.0.0.0' }});\n}}\n"
        ),
        FrameworkId::Hono if stack.runtime == RuntimeId::Node => format!(
            "import {{ Hono }} from 'hono';\nimport {{ serve }} from '@hono/node-server';\n\nexport const app = new Hono();\n\napp.get('/health', (c) => c.json({{ status: 'ok', service: '{name}' }}));\n\nif (process.env.NODE_ENV !== 'test') {{\n  serve({{ fetch: app.fetch, port: Number(process.env.PORT ?? 3000) }});\n}}\n"
        ),
        FrameworkId::Hono if stack.runtime == RuntimeId::Deno => format!(
            "import {{ Hono }} from 'hono';\n\nexport const app = new Hono();\n\napp.get('/health', (c) => c.json({{ status: 'ok', service: '{name}' }}));\n\nif (import.meta.main) {{\n  Deno.serve({{ port: 3000 }}, app.fetch);\n}}\n"
        ),
        FrameworkId::Hono => format!(
            "import {{ Hono }} from 'hono';\n\nexport const app = new Hono();\n\napp.get('/health', (c) => c.json({{ status: 'ok', service: '{name}' }}));\n\nexport default {{ port: 3000, fetch: app.fetch }};\n"
        ),
        FrameworkId::NestJs => format!(
            "import 'reflect-metadata';\nimport {{ Controller, Get, Module }} from '@nestjs/common';\nimport {{ NestFactory }} from '@nestjs/core';\n\n@Controller()\nexport class HealthController {{\n  @Get('health')\n  health() {{\n    return {{ status: 'ok', service: '{name}' }};\n  }}\n}}\n\n@Module({{ controllers: [HealthController] }})\nexport class AppModule {{}}\n\nasync function bootstrap() {{\n  const app = await NestFactory.create(AppModule);\n  await app.listen(Number(process.env.PORT ?? 3000));\n}}\n\nif (process.env.NODE_ENV !== 'test') {{\n  bootstrap();\n}}\n"
        ),
        FrameworkId::React => format!(
            "import {{ StrictMode }} from 'react';\nimport {{ createRoot }} from 'react-dom/client';\n\nexport function App() {{\n  return <h1>{name}</h1>;\n}}\n\nconst root = document.getElementById('root');\nif (root) {{\n  createRoot(root).render(\n    <StrictMode>\n      <App />\n    </StrictMode>,\n  );\n}}\n"
        ),
        FrameworkId::Solid => format!(
            "import {{ render }} from 'solid-js/web';\n\nexport function App() {{\n  return <h1>{name}</h1>;\n}}\n\nconst root = document.getElementById('root');\nif (root) {{\n  render(() => <App />, root);\n}}\n"
        ),
        FrameworkId::Vue => format!(
            "import {{ createApp, h }} from 'vue';\n\nexport const App = {{\n  render: () => h('h1', '{name}'),\n}};\n\ncreateApp(App).mount('#root');\n"
        ),
        FrameworkId::Svelte => "import { mount } from 'svelte';\nimport App from './App.svelte';\n\nexport default mount(App, { target: document.body });\n".to_string(),
        FrameworkId::Angular => format!(
            "import 'zone.js';\nimport {{ Component }} from '@angular/core';\nimport {{ bootstrapApplication }} from '@angular/platform-browser';\n\n@Component({{\n  selector: 'app-root',\n  standalone: true,\n  template: '<h1>{name}</h1>',\n}})\nexport class AppComponent {{}}\n\nbootstrapApplication(AppComponent);\n"
        ),
        FrameworkId::NextJs | FrameworkId::Nuxt | FrameworkId::SvelteKit | FrameworkId::Remix => {
            format!(
                "export const appName = '{name}';\n\nexport function health() {{\n  return {{ status: 'ok', service: appName }};\n}}\n"
            )
        }
        FrameworkId::Commander => format!(
            "#!/usr/bin/env node\nimport {{ Command }} from 'commander';\n\nexport function greet(name{s}) {{\n  return `Hello, ${{name}}!`;\n}}\n\nconst program = new Command();\nprogram\n  .name('{name}')\n  .version('0.1.0')\n  .argument('[name]', 'who to greet', 'world')\n  .action((who{s}) => console.log(greet(who)));\n\nif (process.env.NODE_ENV !== 'test') {{\n  program.parse();\n}}\n",
            s = if ts { ": string" } else { "" }
        ),
        FrameworkId::ReactNative => format!(
            "import {{ Text, View }} from 'react-native';\n\nexport default function App() {{\n  return (\n    <View>\n      <Text>{name}</Text>\n    </View>\n  );\n}}\n"
        ),
        FrameworkId::Electron => format!(
            "import {{ app, BrowserWindow }} from 'electron';\n\nfunction createWindow() {{\n  const win = new BrowserWindow({{ width: 1024, height: 768, title: '{name}' }});\n  win.loadURL('data:text/html,<h1>{name}</h1>');\n}}\n\napp.whenReady().then(createWindow);\napp.on('window-all-closed', () => app.quit());\n"
        ),
        FrameworkId::Phaser => format!(
            "import Phaser from 'phaser';\n\nclass MainScene extends Phaser.Scene {{\n  create() {{\n    this.add.text(16, 16, '{name}', {{ color: '#ffffff' }});\n  }}\n}}\n\nexport const config = {{\n  type: Phaser.AUTO,\n  width: 800,\n  height: 600,\n  scene: MainScene,\n}};\n\nif (typeof window !== 'undefined') {{\n  new Phaser.Game(config);\n}}\n"
        ),
        _ => format!(
            "export function greet(name{s}){r} {{\n  return `Hello from {name}, ${{name}}!`;\n}}\n",
            s = if ts { ": string" } else { "" },
            r = if ts { ": string" } else { "" }
        ),
    }
}

fn vite_config(framework: FrameworkId) -> String {
    let (import, plugin) = match framework {
        FrameworkId::React => ("import react from '@vitejs/plugin-react';\n", "react()"),
        FrameworkId::Vue => ("import vue from '@vitejs/plugin-vue';\n", "vue()"),
        FrameworkId::Svelte => (
            "import { svelte } from '@sveltejs/vite-plugin-svelte';\n",
            "svelte()",
        ),
        FrameworkId::Solid => ("import solid from 'vite-plugin-solid';\n", "solid()"),
        _ => ("", ""),
    };
    format!(
        "import {{ defineConfig }} from 'vite';\n{import}\nexport default defineConfig({{\n  plugins: [{plugin}],\n}});\n"
    )
}

fn index_html(name: &str, entry: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n  <head>\n    <meta charset=\"UTF-8\" />\n    <title>{name}</title>\n  </head>\n  <body>\n    <div id=\"root\"></div>\n    <script type=\"module\" src=\"/{entry}\"></script>\n  </body>\n</html>\n"
    )
}

fn test_file(stack: &TechStack, ext: &str) -> (String, String) {
    let dir = if stack.testing == TestingId::Mocha {
        "test"
    } else {
        "tests"
    };
    let path = format!("{dir}/app.test.{ext}");
    let header = match stack.testing {
        TestingId::Jest => "",
        TestingId::Mocha => "import { expect } from 'chai';\n",
        _ => "import { describe, it, expect } from 'vitest';\n",
    };
    let assertion = if stack.testing == TestingId::Mocha {
        "expect(1 + 1).to.equal(2);"
    } else {
        "expect(1 + 1).toBe(2);"
    };
    let body = format!(
        "{header}\ndescribe('smoke', () => {{\n  it('runs', () => {{\n    {assertion}\n  }});\n}});\n"
    );
    (path, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn express_stack() -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::TypeScript,
            runtime: RuntimeId::Node,
            framework: FrameworkId::Express,
            database: DatabaseId::Postgres,
            orm: OrmId::Prisma,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::Npm,
            styling: StylingId::None,
            testing: TestingId::Vitest,
        }
    }

    #[test]
    fn test_package_json_dependencies() {
        let package = package_json("calm-heron-ab12", &express_stack());
        assert_eq!(package["name"], "calm-heron-ab12");
        assert!(package["dependencies"]["express"].is_string());
        assert!(package["dependencies"]["@prisma/client"].is_string());
        assert!(package["dependencies"]["pg"].is_string());
        assert!(package["devDependencies"]["vitest"].is_string());
        assert_eq!(package["scripts"]["test"], "vitest run");
        assert_eq!(package["scripts"]["build"], "tsc");
    }

    #[test]
    fn test_deno_json_tasks() {
        let mut stack = express_stack();
        stack.framework = FrameworkId::Hono;
        stack.runtime = RuntimeId::Deno;
        stack.build_tool = BuildToolId::Deno;
        let deno = deno_json(&stack);
        assert_eq!(deno["tasks"]["start"], "deno run -A src/index.ts");
        assert!(deno["imports"]["hono"].is_string());
    }

    #[test]
    fn test_express_entry_has_health_route() {
        let source = entry_source("calm-heron-ab12", &express_stack());
        assert!(source.contains("app.get('/health'"));
        assert!(source.contains("const port: number"));
    }

    #[test]
    fn test_mocha_test_lives_in_test_dir() {
        let mut stack = express_stack();
        stack.testing = TestingId::Mocha;
        let (path, body) = test_file(&stack, "ts");
        assert_eq!(path, "test/app.test.ts");
        assert!(body.contains("to.equal(2)"));
    }
}
