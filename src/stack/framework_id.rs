crate::define_id_enum! {
    /// Framework identifier. Library and game archetypes resolve to a
    /// language-keyed default rather than drawing from this list.
    FrameworkId {
        // backend
        Express => "express" : "Express",
        Fastify => "fastify" : "Fastify",
        NestJs => "nestjs" : "NestJS",
        Hono => "hono" : "Hono",
        Django => "django" : "Django",
        FastApi => "fastapi" : "FastAPI",
        Flask => "flask" : "Flask",
        Axum => "axum" : "Axum",
        Actix => "actix" : "Actix Web" | "actix-web",
        Gin => "gin" : "Gin",
        Echo => "echo" : "Echo",
        Fiber => "fiber" : "Fiber",
        SpringBoot => "spring-boot" : "Spring Boot" | "spring",
        Quarkus => "quarkus" : "Quarkus",
        Ktor => "ktor" : "Ktor",
        AspNetCore => "aspnet-core" : "ASP.NET Core" | "aspnet",
        Rails => "rails" : "Rails" | "ruby-on-rails",
        Sinatra => "sinatra" : "Sinatra",
        Laravel => "laravel" : "Laravel",
        Symfony => "symfony" : "Symfony",
        Phoenix => "phoenix" : "Phoenix",
        Vapor => "vapor" : "Vapor",
        // frontend
        React => "react" : "React",
        Vue => "vue" : "Vue" | "vuejs",
        Svelte => "svelte" : "Svelte",
        Angular => "angular" : "Angular",
        Solid => "solid" : "SolidJS" | "solidjs",
        // fullstack
        NextJs => "nextjs" : "Next.js" | "next",
        Nuxt => "nuxt" : "Nuxt",
        SvelteKit => "sveltekit" : "SvelteKit",
        Remix => "remix" : "Remix",
        // cli
        Commander => "commander" : "Commander.js",
        Typer => "typer" : "Typer",
        Click => "click" : "Click",
        Clap => "clap" : "clap",
        Cobra => "cobra" : "Cobra",
        // mobile
        ReactNative => "react-native" : "React Native",
        Flutter => "flutter" : "Flutter",
        SwiftUi => "swiftui" : "SwiftUI",
        JetpackCompose => "jetpack-compose" : "Jetpack Compose" | "compose",
        // desktop
        Electron => "electron" : "Electron",
        Tauri => "tauri" : "Tauri",
        // game
        Bevy => "bevy" : "Bevy",
        Pygame => "pygame" : "Pygame",
        Phaser => "phaser" : "Phaser",
        MonoGame => "monogame" : "MonoGame",
        Raylib => "raylib" : "raylib",
        Ebiten => "ebiten" : "Ebitengine" | "ebitengine",
        // library
        Stdlib => "stdlib" : "Standard Library" | "none",
    }
}
