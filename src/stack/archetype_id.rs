crate::define_id_enum! {
    /// What kind of project a seed produces.
    ArchetypeId {
        Backend => "backend" : "Backend Service" | "api" | "server",
        Frontend => "frontend" : "Frontend App" | "web" | "spa",
        Fullstack => "fullstack" : "Full-stack App",
        Cli => "cli" : "Command-line Tool",
        Library => "library" : "Library" | "lib",
        Mobile => "mobile" : "Mobile App",
        Desktop => "desktop" : "Desktop App",
        Game => "game" : "Game",
    }
}

impl ArchetypeId {
    /// Archetypes without a natural framework; resolution substitutes a
    /// language-keyed default instead of drawing one.
    pub fn has_natural_framework(&self) -> bool {
        !matches!(self, ArchetypeId::Library | ArchetypeId::Game)
    }
}
