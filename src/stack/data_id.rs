crate::define_id_enum! {
    DatabaseId {
        Postgres => "postgresql" : "PostgreSQL" | "postgres" | "pg",
        Mysql => "mysql" : "MySQL" | "mariadb",
        Sqlite => "sqlite" : "SQLite",
        Mongodb => "mongodb" : "MongoDB" | "mongo",
        Redis => "redis" : "Redis",
        None => "none" : "None",
    }
}

crate::define_id_enum! {
    OrmId {
        Prisma => "prisma" : "Prisma",
        Drizzle => "drizzle" : "Drizzle ORM" | "drizzle-orm",
        TypeOrm => "typeorm" : "TypeORM",
        Sequelize => "sequelize" : "Sequelize",
        Mongoose => "mongoose" : "Mongoose",
        SqlAlchemy => "sqlalchemy" : "SQLAlchemy",
        DjangoOrm => "django-orm" : "Django ORM",
        Diesel => "diesel" : "Diesel",
        SeaOrm => "sea-orm" : "SeaORM" | "seaorm",
        Sqlx => "sqlx" : "SQLx",
        Gorm => "gorm" : "GORM",
        Ent => "ent" : "ent",
        Hibernate => "hibernate" : "Hibernate" | "jpa",
        Exposed => "exposed" : "Exposed",
        EfCore => "ef-core" : "Entity Framework Core" | "efcore",
        ActiveRecord => "active-record" : "Active Record" | "activerecord",
        Eloquent => "eloquent" : "Eloquent",
        Doctrine => "doctrine" : "Doctrine",
        Ecto => "ecto" : "Ecto",
        Fluent => "fluent" : "Fluent",
        Drift => "drift" : "Drift",
        None => "none" : "None",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_aliases() {
        assert_eq!(DatabaseId::from_name("postgres"), Some(DatabaseId::Postgres));
        assert_eq!(DatabaseId::Postgres.as_str(), "postgresql");
    }

    #[test]
    fn test_orm_round_trip_name() {
        let parsed: OrmId = serde_json::from_str("\"django-orm\"").unwrap();
        assert_eq!(parsed, OrmId::DjangoOrm);
        assert_eq!(parsed.name(), "Django ORM");
    }
}
