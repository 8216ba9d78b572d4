//! Persistence layer files: ORM schema or entity definitions and connection
//! settings. Runs after the language skeleton so it can extend its layout.

use super::common::{module_name, pascal_case};
use crate::stack::{DatabaseId, LanguageId, OrmId, TechStack};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct DataLayerStrategy;

#[async_trait]
impl GenerationStrategy for DataLayerStrategy {
    fn id(&self) -> &str {
        "data"
    }

    fn name(&self) -> &str {
        "Data layer"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.database != DatabaseId::None
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let module = module_name(ctx.project_name);
        let pascal = pascal_case(ctx.project_name);
        let ts = stack.language == LanguageId::TypeScript;
        let ext = if ts { "ts" } else { "js" };

        match stack.orm {
            OrmId::Prisma => ctx.write("prisma/schema.prisma", prisma_schema(stack.database)),
            OrmId::Drizzle => {
                ctx.write(format!("src/db/schema.{ext}"), drizzle_schema(stack.database));
                ctx.write(
                    format!("drizzle.config.{ext}"),
                    format!(
                        "export default {{\n  schema: './src/db/schema.{ext}',\n  out: './drizzle',\n  dialect: '{}',\n  dbCredentials: {{ url: process.env.DATABASE_URL }},\n}};\n",
                        match stack.database {
                            DatabaseId::Mysql => "mysql",
                            DatabaseId::Sqlite => "sqlite",
                            _ => "postgresql",
                        }
                    ),
                );
            }
            OrmId::TypeOrm => ctx.write(
                format!("src/entity/User.{ext}"),
                "import { Entity, PrimaryGeneratedColumn, Column } from 'typeorm';\n\n@Entity()\nexport class User {\n  @PrimaryGeneratedColumn()\n  id;\n\n  @Column({ unique: true })\n  email;\n}\n"
                    .replace("  id;", if ts { "  id!: number;" } else { "  id;" })
                    .replace("  email;", if ts { "  email!: string;" } else { "  email;" }),
            ),
            OrmId::Sequelize => ctx.write(
                format!("src/models/user.{ext}"),
                "import { DataTypes } from 'sequelize';\n\nexport function defineUser(sequelize) {\n  return sequelize.define('User', {\n    email: { type: DataTypes.STRING, allowNull: false, unique: true },\n  });\n}\n"
                    .replace("(sequelize)", if ts { "(sequelize: any)" } else { "(sequelize)" }),
            ),
            OrmId::Mongoose => ctx.write(
                format!("src/models/user.{ext}"),
                "import mongoose from 'mongoose';\n\nconst userSchema = new mongoose.Schema({\n  email: { type: String, required: true, unique: true },\n});\n\nexport const User = mongoose.model('User', userSchema);\n",
            ),
            OrmId::SqlAlchemy => ctx.write(
                format!("{module}/models.py"),
                "from sqlalchemy import String\nfrom sqlalchemy.orm import DeclarativeBase, Mapped, mapped_column\n\n\nclass Base(DeclarativeBase):\n    pass\n\n\nclass User(Base):\n    __tablename__ = \"users\"\n\n    id: Mapped[int] = mapped_column(primary_key=True)\n    email: Mapped[str] = mapped_column(String(255), unique=True)\n",
            ),
            OrmId::DjangoOrm => ctx.write(
                format!("{module}/models.py"),
                "from django.db import models\n\n\nclass User(models.Model):\n    email = models.EmailField(unique=True)\n    created_at = models.DateTimeField(auto_now_add=True)\n",
            ),
            OrmId::Diesel => {
                ctx.write(
                    "diesel.toml",
                    "[print_schema]\nfile = \"src/schema.rs\"\n\n[migrations_directory]\ndir = \"migrations\"\n",
                );
                ctx.write(
                    "migrations/0001_create_users/up.sql",
                    sql_users_table(stack.database),
                );
                ctx.write("migrations/0001_create_users/down.sql", "DROP TABLE users;\n");
            }
            OrmId::Sqlx | OrmId::SeaOrm => {
                ctx.write("migrations/0001_create_users.sql", sql_users_table(stack.database))
            }
            OrmId::Gorm => ctx.write(
                "internal/models/user.go",
                "package models\n\nimport \"gorm.io/gorm\"\n\n// User is a registered account.\ntype User struct {\n\tgorm.Model\n\tEmail string `gorm:\"uniqueIndex\"`\n}\n",
            ),
            OrmId::Ent => ctx.write(
                "ent/schema/user.go",
                "package schema\n\nimport (\n\t\"entgo.io/ent\"\n\t\"entgo.io/ent/schema/field\"\n)\n\n// User holds the schema definition for the User entity.\ntype User struct {\n\tent.Schema\n}\n\n// Fields of the User.\nfunc (User) Fields() []ent.Field {\n\treturn []ent.Field{\n\t\tfield.String(\"email\").Unique(),\n\t}\n}\n",
            ),
            OrmId::Hibernate => {
                let package = format!("com.example.{module}");
                let (path, body) = if stack.language == LanguageId::Kotlin {
                    (
                        format!("src/main/kotlin/{}/User.kt", package.replace('.', "/")),
                        format!(
                            "package {package}\n\nimport jakarta.persistence.*\n\n@Entity\n@Table(name = \"users\")\nclass User(\n    @Id @GeneratedValue var id: Long? = null,\n    @Column(unique = true) var email: String = \"\",\n)\n"
                        ),
                    )
                } else {
                    (
                        format!("src/main/java/{}/User.java", package.replace('.', "/")),
                        format!(
                            "package {package};\n\nimport jakarta.persistence.*;\n\n@Entity\n@Table(name = \"users\")\npublic class User {{\n\n    @Id\n    @GeneratedValue\n    private Long id;\n\n    @Column(unique = true)\n    private String email;\n}}\n"
                        ),
                    )
                };
                ctx.write(path, body);
            }
            OrmId::Exposed => ctx.write(
                format!("src/main/kotlin/com/example/{module}/Users.kt"),
                format!(
                    "package com.example.{module}\n\nimport org.jetbrains.exposed.dao.id.LongIdTable\n\nobject Users : LongIdTable(\"users\") {{\n    val email = varchar(\"email\", 255).uniqueIndex()\n}}\n"
                ),
            ),
            OrmId::EfCore => ctx.write(
                "Data/AppDbContext.cs",
                format!(
                    "using Microsoft.EntityFrameworkCore;\n\nnamespace {pascal}.Data;\n\npublic class User\n{{\n    public long Id {{ get; set; }}\n    public string Email {{ get; set; }} = \"\";\n}}\n\npublic class AppDbContext(DbContextOptions<AppDbContext> options) : DbContext(options)\n{{\n    public DbSet<User> Users => Set<User>();\n}}\n"
                ),
            ),
            OrmId::ActiveRecord => {
                ctx.write(
                    "app/models/user.rb",
                    "class User < ActiveRecord::Base\n  validates :email, presence: true, uniqueness: true\nend\n",
                );
                ctx.write(
                    "db/migrate/20240101000000_create_users.rb",
                    "class CreateUsers < ActiveRecord::Migration[7.2]\n  def change\n    create_table :users do |t|\n      t.string :email, null: false, index: { unique: true }\n      t.timestamps\n    end\n  end\nend\n",
                );
            }
            OrmId::Eloquent => ctx.write(
                "app/Models/User.php",
                "<?php\n\nnamespace App\\Models;\n\nuse Illuminate\\Database\\Eloquent\\Model;\n\nclass User extends Model\n{\n    protected $fillable = ['email'];\n}\n",
            ),
            OrmId::Doctrine => ctx.write(
                "src/Entity/User.php",
                format!(
                    "<?php\n\nnamespace {pascal}\\Entity;\n\nuse Doctrine\\ORM\\Mapping as ORM;\n\n#[ORM\\Entity]\n#[ORM\\Table(name: 'users')]\nclass User\n{{\n    #[ORM\\Id, ORM\\GeneratedValue, ORM\\Column]\n    private ?int $id = null;\n\n    #[ORM\\Column(unique: true)]\n    private string $email = '';\n}}\n"
                ),
            ),
            OrmId::Ecto => {
                ctx.write(
                    format!("lib/{module}/user.ex"),
                    format!(
                        "defmodule {pascal}.User do\n  use Ecto.Schema\n\n  schema \"users\" do\n    field :email, :string\n    timestamps()\n  end\nend\n"
                    ),
                );
                ctx.write(
                    "priv/repo/migrations/20240101000000_create_users.exs",
                    format!(
                        "defmodule {pascal}.Repo.Migrations.CreateUsers do\n  use Ecto.Migration\n\n  def change do\n    create table(:users) do\n      add :email, :string, null: false\n      timestamps()\n    end\n\n    create unique_index(:users, [:email])\n  end\nend\n"
                    ),
                );
            }
            OrmId::Fluent => ctx.write(
                format!("Sources/{pascal}/Models/User.swift"),
                "import Fluent\n\nfinal class User: Model, @unchecked Sendable {\n    static let schema = \"users\"\n\n    @ID(key: .id) var id: UUID?\n    @Field(key: \"email\") var email: String\n\n    init() {}\n}\n",
            ),
            OrmId::Drift => ctx.write(
                "lib/database.dart",
                "import 'package:drift/drift.dart';\n\nclass Users extends Table {\n  IntColumn get id => integer().autoIncrement()();\n  TextColumn get email => text().unique()();\n}\n",
            ),
            OrmId::None => {
                if matches!(
                    stack.database,
                    DatabaseId::Postgres | DatabaseId::Mysql | DatabaseId::Sqlite
                ) {
                    ctx.write("db/schema.sql", sql_users_table(stack.database));
                }
            }
        }
        Ok(())
    }
}

/// Connection string used by generated config and compose files.
pub fn database_url(database: DatabaseId, project_name: &str) -> Option<String> {
    let db = module_name(project_name);
    let url = match database {
        DatabaseId::Postgres => format!("postgres://app:app@db:5432/{db}"),
        DatabaseId::Mysql => format!("mysql://app:app@db:3306/{db}"),
        DatabaseId::Sqlite => format!("file:./{db}.db"),
        DatabaseId::Mongodb => format!("mongodb://db:27017/{db}"),
        DatabaseId::Redis => "redis://db:6379".to_string(),
        DatabaseId::None => return None,
    };
    Some(url)
}

fn prisma_schema(database: DatabaseId) -> String {
    let (provider, id) = match database {
        DatabaseId::Mysql => ("mysql", "Int     @id @default(autoincrement())"),
        DatabaseId::Sqlite => ("sqlite", "Int     @id @default(autoincrement())"),
        DatabaseId::Mongodb => ("mongodb", "String  @id @default(auto()) @map(\"_id\") @db.ObjectId"),
        _ => ("postgresql", "Int     @id @default(autoincrement())"),
    };
    format!(
        "generator client {{\n  provider = \"prisma-client-js\"\n}}\n\ndatasource db {{\n  provider = \"{provider}\"\n  url      = env(\"DATABASE_URL\")\n}}\n\nmodel User {{\n  id    {id}\n  email String  @unique\n}}\n"
    )
}

fn drizzle_schema(database: DatabaseId) -> &'static str {
    match database {
        DatabaseId::Mysql => "import { mysqlTable, serial, varchar } from 'drizzle-orm/mysql-core';\n\nexport const users = mysqlTable('users', {\n  id: serial('id').primaryKey(),\n  email: varchar('email', { length: 255 }).notNull().unique(),\n});\n",
        DatabaseId::Sqlite => "import { sqliteTable, integer, text } from 'drizzle-orm/sqlite-core';\n\nexport const users = sqliteTable('users', {\n  id: integer('id').primaryKey(),\n  email: text('email').notNull().unique(),\n});\n",
        _ => "import { pgTable, serial, text } from 'drizzle-orm/pg-core';\n\nexport const users = pgTable('users', {\n  id: serial('id').primaryKey(),\n  email: text('email').notNull().unique(),\n});\n",
    }
}

fn sql_users_table(database: DatabaseId) -> String {
    let id = match database {
        DatabaseId::Mysql => "BIGINT AUTO_INCREMENT PRIMARY KEY",
        DatabaseId::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        _ => "BIGSERIAL PRIMARY KEY",
    };
    format!("CREATE TABLE users (\n    id {id},\n    email VARCHAR(255) NOT NULL UNIQUE\n);\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prisma_provider_follows_database() {
        assert!(prisma_schema(DatabaseId::Mongodb).contains("provider = \"mongodb\""));
        assert!(prisma_schema(DatabaseId::Postgres).contains("provider = \"postgresql\""));
    }

    #[test]
    fn test_database_url() {
        assert_eq!(
            database_url(DatabaseId::Postgres, "calm-heron").as_deref(),
            Some("postgres://app:app@db:5432/calm_heron")
        );
        assert!(database_url(DatabaseId::None, "x").is_none());
    }

    #[test]
    fn test_sql_dialects() {
        assert!(sql_users_table(DatabaseId::Sqlite).contains("AUTOINCREMENT"));
        assert!(sql_users_table(DatabaseId::Postgres).contains("BIGSERIAL"));
    }
}
