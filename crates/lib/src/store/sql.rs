//! Idempotent schema definitions, executed on every startup.

pub const CREATE_CATEGORIES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE,
        icon TEXT,
        description TEXT
    );
";

pub const CREATE_ARTICLES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        summary TEXT,
        content TEXT NOT NULL,
        title_en TEXT,
        summary_en TEXT,
        content_en TEXT,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        source_url TEXT NOT NULL UNIQUE,
        source_name TEXT,
        credibility INTEGER NOT NULL DEFAULT 3,
        image_url TEXT,
        ai_generated INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

pub const CREATE_ARTICLES_SOURCE_INDEX: &str = "
    CREATE UNIQUE INDEX IF NOT EXISTS idx_articles_source_url ON articles(source_url);
";

pub const CREATE_GLOSSARY_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS glossary_terms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        banned TEXT NOT NULL UNIQUE,
        preferred TEXT NOT NULL
    );
";

pub const CREATE_EMBEDDINGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS article_embeddings (
        article_id INTEGER PRIMARY KEY,
        embedding BLOB NOT NULL,
        document TEXT NOT NULL,
        slug TEXT NOT NULL,
        title TEXT NOT NULL,
        category TEXT NOT NULL
    );
";

pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_CATEGORIES_TABLE,
    CREATE_ARTICLES_TABLE,
    CREATE_ARTICLES_SOURCE_INDEX,
    CREATE_GLOSSARY_TABLE,
    CREATE_EMBEDDINGS_TABLE,
];
