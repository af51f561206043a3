pub const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS museum (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL CHECK (length(trim(name)) > 0)
    );

    CREATE TABLE IF NOT EXISTS titles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title_text TEXT UNIQUE NOT NULL CHECK (length(trim(title_text)) > 0)
    );

    CREATE TABLE IF NOT EXISTS artists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        artist_name TEXT UNIQUE NOT NULL CHECK (length(trim(artist_name)) > 0)
    );

    CREATE TABLE IF NOT EXISTS mediums (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        medium_text TEXT UNIQUE NOT NULL CHECK (length(trim(medium_text)) > 0)
    );

    CREATE TABLE IF NOT EXISTS classifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        classification_text TEXT UNIQUE NOT NULL CHECK (length(trim(classification_text)) > 0)
    );

    CREATE TABLE IF NOT EXISTS cultures (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        culture_text TEXT UNIQUE NOT NULL CHECK (length(trim(culture_text)) > 0)
    );

    CREATE TABLE IF NOT EXISTS dates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date_text TEXT UNIQUE NOT NULL CHECK (length(trim(date_text)) > 0)
    );

    CREATE TABLE IF NOT EXISTS artworks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        original_id INTEGER NOT NULL,
        museum_id INTEGER NOT NULL,
        title_id INTEGER NOT NULL,
        artist_id INTEGER NOT NULL,
        medium_id INTEGER NOT NULL,
        classification_id INTEGER NOT NULL,
        culture_id INTEGER NOT NULL,
        date_id INTEGER NOT NULL,
        UNIQUE(museum_id, original_id),
        FOREIGN KEY(museum_id) REFERENCES museum(id),
        FOREIGN KEY(title_id) REFERENCES titles(id),
        FOREIGN KEY(artist_id) REFERENCES artists(id),
        FOREIGN KEY(medium_id) REFERENCES mediums(id),
        FOREIGN KEY(classification_id) REFERENCES classifications(id),
        FOREIGN KEY(culture_id) REFERENCES cultures(id),
        FOREIGN KEY(date_id) REFERENCES dates(id)
    );
";
