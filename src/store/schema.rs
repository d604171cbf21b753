pub const SCHEMA: &str = r#"
-- Accounts; role is 'employee' or 'owner'
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- pbkdf2:sha256:<iterations>$<salt>$<hex>
    role TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Video catalog; filename points into the upload directory
CREATE TABLE IF NOT EXISTS videos (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    filename TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Per-user watched flags
CREATE TABLE IF NOT EXISTS progress (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    video_id TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
    watched INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT DEFAULT (datetime('now')),

    UNIQUE(user_id, video_id)
);

CREATE INDEX IF NOT EXISTS idx_videos_category ON videos(category);
CREATE INDEX IF NOT EXISTS idx_progress_user ON progress(user_id);
"#;
