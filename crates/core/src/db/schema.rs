pub const SCHEMA: &str = "
-- Core prompts table
CREATE TABLE IF NOT EXISTS prompts (
    id INTEGER PRIMARY KEY,       -- Surrogate key, assigned on insert
    uuid TEXT UNIQUE NOT NULL,    -- Stable identifier (UUID v4 string)
    title TEXT NOT NULL,          -- Display title
    content TEXT NOT NULL,        -- The prompt text
    category TEXT NOT NULL,       -- Free-text category
    is_builtin BOOLEAN NOT NULL   -- 1 when owned by the bundled definition file
);

-- Filtering by origin
CREATE INDEX IF NOT EXISTS idx_prompts_builtin ON prompts(is_builtin);
";
