pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    api_key TEXT NOT NULL UNIQUE,
    plan TEXT NOT NULL DEFAULT 'free',
    monthly_limit INTEGER NOT NULL DEFAULT 100,
    validations_used INTEGER NOT NULL DEFAULT 0,
    passed_min INTEGER NOT NULL DEFAULT 70,
    borderline_min INTEGER NOT NULL DEFAULT 40,
    block_rejected INTEGER NOT NULL DEFAULT 0,
    rejection_message TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS forms (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    form_key TEXT NOT NULL UNIQUE,
    is_active INTEGER NOT NULL DEFAULT 1,
    validation_count INTEGER NOT NULL DEFAULT 0,
    passed_count INTEGER NOT NULL DEFAULT 0,
    avg_score REAL NOT NULL DEFAULT 0.0,
    pass_rate REAL NOT NULL DEFAULT 0.0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS validations (
    id TEXT PRIMARY KEY,
    form_id TEXT NOT NULL REFERENCES forms(id) ON DELETE CASCADE,
    account_id TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    company TEXT,
    ip TEXT,
    score INTEGER NOT NULL,
    status TEXT NOT NULL,
    manually_passed INTEGER NOT NULL DEFAULT 0,
    signals_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS integrations (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    provider TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'connected',
    connection_id TEXT,
    field_mappings_json TEXT NOT NULL DEFAULT '[]',
    last_synced_at TEXT,
    created_at TEXT NOT NULL,
    UNIQUE(account_id, provider)
);

CREATE TABLE IF NOT EXISTS integration_logs (
    id TEXT PRIMARY KEY,
    integration_id TEXT NOT NULL REFERENCES integrations(id) ON DELETE CASCADE,
    validation_id TEXT NOT NULL,
    success INTEGER NOT NULL,
    error TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_validations_form ON validations(form_id);
CREATE INDEX IF NOT EXISTS idx_validations_account ON validations(account_id);
CREATE INDEX IF NOT EXISTS idx_integration_logs_integration ON integration_logs(integration_id);
";
