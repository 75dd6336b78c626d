//! SQL schema for the catalog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.
//!
//! Constraint names matter: the writer classifies CHECK failures by the name
//! SQLite reports, and UNIQUE failures by the `table.column` it reports.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Referenced rows. Managed elsewhere; mirrored here so foreign keys hold.
CREATE TABLE IF NOT EXISTS brands (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS attributes (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS options (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Prices are canonical decimal strings.
CREATE TABLE IF NOT EXISTS products (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT    NOT NULL,
    description       TEXT    NOT NULL DEFAULT '',
    short_description TEXT    NOT NULL DEFAULT '',
    image_url         TEXT    NOT NULL,
    slug              TEXT    NOT NULL,
    base_price        TEXT    NOT NULL,
    sale_price        TEXT,
    is_featured       INTEGER NOT NULL DEFAULT 0,
    sale_start_date   TEXT,
    sale_end_date     TEXT,
    status            TEXT    NOT NULL DEFAULT 'ACTIVE',
    brand_id          INTEGER NOT NULL REFERENCES brands(id),
    category_id       INTEGER NOT NULL REFERENCES categories(id),
    user_id           INTEGER NOT NULL REFERENCES users(id),
    version           INTEGER NOT NULL DEFAULT 1,
    created_at        TEXT    NOT NULL,
    updated_at        TEXT    NOT NULL,
    CONSTRAINT products_base_price_check
        CHECK (CAST(base_price AS REAL) >= 0),
    CONSTRAINT products_sale_price_check
        CHECK (sale_price IS NULL OR CAST(sale_price AS REAL) >= 0),
    CONSTRAINT products_status_check
        CHECK (status IN ('ACTIVE', 'INACTIVE', 'OUT_OF_STOCK', 'DISCONTINUED'))
);

CREATE UNIQUE INDEX IF NOT EXISTS products_slug_key ON products(slug);
CREATE UNIQUE INDEX IF NOT EXISTS products_name_key ON products(name);

CREATE TABLE IF NOT EXISTS product_attribute_info (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    name       TEXT    NOT NULL,
    value      TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS product_option_info (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    name       TEXT    NOT NULL,
    value      TEXT    NOT NULL
);

-- Vocabulary: append-only, shared across products.
CREATE TABLE IF NOT EXISTS attribute_values (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    attribute_id INTEGER NOT NULL REFERENCES attributes(id),
    value        TEXT    NOT NULL,
    UNIQUE (attribute_id, value)
);

CREATE TABLE IF NOT EXISTS option_values (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    option_id INTEGER NOT NULL REFERENCES options(id),
    value     TEXT    NOT NULL,
    UNIQUE (option_id, value)
);

CREATE TABLE IF NOT EXISTS skus (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id      INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    sku             TEXT    NOT NULL UNIQUE,
    sku_signature   TEXT    NOT NULL UNIQUE,
    extra_price     TEXT    NOT NULL DEFAULT '0',
    sale_type       TEXT,
    sale_value      TEXT,
    sale_start_date TEXT,
    sale_end_date   TEXT,
    status          TEXT    NOT NULL DEFAULT 'ACTIVE',
    version         INTEGER NOT NULL DEFAULT 1,
    CONSTRAINT skus_sale_value_check
        CHECK (sale_value IS NULL OR CAST(sale_value AS REAL) >= 0),
    CONSTRAINT skus_status_check
        CHECK (status IN ('ACTIVE', 'INACTIVE', 'OUT_OF_STOCK', 'DISCONTINUED'))
);

-- Exactly one row per SKU.
CREATE TABLE IF NOT EXISTS inventories (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id      INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    sku_id          INTEGER NOT NULL UNIQUE REFERENCES skus(id) ON DELETE CASCADE,
    available_stock INTEGER NOT NULL DEFAULT 0,
    reserved_stock  INTEGER NOT NULL DEFAULT 0,
    damaged_stock   INTEGER NOT NULL DEFAULT 0,
    version         INTEGER NOT NULL DEFAULT 1,
    CONSTRAINT inventories_stock_check
        CHECK (available_stock >= 0 AND reserved_stock >= 0 AND damaged_stock >= 0)
);

CREATE TABLE IF NOT EXISTS option_combinations (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id    INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    option_id     INTEGER NOT NULL REFERENCES options(id),
    display_order INTEGER NOT NULL,
    UNIQUE (product_id, option_id)
);

CREATE INDEX IF NOT EXISTS product_attribute_info_product_idx ON product_attribute_info(product_id);
CREATE INDEX IF NOT EXISTS product_option_info_product_idx    ON product_option_info(product_id);
CREATE INDEX IF NOT EXISTS skus_product_idx                   ON skus(product_id);

PRAGMA user_version = 1;
";
