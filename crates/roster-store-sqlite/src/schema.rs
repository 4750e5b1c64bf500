//! SQL for the roster SQLite store.
//!
//! Every statement is idempotent: tables are created if missing and dropped
//! if present. Statements run in autocommit mode, so each one is committed
//! on its own.

/// Applied once per connection.
///
/// SQLite's own foreign-key enforcement stays off: references are checked
/// before every write through the session's lookups, and tables drop
/// unconditionally.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
";

/// Departments are owned elsewhere; this table only needs to exist for the
/// employee foreign key and existence checks.
pub const CREATE_DEPARTMENTS: &str = "
CREATE TABLE IF NOT EXISTS departments (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
)";

pub const DROP_DEPARTMENTS: &str = "DROP TABLE IF EXISTS departments";

pub const CREATE_EMPLOYEES: &str = "
CREATE TABLE IF NOT EXISTS employees (
    id            INTEGER PRIMARY KEY,
    name          TEXT,
    job_title     TEXT,
    department_id INTEGER,
    FOREIGN KEY (department_id) REFERENCES departments (id)
)";

pub const DROP_EMPLOYEES: &str = "DROP TABLE IF EXISTS employees";

pub const CREATE_REVIEWS: &str = "
CREATE TABLE IF NOT EXISTS reviews (
    id          INTEGER PRIMARY KEY,
    year        INTEGER,
    summary     TEXT,
    employee_id INTEGER,
    FOREIGN KEY (employee_id) REFERENCES employees (id)
)";

pub const DROP_REVIEWS: &str = "DROP TABLE IF EXISTS reviews";
