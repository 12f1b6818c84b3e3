//! SQL schema for the planner SQLite store.
//!
//! Executed once at connection startup; `PRAGMA user_version` records the
//! schema revision so future migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys cascade: deleting a person removes the projects they manage
/// and every assignment that pointed at either.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    working_hours INTEGER            -- per week; NULL when unknown
);

CREATE TABLE IF NOT EXISTS projects (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT    NOT NULL,
    project_manager_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    budget             TEXT              -- decimal string, scale 2
);

CREATE TABLE IF NOT EXISTS assignments (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id     INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    person_id      INTEGER NOT NULL REFERENCES persons(id)  ON DELETE CASCADE,
    assigned_hours INTEGER NOT NULL CHECK (assigned_hours > 0),
    timeline_start TEXT,                 -- YYYY-MM-DD
    timeline_end   TEXT,                 -- YYYY-MM-DD
    CHECK (timeline_start IS NULL OR timeline_end IS NULL
           OR timeline_start <= timeline_end)
);

CREATE INDEX IF NOT EXISTS projects_manager_idx    ON projects(project_manager_id);
CREATE INDEX IF NOT EXISTS assignments_project_idx ON assignments(project_id);
CREATE INDEX IF NOT EXISTS assignments_person_idx  ON assignments(person_id);

PRAGMA user_version = 1;
";

/// Projects joined with their manager's current name.
pub const PROJECT_SELECT: &str = "
SELECT p.id, p.name, p.project_manager_id, m.name, p.budget
FROM projects p
LEFT JOIN persons m ON m.id = p.project_manager_id";

/// Assignments joined with the current project and person names.
pub const ASSIGNMENT_SELECT: &str = "
SELECT a.id, a.project_id, pr.name, a.person_id, pe.name,
       a.assigned_hours, a.timeline_start, a.timeline_end
FROM assignments a
LEFT JOIN projects pr ON pr.id = a.project_id
LEFT JOIN persons  pe ON pe.id = a.person_id";
