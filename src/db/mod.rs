mod schema;
mod tags;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use crate::error::{MissingRefs, Result, ServiceError};
use crate::models::*;

use tags::TagTarget;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "rolodex")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("rolodex.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.lock();
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database lock poisoned")
    }

    // ============================================================
    // Person operations
    // ============================================================

    pub fn create_person(&self, input: CreatePersonInput) -> Result<Person> {
        let conn = self.lock();

        // Uniqueness of the name pair is a service-layer rule, not a
        // storage constraint.
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM persons WHERE first_name = ? AND last_name = ?",
                params![input.first_name, input.last_name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Err(ServiceError::Duplicate {
                entity: "Person",
                name: format!("{} {}", input.first_name, input.last_name)
                    .trim()
                    .to_string(),
                id,
            });
        }

        conn.execute(
            "INSERT INTO persons (first_name, last_name) VALUES (?, ?)",
            params![input.first_name, input.last_name],
        )?;

        Ok(Person {
            id: conn.last_insert_rowid(),
            first_name: input.first_name,
            last_name: input.last_name,
        })
    }

    pub fn list_persons(&self) -> Result<Vec<Person>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name FROM persons ORDER BY last_name, first_name",
        )?;
        let persons = stmt
            .query_map([], map_person)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(persons)
    }

    pub fn search_persons(&self, query: &str) -> Result<Vec<Person>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name FROM persons
             WHERE instr(lower(first_name), lower(?1)) > 0
                OR instr(lower(last_name), lower(?1)) > 0
             ORDER BY first_name, last_name",
        )?;
        let persons = stmt
            .query_map(params![query], map_person)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(persons)
    }

    /// Top persons by note count, descending. Ties fall back to storage
    /// order, which is stable but otherwise unspecified.
    pub fn top_persons(&self, limit: u32) -> Result<Vec<PersonWithNoteCount>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.first_name, p.last_name, COUNT(np.note_id) AS note_count
             FROM persons p
             LEFT JOIN note_persons np ON np.person_id = p.id
             GROUP BY p.id
             ORDER BY note_count DESC
             LIMIT ?",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(PersonWithNoteCount {
                    person: map_person(row)?,
                    note_count: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Add several persons at once from "First Last" (or bare "First")
    /// strings. Existing name pairs are skipped, not errors.
    pub fn bulk_add_persons(&self, names: &[String]) -> Result<BulkAddOutcome> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let mut added = Vec::new();
        let mut skipped = Vec::new();

        for raw in names {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            let (first, last) = match name.split_once(char::is_whitespace) {
                Some((first, rest)) => (first, rest.trim()),
                None => (name, ""),
            };
            let full = format!("{first} {last}").trim().to_string();

            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM persons WHERE first_name = ? AND last_name = ?",
                    params![first, last],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                Some(id) => skipped.push(format!("{full} (ID: {id})")),
                None => {
                    tx.execute(
                        "INSERT INTO persons (first_name, last_name) VALUES (?, ?)",
                        params![first, last],
                    )?;
                    added.push(format!("{full} (ID: {})", tx.last_insert_rowid()));
                }
            }
        }

        tx.commit()?;
        Ok(BulkAddOutcome { added, skipped })
    }

    /// A person plus their most recent notes, newest first. `None` when the
    /// person does not exist.
    pub fn person_with_notes(
        &self,
        id: i64,
        note_limit: u32,
    ) -> Result<Option<(Person, Vec<NoteSummary>)>> {
        let conn = self.lock();

        let person = conn
            .query_row(
                "SELECT id, first_name, last_name FROM persons WHERE id = ?",
                params![id],
                map_person,
            )
            .optional()?;
        let Some(person) = person else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT n.id, n.title, n.content, n.created_at, n.updated_at
             FROM notes n
             JOIN note_persons np ON np.note_id = n.id
             WHERE np.person_id = ?
             ORDER BY datetime(n.created_at) DESC, n.id DESC
             LIMIT ?",
        )?;
        let notes = stmt
            .query_map(params![id, note_limit], map_note_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some((person, notes)))
    }

    // ============================================================
    // Organization operations
    // ============================================================

    pub fn create_organization(&self, input: CreateOrganizationInput) -> Result<Organization> {
        let conn = self.lock();

        // Pre-check so the caller learns the existing ID instead of a bare
        // constraint violation.
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM organizations WHERE name = ?",
                params![input.name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Err(ServiceError::Duplicate {
                entity: "Organization",
                name: input.name,
                id,
            });
        }

        conn.execute(
            "INSERT INTO organizations (name) VALUES (?)",
            params![input.name],
        )?;

        Ok(Organization {
            id: conn.last_insert_rowid(),
            name: input.name,
        })
    }

    pub fn list_organizations(&self) -> Result<Vec<Organization>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM organizations ORDER BY name")?;
        let organizations = stmt
            .query_map([], map_organization)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(organizations)
    }

    pub fn top_organizations(&self, limit: u32) -> Result<Vec<OrganizationWithNoteCount>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT o.id, o.name, COUNT(no_.note_id) AS note_count
             FROM organizations o
             LEFT JOIN note_organizations no_ ON no_.organization_id = o.id
             GROUP BY o.id
             ORDER BY note_count DESC
             LIMIT ?",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(OrganizationWithNoteCount {
                    organization: map_organization(row)?,
                    note_count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ============================================================
    // Note operations
    // ============================================================

    pub fn create_note(&self, input: CreateNoteInput) -> Result<Note> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        // All referenced IDs must resolve before any row is written.
        let missing = MissingRefs {
            persons: tags::unresolved(&tx, "persons", &input.person_ids)?,
            organizations: tags::unresolved(&tx, "organizations", &input.org_ids)?,
            tasks: tags::unresolved(&tx, "tasks", &input.task_ids)?,
        };
        if !missing.is_empty() {
            return Err(ServiceError::ReferenceNotFound(missing));
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO notes (title, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![input.title, input.content, now, now],
        )?;
        let id = tx.last_insert_rowid();

        tags::add_links(&tx, &tags::NOTE_PERSONS, id, &input.person_ids)?;
        tags::add_links(&tx, &tags::NOTE_ORGANIZATIONS, id, &input.org_ids)?;
        tags::add_links(&tx, &tags::NOTE_TASKS, id, &input.task_ids)?;

        tx.commit()?;

        load_note(&conn, id)?.ok_or_else(|| ServiceError::not_found("Note", id))
    }

    /// List notes, newest first. A person/org filter that names a missing
    /// entity is an error; an empty result is not.
    pub fn list_notes(
        &self,
        limit: u32,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Note>> {
        let conn = self.lock();

        let ids: Vec<i64> = if let Some(pid) = person_id {
            ensure_exists(&conn, "persons", "Person", pid)?;
            let mut stmt = conn.prepare(
                "SELECT n.id FROM notes n
                 JOIN note_persons np ON np.note_id = n.id
                 WHERE np.person_id = ?
                 ORDER BY datetime(n.created_at) DESC, n.id DESC
                 LIMIT ?",
            )?;
            let ids = stmt
                .query_map(params![pid, limit], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        } else if let Some(oid) = org_id {
            ensure_exists(&conn, "organizations", "Organization", oid)?;
            let mut stmt = conn.prepare(
                "SELECT n.id FROM notes n
                 JOIN note_organizations no_ ON no_.note_id = n.id
                 WHERE no_.organization_id = ?
                 ORDER BY datetime(n.created_at) DESC, n.id DESC
                 LIMIT ?",
            )?;
            let ids = stmt
                .query_map(params![oid, limit], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        } else {
            let mut stmt = conn.prepare(
                "SELECT id FROM notes ORDER BY datetime(created_at) DESC, id DESC LIMIT ?",
            )?;
            let ids = stmt
                .query_map(params![limit], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        };

        let mut notes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(note) = load_note(&conn, id)? {
                notes.push(note);
            }
        }
        Ok(notes)
    }

    pub fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let conn = self.lock();
        load_note(&conn, id)
    }

    /// Reconcile a note's person/organization/task tags in one transaction.
    pub fn tag_note(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let diff = tags::reconcile(&tx, TagTarget::Note, id, update)?;
        tx.commit()?;
        Ok(diff)
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        if !(0..=10).contains(&input.importance) {
            return Err(ServiceError::Validation(
                "Importance must be between 0 and 10".to_string(),
            ));
        }

        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let missing = MissingRefs {
            persons: tags::unresolved(&tx, "persons", &input.person_ids)?,
            organizations: tags::unresolved(&tx, "organizations", &input.org_ids)?,
            tasks: Vec::new(),
        };
        if !missing.is_empty() {
            return Err(ServiceError::ReferenceNotFound(missing));
        }

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO tasks (title, description, due_at, importance, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)",
            params![
                input.title,
                input.description,
                input.due_at.to_rfc3339(),
                input.importance,
                now,
                now
            ],
        )?;
        let id = tx.last_insert_rowid();

        tags::add_links(&tx, &tags::TASK_PERSONS, id, &input.person_ids)?;
        tags::add_links(&tx, &tags::TASK_ORGANIZATIONS, id, &input.org_ids)?;

        tx.commit()?;

        load_task(&conn, id)?.ok_or_else(|| ServiceError::not_found("Task", id))
    }

    /// List tasks by due time ascending, optionally including completed ones
    /// and filtering by a tagged person or organization.
    pub fn list_tasks(
        &self,
        limit: u32,
        include_completed: bool,
        person_id: Option<i64>,
        org_id: Option<i64>,
    ) -> Result<Vec<Task>> {
        let conn = self.lock();

        let mut sql = String::from("SELECT t.id FROM tasks t");
        let mut clauses: Vec<&str> = Vec::new();
        let mut bind: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(pid) = person_id {
            sql.push_str(" JOIN task_persons tp ON tp.task_id = t.id");
            clauses.push("tp.person_id = ?");
            bind.push(Box::new(pid));
        }
        if let Some(oid) = org_id {
            sql.push_str(" JOIN task_organizations torg ON torg.task_id = t.id");
            clauses.push("torg.organization_id = ?");
            bind.push(Box::new(oid));
        }
        if !include_completed {
            clauses.push("t.completed = 0");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY datetime(t.due_at) ASC LIMIT ?");
        bind.push(Box::new(limit));

        let mut stmt = conn.prepare(&sql)?;
        let bind_refs: Vec<&dyn ToSql> = bind.iter().map(|p| p.as_ref()).collect();
        let ids = stmt
            .query_map(bind_refs.as_slice(), |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(task) = load_task(&conn, id)? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    /// Incomplete tasks due within `days` from now.
    pub fn urgent_tasks(&self, days: i64, sort: UrgentSort) -> Result<Vec<Task>> {
        let conn = self.lock();
        let threshold = (Utc::now() + Duration::days(days)).to_rfc3339();

        let order = match sort {
            UrgentSort::Urgency => "datetime(due_at) ASC",
            UrgentSort::Importance => "importance DESC, datetime(due_at) ASC",
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM tasks
             WHERE completed = 0 AND datetime(due_at) <= datetime(?)
             ORDER BY {order}"
        ))?;
        let ids = stmt
            .query_map(params![threshold], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut tasks = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(task) = load_task(&conn, id)? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.lock();
        load_task(&conn, id)
    }

    pub fn complete_task(&self, id: i64) -> Result<Task> {
        self.set_task_completed(id, true)
    }

    pub fn uncomplete_task(&self, id: i64) -> Result<Task> {
        self.set_task_completed(id, false)
    }

    fn set_task_completed(&self, id: i64, completed: bool) -> Result<Task> {
        let conn = self.lock();

        let task = load_task(&conn, id)?.ok_or_else(|| ServiceError::not_found("Task", id))?;
        if task.completed == completed {
            let state = if completed { "completed" } else { "incomplete" };
            return Err(ServiceError::Validation(format!(
                "Task '{}' is already {state}",
                task.title
            )));
        }

        conn.execute(
            "UPDATE tasks SET completed = ?, updated_at = ? WHERE id = ?",
            params![completed as i64, Utc::now().to_rfc3339(), id],
        )?;

        load_task(&conn, id)?.ok_or_else(|| ServiceError::not_found("Task", id))
    }

    /// Reconcile a task's person/organization tags in one transaction. Task
    /// instructions in the update are ignored; tasks cannot tag tasks.
    pub fn tag_task(&self, id: i64, update: &TagUpdate) -> Result<TagDiff> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let diff = tags::reconcile(&tx, TagTarget::Task, id, update)?;
        tx.commit()?;
        Ok(diff)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

// ============================================================
// Row mapping
// ============================================================

fn map_person(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}

fn map_organization(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn map_note_summary(row: &Row<'_>) -> rusqlite::Result<NoteSummary> {
    Ok(NoteSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_datetime(row.get::<_, String>(3)?),
        updated_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn map_task_summary(row: &Row<'_>) -> rusqlite::Result<TaskSummary> {
    Ok(TaskSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_at: parse_datetime(row.get::<_, String>(3)?),
        importance: row.get(4)?,
        completed: row.get::<_, i64>(5)? != 0,
        created_at: parse_datetime(row.get::<_, String>(6)?),
        updated_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

fn load_note(conn: &Connection, id: i64) -> Result<Option<Note>> {
    let summary = conn
        .query_row(
            "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = ?",
            params![id],
            map_note_summary,
        )
        .optional()?;
    let Some(summary) = summary else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT p.id, p.first_name, p.last_name FROM persons p
         JOIN note_persons np ON np.person_id = p.id
         WHERE np.note_id = ? ORDER BY p.id",
    )?;
    let persons = stmt
        .query_map(params![id], map_person)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT o.id, o.name FROM organizations o
         JOIN note_organizations no_ ON no_.organization_id = o.id
         WHERE no_.note_id = ? ORDER BY o.id",
    )?;
    let organizations = stmt
        .query_map(params![id], map_organization)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT t.id, t.title, t.description, t.due_at, t.importance, t.completed, t.created_at, t.updated_at
         FROM tasks t
         JOIN note_tasks nt ON nt.task_id = t.id
         WHERE nt.note_id = ? ORDER BY t.id",
    )?;
    let tasks = stmt
        .query_map(params![id], map_task_summary)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Some(Note {
        id: summary.id,
        title: summary.title,
        content: summary.content,
        created_at: summary.created_at,
        updated_at: summary.updated_at,
        persons,
        organizations,
        tasks,
    }))
}

fn load_task(conn: &Connection, id: i64) -> Result<Option<Task>> {
    let summary = conn
        .query_row(
            "SELECT id, title, description, due_at, importance, completed, created_at, updated_at
             FROM tasks WHERE id = ?",
            params![id],
            map_task_summary,
        )
        .optional()?;
    let Some(summary) = summary else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT p.id, p.first_name, p.last_name FROM persons p
         JOIN task_persons tp ON tp.person_id = p.id
         WHERE tp.task_id = ? ORDER BY p.id",
    )?;
    let persons = stmt
        .query_map(params![id], map_person)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT o.id, o.name FROM organizations o
         JOIN task_organizations torg ON torg.organization_id = o.id
         WHERE torg.task_id = ? ORDER BY o.id",
    )?;
    let organizations = stmt
        .query_map(params![id], map_organization)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Some(Task {
        id: summary.id,
        title: summary.title,
        description: summary.description,
        due_at: summary.due_at,
        importance: summary.importance,
        completed: summary.completed,
        created_at: summary.created_at,
        updated_at: summary.updated_at,
        persons,
        organizations,
    }))
}

fn ensure_exists(conn: &Connection, table: &str, entity: &'static str, id: i64) -> Result<()> {
    let present: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE id = ?"),
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    match present {
        Some(_) => Ok(()),
        None => Err(ServiceError::not_found(entity, id)),
    }
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
