//! Tag reconciliation over the many-to-many association tables.
//!
//! A reconciliation call validates every referenced ID across every kind
//! before touching any association set, then applies the minimal add/remove
//! changes and reports what actually changed. Callers wrap each call in a
//! single transaction, so a reference failure leaves no partial state.

use std::collections::HashSet;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::{MissingRefs, Result, ServiceError};
use crate::models::{TagDiff, TagUpdate};

const PERSON_NAME_EXPR: &str = "trim(first_name || ' ' || last_name)";

/// One association kind's table layout, resolved for a concrete owner.
pub(crate) struct AssocTables {
    /// Table the tagged entities live in.
    pub source: &'static str,
    /// SQL expression producing the display name of a tagged entity.
    pub name_expr: &'static str,
    pub link: &'static str,
    pub owner_col: &'static str,
    pub other_col: &'static str,
}

pub(crate) const NOTE_PERSONS: AssocTables = AssocTables {
    source: "persons",
    name_expr: PERSON_NAME_EXPR,
    link: "note_persons",
    owner_col: "note_id",
    other_col: "person_id",
};

pub(crate) const NOTE_ORGANIZATIONS: AssocTables = AssocTables {
    source: "organizations",
    name_expr: "name",
    link: "note_organizations",
    owner_col: "note_id",
    other_col: "organization_id",
};

pub(crate) const NOTE_TASKS: AssocTables = AssocTables {
    source: "tasks",
    name_expr: "title",
    link: "note_tasks",
    owner_col: "note_id",
    other_col: "task_id",
};

pub(crate) const TASK_PERSONS: AssocTables = AssocTables {
    source: "persons",
    name_expr: PERSON_NAME_EXPR,
    link: "task_persons",
    owner_col: "task_id",
    other_col: "person_id",
};

pub(crate) const TASK_ORGANIZATIONS: AssocTables = AssocTables {
    source: "organizations",
    name_expr: "name",
    link: "task_organizations",
    owner_col: "task_id",
    other_col: "organization_id",
};

/// Which entity's association sets a reconciliation call operates on.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TagTarget {
    Note,
    Task,
}

impl TagTarget {
    fn entity(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Task => "Task",
        }
    }

    fn table(self) -> &'static str {
        match self {
            Self::Note => "notes",
            Self::Task => "tasks",
        }
    }

    fn persons(self) -> &'static AssocTables {
        match self {
            Self::Note => &NOTE_PERSONS,
            Self::Task => &TASK_PERSONS,
        }
    }

    fn organizations(self) -> &'static AssocTables {
        match self {
            Self::Note => &NOTE_ORGANIZATIONS,
            Self::Task => &TASK_ORGANIZATIONS,
        }
    }

    /// Tasks cannot be tagged with other tasks; the task-kind instructions
    /// of a `TagUpdate` are ignored for task targets.
    fn supports_tasks(self) -> bool {
        matches!(self, Self::Note)
    }
}

pub(crate) fn reconcile(
    conn: &Connection,
    target: TagTarget,
    id: i64,
    update: &TagUpdate,
) -> Result<TagDiff> {
    let present: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {} WHERE id = ?", target.table()),
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    if present.is_none() {
        return Err(ServiceError::not_found(target.entity(), id));
    }

    // Resolve every add-list across every kind before mutating anything, so
    // one bad reference cannot leave a partially applied request behind.
    let missing = MissingRefs {
        persons: unresolved(conn, "persons", &update.add_person_ids)?,
        organizations: unresolved(conn, "organizations", &update.add_org_ids)?,
        tasks: if target.supports_tasks() {
            unresolved(conn, "tasks", &update.add_task_ids)?
        } else {
            Vec::new()
        },
    };
    if !missing.is_empty() {
        return Err(ServiceError::ReferenceNotFound(missing));
    }

    let diff = TagDiff {
        added_persons: add_links(conn, target.persons(), id, &update.add_person_ids)?,
        removed_persons: remove_links(conn, target.persons(), id, &update.remove_person_ids)?,
        added_organizations: add_links(conn, target.organizations(), id, &update.add_org_ids)?,
        removed_organizations: remove_links(
            conn,
            target.organizations(),
            id,
            &update.remove_org_ids,
        )?,
        added_tasks: if target.supports_tasks() {
            add_links(conn, &NOTE_TASKS, id, &update.add_task_ids)?
        } else {
            Vec::new()
        },
        removed_tasks: if target.supports_tasks() {
            remove_links(conn, &NOTE_TASKS, id, &update.remove_task_ids)?
        } else {
            Vec::new()
        },
    };

    if !diff.is_empty() {
        touch_updated_at(conn, target, id)?;
    }

    Ok(diff)
}

/// IDs from `ids` that have no row in `table`, deduplicated and sorted.
pub(crate) fn unresolved(conn: &Connection, table: &str, ids: &[i64]) -> Result<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut wanted: Vec<i64> = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let placeholders = vec!["?"; wanted.len()].join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT id FROM {table} WHERE id IN ({placeholders})"
    ))?;
    let found = stmt
        .query_map(params_from_iter(wanted.iter()), |row| row.get(0))?
        .collect::<std::result::Result<HashSet<i64>, _>>()?;

    Ok(wanted.into_iter().filter(|id| !found.contains(id)).collect())
}

/// Insert missing link rows, returning the display names of entries actually
/// added. Already-present pairs and within-request duplicates are skipped.
pub(crate) fn add_links(
    conn: &Connection,
    tables: &AssocTables,
    owner_id: i64,
    ids: &[i64],
) -> Result<Vec<String>> {
    let mut added = Vec::new();
    let mut seen = HashSet::new();
    for &other in ids {
        if !seen.insert(other) {
            continue;
        }
        let inserted = conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?, ?)",
                tables.link, tables.owner_col, tables.other_col
            ),
            params![owner_id, other],
        )?;
        if inserted > 0 {
            if let Some(name) = display_name(conn, tables, other)? {
                added.push(name);
            }
        }
    }
    Ok(added)
}

/// Delete matching link rows, returning the display names of entries actually
/// removed. Remove is a set difference: IDs not currently associated are
/// ignored without any existence check.
fn remove_links(
    conn: &Connection,
    tables: &AssocTables,
    owner_id: i64,
    ids: &[i64],
) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    let mut seen = HashSet::new();
    for &other in ids {
        if !seen.insert(other) {
            continue;
        }
        let name = display_name(conn, tables, other)?;
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ? AND {} = ?",
                tables.link, tables.owner_col, tables.other_col
            ),
            params![owner_id, other],
        )?;
        if deleted > 0 {
            if let Some(name) = name {
                removed.push(name);
            }
        }
    }
    Ok(removed)
}

fn display_name(conn: &Connection, tables: &AssocTables, id: i64) -> Result<Option<String>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM {} WHERE id = ?",
            tables.name_expr, tables.source
        ),
        params![id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

fn touch_updated_at(conn: &Connection, target: TagTarget, id: i64) -> Result<()> {
    conn.execute(
        &format!("UPDATE {} SET updated_at = ? WHERE id = ?", target.table()),
        params![chrono::Utc::now().to_rfc3339(), id],
    )?;
    Ok(())
}
