//! SQLite-backed persistence for the roster, the area catalog, the current
//! assignment set and the single-row last-update marker.
//!
//! # Tables
//!
//! ```text
//! students    (id INTEGER PRIMARY KEY, name TEXT)
//! areas       (id INTEGER PRIMARY KEY, name TEXT)
//! assignments (id INTEGER PRIMARY KEY, student_id INTEGER, area_id INTEGER, week INTEGER, year INTEGER)
//! last_update (id INTEGER PRIMARY KEY, timestamp TEXT)
//! ```
//!
//! Every multi-statement write runs inside one transaction, so readers never
//! observe a half-replaced roster or a half-deleted assignment set.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, RotaError};
use crate::types::{Area, Assignment, RosterKind, ScheduleEntry, Student, ROSTER_SIZE};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS students (id INTEGER PRIMARY KEY, name TEXT);
    CREATE TABLE IF NOT EXISTS areas (id INTEGER PRIMARY KEY, name TEXT);
    CREATE TABLE IF NOT EXISTS assignments (id INTEGER PRIMARY KEY, student_id INTEGER, area_id INTEGER, week INTEGER, year INTEGER);
    CREATE TABLE IF NOT EXISTS last_update (id INTEGER PRIMARY KEY, timestamp TEXT);
";

pub const DEFAULT_STUDENTS: [&str; ROSTER_SIZE] =
    ["박찬진", "이동현", "정지훈", "정한영", "하현일", "허윤재"];

pub const DEFAULT_AREAS: [&str; ROSTER_SIZE] = [
    "빗자루, 대걸래, 분리수거",
    "빗자루, 대걸래, 분리수거",
    "환기, 빗자루, 대걸래",
    "손걸래, 세절기",
    "손걸래, 세절기",
    "교사쓰레기통, 전체 쓰레기통 정리",
];

/// Owner of all persisted rotation state.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create the database at `path`, create the schema if absent and
    /// seed the default roster and catalog into empty tables.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        seed_if_empty(&mut conn, RosterKind::Students, &DEFAULT_STUDENTS)?;
        seed_if_empty(&mut conn, RosterKind::Areas, &DEFAULT_AREAS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RotaError::StoreUnavailable)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn students(&self) -> Result<Vec<Student>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM students ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn areas(&self) -> Result<Vec<Area>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM areas ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Area {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn assignments(&self) -> Result<Vec<Assignment>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT student_id, area_id, week, year FROM assignments ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Assignment {
                    student_id: row.get(0)?,
                    area_id: row.get(1)?,
                    week: row.get(2)?,
                    year: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Current assignments joined with student and area names. Assignments
    /// whose student or area id no longer exists are dropped by the join.
    pub fn schedule(&self) -> Result<Vec<ScheduleEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT s.name AS student, a.name AS area
             FROM assignments
             JOIN students s ON s.id = assignments.student_id
             JOIN areas a ON a.id = assignments.area_id
             ORDER BY assignments.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ScheduleEntry {
                    student: row.get(0)?,
                    area: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Instant of the most recent rotation, if any.
    pub fn last_update(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row("SELECT timestamp FROM last_update WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RotaError::InvalidTimestamp(format!("{s}: {e}")))
        })
        .transpose()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Replace the whole student or area table with `names`, assigning ids
    /// 1..=6 in the given order. Fails without touching the table unless
    /// exactly six names are supplied.
    pub fn replace(&self, kind: RosterKind, names: &[String]) -> Result<()> {
        if names.len() != ROSTER_SIZE {
            return Err(RotaError::InvalidCount(kind));
        }
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", kind.table()), [])?;
        insert_names(&tx, kind, names.iter().map(String::as_str))?;
        tx.commit()?;
        Ok(())
    }

    /// Swap in a new assignment set and stamp the last-update marker, as one
    /// unit of work.
    pub fn commit_rotation(&self, assignments: &[Assignment], at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM assignments", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO assignments (student_id, area_id, week, year) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for a in assignments {
                insert.execute(params![a.student_id, a.area_id, a.week, a.year])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO last_update (id, timestamp) VALUES (1, ?1)",
            params![at.to_rfc3339_opts(SecondsFormat::Millis, true)],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn clear_last_update(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM last_update", [])?;
        Ok(())
    }
}

fn seed_if_empty(conn: &mut Connection, kind: RosterKind, names: &[&str]) -> Result<()> {
    let tx = conn.transaction()?;
    let count: i64 = tx.query_row(
        &format!("SELECT COUNT(*) FROM {}", kind.table()),
        [],
        |row| row.get(0),
    )?;
    if count == 0 {
        insert_names(&tx, kind, names.iter().copied())?;
        tracing::info!(table = kind.table(), rows = names.len(), "seeded default rows");
    }
    tx.commit()?;
    Ok(())
}

fn insert_names<'a>(
    conn: &Connection,
    kind: RosterKind,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut insert = conn.prepare(&format!(
        "INSERT INTO {} (id, name) VALUES (?1, ?2)",
        kind.table()
    ))?;
    for (i, name) in names.enumerate() {
        insert.execute(params![i as i64 + 1, name])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fresh_store_is_seeded() {
        let store = Store::open_in_memory().unwrap();
        let students = store.students().unwrap();
        let areas = store.areas().unwrap();

        assert_eq!(students.len(), ROSTER_SIZE);
        assert_eq!(areas.len(), ROSTER_SIZE);
        assert_eq!(students[0], Student { id: 1, name: "박찬진".into() });
        assert_eq!(areas[5].name, "교사쓰레기통, 전체 쓰레기통 정리");
        assert!(store.assignments().unwrap().is_empty());
        assert!(store.last_update().unwrap().is_none());
    }

    #[test]
    fn reopening_does_not_reseed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/cleaning.db");
        {
            let store = Store::open(&path).unwrap();
            store
                .replace(RosterKind::Students, &names(&["a", "b", "c", "d", "e", "f"]))
                .unwrap();
        }
        let store = Store::open(&path).unwrap();
        let students = store.students().unwrap();
        assert_eq!(students.len(), ROSTER_SIZE);
        assert_eq!(students[0].name, "a");
    }

    #[test]
    fn replace_assigns_ids_in_submitted_order() {
        let store = Store::open_in_memory().unwrap();
        let submitted = names(&["f", "e", "d", "c", "b", "a"]);
        store.replace(RosterKind::Areas, &submitted).unwrap();

        let areas = store.areas().unwrap();
        let ids: Vec<i64> = areas.iter().map(|a| a.id).collect();
        let got: Vec<String> = areas.into_iter().map(|a| a.name).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(got, submitted);
    }

    #[test]
    fn replace_with_wrong_count_leaves_table_unchanged() {
        let store = Store::open_in_memory().unwrap();
        let before = store.students().unwrap();

        for bad in [names(&["a", "b", "c", "d", "e"]), names(&["a", "b", "c", "d", "e", "f", "g"])] {
            let err = store.replace(RosterKind::Students, &bad).unwrap_err();
            assert!(matches!(err, RotaError::InvalidCount(RosterKind::Students)));
        }
        assert_eq!(store.students().unwrap(), before);
    }

    #[test]
    fn commit_rotation_replaces_set_and_marker() {
        let store = Store::open_in_memory().unwrap();
        let first = Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap();
        let rows: Vec<Assignment> = (1..=6)
            .map(|i| Assignment { student_id: i, area_id: 7 - i, week: 2, year: 2024 })
            .collect();
        store.commit_rotation(&rows, first).unwrap();
        assert_eq!(store.assignments().unwrap(), rows);
        assert_eq!(store.last_update().unwrap(), Some(first));

        let second = first + chrono::Duration::weeks(1);
        let next: Vec<Assignment> = (1..=6)
            .map(|i| Assignment { student_id: i, area_id: i, week: 3, year: 2024 })
            .collect();
        store.commit_rotation(&next, second).unwrap();
        assert_eq!(store.assignments().unwrap(), next);
        assert_eq!(store.last_update().unwrap(), Some(second));
    }

    #[test]
    fn schedule_joins_names() {
        let store = Store::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap();
        store
            .commit_rotation(
                &[Assignment { student_id: 2, area_id: 4, week: 2, year: 2024 }],
                at,
            )
            .unwrap();

        let schedule = store.schedule().unwrap();
        assert_eq!(
            schedule,
            vec![ScheduleEntry {
                student: "이동현".into(),
                area: "손걸래, 세절기".into(),
            }]
        );
    }

    #[test]
    fn clear_last_update_removes_marker() {
        let store = Store::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap();
        store.commit_rotation(&[], at).unwrap();
        assert!(store.last_update().unwrap().is_some());

        store.clear_last_update().unwrap();
        assert!(store.last_update().unwrap().is_none());
    }
}
