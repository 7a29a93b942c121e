//! Weekly rotation: the due check, the shuffle, and the gate that keeps two
//! rotations from interleaving.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use rand::Rng;

use crate::error::{Result, RotaError};
use crate::store::Store;
use crate::types::{Area, Assignment, Student, WeekStamp, ROSTER_SIZE};
use crate::week::WeekClock;

/// Civil weekday on which a new rotation becomes due.
pub const ROTATION_WEEKDAY: Weekday = Weekday::Mon;
/// Civil hour (inclusive) from which a rotation becomes due on that weekday.
pub const ROTATION_HOUR: u32 = 8;

/// Outcome of a committed rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub stamp: WeekStamp,
    pub at: DateTime<Utc>,
    pub pairs: Vec<(Student, Area)>,
}

/// Whether a rotation should happen at `now` given the previous marker.
///
/// With no marker a rotation is always due. Otherwise it is due only on the
/// rotation weekday at or after the rotation hour, and only when the current
/// week stamp differs from the marker's.
pub fn rotation_due(clock: &WeekClock, now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> bool {
    let Some(last) = last else {
        return true;
    };
    let local = clock.local(now);
    local.weekday() == ROTATION_WEEKDAY
        && local.hour() >= ROTATION_HOUR
        && clock.stamp(now) != clock.stamp(last)
}

/// Fisher-Yates: for `i` from the last index down to 1, swap with a uniform
/// index in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Drives rotations against a shared [`Store`].
pub struct Rotator {
    store: Arc<Store>,
    clock: WeekClock,
    gate: Mutex<()>,
}

impl Rotator {
    pub fn new(store: Arc<Store>, clock: WeekClock) -> Self {
        Self {
            store,
            clock,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn clock(&self) -> &WeekClock {
        &self.clock
    }

    pub fn maybe_rotate(&self) -> Result<Option<Rotation>> {
        self.maybe_rotate_at(Utc::now(), &mut rand::thread_rng())
    }

    /// Rotate if due at `now`. Returns `None` without side effects when not due.
    pub fn maybe_rotate_at<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<Rotation>> {
        let _guard = self.gate.lock().map_err(|_| RotaError::RotationGatePoisoned)?;
        self.rotate_if_due(now, rng)
    }

    pub fn on_startup(&self) -> Result<Option<Rotation>> {
        self.on_startup_at(Utc::now(), &mut rand::thread_rng())
    }

    /// Startup check: on the rotation weekday the marker is cleared so the day
    /// always starts with a fresh rotation; any other day runs the normal check.
    pub fn on_startup_at<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<Rotation>> {
        let _guard = self.gate.lock().map_err(|_| RotaError::RotationGatePoisoned)?;
        if self.clock.local(now).weekday() == ROTATION_WEEKDAY {
            tracing::info!("rotation day at startup, clearing last-update marker");
            self.store.clear_last_update()?;
        }
        self.rotate_if_due(now, rng)
    }

    /// Rotate regardless of the due condition. The marker is only replaced by
    /// a successful commit, so a failed attempt leaves it as it was.
    pub fn force_rotate_at<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Rotation> {
        let _guard = self.gate.lock().map_err(|_| RotaError::RotationGatePoisoned)?;
        self.rotate(now, rng)
    }

    // Callers hold the gate.
    fn rotate_if_due<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Option<Rotation>> {
        let last = self.store.last_update()?;
        if !rotation_due(&self.clock, now, last) {
            tracing::debug!(stamp = %self.clock.stamp(now), "rotation not due");
            return Ok(None);
        }
        self.rotate(now, rng).map(Some)
    }

    fn rotate<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> Result<Rotation> {
        let mut students = self.store.students()?;
        let areas = self.store.areas()?;
        if students.len() != ROSTER_SIZE || areas.len() != ROSTER_SIZE {
            let err = RotaError::RosterSize {
                students: students.len(),
                areas: areas.len(),
            };
            tracing::error!(error = %err, "rotation aborted");
            return Err(err);
        }

        shuffle(&mut students, rng);
        let stamp = self.clock.stamp(now);
        let assignments: Vec<Assignment> = students
            .iter()
            .zip(&areas)
            .map(|(s, a)| Assignment {
                student_id: s.id,
                area_id: a.id,
                week: stamp.week,
                year: stamp.year,
            })
            .collect();
        self.store.commit_rotation(&assignments, now)?;

        tracing::info!(%stamp, "rotation committed");
        Ok(Rotation {
            stamp,
            at: now,
            pairs: students.into_iter().zip(areas).collect(),
        })
    }
}
