use serde::{Deserialize, Serialize};

/// Number of students on the roster and areas in the catalog. The rotation
/// pairs them one to one, so both sides must match this exactly.
pub const ROSTER_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub student_id: i64,
    pub area_id: i64,
    pub week: u32,
    pub year: i32,
}

/// One row of the published schedule: who cleans what this week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub student: String,
    pub area: String,
}

/// A (year, week) pair. Ordering compares the year first so week 1 of a new
/// year sorts after week 52/53 of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekStamp {
    pub year: i32,
    pub week: u32,
}

impl std::fmt::Display for WeekStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Which of the two replace-wholesale tables an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Students,
    Areas,
}

impl RosterKind {
    pub fn table(self) -> &'static str {
        match self {
            RosterKind::Students => "students",
            RosterKind::Areas => "areas",
        }
    }

    /// Validation message returned to clients when a replacement list has the
    /// wrong length.
    pub fn count_message(self) -> &'static str {
        match self {
            RosterKind::Students => "학생은 정확히 6명이어야 합니다.",
            RosterKind::Areas => "청소 구역은 정확히 6개여야 합니다.",
        }
    }
}

impl std::fmt::Display for RosterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_stamp_orders_year_first() {
        let late = WeekStamp { year: 2023, week: 53 };
        let early = WeekStamp { year: 2024, week: 1 };
        assert!(early > late);
        assert_ne!(early, late);
    }

    #[test]
    fn week_stamp_display_pads_week() {
        let stamp = WeekStamp { year: 2024, week: 3 };
        assert_eq!(stamp.to_string(), "2024-W03");
    }

    #[test]
    fn count_messages_are_kind_specific() {
        assert!(RosterKind::Students.count_message().contains("6명"));
        assert!(RosterKind::Areas.count_message().contains("6개"));
    }
}
