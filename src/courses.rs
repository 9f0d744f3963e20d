//! Append-only course catalog. The course id is the index into the arena.

use crate::identity::Handle;
use serde::{Deserialize, Serialize};

/// Immutable course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Sequential id starting at 0.
    pub id: u64,
    /// Display name; duplicates are allowed.
    pub name: String,
    /// Encrypted pass threshold.
    pub threshold: Handle,
}

/// Read view of a course; absent ids yield the zero view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseInfo {
    /// Course name, empty when absent.
    pub name: String,
    /// Threshold handle, zero when absent.
    pub threshold: Handle,
    /// Whether the course exists.
    pub exists: bool,
}

/// Catalog of courses keyed by monotonic id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseRegistry {
    courses: Vec<Course>,
}

impl CourseRegistry {
    /// Appends a course and returns its id.
    pub fn register(&mut self, name: String, threshold: Handle) -> u64 {
        let id = self.courses.len() as u64;
        self.courses.push(Course {
            id,
            name,
            threshold,
        });
        id
    }

    /// Looks up a course by id.
    pub fn course(&self, id: u64) -> Option<&Course> {
        usize::try_from(id).ok().and_then(|idx| self.courses.get(idx))
    }

    /// Read view that never fails.
    pub fn info(&self, id: u64) -> CourseInfo {
        self.course(id)
            .map(|course| CourseInfo {
                name: course.name.clone(),
                threshold: course.threshold,
                exists: true,
            })
            .unwrap_or_default()
    }

    /// Number of registered courses, which is also the next id.
    pub fn len(&self) -> u64 {
        self.courses.len() as u64
    }

    /// True when no course has been registered.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
