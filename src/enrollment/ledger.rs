//! Nested per-lesson progress document stored as one Jsonb column on the
//! enrollment row. The whole ledger is a single consistency unit: every
//! mutation happens inside the enrollment row's read-modify-write
//! transaction, so two concurrent lesson updates can never lose each
//! other's writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::courses::CourseStructure;
use crate::enrollment::error::EnrollmentError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizOutcome {
    pub score: i32,
    pub passed: bool,
    pub attempted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonProgress {
    pub completed: bool,
    pub watch_time_seconds: i32,
    pub quiz_result: Option<QuizOutcome>,
    /// Every attempt ever made, oldest first. The latest entry mirrors
    /// `quiz_result`; kept for audit and analytics.
    #[serde(default)]
    pub quiz_history: Vec<QuizOutcome>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for LessonProgress {
    fn default() -> Self {
        Self {
            completed: false,
            watch_time_seconds: 0,
            quiz_result: None,
            quiz_history: Vec::new(),
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleProgress {
    #[serde(default)]
    pub lessons: HashMap<Uuid, LessonProgress>,
}

/// The progress ledger: module id -> lesson id -> lesson progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulesProgress(pub HashMap<Uuid, ModuleProgress>);

impl ModulesProgress {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, EnrollmentError> {
        serde_json::from_value(value.clone())
            .map_err(|e| EnrollmentError::Database(format!("Corrupt progress ledger: {e}")))
    }

    pub fn to_value(&self) -> Result<serde_json::Value, EnrollmentError> {
        serde_json::to_value(self)
            .map_err(|e| EnrollmentError::Database(format!("Cannot serialize ledger: {e}")))
    }

    pub fn lesson(&self, module_id: Uuid, lesson_id: Uuid) -> Option<&LessonProgress> {
        self.0.get(&module_id).and_then(|m| m.lessons.get(&lesson_id))
    }

    pub fn lesson_mut(&mut self, module_id: Uuid, lesson_id: Uuid) -> &mut LessonProgress {
        self.0
            .entry(module_id)
            .or_default()
            .lessons
            .entry(lesson_id)
            .or_default()
    }

    /// Record reported watch time. Watch time is monotonic non-decreasing:
    /// a report lower than the stored value is ignored. Returns the
    /// effective stored value.
    pub fn apply_watch_time(&mut self, module_id: Uuid, lesson_id: Uuid, seconds: i32) -> i32 {
        let lesson = self.lesson_mut(module_id, lesson_id);
        if seconds > lesson.watch_time_seconds {
            lesson.watch_time_seconds = seconds;
        }
        lesson.watch_time_seconds
    }

    /// Record a quiz attempt: the latest result is always stored, the
    /// attempt is appended to history. Completion is decided separately
    /// and is sticky once reached.
    pub fn record_quiz(&mut self, module_id: Uuid, lesson_id: Uuid, outcome: QuizOutcome) {
        let lesson = self.lesson_mut(module_id, lesson_id);
        lesson.quiz_history.push(outcome.clone());
        lesson.quiz_result = Some(outcome);
    }

    pub fn set_completed(&mut self, module_id: Uuid, lesson_id: Uuid, at: DateTime<Utc>) {
        let lesson = self.lesson_mut(module_id, lesson_id);
        if !lesson.completed {
            lesson.completed = true;
            lesson.completed_at = Some(at);
        }
    }

    pub fn any_completed(&self) -> bool {
        self.0
            .values()
            .any(|m| m.lessons.values().any(|l| l.completed))
    }

    /// Count completed lessons that still exist in the course. Ledger
    /// entries for lessons removed by authoring are not counted, and
    /// lessons added after enrollment enlarge the denominator; the
    /// percentage always reflects the structure at query time.
    pub fn completed_lessons(&self, structure: &CourseStructure) -> usize {
        structure
            .lesson_ids()
            .filter(|(module_id, lesson_id)| {
                self.lesson(*module_id, *lesson_id)
                    .map(|l| l.completed)
                    .unwrap_or(false)
            })
            .count()
    }

    /// Aggregate completion percentage, rounded to the nearest integer.
    pub fn percentage(&self, structure: &CourseStructure) -> i32 {
        let total = structure.total_lessons();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_lessons(structure);
        ((100.0 * completed as f64) / total as f64).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::courses::{Course, CourseLesson, CourseModule};

    fn structure(lessons_per_module: &[usize]) -> CourseStructure {
        let now = Utc::now();
        let course_id = Uuid::new_v4();
        let course = Course {
            id: course_id,
            title: "Breathing Basics".to_string(),
            description: None,
            category: "breathwork".to_string(),
            pricing_type: "free".to_string(),
            price: None,
            currency: "USD".to_string(),
            premium_tier: None,
            is_published: true,
            rating_average: 0.0,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        };
        let modules = lessons_per_module
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let module = CourseModule {
                    id: Uuid::new_v4(),
                    course_id,
                    title: format!("Module {i}"),
                    module_order: i as i32,
                    created_at: now,
                };
                let lessons = (0..n)
                    .map(|j| CourseLesson {
                        id: Uuid::new_v4(),
                        module_id: module.id,
                        course_id,
                        title: format!("Lesson {j}"),
                        content_type: "video".to_string(),
                        content_url: None,
                        content_text: None,
                        quiz: None,
                        duration_seconds: 120,
                        is_preview: false,
                        lesson_order: j as i32,
                        created_at: now,
                        updated_at: now,
                    })
                    .collect();
                (module, lessons)
            })
            .collect();
        CourseStructure { course, modules }
    }

    #[test]
    fn test_watch_time_is_monotonic() {
        let mut ledger = ModulesProgress::default();
        let (m, l) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(ledger.apply_watch_time(m, l, 90), 90);
        // Lower report is a no-op, not a regression.
        assert_eq!(ledger.apply_watch_time(m, l, 30), 90);
        assert_eq!(ledger.apply_watch_time(m, l, 120), 120);
    }

    #[test]
    fn test_percentage_two_by_two() {
        let s = structure(&[2, 2]);
        let mut ledger = ModulesProgress::default();
        assert_eq!(ledger.percentage(&s), 0);

        let (m0, l0) = (s.modules[0].0.id, s.modules[0].1[0].id);
        ledger.set_completed(m0, l0, Utc::now());
        assert_eq!(ledger.percentage(&s), 25);

        for (module_id, lesson_id) in s.lesson_ids().collect::<Vec<_>>() {
            ledger.set_completed(module_id, lesson_id, Utc::now());
        }
        assert_eq!(ledger.percentage(&s), 100);
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        // 1 of 3 complete: 33.33 -> 33; 2 of 3: 66.67 -> 67.
        let s = structure(&[3]);
        let mut ledger = ModulesProgress::default();
        let ids: Vec<_> = s.lesson_ids().collect();

        ledger.set_completed(ids[0].0, ids[0].1, Utc::now());
        assert_eq!(ledger.percentage(&s), 33);

        ledger.set_completed(ids[1].0, ids[1].1, Utc::now());
        assert_eq!(ledger.percentage(&s), 67);
    }

    #[test]
    fn test_lessons_added_later_lower_percentage() {
        let mut s = structure(&[2]);
        let mut ledger = ModulesProgress::default();
        for (m, l) in s.lesson_ids().collect::<Vec<_>>() {
            ledger.set_completed(m, l, Utc::now());
        }
        assert_eq!(ledger.percentage(&s), 100);

        // Authoring adds two more lessons to the module.
        let module_id = s.modules[0].0.id;
        let course_id = s.course.id;
        let now = Utc::now();
        for j in 2..4 {
            s.modules[0].1.push(CourseLesson {
                id: Uuid::new_v4(),
                module_id,
                course_id,
                title: format!("Lesson {j}"),
                content_type: "text".to_string(),
                content_url: None,
                content_text: Some("New material".to_string()),
                quiz: None,
                duration_seconds: 0,
                is_preview: false,
                lesson_order: j,
                created_at: now,
                updated_at: now,
            });
        }
        assert_eq!(ledger.percentage(&s), 50);
    }

    #[test]
    fn test_removed_lessons_not_counted() {
        let mut s = structure(&[2]);
        let mut ledger = ModulesProgress::default();
        for (m, l) in s.lesson_ids().collect::<Vec<_>>() {
            ledger.set_completed(m, l, Utc::now());
        }

        // Authoring deletes one of the completed lessons.
        s.modules[0].1.pop();
        assert_eq!(ledger.completed_lessons(&s), 1);
        assert_eq!(ledger.percentage(&s), 100);
    }

    #[test]
    fn test_quiz_history_appends_and_latest_wins() {
        let mut ledger = ModulesProgress::default();
        let (m, l) = (Uuid::new_v4(), Uuid::new_v4());
        let t = Utc::now();

        ledger.record_quiz(m, l, QuizOutcome { score: 80, passed: true, attempted_at: t });
        ledger.record_quiz(m, l, QuizOutcome { score: 40, passed: false, attempted_at: t });

        let lesson = ledger.lesson(m, l).unwrap();
        assert_eq!(lesson.quiz_history.len(), 2);
        assert_eq!(lesson.quiz_result.as_ref().unwrap().score, 40);
        assert!(!lesson.quiz_result.as_ref().unwrap().passed);
    }

    #[test]
    fn test_completion_is_sticky() {
        let mut ledger = ModulesProgress::default();
        let (m, l) = (Uuid::new_v4(), Uuid::new_v4());
        let first = Utc::now();

        ledger.set_completed(m, l, first);
        let recorded = ledger.lesson(m, l).unwrap().completed_at;
        ledger.set_completed(m, l, first + chrono::Duration::hours(1));
        // Replaying completion neither clears the flag nor moves the stamp.
        assert_eq!(ledger.lesson(m, l).unwrap().completed_at, recorded);
        assert!(ledger.lesson(m, l).unwrap().completed);
    }

    #[test]
    fn test_ledger_serde_round_trip() {
        let mut ledger = ModulesProgress::default();
        let (m, l) = (Uuid::new_v4(), Uuid::new_v4());
        ledger.apply_watch_time(m, l, 45);
        ledger.record_quiz(m, l, QuizOutcome { score: 100, passed: true, attempted_at: Utc::now() });
        ledger.set_completed(m, l, Utc::now());

        let value = ledger.to_value().unwrap();
        let restored = ModulesProgress::from_value(&value).unwrap();
        let lesson = restored.lesson(m, l).unwrap();
        assert!(lesson.completed);
        assert_eq!(lesson.watch_time_seconds, 45);
        assert_eq!(lesson.quiz_history.len(), 1);
    }

    #[test]
    fn test_empty_course_percentage_is_zero() {
        let s = structure(&[]);
        let ledger = ModulesProgress::default();
        assert_eq!(ledger.percentage(&s), 0);
    }
}
