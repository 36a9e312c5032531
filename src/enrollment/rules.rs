//! Per-content-type policy for when a lesson counts as complete.

use crate::courses::types::ContentType;
use crate::courses::CourseLesson;
use crate::enrollment::ledger::LessonProgress;

/// Decide whether a lesson is complete given its recorded progress.
/// Completion is sticky: a lesson already marked complete stays complete
/// regardless of later watch-time reports or quiz attempts.
pub fn is_lesson_complete(lesson: &CourseLesson, progress: &LessonProgress) -> bool {
    if progress.completed {
        return true;
    }
    match lesson.content() {
        ContentType::Video | ContentType::Audio => {
            if lesson.duration_seconds <= 0 {
                // Malformed duration: any positive report completes, so the
                // lesson never becomes unreachable.
                progress.watch_time_seconds > 0
            } else {
                progress.watch_time_seconds >= lesson.duration_seconds
            }
        }
        // Text lessons complete only through the explicit mark action.
        ContentType::Text => false,
        ContentType::Quiz => progress
            .quiz_result
            .as_ref()
            .map(|r| r.passed)
            .unwrap_or(false),
    }
}
