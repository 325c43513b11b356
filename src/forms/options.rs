//! 下拉框选项
//!
//! 选项值为记录 ID（字符串形式），标签为显示名称或本地化文字。

use super::FormContext;
use crate::models::ChoiceOption;
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::instructors::entities::RELIGIOUS_QUALIFICATIONS;
use crate::models::recitations::entities::{QURAN_JUZ_COUNT, RecitationEvaluation};
use crate::models::references::entities::{Course, Lesson, Student};

/// 背诵页码、作业编号的可选数量
pub const PAGE_OPTION_COUNT: i64 = 20;

pub fn lesson_options(lessons: &[Lesson]) -> Vec<ChoiceOption> {
    lessons
        .iter()
        .map(|lesson| ChoiceOption::new(lesson.id, lesson.lesson_title.clone()))
        .collect()
}

// 背诵表单按“标题 - 日期”显示课次
pub fn dated_lesson_options(lessons: &[Lesson]) -> Vec<ChoiceOption> {
    lessons
        .iter()
        .map(|lesson| {
            ChoiceOption::new(
                lesson.id,
                format!("{} - {}", lesson.lesson_title, lesson.lesson_date),
            )
        })
        .collect()
}

pub fn student_options(students: &[Student]) -> Vec<ChoiceOption> {
    students
        .iter()
        .map(|student| ChoiceOption::new(student.id, student.name.clone()))
        .collect()
}

pub fn course_options(courses: &[Course]) -> Vec<ChoiceOption> {
    courses
        .iter()
        .map(|course| ChoiceOption::new(course.id, course.title.clone()))
        .collect()
}

pub fn attendance_status_options(ctx: &FormContext) -> Vec<ChoiceOption> {
    [AttendanceStatus::Present, AttendanceStatus::Absent]
        .iter()
        .map(|status| ChoiceOption::new(status.code(), ctx.t(status.label_key())))
        .collect()
}

pub fn evaluation_options(ctx: &FormContext) -> Vec<ChoiceOption> {
    RecitationEvaluation::ALL
        .iter()
        .map(|e| ChoiceOption::new(e.as_str(), ctx.t(e.label_key())))
        .collect()
}

pub fn quran_part_options(ctx: &FormContext) -> Vec<ChoiceOption> {
    let juz = ctx.t("quran.juz");
    (1..=QURAN_JUZ_COUNT)
        .map(|n| ChoiceOption::new(n, format!("{juz} {n}")))
        .collect()
}

pub fn page_options(ctx: &FormContext) -> Vec<ChoiceOption> {
    numbered_options(&ctx.t("recitation.page"))
}

pub fn homework_options(ctx: &FormContext) -> Vec<ChoiceOption> {
    numbered_options(&ctx.t("recitation.assignment"))
}

fn numbered_options(prefix: &str) -> Vec<ChoiceOption> {
    (1..=PAGE_OPTION_COUNT)
        .map(|n| ChoiceOption::new(n, format!("{prefix} {n}")))
        .collect()
}

pub fn religious_qualification_options() -> Vec<ChoiceOption> {
    RELIGIOUS_QUALIFICATIONS
        .iter()
        .map(|q| ChoiceOption::new(q, *q))
        .collect()
}
