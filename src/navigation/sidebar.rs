use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::errors::MadrasaError;
use crate::i18n::Translate;

/// 侧栏分区，顺序即显示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    #[default]
    Courses,
    Students,
    Instructors,
    Lessons,
    Exams,
    Attendance,
    StudentExams,
    Recitation,
    CourseFiles,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Courses,
        Section::Students,
        Section::Instructors,
        Section::Lessons,
        Section::Exams,
        Section::Attendance,
        Section::StudentExams,
        Section::Recitation,
        Section::CourseFiles,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Section::Courses => "courses",
            Section::Students => "students",
            Section::Instructors => "instructors",
            Section::Lessons => "lessons",
            Section::Exams => "exams",
            Section::Attendance => "attendance",
            Section::StudentExams => "studentExams",
            Section::Recitation => "recitation",
            Section::CourseFiles => "courseFiles",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Section::Courses => "navigation.courses",
            Section::Students => "navigation.students",
            Section::Instructors => "navigation.instructors",
            Section::Lessons => "navigation.lessons",
            Section::Exams => "navigation.exams",
            Section::Attendance => "navigation.attendance",
            Section::StudentExams => "navigation.studentExams",
            Section::Recitation => "navigation.recitation",
            Section::CourseFiles => "navigation.courseFiles",
        }
    }

    // 图标名称（lucide）
    pub fn icon(&self) -> &'static str {
        match self {
            Section::Courses => "book-open",
            Section::Students => "users",
            Section::Instructors => "graduation-cap",
            Section::Lessons => "calendar",
            Section::Exams => "file-text",
            Section::Attendance => "check-square",
            Section::StudentExams => "award",
            Section::Recitation => "mic",
            Section::CourseFiles => "folder-open",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Section {
    type Err = MadrasaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id() == s)
            .ok_or_else(|| MadrasaError::not_found(format!("Unknown section '{s}'")))
    }
}

/// 侧栏中的一项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub section: Section,
    pub label: String,
    pub icon: &'static str,
    pub active: bool,
}

/// 侧栏状态：当前分区与移动端抽屉
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sidebar {
    active: Section,
    open: bool,
}

impl Sidebar {
    pub fn new(active: Section) -> Self {
        Self {
            active,
            open: false,
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 选择分区后关闭抽屉
    pub fn select(&mut self, section: Section) {
        debug!("Navigating to {}", section);
        self.active = section;
        self.open = false;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// 抽屉打开时显示遮罩，点击遮罩关闭抽屉
    pub fn overlay_visible(&self) -> bool {
        self.open
    }

    pub fn items(&self, translator: &dyn Translate) -> Vec<NavItem> {
        Section::ALL
            .into_iter()
            .map(|section| NavItem {
                section,
                label: translator.t(section.label_key()),
                icon: section.icon(),
                active: section == self.active,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use serde_json::json;

    #[test]
    fn test_sections_in_display_order() {
        let ids: Vec<&str> = Section::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            vec![
                "courses",
                "students",
                "instructors",
                "lessons",
                "exams",
                "attendance",
                "studentExams",
                "recitation",
                "courseFiles",
            ]
        );
        assert_eq!("studentExams".parse::<Section>(), Ok(Section::StudentExams));
        assert!("grades".parse::<Section>().is_err());
    }

    #[test]
    fn test_select_closes_drawer() {
        let mut sidebar = Sidebar::default();
        sidebar.open();
        assert!(sidebar.overlay_visible());

        sidebar.select(Section::Recitation);

        assert_eq!(sidebar.active(), Section::Recitation);
        assert!(!sidebar.is_open());
        assert!(!sidebar.overlay_visible());
    }

    #[test]
    fn test_toggle_and_close() {
        let mut sidebar = Sidebar::new(Section::Exams);
        assert!(sidebar.toggle());
        assert!(!sidebar.toggle());
        sidebar.open();
        sidebar.close();
        assert!(!sidebar.is_open());
        assert_eq!(sidebar.active(), Section::Exams);
    }

    #[test]
    fn test_items_are_localized_and_marked_active() {
        let catalog = Catalog::from_json(
            "ar",
            &json!({"navigation": {"courses": "الدورات", "attendance": "الحضور"}}),
        )
        .unwrap();
        let sidebar = Sidebar::new(Section::Attendance);
        let items = sidebar.items(&catalog);

        assert_eq!(items.len(), 9);
        assert_eq!(items[0].label, "الدورات");
        assert_eq!(items[1].label, "navigation.students");
        let active: Vec<Section> = items.iter().filter(|i| i.active).map(|i| i.section).collect();
        assert_eq!(active, vec![Section::Attendance]);
    }
}
