//! Domain types mirroring the upstream's JSON schema. Field names follow
//! the upstream wire format, not Rust naming convention, hence the
//! `#[serde(rename_all)]`-free direct mapping — the upstream already uses
//! snake_case.

use serde::{Deserialize, Serialize};

/// Generic envelope every upstream response (other than a transport-level
/// failure) is wrapped in. Success iff `code == 1`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamEnvelope<V> {
    pub code: i32,
    pub message: String,
    pub data: V,
}

impl<V> UpstreamEnvelope<V> {
    pub const SUCCESS_CODE: i32 = 1;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CourseEntry {
    pub name: String,
    pub teacher: String,
    pub classroom: String,
    pub weeks: String,
    pub start_time: i32,
    pub duration: i32,
    pub day: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CourseList {
    pub courses: Vec<CourseEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TeachingCalendar {
    pub start: String,
    pub weeks: i32,
    pub term_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClassroomStatus {
    pub name: String,
    pub status: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClassroomStatusTable {
    pub classrooms: std::collections::HashMap<String, Vec<ClassroomStatus>>,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Examination {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub exam_type: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExamList {
    pub exams: Vec<Examination>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StudentInfo {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub birthday: String,
    pub major: String,
    #[serde(rename = "class_")]
    pub class: String,
    pub entrance_day: String,
    pub college: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Score {
    pub name: String,
    pub score: String,
    pub credit: String,
    #[serde(rename = "type")]
    pub score_type: String,
    pub term: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScoreBoard {
    pub student_id: String,
    pub name: String,
    pub college: String,
    pub major: String,
    pub scores: Vec<Score>,
    pub total_credit: Vec<String>,
    pub elective_credit: Vec<String>,
    pub compulsory_credit: Vec<String>,
    pub cross_course_credit: Vec<String>,
    pub average_score: String,
    pub gpa: String,
    pub cet4: String,
    pub cet6: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Rank {
    pub average_score: String,
    pub gpa: String,
    pub class_rank: i32,
    pub major_rank: i32,
    pub terms: Vec<String>,
}
