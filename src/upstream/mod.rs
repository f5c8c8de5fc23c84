//! The spider upstream: wire models, an HTTP client, and a per-student
//! proxy that wraps every call in a retry/relogin loop.

mod client;
mod models;
mod student;
mod student_service;

pub use client::UpstreamClient;
pub use models::{
    ClassroomStatus, ClassroomStatusTable, CourseEntry, CourseList, Examination, ExamList,
    LoginResponse, Rank, Score, ScoreBoard, StudentInfo, TeachingCalendar, UpstreamEnvelope,
};
pub use student::StudentProxy;
pub use student_service::StudentService;
