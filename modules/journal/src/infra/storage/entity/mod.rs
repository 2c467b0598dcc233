pub mod answer;
pub mod mood_checkin;
pub mod partnership;
pub mod question;
pub mod question_assignment;
