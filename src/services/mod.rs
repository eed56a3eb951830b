pub mod ai_service;
pub mod grading_service;
pub mod quiz_service;
pub mod session_service;
