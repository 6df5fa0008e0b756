pub mod chemistry;
pub mod fitness;
pub mod forms;
pub mod housing;
pub mod numerology;
pub mod personal_finance;
pub mod projection;
pub mod student_loans;
