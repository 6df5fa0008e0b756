pub mod amortization;
pub mod growth;
pub mod projector;
