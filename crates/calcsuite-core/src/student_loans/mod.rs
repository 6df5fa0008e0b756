pub mod repayment;
