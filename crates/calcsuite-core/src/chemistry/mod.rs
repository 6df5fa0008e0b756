pub mod solutions;
