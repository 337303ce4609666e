pub mod context;
pub mod errors;
pub mod interpreter;
pub mod verb;
