pub mod lexer;
pub mod ast;
pub mod parser;
pub mod environment;
pub mod evaluator;
