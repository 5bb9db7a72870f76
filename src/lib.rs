pub mod ast;
pub mod compiler;
pub mod interface;
