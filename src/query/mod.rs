// query/mod.rs - 查询模块
//! 问题解析：日期子语法、实体抽取、规则级联、兜底分类

pub mod calendar;
pub mod cascade;
pub mod entities;
pub mod fallback;
mod parser;
pub mod types;

pub use parser::*;
pub use types::*;
