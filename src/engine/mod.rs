// engine/mod.rs - 问答引擎
//! 解析结果到数值回答的统一入口

pub mod builder;
pub mod core;
pub mod store;

pub use builder::*;
pub use self::core::*;
pub use store::*;
