//! 提示词模板：(配置, 先前产物, 反馈) 的纯函数，输出提示词字符串

pub mod base;
pub mod character;
pub mod rewrite;
pub mod story;
