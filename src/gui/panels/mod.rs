//! GUI 面板模块

pub mod lighting;
pub mod performance;
pub mod scene;
