//! 组件基类

/// 组件 trait
///
/// 场景里的相机和光源都实现这个接口
pub trait Component {
    /// 获取组件名称
    fn name(&self) -> &str;

    /// 每帧更新（可选实现）
    fn tick(&mut self, _delta_time: f32) {}
}
