//! 缓存层
//!
//! 以插件方式注册缓存后端（moka 内存缓存 / redis），启动时按配置选择。
//! 账号目录查询与令牌解析结果都经由这里做带 TTL 的缓存。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache, get_json, insert_json};

/// 声明并在加载时注册一个缓存插件
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::InternHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
