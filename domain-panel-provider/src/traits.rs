use async_trait::async_trait;

use crate::error::Result;
use crate::types::DomainRecord;

/// 域名列表数据源 Trait
///
/// 实现:
/// - `HttpDomainApi`: 通过 HTTP 访问远程服务
/// - 测试中的脚本化 mock
#[async_trait]
pub trait DomainApi: Send + Sync {
    /// 数据源标识（用于日志与错误信息）
    fn endpoint(&self) -> &str;

    /// 获取完整的域名列表快照
    ///
    /// 每次调用都是一次完整请求，不做重试，也不做增量合并。
    async fn list_domains(&self) -> Result<Vec<DomainRecord>>;
}
