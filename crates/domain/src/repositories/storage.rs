use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// Media store collaborator: keeps uploaded files and hands back retrievable
/// references. Size and type validation happens before `store` is called.
#[async_trait]
#[automock]
pub trait MediaStorage {
    /// Persists the file under the namespace and returns its stored path.
    async fn store(&self, namespace: &str, filename: &str, content: &[u8]) -> Result<String>;

    /// Removes a stored file. Used for explicit cleanup when an enclosing
    /// operation fails after files were written.
    async fn remove(&self, path: &str) -> Result<()>;
}
