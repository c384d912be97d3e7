use domain::{DomainResult, NewTask, Task, TaskId, TaskPatch};

/// タスク保存先の抽象
///
/// 実装は複数リクエストから同時に呼ばれるため `Send + Sync` を要求します。
/// 変更系（create/update/delete）は互いに割り込まないこと、
/// 参照系は変更の途中状態を観測しないことが実装側の責務です。
pub trait TaskRepository: Send + Sync {
    /// 全件を挿入順で返す（ページングなし）
    fn list(&self) -> Vec<Task>;
    fn get(&self, id: &TaskId) -> DomainResult<Task>;
    /// 新しい ID を採番して末尾に追加
    fn create(&self, input: NewTask) -> DomainResult<Task>;
    /// 指定されたフィールドのみ上書きし、`updated_at` を更新
    fn update(&self, id: &TaskId, patch: TaskPatch) -> DomainResult<Task>;
    fn delete(&self, id: &TaskId) -> DomainResult<()>;
}
