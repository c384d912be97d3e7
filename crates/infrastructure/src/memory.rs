use crate::repositories::TaskRepository;
use chrono::Utc;
use domain::{DomainError, DomainResult, NewTask, Task, TaskId, TaskPatch};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use ulid::Generator;

/// プロセス内メモリのタスクストア（再起動で消える）
///
/// 単一の `RwLock` で一覧と ID 採番器をまとめて保護します。
/// 変更はロック内で完結するため、ポイズン状態でもデータは整合しており、そのまま回復して使います。
#[derive(Default)]
pub struct InMemoryTaskRepository {
    inner: RwLock<Inner>,
}

struct Inner {
    // 挿入順を保持
    tasks: Vec<Task>,
    // 単調増加 ULID。削除済み ID が再発行されないことを保証する
    ids: Generator,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            ids: Generator::new(),
        }
    }
}

impl Inner {
    fn position(&self, id: &TaskId) -> DomainResult<usize> {
        self.tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| DomainError::NotFound(id.clone()))
    }
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn list(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    fn get(&self, id: &TaskId) -> DomainResult<Task> {
        let inner = self.read();
        let idx = inner.position(id)?;
        Ok(inner.tasks[idx].clone())
    }

    fn create(&self, input: NewTask) -> DomainResult<Task> {
        let mut inner = self.write();
        let id = inner
            .ids
            .generate()
            .map(TaskId::from)
            .map_err(|_| DomainError::IdExhausted)?;
        let task = Task::new(id, input, Utc::now());
        inner.tasks.push(task.clone());
        debug!(task_id = %task.id, count = inner.tasks.len(), "task created");
        Ok(task)
    }

    fn update(&self, id: &TaskId, patch: TaskPatch) -> DomainResult<Task> {
        let mut inner = self.write();
        let idx = inner.position(id)?;
        let task = &mut inner.tasks[idx];
        task.apply(patch, Utc::now());
        debug!(task_id = %id, "task updated");
        Ok(task.clone())
    }

    fn delete(&self, id: &TaskId) -> DomainResult<()> {
        let mut inner = self.write();
        let idx = inner.position(id)?;
        inner.tasks.remove(idx);
        debug!(task_id = %id, count = inner.tasks.len(), "task deleted");
        Ok(())
    }
}
