//! タスク（Todo）のドメインモデル
//!
//! 状態遷移は `Task::new` と `Task::apply` の 2 つだけです。
//! 永続化や排他制御はインフラ層の責務とし、本モジュールは時刻を引数で受け取る純粋な関数のみを持ちます。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// タスク ID（ULID 文字列）
///
/// 外部からは不透明な文字列として扱い、パスパラメータもそのまま包みます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Ulid> for TaskId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 作成時の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// 部分更新の入力
///
/// `None` は「変更しない」を意味します（値の真偽ではなく有無で判定）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl Task {
    /// 未完了のタスクを生成します。`created_at` と `updated_at` は同じ時刻になります。
    pub fn new(id: TaskId, input: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// パッチを適用し、`updated_at` を必ず前進させます。
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        // 時計が進んでいない（または巻き戻った）場合でも単調増加を保つ
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(now: DateTime<Utc>) -> Task {
        Task::new(
            TaskId::from(Ulid::new()),
            NewTask {
                title: "Buy milk".into(),
                description: Some("2 bottles".into()),
            },
            now,
        )
    }

    #[test]
    fn new_task_starts_incomplete_with_equal_timestamps() {
        let now = Utc::now();
        let task = sample(now);

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description.as_deref(), Some("2 bottles"));
        assert!(!task.completed);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn apply_overwrites_only_present_fields() {
        let now = Utc::now();
        let mut task = sample(now);

        task.apply(
            TaskPatch {
                title: Some("Buy oat milk".into()),
                ..TaskPatch::default()
            },
            now + Duration::seconds(1),
        );

        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description.as_deref(), Some("2 bottles"));
        assert!(!task.completed);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now + Duration::seconds(1));
    }

    #[test]
    fn explicit_false_is_distinct_from_absent() {
        let now = Utc::now();
        let mut task = sample(now);
        task.apply(
            TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
            now,
        );
        assert!(task.completed);

        // 省略は変更なし
        task.apply(TaskPatch::default(), now);
        assert!(task.completed);

        // 明示的な false は反映される
        task.apply(
            TaskPatch {
                completed: Some(false),
                ..TaskPatch::default()
            },
            now,
        );
        assert!(!task.completed);
    }

    #[test]
    fn updated_at_advances_even_if_clock_stalls() {
        let now = Utc::now();
        let mut task = sample(now);

        task.apply(TaskPatch::default(), now);
        assert!(task.updated_at > now);

        let previous = task.updated_at;
        task.apply(TaskPatch::default(), now - Duration::seconds(10));
        assert!(task.updated_at > previous);
    }

    #[test]
    fn serializes_with_camel_case_and_omits_missing_description() {
        let now = Utc::now();
        let task = Task::new(
            TaskId::from("01HZX3".to_string()),
            NewTask { title: "T".into(), description: None },
            now,
        );

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "01HZX3");
        assert_eq!(json["completed"], false);
        assert!(json.get("description").is_none());
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    // プロパティベーステスト: completed のみの更新は他フィールドを変えない
    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn completed_only_patch_keeps_text_fields(
                title in ".{0,64}",
                description in proptest::option::of(".{0,64}"),
                completed in any::<bool>(),
                skew_ms in -5_000i64..5_000,
            ) {
                let now = Utc::now();
                let mut task = Task::new(
                    TaskId::from(Ulid::new()),
                    NewTask { title: title.clone(), description: description.clone() },
                    now,
                );
                let before = task.updated_at;

                task.apply(
                    TaskPatch { completed: Some(completed), ..TaskPatch::default() },
                    now + Duration::milliseconds(skew_ms),
                );

                prop_assert_eq!(&task.title, &title);
                prop_assert_eq!(&task.description, &description);
                prop_assert_eq!(task.completed, completed);
                prop_assert_eq!(task.created_at, now);
                prop_assert!(task.updated_at > before);
            }
        }
    }
}
