//! In-memory to-do store with categories.
//!
//! # Responsibility
//! - Own the ordered task list and the category set for one session.
//! - Validate task input before any mutation.
//!
//! # Invariants
//! - Category names are unique.
//! - Every task's category is a member of the category set.
//! - A category referenced by any task cannot be removed.
//! - Task order is insertion order; no operation re-sorts.

use crate::model::task::{Deadline, ImageRef, Priority, Task, TaskId, TaskValidationError};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Categories seeded by `TaskStore::with_default_categories`.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["仕事", "学業", "趣味", "その他"];

/// Label the presentation layer uses for the unfiltered view.
pub const ALL_CATEGORIES_LABEL: &str = "すべて";

/// Failure modes for task store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreError {
    EmptyText,
    InvalidTime(String),
    EmptyCategoryName,
    /// Name collides with a label `CategoryFilter::parse` reads as `All`.
    ReservedCategoryName(String),
    DuplicateCategory(String),
    CategoryInUse(String),
    CategoryNotFound(String),
    TaskNotFound(TaskId),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::InvalidTime(value) => {
                write!(f, "invalid deadline time `{value}`; expected HH:MM (24-hour)")
            }
            Self::EmptyCategoryName => write!(f, "category name cannot be empty"),
            Self::ReservedCategoryName(name) => {
                write!(f, "category name `{name}` is reserved for the unfiltered view")
            }
            Self::DuplicateCategory(name) => write!(f, "category already exists: `{name}`"),
            Self::CategoryInUse(name) => {
                write!(f, "category `{name}` is used by at least one task")
            }
            Self::CategoryNotFound(name) => write!(f, "category not found: `{name}`"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for TaskStoreError {}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::EmptyText => Self::EmptyText,
            TaskValidationError::InvalidTime(raw) => Self::InvalidTime(raw),
        }
    }
}

pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Request model for adding one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub priority: Priority,
    pub date: NaiveDate,
    /// Raw `HH:MM` input; validated by the store.
    pub time: String,
    pub category: String,
    pub memo: Option<String>,
    pub image: Option<ImageRef>,
}

impl NewTask {
    pub fn new(
        text: impl Into<String>,
        priority: Priority,
        date: NaiveDate,
        time: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            priority,
            date,
            time: time.into(),
            category: category.into(),
            memo: None,
            image: None,
        }
    }
}

/// Category scope for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Named(String),
}

impl CategoryFilter {
    /// Maps `すべて` and `all` (any case) to `All`, anything else to `Named`.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES_LABEL || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => task.category == *name,
        }
    }
}

/// Completion summary across every stored task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskProgress {
    pub total: usize,
    pub done: usize,
    pub not_done: usize,
}

/// Session-owned task and category collections.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    categories: Vec<String>,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates a store with no categories and no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `categories` in the given order.
    ///
    /// # Errors
    /// - Any `add_category` error for the first rejected name.
    pub fn with_categories<I, S>(categories: I) -> TaskStoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for name in categories {
            store.add_category(name)?;
        }
        Ok(store)
    }

    /// Creates a store seeded with `DEFAULT_CATEGORIES`.
    pub fn with_default_categories() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
            tasks: Vec::new(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a new category and returns the updated set.
    ///
    /// # Errors
    /// - `EmptyCategoryName` when the name is blank.
    /// - `ReservedCategoryName` for `すべて` and `all` (any case).
    /// - `DuplicateCategory` when the name already exists.
    pub fn add_category(&mut self, name: impl Into<String>) -> TaskStoreResult<&[String]> {
        let name = name.into();
        if name.trim().is_empty() {
            warn!("event=category_add module=task_store status=error error_code=empty_name");
            return Err(TaskStoreError::EmptyCategoryName);
        }
        if CategoryFilter::parse(&name) == CategoryFilter::All {
            warn!("event=category_add module=task_store status=error error_code=reserved_name");
            return Err(TaskStoreError::ReservedCategoryName(name));
        }
        if self.categories.contains(&name) {
            warn!("event=category_add module=task_store status=error error_code=duplicate_category");
            return Err(TaskStoreError::DuplicateCategory(name));
        }

        self.categories.push(name);
        info!(
            "event=category_add module=task_store status=ok category_count={}",
            self.categories.len()
        );
        Ok(&self.categories)
    }

    /// Removes an unreferenced category.
    pub fn delete_category(&mut self, name: &str) -> TaskStoreResult<()> {
        let Some(position) = self.categories.iter().position(|current| current == name) else {
            return Err(TaskStoreError::CategoryNotFound(name.to_string()));
        };

        if self.tasks.iter().any(|task| task.category == name) {
            warn!("event=category_delete module=task_store status=error error_code=category_in_use");
            return Err(TaskStoreError::CategoryInUse(name.to_string()));
        }

        self.categories.remove(position);
        info!(
            "event=category_delete module=task_store status=ok category_count={}",
            self.categories.len()
        );
        Ok(())
    }

    /// Validates `request` and appends a new not-done task.
    ///
    /// # Errors
    /// - `EmptyText` when the text is blank.
    /// - `InvalidTime` when the time is not 24-hour `HH:MM`.
    /// - `CategoryNotFound` when the category is not in the set.
    pub fn add_task(&mut self, request: NewTask) -> TaskStoreResult<&Task> {
        let NewTask {
            text,
            priority,
            date,
            time,
            category,
            memo,
            image,
        } = request;

        if text.trim().is_empty() {
            return Err(TaskStoreError::EmptyText);
        }
        let deadline = Deadline::from_parts(date, &time)?;
        if !self.categories.contains(&category) {
            return Err(TaskStoreError::CategoryNotFound(category));
        }

        let task = Task::new(text, priority, deadline, category)?
            .with_memo(memo)
            .with_image(image);
        debug!(
            "event=task_add module=task_store status=ok priority={:?} has_memo={} has_image={}",
            task.priority,
            task.memo.is_some(),
            task.image.is_some()
        );
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Sets the done flag of one task to `value`.
    pub fn toggle_done(&mut self, id: TaskId, value: bool) -> TaskStoreResult<&Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskStoreError::TaskNotFound(id))?;
        task.done = value;
        Ok(&*task)
    }

    /// Removes exactly one task and returns it.
    pub fn delete_task(&mut self, id: TaskId) -> TaskStoreResult<Task> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskStoreError::TaskNotFound(id))?;
        Ok(self.tasks.remove(position))
    }

    /// Marks every task done. Returns how many flags changed.
    pub fn set_all_done(&mut self) -> usize {
        let mut changed = 0;
        for task in self.tasks.iter_mut().filter(|task| !task.done) {
            task.done = true;
            changed += 1;
        }
        info!("event=task_set_all_done module=task_store status=ok changed={changed}");
        changed
    }

    /// Drops every done task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.done);
        let removed = before - self.tasks.len();
        info!("event=task_clear_completed module=task_store status=ok removed={removed}");
        removed
    }

    /// Tasks in `filter` scope, in insertion order.
    pub fn filter_by_category(&self, filter: &CategoryFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    pub fn progress(&self) -> TaskProgress {
        let total = self.tasks.len();
        let done = self.tasks.iter().filter(|task| task.done).count();
        TaskProgress {
            total,
            done,
            not_done: total - done,
        }
    }
}
