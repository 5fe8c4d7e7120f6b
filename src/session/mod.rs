/// Session layer: the mode coordinator
///
/// A `Session` owns both persistence adapters, the current identity and the
/// in-memory collections the presentation layer displays. Every operation
/// runs the validation gate first, then dispatches to the local adapter when
/// the session is a guest or to the remote adapter with the authenticated
/// identity otherwise. Callers never pick an adapter themselves.
///
/// After any successful operation the in-memory collections match what the
/// active adapter would return on a fresh list (newest-first): entities are
/// inserted, replaced or removed only once the adapter reports success, so a
/// failed operation leaves the displayed state untouched.
///
/// The session starts as a guest and nothing about it survives a process
/// restart; becoming authenticated always goes through `login`, never
/// through a remembered identity.

use crate::domain::{
    surah, validate, Identity, Locale, ReadingReminder, ReminderDraft, ReminderPatch, Task,
    TaskDraft, TaskPatch,
};
use crate::store::{EntityStore, LocalStore, RemoteStore, StoreError};

pub struct Session {
    identity: Identity,
    locale: Locale,
    local: LocalStore,
    remote: RemoteStore,
    tasks: Vec<Task>,
    reminders: Vec<ReadingReminder>,
}

impl Session {
    /// Start a guest session over the given adapters
    pub fn new(local: LocalStore, remote: RemoteStore, locale: Locale) -> Self {
        Self {
            identity: Identity::Guest,
            locale,
            local,
            remote,
            tasks: Vec::new(),
            reminders: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_guest(&self) -> bool {
        self.identity.is_guest()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch the display locale; affects surah name resolution for
    /// reminders created from now on, never stored data
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// The displayed task collection, newest-first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The displayed reminder collection, newest-first
    pub fn reminders(&self) -> &[ReadingReminder] {
        &self.reminders
    }

    /// The adapter every operation in the current mode dispatches to
    fn store(&self) -> &dyn EntityStore {
        match self.identity {
            Identity::Guest => &self.local,
            Identity::User(_) => &self.remote,
        }
    }

    /// Reload both collections from the active adapter
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let tasks = self.store().list_tasks(&self.identity).await?;
        let reminders = self.store().list_reminders(&self.identity).await?;
        self.tasks = tasks;
        self.reminders = reminders;
        Ok(())
    }

    /// Validate credentials against the server and become authenticated
    ///
    /// On success the guest collections are replaced by the user's remote
    /// data. On failure, including a failed reload of the user's data, the
    /// session stays exactly as it was: still guest, still displaying the
    /// guest collections.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), StoreError> {
        let user_id = self.remote.login(email, password).await?;
        self.become_user(Identity::User(user_id)).await
    }

    /// Register a new account and become authenticated as it
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(), StoreError> {
        let user_id = self.remote.register(email, password, name).await?;
        self.become_user(Identity::User(user_id)).await
    }

    /// Commit the authenticated transition atomically: the identity and the
    /// displayed collections change together, only once the user's remote
    /// data has loaded. An authenticated session can never display guest
    /// entities, not even transiently.
    async fn become_user(&mut self, identity: Identity) -> Result<(), StoreError> {
        let tasks = self.remote.list_tasks(&identity).await?;
        let reminders = self.remote.list_reminders(&identity).await?;
        self.identity = identity;
        self.tasks = tasks;
        self.reminders = reminders;
        Ok(())
    }

    /// Return to guest mode, clearing the in-memory collections
    ///
    /// Remote data is untouched; local guest data reappears on the next
    /// refresh.
    pub fn logout(&mut self) {
        if !self.is_guest() {
            tracing::info!("Logged out {}", self.identity);
        }
        self.identity = Identity::Guest;
        self.tasks.clear();
        self.reminders.clear();
    }

    /// Explicit "continue as guest": a no-op when already guest, which is
    /// the only state it is offered from
    pub fn continue_as_guest(&mut self) {
        if self.is_guest() {
            tracing::debug!("Continuing as guest");
        }
    }

    // Task operations

    /// Validate and persist a new task, then show it at the top of the
    /// collection
    pub async fn add_task(&mut self, draft: TaskDraft) -> Result<&Task, StoreError> {
        let errors = validate::validate_task(&draft);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }
        let task = self.store().create_task(&self.identity, &draft).await?;
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Flip a task's completion flag
    pub async fn toggle_task(&mut self, id: &str) -> Result<&Task, StoreError> {
        let completed = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.completed)
            .ok_or_else(|| StoreError::NotFound {
                kind: "task",
                id: id.to_string(),
            })?;
        self.edit_task(id, TaskPatch::completion(!completed)).await
    }

    /// Apply a partial update to a task
    pub async fn edit_task(&mut self, id: &str, patch: TaskPatch) -> Result<&Task, StoreError> {
        let errors = validate::validate_task_patch(&patch);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }
        let updated = self
            .store()
            .update_task(&self.identity, id, &patch)
            .await?;
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "task",
                id: id.to_string(),
            })?;
        *slot = updated;
        Ok(slot)
    }

    /// Delete a task; a second delete of the same id fails with `NotFound`
    pub async fn remove_task(&mut self, id: &str) -> Result<(), StoreError> {
        self.store().delete_task(&self.identity, id).await?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    // Reminder operations

    /// Validate and persist a new reading reminder
    ///
    /// The surah display name is resolved from the active locale here, once,
    /// and stored on the reminder.
    pub async fn add_reminder(
        &mut self,
        draft: ReminderDraft,
    ) -> Result<&ReadingReminder, StoreError> {
        let errors = validate::validate_reminder(&draft);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }
        let surah_name = surah::resolve_surah_name(draft.surah_number, self.locale);
        let reminder = self
            .store()
            .create_reminder(&self.identity, &draft, &surah_name)
            .await?;
        self.reminders.insert(0, reminder);
        Ok(&self.reminders[0])
    }

    /// Flip a reminder's completion flag
    pub async fn toggle_reminder(&mut self, id: &str) -> Result<&ReadingReminder, StoreError> {
        let completed = self
            .reminders
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.completed)
            .ok_or_else(|| StoreError::NotFound {
                kind: "reminder",
                id: id.to_string(),
            })?;
        self.edit_reminder(id, ReminderPatch::completion(!completed))
            .await
    }

    /// Apply a partial update to a reminder
    pub async fn edit_reminder(
        &mut self,
        id: &str,
        patch: ReminderPatch,
    ) -> Result<&ReadingReminder, StoreError> {
        let errors = validate::validate_reminder_patch(&patch);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }
        let updated = self
            .store()
            .update_reminder(&self.identity, id, &patch)
            .await?;
        let slot = self
            .reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "reminder",
                id: id.to_string(),
            })?;
        *slot = updated;
        Ok(slot)
    }

    /// Delete a reminder; a second delete of the same id fails with
    /// `NotFound`
    pub async fn remove_reminder(&mut self, id: &str) -> Result<(), StoreError> {
        self.store().delete_reminder(&self.identity, id).await?;
        self.reminders.retain(|r| r.id != id);
        Ok(())
    }
}
