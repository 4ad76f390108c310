//! Play library: a strategy store plus the notification collaborator.

use crate::config::EditorConfig;
use crate::editor::{Editor, PendingSave};
use crate::notify::{LogNotifier, Notifier, NotifyLevel};
use crate::play::StoredPlay;
use crate::roles::{InstantiationReport, Substitution, SubstitutionReport};
use crate::roster::{PlayerRecord, Roster};
use crate::storage::{StorageResult, StrategyStore};
use std::sync::Arc;

/// Runs store calls and reports each outcome through a [`Notifier`].
///
/// Failures are returned as well as notified; the caller's session is never
/// touched here, so a failed save can simply be retried.
pub struct PlayLibrary<S: StrategyStore> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S: StrategyStore> PlayLibrary<S> {
    /// Create a library that reports to the `log` facade.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_notifier(store, Arc::new(LogNotifier))
    }

    pub fn with_notifier(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Hand a prepared payload to the store. Returns the play's id.
    ///
    /// Apply [`Editor::mark_saved`] only once this returns `Ok`.
    pub async fn save(&self, pending: &PendingSave) -> StorageResult<String> {
        let unmapped = pending.report.unmapped.len();
        if unmapped > 0 {
            self.notifier.notify(
                &format!("{} player(s) outside the starting five were saved as '?'", unmapped),
                NotifyLevel::Warning,
            );
        }

        match self.store.save(&pending.play).await {
            Ok(id) => {
                log::info!("Saved play '{}' as {}", pending.play.name, id);
                self.notifier
                    .notify(&format!("Saved '{}'", pending.play.name), NotifyLevel::Success);
                Ok(id)
            }
            Err(e) => {
                log::warn!("Saving play '{}' failed: {}", pending.play.name, e);
                self.notifier
                    .notify(&format!("Could not save '{}': {}", pending.play.name, e), NotifyLevel::Error);
                Err(e)
            }
        }
    }

    /// Load a stored play as-is.
    pub async fn load(&self, id: &str) -> StorageResult<StoredPlay> {
        match self.store.load(id).await {
            Ok(play) => {
                log::info!("Loaded play '{}' ({})", play.name, id);
                Ok(play)
            }
            Err(e) => {
                log::warn!("Loading play {} failed: {}", id, e);
                self.notifier
                    .notify(&format!("Could not load play: {}", e), NotifyLevel::Error);
                Err(e)
            }
        }
    }

    /// Load a play and open it as an editing session against `roster`.
    pub async fn open(
        &self,
        id: &str,
        roster: &Roster,
        config: EditorConfig,
    ) -> StorageResult<(Editor, InstantiationReport)> {
        let play = self.load(id).await?;
        let (editor, report) = Editor::from_stored(&play, roster, config);
        if !report.unbound_slots.is_empty() {
            let slots: Vec<String> = report.unbound_slots.iter().map(|s| s.to_string()).collect();
            log::warn!("Play '{}' has unbound slots: {}", play.name, slots.join(", "));
            self.notifier.notify(
                &format!("No starter for slot(s) {}; left as placeholders", slots.join(", ")),
                NotifyLevel::Warning,
            );
        }
        Ok((editor, report))
    }

    /// Substitute `incoming` into `editor` and report the outcome.
    ///
    /// A substitution that matched nothing is reported as info; frames
    /// skipped because `incoming` was already there raise a warning.
    pub fn substitute(
        &self,
        editor: &mut Editor,
        outgoing: &Substitution,
        incoming: &PlayerRecord,
    ) -> SubstitutionReport {
        let report = editor.substitute(outgoing, incoming);
        if !report.changed() {
            self.notifier
                .notify(&format!("No tokens to replace with {}", incoming.name), NotifyLevel::Info);
            return report;
        }

        self.notifier.notify(
            &format!("{} now plays in {} frame(s)", incoming.name, report.rewritten),
            NotifyLevel::Success,
        );
        if report.skipped > 0 {
            log::warn!("Substitution of {} skipped {} frame(s)", incoming.name, report.skipped);
            self.notifier.notify(
                &format!(
                    "{} frame(s) left unchanged: {} is already on the court there",
                    report.skipped, incoming.name
                ),
                NotifyLevel::Warning,
            );
        }
        report
    }

    /// All stored plays, ordered by name.
    pub async fn list(&self) -> StorageResult<Vec<StoredPlay>> {
        self.store.list().await.inspect_err(|e| {
            log::warn!("Listing plays failed: {}", e);
            self.notifier
                .notify(&format!("Could not list plays: {}", e), NotifyLevel::Error);
        })
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        match self.store.delete(id).await {
            Ok(()) => {
                log::info!("Deleted play {}", id);
                self.notifier.notify("Play deleted", NotifyLevel::Success);
                Ok(())
            }
            Err(e) => {
                log::warn!("Deleting play {} failed: {}", id, e);
                self.notifier
                    .notify(&format!("Could not delete play: {}", e), NotifyLevel::Error);
                Err(e)
            }
        }
    }
}
