//! Per-component localization controller
//!
//! Each consuming component owns one controller. The controller tracks
//! the document locale settings, resolves a language and resource
//! bundle through the provider seam, gates the component's first render
//! until resources arrive, and exposes the `localize`/`format*`/
//! `parse*` surface the component renders with.
//!
//! Lifecycle: `Uninitialized → AwaitingLanguage → AwaitingResources →
//! Ready`, re-entering `AwaitingResources` on every relevant settings
//! change. Fetches are not pipelined per instance: a newer settings
//! change may start a fetch while an older one is outstanding, and the
//! visible state always converges on the newest change. Stale
//! completions are discarded by generation number.

use crate::error::{LocalizeError, LocalizeResult};
use crate::formatter::{MessageArgs, MessageCache};
use crate::intl::{ChronoIntl, DateTimeStyle, IntlFormat};
use crate::provider::{ResolvedResources, ResourceProvider};
use crate::resolver::candidate_languages;
use crate::settings::{DocumentLocaleSettings, LocaleSettingsSnapshot, TimezoneDescriptor};
use arc_swap::ArcSwap;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Language used for value formatting before any resolution completes
const DEFAULT_FORMAT_LANGUAGE: &str = "en";

/// Capacity of the controller event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Resolved language state for one component instance
#[derive(Debug, Clone, Default)]
pub struct ResolvedLocaleState {
    pub language: Option<String>,
    pub resources: Option<crate::catalog::ResourceBundle>,
    pub ready: bool,
}

/// Lifecycle phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// Constructed, not yet attached
    Uninitialized,
    /// Attached; no candidate language has resolved yet
    AwaitingLanguage,
    /// A resource fetch is outstanding
    AwaitingResources,
    /// Resources committed; `localize` serves real strings
    Ready,
}

/// Readiness of the first resource fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    Pending,
    Ready,
    Failed(String),
}

/// Notifications dispatched to the owning component
///
/// The first successful resolution is deliberately silent so the
/// component does not react before it has rendered anything.
#[derive(Debug, Clone, PartialEq)]
pub enum LocaleEvent {
    LanguageChanged { language: String },
    TimezoneChanged { timezone: TimezoneDescriptor },
}

/// Localization controller owned by a consuming component
pub struct LocalizationController {
    /// Self-reference handed to spawned tasks; tasks hold only weak
    /// references so a dropped controller never outlives its owner
    weak_self: Weak<Self>,
    settings: Arc<DocumentLocaleSettings>,
    provider: Arc<dyn ResourceProvider>,
    intl: Arc<dyn IntlFormat>,
    cache: Arc<MessageCache>,
    state: ArcSwap<ResolvedLocaleState>,
    phase: Mutex<ControllerPhase>,
    /// Generation of the most recently issued fetch
    issued: AtomicU64,
    /// Generation of the most recently committed fetch
    committed: Mutex<u64>,
    first_commit: AtomicBool,
    pending_updates: Mutex<BTreeSet<String>>,
    readiness_tx: watch::Sender<Readiness>,
    events_tx: broadcast::Sender<LocaleEvent>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl LocalizationController {
    /// Create a controller with the default formatter service and the
    /// process-wide message cache
    pub fn new(
        settings: Arc<DocumentLocaleSettings>,
        provider: Arc<dyn ResourceProvider>,
    ) -> Arc<Self> {
        Self::with_intl(settings, provider, Arc::new(ChronoIntl::new()))
    }

    /// Create a controller with an explicit formatting service
    pub fn with_intl(
        settings: Arc<DocumentLocaleSettings>,
        provider: Arc<dyn ResourceProvider>,
        intl: Arc<dyn IntlFormat>,
    ) -> Arc<Self> {
        let (readiness_tx, _) = watch::channel(Readiness::Pending);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new_cyclic(|weak| Self {
            weak_self: weak.clone(),
            settings,
            provider,
            intl,
            cache: MessageCache::global(),
            state: ArcSwap::from_pointee(ResolvedLocaleState::default()),
            phase: Mutex::new(ControllerPhase::Uninitialized),
            issued: AtomicU64::new(0),
            committed: Mutex::new(0),
            first_commit: AtomicBool::new(false),
            pending_updates: Mutex::new(BTreeSet::new()),
            readiness_tx,
            events_tx,
            listener: Mutex::new(None),
        })
    }

    /// Convenience: create and attach immediately
    pub fn attached(
        settings: Arc<DocumentLocaleSettings>,
        provider: Arc<dyn ResourceProvider>,
    ) -> Arc<Self> {
        let controller = Self::new(settings, provider);
        controller.attach();
        controller
    }

    /// Start observing settings changes and issue the initial fetch
    ///
    /// Idempotent; a second attach while already attached is a no-op.
    /// Must run inside a tokio runtime. The subscription lives until
    /// [`detach`](Self::detach) or drop, so a component attached to a
    /// longer-lived settings object does not leak its callback.
    pub fn attach(&self) {
        let mut listener = self.listener.lock();
        if listener.is_some() {
            return;
        }
        *self.phase.lock() = ControllerPhase::AwaitingLanguage;

        let snapshot = self.settings.snapshot();
        self.spawn_refresh(snapshot.clone());

        let weak = self.weak_self.clone();
        let mut rx = self.settings.subscribe();
        *listener = Some(tokio::spawn(async move {
            let mut previous = snapshot;
            while rx.changed().await.is_ok() {
                let current = rx.borrow_and_update().clone();
                let Some(controller) = Weak::upgrade(&weak) else {
                    break;
                };
                controller.on_settings_change(&previous, &current);
                previous = current;
            }
        }));
    }

    /// Stop observing settings changes
    pub fn detach(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
            debug!("detached from locale settings");
        }
    }

    fn on_settings_change(
        &self,
        previous: &LocaleSettingsSnapshot,
        current: &LocaleSettingsSnapshot,
    ) {
        if current.language != previous.language
            || current.fallback_language != previous.fallback_language
        {
            self.spawn_refresh(current.clone());
        }
        if current.timezone != previous.timezone {
            let _ = self.events_tx.send(LocaleEvent::TimezoneChanged {
                timezone: current.timezone.clone(),
            });
        }
    }

    fn spawn_refresh(&self, snapshot: LocaleSettingsSnapshot) {
        // Generations are handed out here, synchronously, so they follow
        // settings-change order even when the spawned fetches interleave.
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(controller) = self.weak_self.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            controller.refresh(generation, snapshot).await;
        });
    }

    /// Resolve and fetch resources for one settings snapshot
    async fn refresh(&self, generation: u64, snapshot: LocaleSettingsSnapshot) {
        let candidates = candidate_languages(
            snapshot.language.as_deref(),
            snapshot.fallback_language.as_deref(),
        );
        debug!(generation, candidates = ?candidates, "fetching resources");
        self.set_phase_if_current(generation, ControllerPhase::AwaitingResources);

        match self.provider.get_resources(&candidates).await {
            Ok(Some(resolved)) => self.commit(generation, resolved),
            Ok(None) => {
                // Every catalog is expected to carry the universal "en"
                // entry; reaching this branch is a host configuration
                // error, not a runtime condition to recover from.
                warn!(
                    candidates = ?candidates,
                    "no resource bundle matches any candidate language; staying unready"
                );
                self.set_phase_if_current(generation, ControllerPhase::AwaitingLanguage);
            }
            Err(e) => {
                warn!(generation, error = %e, "resource fetch failed");
                self.readiness_tx.send_if_modified(|readiness| {
                    if matches!(readiness, Readiness::Pending) {
                        *readiness = Readiness::Failed(e.to_string());
                        true
                    } else {
                        false
                    }
                });
            }
        }
    }

    /// Record a phase transition unless a newer fetch already committed
    fn set_phase_if_current(&self, generation: u64, phase: ControllerPhase) {
        let committed = self.committed.lock();
        if generation >= *committed {
            *self.phase.lock() = phase;
        }
    }

    /// Commit a completed fetch, unless a newer one already landed
    fn commit(&self, generation: u64, resolved: ResolvedResources) {
        {
            let mut committed = self.committed.lock();
            if generation < *committed {
                debug!(
                    generation,
                    committed = *committed,
                    "discarding stale resource fetch"
                );
                return;
            }
            *committed = generation;
            // Replace semantics: the previous bundle is dropped, never
            // merged into.
            self.state.store(Arc::new(ResolvedLocaleState {
                language: Some(resolved.language.clone()),
                resources: Some(resolved.resources),
                ready: true,
            }));
            *self.phase.lock() = ControllerPhase::Ready;
        }

        self.readiness_tx.send_if_modified(|readiness| {
            if matches!(readiness, Readiness::Pending) {
                *readiness = Readiness::Ready;
                true
            } else {
                false
            }
        });

        if self.first_commit.swap(true, Ordering::SeqCst) {
            let _ = self.events_tx.send(LocaleEvent::LanguageChanged {
                language: resolved.language,
            });
        } else {
            debug!(language = %resolved.language, "initial resolution committed");
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ControllerPhase {
        *self.phase.lock()
    }

    /// Resolved language, once ready
    pub fn language(&self) -> Option<String> {
        self.state.load().language.clone()
    }

    /// Configured timezone descriptor
    pub fn timezone(&self) -> TimezoneDescriptor {
        self.settings.snapshot().timezone
    }

    /// Snapshot of the resolved locale state
    pub fn resolved_state(&self) -> Arc<ResolvedLocaleState> {
        self.state.load_full()
    }

    /// Whether the first resource fetch has committed
    pub fn is_ready(&self) -> bool {
        self.state.load().ready
    }

    /// Subscribe to language/timezone change notifications
    pub fn events(&self) -> broadcast::Receiver<LocaleEvent> {
        self.events_tx.subscribe()
    }

    /// Wait for the first resource fetch to settle
    ///
    /// Resolves once resources have committed; errs if the first fetch
    /// failed. When no candidate language ever matches (a host
    /// configuration error) this future never completes.
    pub async fn resource_fetch_complete(&self) -> LocalizeResult<()> {
        let mut rx = self.readiness_tx.subscribe();
        loop {
            let readiness = rx.borrow_and_update().clone();
            match readiness {
                Readiness::Ready => return Ok(()),
                Readiness::Failed(message) => {
                    return Err(LocalizeError::ResourceFetch { message });
                }
                Readiness::Pending => {}
            }
            if rx.changed().await.is_err() {
                return Err(LocalizeError::ResourceFetch {
                    message: "controller dropped before resources resolved".to_string(),
                });
            }
        }
    }

    /// Gate a render update on readiness
    ///
    /// Returns `true` when the component should apply the change set
    /// now. While unready, the change set is buffered instead and the
    /// call returns `false`; the merged set is replayed through
    /// [`take_pending_updates`](Self::take_pending_updates) once ready,
    /// so the first real render happens with resolved resources rather
    /// than placeholder text.
    pub fn should_update<I, S>(&self, changed: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.state.load().ready {
            return true;
        }
        let mut pending = self.pending_updates.lock();
        for property in changed {
            pending.insert(property.into());
        }
        false
    }

    /// Drain the buffered property change set
    pub fn take_pending_updates(&self) -> Vec<String> {
        let mut pending = self.pending_updates.lock();
        std::mem::take(&mut *pending).into_iter().collect()
    }

    /// Translate a message key with the resolved resources
    ///
    /// Returns the empty string while unready, for unknown keys, and
    /// for keys whose template is empty; display code never has to
    /// handle a missing translation specially.
    pub fn localize(&self, key: &str, args: &MessageArgs) -> String {
        let state = self.state.load();
        if !state.ready {
            return String::new();
        }
        let (Some(language), Some(resources)) = (&state.language, &state.resources) else {
            return String::new();
        };
        let Some(template) = resources.get(key) else {
            debug!(key = %key, language = %language, "missing message key");
            return String::new();
        };
        if template.is_empty() {
            return String::new();
        }
        self.cache.get_or_compile(key, template).format(language, args)
    }

    fn format_language(&self) -> String {
        self.state
            .load()
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_FORMAT_LANGUAGE.to_string())
    }

    pub fn format_date_time(&self, value: DateTime<Utc>, style: DateTimeStyle) -> String {
        let snapshot = self.settings.snapshot();
        self.intl.format_date_time(
            &self.format_language(),
            &snapshot.overrides,
            &snapshot.timezone,
            value,
            style,
        )
    }

    pub fn format_date(&self, value: DateTime<Utc>, style: DateTimeStyle) -> String {
        let snapshot = self.settings.snapshot();
        self.intl.format_date(
            &self.format_language(),
            &snapshot.overrides,
            &snapshot.timezone,
            value,
            style,
        )
    }

    pub fn format_time(&self, value: DateTime<Utc>) -> String {
        let snapshot = self.settings.snapshot();
        self.intl.format_time(
            &self.format_language(),
            &snapshot.overrides,
            &snapshot.timezone,
            value,
        )
    }

    pub fn format_number(&self, value: f64) -> String {
        let snapshot = self.settings.snapshot();
        self.intl
            .format_number(&self.format_language(), &snapshot.overrides, value)
    }

    pub fn format_file_size(&self, bytes: u64) -> String {
        let snapshot = self.settings.snapshot();
        self.intl
            .format_file_size(&self.format_language(), &snapshot.overrides, bytes)
    }

    pub fn parse_date(&self, input: &str) -> LocalizeResult<NaiveDate> {
        let snapshot = self.settings.snapshot();
        self.intl
            .parse_date(&self.format_language(), &snapshot.overrides, input)
    }

    pub fn parse_time(&self, input: &str) -> LocalizeResult<NaiveTime> {
        let snapshot = self.settings.snapshot();
        self.intl
            .parse_time(&self.format_language(), &snapshot.overrides, input)
    }

    pub fn parse_number(&self, input: &str) -> LocalizeResult<f64> {
        let snapshot = self.settings.snapshot();
        self.intl
            .parse_number(&self.format_language(), &snapshot.overrides, input)
    }
}

impl Drop for LocalizationController {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for LocalizationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.load();
        f.debug_struct("LocalizationController")
            .field("phase", &self.phase())
            .field("state", &*state)
            .finish_non_exhaustive()
    }
}
