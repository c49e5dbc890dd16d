use crate::calendar::{
    date_key, first_weekday_offset, is_today, is_weekend, month_days, month_title, Clock,
    SystemClock,
};
use crate::config::Config;
use crate::models::{
    CountScope, DayCell, Direction, DisplayCursor, MonthCount, MonthView, StateChange,
};
use crate::stats::{counter, trailing_monthly_counts};
use crate::storage::{FileStorage, RecordStorage};
use crate::store::AttendanceStore;
use chrono::Datelike;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

const CHANGE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub quota: Option<u32>,
    pub scope: CountScope,
    pub trend_months: usize,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            quota: config.quota,
            scope: config.scope,
            trend_months: config.trend_months,
        }
    }
}

/// Owns the attendance store, the display cursor and the change feed for one
/// widget. Every mutation is followed by a `StateChange` broadcast.
pub struct CalendarSession<S, C> {
    store: AttendanceStore<S>,
    clock: C,
    cursor: DisplayCursor,
    settings: SessionSettings,
    changes: broadcast::Sender<StateChange>,
}

impl<S: RecordStorage, C: Clock> CalendarSession<S, C> {
    pub async fn open(storage: S, clock: C, settings: SessionSettings) -> Self {
        let store = AttendanceStore::load(storage).await;
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        let cursor = DisplayCursor::containing(clock.today());
        Self {
            store,
            clock,
            cursor,
            settings,
            changes,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    /// Resets the cursor to the current month.
    pub fn on_open(&mut self) -> DisplayCursor {
        self.cursor = DisplayCursor::containing(self.clock.today());
        self.notify(StateChange::Opened(self.cursor));
        self.cursor
    }

    pub async fn on_close(&mut self) {
        if let Err(err) = self.store.flush_if_dirty().await {
            tracing::error!("failed to flush attendance record on close: {err}");
        }
        self.notify(StateChange::Closed);
    }

    pub async fn on_toggle(&mut self, key: &str) -> bool {
        let on_site = self.store.toggle(key).await;
        self.notify(StateChange::Toggled {
            key: key.to_string(),
            on_site,
        });
        on_site
    }

    pub fn on_navigate(&mut self, direction: Direction) -> DisplayCursor {
        let cursor = self.cursor.step(direction);
        self.notify(StateChange::Navigated(cursor));
        cursor
    }

    pub fn cursor(&self) -> DisplayCursor {
        self.cursor
    }

    pub fn store(&self) -> &AttendanceStore<S> {
        &self.store
    }

    pub fn is_on_site(&self, key: &str) -> bool {
        self.store.get(key)
    }

    pub fn month_count(&self) -> usize {
        counter(self.store.record(), self.cursor, self.settings.scope)
    }

    pub fn trend(&self) -> Vec<MonthCount> {
        trailing_monthly_counts(self.store.record(), self.cursor, self.settings.trend_months)
    }

    pub fn day_cells(&self) -> Vec<DayCell> {
        let today = self.clock.today();
        month_days(self.cursor.year, self.cursor.month0)
            .into_iter()
            .map(|date| {
                let key = date_key(date);
                DayCell {
                    is_on_site: self.store.get(&key),
                    key,
                    date,
                    day: date.day(),
                    weekday_index: date.weekday().num_days_from_monday(),
                    is_weekend: is_weekend(date),
                    is_today: is_today(date, today),
                }
            })
            .collect()
    }

    pub fn month_view(&self) -> MonthView {
        MonthView {
            cursor: self.cursor,
            title: month_title(self.cursor),
            leading_blanks: first_weekday_offset(self.cursor.year, self.cursor.month0),
            days: self.day_cells(),
            on_site_count: self.month_count(),
            scope: self.settings.scope,
            quota: self.settings.quota,
            trend: self.trend(),
        }
    }

    fn notify(&self, change: StateChange) {
        debug!(?change, "calendar state changed");
        // No subscribers is not an error.
        let _ = self.changes.send(change);
    }
}

pub type FileSession = CalendarSession<FileStorage, SystemClock>;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<FileSession>>,
}

impl AppState {
    pub fn new(session: FileSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
