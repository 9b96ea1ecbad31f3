use crate::notify::Notifier;
use crate::sheet::SheetState;
use crate::storage::LocalStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Everything one browser tab works against: the store, the active sheet and
/// the status message.
#[derive(Debug, Default)]
pub struct Session {
    pub store: LocalStore,
    pub sheet: SheetState,
    pub notifier: Notifier,
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: LocalStore) -> Self {
        Self {
            data_path,
            session: Arc::new(Mutex::new(Session {
                store,
                ..Session::default()
            })),
        }
    }
}
