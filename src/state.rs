use crate::catalog::{self, CategoryRegistry};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::ledger::Ledger;
use crate::notify::ToastQueue;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
    pub categories: Arc<Mutex<CategoryRegistry>>,
    pub toasts: ToastQueue,
}

impl AppState {
    pub fn new(ledger: Ledger, categories: CategoryRegistry, toasts: ToastQueue) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            categories: Arc::new(Mutex::new(categories)),
            toasts,
        }
    }

    /// Fresh in-memory dashboard on the system clock.
    pub fn from_config(config: &Config) -> Self {
        let toasts = ToastQueue::new();
        let mut ledger = Ledger::new(SystemClock, toasts.clone());
        if config.seed_demo {
            for spec in catalog::demo_habits() {
                if let Err(err) = ledger.add_habit(spec) {
                    warn!("skipping demo habit: {err}");
                }
            }
        }
        Self::new(ledger, CategoryRegistry::default(), toasts)
    }
}
