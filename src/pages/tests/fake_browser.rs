use crate::driver::{Launcher, Session, scripts};
use crate::error::DriverError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted page state shared by every session a [`FakeLauncher`] opens
#[derive(Default)]
pub struct BrowserState {
    pub visible: HashSet<String>,
    pub texts: HashMap<String, String>,
    pub values: HashMap<String, String>,
    pub checked: HashMap<String, bool>,
    pub shadow: Value,
    /// Cell text per table selector, indexed by how many reloads happened
    pub tables: HashMap<String, Vec<String>>,
    pub source: String,
    /// Selector whose wait never completes
    pub hang_on: Option<String>,

    pub navigations: Vec<String>,
    pub clicks: Vec<String>,
    pub reloads: usize,
    pub launches: usize,
    pub closes: usize,
}

impl BrowserState {
    pub fn show<S: AsRef<str>>(&mut self, selectors: &[S]) {
        self.visible
            .extend(selectors.iter().map(|s| s.as_ref().to_string()));
    }
}

#[derive(Clone)]
pub struct FakeSession(Arc<Mutex<BrowserState>>);

pub struct FakeLauncher {
    pub state: Arc<Mutex<BrowserState>>,
    pub refuse: bool,
}

impl FakeLauncher {
    pub fn new(state: BrowserState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            refuse: false,
        }
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, DriverError> {
        if self.refuse {
            return Err(DriverError::Connect {
                url: "fake://".to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.state.lock().unwrap().launches += 1;
        Ok(FakeSession(Arc::clone(&self.state)))
    }
}

fn missing(selector: &str) -> DriverError {
    DriverError::Command(format!("no such element: {selector}"))
}

fn arg(args: &[Value], i: usize) -> String {
    args.get(i)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Session for FakeSession {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.0.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    /// Visible elements answer at once; anything else is polled for the full
    /// `within` before giving up, as the WebDriver session does
    async fn wait_visible(&self, selector: &str, within: Duration) -> Result<bool, DriverError> {
        let hang = self.0.lock().unwrap().hang_on.as_deref() == Some(selector);
        if hang {
            std::future::pending::<()>().await;
        }
        let visible = self.0.lock().unwrap().visible.contains(selector);
        if !visible {
            tokio::time::sleep(within).await;
        }
        Ok(visible)
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let mut state = self.0.lock().unwrap();
        if !state.visible.contains(selector) {
            return Err(missing(selector));
        }
        state.clicks.push(selector.to_string());
        Ok(())
    }

    async fn evaluate(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        let mut state = self.0.lock().unwrap();
        let target = arg(&args, 0);

        let result = if script == scripts::SET_VALUE {
            let value = arg(&args, 1);
            state.values.insert(target, value.clone());
            Value::String(value)
        } else if script == scripts::READ_VALUE {
            let value = state.values.get(&target).ok_or_else(|| missing(&target))?;
            Value::String(value.clone())
        } else if script == scripts::INNER_TEXT {
            let text = state.texts.get(&target).ok_or_else(|| missing(&target))?;
            Value::String(text.clone())
        } else if script == scripts::IS_CHECKED {
            Value::Bool(state.checked.get(&target).copied().unwrap_or(false))
        } else if script == scripts::SHADOW_CONTENT {
            state.shadow.clone()
        } else if script == scripts::TABLE_CELL {
            let cells = state.tables.get(&target).ok_or_else(|| missing(&target))?;
            let index = state.reloads.min(cells.len().saturating_sub(1));
            Value::String(cells.get(index).cloned().unwrap_or_default())
        } else {
            return Err(DriverError::Script(format!("unscripted: {script}")));
        };

        Ok(result)
    }

    async fn source(&self) -> Result<String, DriverError> {
        Ok(self.0.lock().unwrap().source.clone())
    }

    async fn reload(&self) -> Result<(), DriverError> {
        self.0.lock().unwrap().reloads += 1;
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.0.lock().unwrap().closes += 1;
        Ok(())
    }
}
