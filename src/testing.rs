//! In-memory doubles for the probe and browser capabilities

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::browser::{BrowserError, BrowserSession, SessionFactory};
use crate::http::{LivenessProbe, ProbeResult};

/// Probe that replays a script, then repeats a fallback result
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeResult>>,
    fallback: ProbeResult,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn always(result: ProbeResult) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self::always(ProbeResult::Unreachable {
            reason: "connection refused".to_string(),
        })
    }

    pub fn reachable() -> Self {
        Self::always(ProbeResult::Reachable { status: 200 })
    }

    /// Unreachable for the first `n` calls, reachable afterwards
    pub fn reachable_after(n: usize) -> Self {
        let probe = Self::reachable();
        {
            let mut script = probe.script.lock().unwrap();
            for _ in 0..n {
                script.push_back(ProbeResult::Unreachable {
                    reason: "connection refused".to_string(),
                });
            }
        }
        probe
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LivenessProbe for ScriptedProbe {
    async fn probe(&self, _url: &str, _timeout: Duration) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// A page the fake browser can land on
#[derive(Clone, Debug, Default)]
pub struct FakePage {
    pub url: String,
    pub title: String,
    pub source: String,
    pub has_body: bool,
}

impl FakePage {
    pub fn rendered(url: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            url: url.into(),
            source: format!("<html><head><title>{title}</title></head><body></body></html>"),
            title,
            has_body: true,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

#[derive(Default)]
pub struct SessionState {
    pub pages: HashMap<String, FakePage>,
    pub broken: HashSet<String>,
    pub current: Option<FakePage>,
    pub navigations: Vec<String>,
    pub pending_render_timeouts: usize,
    pub panic_on_title: bool,
    pub fail_quit: bool,
    pub quits: usize,
}

/// Browser session backed by a route table
#[derive(Clone, Default)]
pub struct ScriptedSession {
    state: Arc<Mutex<SessionState>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the page served when navigating to `url`
    pub fn page(self, url: impl Into<String>, page: FakePage) -> Self {
        self.state().pages.insert(url.into(), page);
        self
    }

    /// Navigating to `url` fails at the browser level
    pub fn broken(self, url: impl Into<String>) -> Self {
        self.state().broken.insert(url.into());
        self
    }

    /// The next `n` element waits time out
    pub fn render_timeouts(self, n: usize) -> Self {
        self.state().pending_render_timeouts = n;
        self
    }

    pub fn fail_quit(self) -> Self {
        self.state().fail_quit = true;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap()
    }
}

impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        let mut state = self.state();
        state.navigations.push(url.to_string());
        if state.broken.contains(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        let page = state.pages.get(url).cloned().unwrap_or_else(|| FakePage {
            url: url.to_string(),
            ..FakePage::default()
        });
        state.current = Some(page);
        Ok(())
    }

    async fn wait_for_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let mut state = self.state();
        if state.pending_render_timeouts > 0 {
            state.pending_render_timeouts -= 1;
            return Err(BrowserError::timeout(format!("element '{selector}'"), timeout));
        }
        match &state.current {
            Some(page) if page.has_body => Ok(()),
            _ => Err(BrowserError::timeout(format!("element '{selector}'"), timeout)),
        }
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        Ok(self
            .state()
            .current
            .as_ref()
            .map(|p| p.url.clone())
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn title(&self) -> Result<String, BrowserError> {
        let state = self.state();
        if state.panic_on_title {
            drop(state);
            panic!("title lookup exploded");
        }
        Ok(state
            .current
            .as_ref()
            .map(|p| p.title.clone())
            .unwrap_or_default())
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok(self
            .state()
            .current
            .as_ref()
            .map(|p| p.source.clone())
            .unwrap_or_default())
    }

    async fn quit(self) -> Result<(), BrowserError> {
        let mut state = self.state();
        state.quits += 1;
        if state.fail_quit {
            Err(BrowserError::Closed)
        } else {
            Ok(())
        }
    }
}

/// Factory handing out clones of one scripted session
pub struct ScriptedFactory {
    session: ScriptedSession,
    fail_launch: bool,
    created: AtomicUsize,
}

impl ScriptedFactory {
    pub fn new(session: ScriptedSession) -> Self {
        Self {
            session,
            fail_launch: false,
            created: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::new(ScriptedSession::new())
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl SessionFactory for ScriptedFactory {
    type Session = ScriptedSession;

    async fn create(&self) -> Result<ScriptedSession, BrowserError> {
        if self.fail_launch {
            return Err(BrowserError::Launch("chrome not found".to_string()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.clone())
    }
}

/// Session that serves the reference storefront on localhost:3000
pub fn storefront_session() -> ScriptedSession {
    let base = "http://localhost:3000";
    ScriptedSession::new()
        .page(format!("{base}/"), FakePage::rendered(format!("{base}/"), "GameShop"))
        .page(
            format!("{base}/products"),
            FakePage::rendered(format!("{base}/products"), "GameShop - Products"),
        )
        .page(
            format!("{base}/login"),
            FakePage::rendered(format!("{base}/login"), "GameShop - Login"),
        )
        .page(
            format!("{base}/register"),
            FakePage::rendered(format!("{base}/register"), "GameShop - Register"),
        )
        .page(
            format!("{base}/cart"),
            FakePage::rendered(format!("{base}/login"), "GameShop - Login"),
        )
}
