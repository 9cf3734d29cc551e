//! Scripted in-memory profile site driven through `PageDriver`.

#![allow(dead_code)]

use async_trait::async_trait;
use fame_runtime::browser::wait::PollPolicy;
use fame_runtime::browser::{BrowserKind, DriverLauncher, ElementHandle, LaunchOptions, Locator, PageDriver};
use fame_runtime::config::{FameConfig, Selectors};
use fame_runtime::error::SessionError;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const BASE: &str = "https://site.test";

/// What a profile URL serves.
#[derive(Debug, Clone)]
pub enum Profile {
    Biography(String),
    /// Biography shown only after clicking "read more".
    Collapsed(String),
    NoBiography,
    /// A page with none of the known markers.
    Blank,
}

#[derive(Debug, Clone)]
pub struct Suggestion {
    pub label: String,
    pub name: String,
    pub href: String,
}

impl Suggestion {
    pub fn artist(name: &str, href: &str) -> Self {
        Self {
            label: "Artist".to_string(),
            name: name.to_string(),
            href: href.to_string(),
        }
    }

    pub fn other(label: &str, name: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            name: name.to_string(),
            href: href.to_string(),
        }
    }
}

/// The site's pages and search index.
#[derive(Debug, Default)]
pub struct Site {
    profiles: HashMap<String, Profile>,
    suggestions: HashMap<String, Vec<Suggestion>>,
    faults: HashSet<String>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `profile` at `/artist/<slug>`.
    pub fn profile(mut self, slug: &str, profile: Profile) -> Self {
        self.profiles.insert(profile_url(slug), profile);
        self
    }

    /// Suggestions shown after typing `query` into the search box.
    pub fn search(mut self, query: &str, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions.insert(query.to_string(), suggestions);
        self
    }

    /// Navigating to `/artist/<slug>` fails at the protocol level.
    pub fn fault(mut self, slug: &str) -> Self {
        self.faults.insert(profile_url(slug));
        self
    }
}

pub fn profile_url(slug: &str) -> String {
    format!("{BASE}/artist/{slug}")
}

pub fn search_url() -> String {
    format!("{BASE}/artists/")
}

/// What drivers did, shared across every session a launcher creates.
#[derive(Debug, Default)]
pub struct Journal {
    navigations: Mutex<Vec<String>>,
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Journal {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn searches(&self) -> usize {
        self.navigations()
            .iter()
            .filter(|u| **u == search_url())
            .count()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
enum Role {
    Plain,
    SearchInput,
    ReadMore(String),
}

#[derive(Debug, Clone)]
struct Node {
    locator: String,
    parent: Option<usize>,
    text: String,
    href: Option<String>,
    role: Role,
}

impl Node {
    fn new(locator: &Locator, text: &str) -> Self {
        Self {
            locator: locator.as_str().to_string(),
            parent: None,
            text: text.to_string(),
            href: None,
            role: Role::Plain,
        }
    }

    fn under(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }
}

pub struct ScriptedDriver {
    site: Arc<Site>,
    selectors: Selectors,
    journal: Arc<Journal>,
    nodes: Vec<Node>,
}

impl ScriptedDriver {
    fn node(&self, el: ElementHandle) -> Result<&Node, SessionError> {
        self.nodes.get(el.0).ok_or(SessionError::StaleElement(el.0))
    }

    fn render(&mut self, url: &str) {
        let sel = &self.selectors;
        self.nodes.clear();
        if url == search_url() {
            let mut input = Node::new(&sel.search_input, "");
            input.role = Role::SearchInput;
            self.nodes.push(input);
            return;
        }
        let node = match self.site.profiles.get(url) {
            Some(Profile::Biography(text)) => Node::new(&sel.biography, text),
            Some(Profile::Collapsed(text)) => {
                let mut button = Node::new(&sel.read_more, "Read more");
                button.role = Role::ReadMore(text.clone());
                button
            }
            Some(Profile::NoBiography) => Node::new(&sel.no_biography, "No biography"),
            Some(Profile::Blank) => Node::new(&Locator::css("main"), ""),
            None => Node::new(&sel.not_found, "Sorry, this page isn't available"),
        };
        self.nodes.push(node);
    }

    fn show_suggestions(&mut self, query: &str) {
        let Some(suggestions) = self.site.suggestions.get(query).cloned() else {
            return;
        };
        let sel = self.selectors.clone();
        let list = self.nodes.len();
        self.nodes.push(Node::new(&sel.suggestion_list, ""));
        for (index, s) in suggestions.iter().enumerate() {
            let item = self.nodes.len();
            self.nodes
                .push(Node::new(&sel.suggestion_at(index), "").under(list));
            self.nodes
                .push(Node::new(&sel.suggestion_type, &s.label).under(item));
            self.nodes
                .push(Node::new(&sel.suggestion_name, &s.name).under(item));
            let mut link = Node::new(&sel.suggestion_link, &s.name).under(item);
            link.href = Some(s.href.clone());
            self.nodes.push(link);
        }
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.journal.navigations.lock().unwrap().push(url.to_string());
        if self.site.faults.contains(url) {
            self.nodes.clear();
            return Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "target crashed".to_string(),
            });
        }
        self.render(url);
        Ok(())
    }

    async fn find(
        &mut self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>, SessionError> {
        Ok(self
            .nodes
            .iter()
            .position(|n| {
                n.locator == locator.as_str() && scope.map_or(true, |s| n.parent == Some(s.0))
            })
            .map(ElementHandle))
    }

    async fn click(&mut self, element: ElementHandle) -> Result<(), SessionError> {
        if let Role::ReadMore(text) = self.node(element)?.role.clone() {
            let bio = Node::new(&self.selectors.biography, &text);
            self.nodes.push(bio);
        }
        Ok(())
    }

    async fn type_text(&mut self, element: ElementHandle, text: &str) -> Result<(), SessionError> {
        if matches!(self.node(element)?.role, Role::SearchInput) {
            self.show_suggestions(text);
        }
        Ok(())
    }

    async fn read_text(&mut self, element: ElementHandle) -> Result<String, SessionError> {
        Ok(self.node(element)?.text.clone())
    }

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        let node = self.node(element)?;
        Ok(if name == "href" { node.href.clone() } else { None })
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.journal.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Launches `ScriptedDriver`s over one site.
pub struct ScriptedLauncher {
    site: Arc<Site>,
    selectors: Selectors,
    pub journal: Arc<Journal>,
    fail: bool,
}

impl ScriptedLauncher {
    pub fn new(site: Site) -> Self {
        Self {
            site: Arc::new(site),
            selectors: Selectors::default(),
            journal: Arc::new(Journal::default()),
            fail: false,
        }
    }

    /// A launcher whose browser never starts.
    pub fn broken() -> Self {
        Self {
            fail: true,
            ..Self::new(Site::new())
        }
    }
}

#[async_trait]
impl DriverLauncher for ScriptedLauncher {
    async fn launch(
        &self,
        _kind: BrowserKind,
        _options: &LaunchOptions,
    ) -> Result<Box<dyn PageDriver>, SessionError> {
        self.journal.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SessionError::Launch("no browser binary".to_string()));
        }
        Ok(Box::new(ScriptedDriver {
            site: Arc::clone(&self.site),
            selectors: self.selectors.clone(),
            journal: Arc::clone(&self.journal),
            nodes: Vec::new(),
        }))
    }
}

/// Default config pointed at the scripted site with single-attempt waits.
pub fn test_config() -> FameConfig {
    let mut config = FameConfig::default();
    config.site.base_url = BASE.to_string();
    config.resolver.suggestion_wait = PollPolicy::immediate();
    config.resolver.page_wait = PollPolicy::immediate();
    config.extractor.page_wait = PollPolicy::immediate();
    config.extractor.expand_wait = PollPolicy::immediate();
    config
}
