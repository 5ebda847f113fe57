//! Font loading with per-family load state
//!
//! [`FontRegistry`] remembers, for each font family, whether it is loading,
//! loaded or failed. It is owned by the host application and shared by
//! reference; there is no process-wide state.
//!
//! # Load rules
//!
//! - A loaded family short-circuits without touching the backend.
//! - A family that is currently loading is not fetched twice: later callers
//!   join the in-flight attempt and receive its result.
//! - A failed family is retried on the next call.
//! - A cancelled attempt resets the family to [`FontState::NotLoaded`].
//!
//! Fetching and registering the font is delegated to a [`FontBackend`].
//! [`AssetFontSet`] reads files below a local asset root and registers them in
//! a `fontdb` database. WOFF files are unpacked by [`woff`] first.
//!
//! # Example
//!
//! ```no_run
//! use designkit::fonts::{AssetFontSet, FontRegistry};
//!
//! # async fn demo() -> Result<(), designkit::fonts::FontError> {
//! let registry = FontRegistry::new(AssetFontSet::new("./public"));
//! // Reads ./public/assets/fonts/Inter/font.woff
//! registry.load_font("Inter", None).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::EditorConfig;

pub mod woff;

use woff::Container;

/// Directory holding one sub-directory per font family
pub const DEFAULT_FONT_DIR: &str = "/assets/fonts";

/// File name of a family's font inside its directory
pub const DEFAULT_FONT_FILE: &str = "font.woff";

/// Default bound on a single load attempt
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Font loading failures
///
/// `Clone` so that one failed attempt can be reported to every caller that
/// joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("Font family name is empty")]
    MissingFamily,

    #[error("Unsupported font location: {0}")]
    Unsupported(String),

    #[error("Failed to fetch font from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("No usable font face in {url}")]
    Decode { url: String },

    #[error("Loading font from {url} timed out after {millis}ms")]
    Timeout { url: String, millis: u128 },

    #[error("Font load for '{0}' was interrupted")]
    Interrupted(String),
}

/// Load state of one font family
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FontState {
    NotLoaded,
    Loading,
    Loaded,
    Failed(FontError),
}

/// How a successful [`FontRegistry::load_font`] call was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoadOutcome {
    /// This call fetched and registered the font
    Loaded,
    /// The family was already loaded
    AlreadyLoaded,
    /// This call waited for another caller's attempt, which succeeded
    Joined,
}

/// Fetches a font resource and adds it to the active font set.
pub trait FontBackend: Send + Sync {
    fn load(&self, family: &str, url: &str) -> impl Future<Output = Result<(), FontError>> + Send;
}

type AttemptResult = Option<Result<(), FontError>>;

enum Entry {
    Loading(watch::Receiver<AttemptResult>),
    Loaded,
    Failed(FontError),
}

type Entries = Mutex<HashMap<String, Entry>>;

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<String, Entry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

enum Claim {
    Start(watch::Sender<AttemptResult>),
    Join(watch::Receiver<AttemptResult>),
}

/// Marks a family as loading for as long as it lives.
///
/// Dropped without [`InFlight::finish`] (the load future was cancelled), it
/// removes the entry again and wakes joiners with an error.
struct InFlight<'a> {
    entries: &'a Entries,
    family: &'a str,
    tx: Option<watch::Sender<AttemptResult>>,
}

impl InFlight<'_> {
    fn finish(mut self, result: Result<(), FontError>) {
        let mut entries = lock(self.entries);
        let entry = match &result {
            Ok(()) => Entry::Loaded,
            Err(e) => Entry::Failed(e.clone()),
        };
        entries.insert(self.family.to_string(), entry);
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(result));
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.tx.take().is_some() {
            debug!(family = self.family, "Font load cancelled, resetting state");
            lock(self.entries).remove(self.family);
        }
    }
}

/// Per-family font cache in front of a [`FontBackend`]
pub struct FontRegistry<B> {
    backend: B,
    font_dir: String,
    font_file: String,
    timeout: Duration,
    entries: Entries,
}

impl<B: FontBackend> FontRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            font_dir: DEFAULT_FONT_DIR.to_string(),
            font_file: DEFAULT_FONT_FILE.to_string(),
            timeout: DEFAULT_LOAD_TIMEOUT,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(backend: B, config: &EditorConfig) -> Self {
        Self {
            font_dir: config.font_dir.clone(),
            font_file: config.font_file.clone(),
            timeout: config.font_load_timeout(),
            ..Self::new(backend)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Conventional location of a family's font file
    pub fn default_url(&self, family: &str) -> String {
        format!(
            "{}/{}/{}",
            self.font_dir.trim_end_matches('/'),
            family,
            self.font_file
        )
    }

    pub fn state(&self, family: &str) -> FontState {
        match lock(&self.entries).get(family) {
            None => FontState::NotLoaded,
            Some(Entry::Loading(_)) => FontState::Loading,
            Some(Entry::Loaded) => FontState::Loaded,
            Some(Entry::Failed(e)) => FontState::Failed(e.clone()),
        }
    }

    /// Loads `family` from `url`, or from [`default_url`](Self::default_url) when `url` is `None`.
    pub async fn load_font(&self, family: &str, url: Option<&str>) -> Result<LoadOutcome, FontError> {
        if family.is_empty() {
            error!("Font family name is empty");
            return Err(FontError::MissingFamily);
        }

        let claim = {
            let mut entries = lock(&self.entries);
            match entries.get(family) {
                Some(Entry::Loaded) => {
                    debug!(family, "Font already loaded");
                    return Ok(LoadOutcome::AlreadyLoaded);
                }
                Some(Entry::Loading(rx)) => Claim::Join(rx.clone()),
                Some(Entry::Failed(_)) | None => {
                    let (tx, rx) = watch::channel(None);
                    entries.insert(family.to_string(), Entry::Loading(rx));
                    Claim::Start(tx)
                }
            }
        };

        match claim {
            Claim::Join(rx) => self.join(family, rx).await,
            Claim::Start(tx) => {
                let in_flight = InFlight {
                    entries: &self.entries,
                    family,
                    tx: Some(tx),
                };
                let url = url.map_or_else(|| self.default_url(family), str::to_string);
                let result = self.attempt(family, &url).await;
                in_flight.finish(result.clone());
                result.map(|()| LoadOutcome::Loaded)
            }
        }
    }

    async fn attempt(&self, family: &str, url: &str) -> Result<(), FontError> {
        debug!(family, url, "Loading font");
        let result = match tokio::time::timeout(self.timeout, self.backend.load(family, url)).await {
            Ok(result) => result,
            Err(_) => Err(FontError::Timeout {
                url: url.to_string(),
                millis: self.timeout.as_millis(),
            }),
        };
        match &result {
            Ok(()) => info!(family, url, "Font loaded"),
            Err(e) => error!(family, "Font resource failed to load: {e}"),
        }
        result
    }

    async fn join(
        &self,
        family: &str,
        mut rx: watch::Receiver<AttemptResult>,
    ) -> Result<LoadOutcome, FontError> {
        debug!(family, "Joining in-flight font load");
        let shared = match rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        };
        match shared {
            Some(Ok(())) => Ok(LoadOutcome::Joined),
            Some(Err(e)) => Err(e),
            None => Err(FontError::Interrupted(family.to_string())),
        }
    }
}

struct FontSetInner {
    db: fontdb::Database,
    families: HashMap<String, Vec<fontdb::ID>>,
}

/// Font backend reading files below a local asset root into a `fontdb` database
///
/// Relative and root-relative URLs are resolved against the asset root.
/// Remote URLs are rejected. TrueType/OpenType and WOFF files are accepted;
/// WOFF2 is reported as [`FontError::Unsupported`].
pub struct AssetFontSet {
    asset_root: PathBuf,
    inner: Mutex<FontSetInner>,
}

impl AssetFontSet {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            inner: Mutex::new(FontSetInner {
                db: fontdb::Database::new(),
                families: HashMap::new(),
            }),
        }
    }

    fn inner(&self) -> MutexGuard<'_, FontSetInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Total number of registered faces
    pub fn face_count(&self) -> usize {
        self.inner().db.len()
    }

    /// Faces registered under the requested family name
    pub fn faces(&self, family: &str) -> Vec<fontdb::ID> {
        self.inner().families.get(family).cloned().unwrap_or_default()
    }

    pub fn contains(&self, family: &str) -> bool {
        self.inner().families.contains_key(family)
    }

    /// Family names embedded in the faces registered under `family`
    pub fn embedded_families(&self, family: &str) -> Vec<String> {
        let inner = self.inner();
        let mut names: Vec<String> = inner
            .families
            .get(family)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.db.face(*id))
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, FontError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Err(FontError::Unsupported(format!(
                "remote font {url} cannot be read from the local asset root"
            )));
        }

        let relative = Path::new(url.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FontError::Unsupported(format!(
                "{url} points outside the asset root"
            )));
        }
        Ok(self.asset_root.join(relative))
    }
}

/// Converts a fetched font file into sfnt data for `fontdb`
fn sfnt_data(url: &str, bytes: Vec<u8>) -> Result<Vec<u8>, FontError> {
    match Container::detect(&bytes) {
        Container::Sfnt => Ok(bytes),
        Container::Woff => woff::decode(&bytes).map_err(|e| {
            error!(url, "Malformed WOFF font: {e}");
            FontError::Decode {
                url: url.to_string(),
            }
        }),
        Container::Woff2 => Err(FontError::Unsupported(format!(
            "{url} is WOFF2; provide a WOFF or TrueType/OpenType file"
        ))),
    }
}

impl FontBackend for AssetFontSet {
    async fn load(&self, family: &str, url: &str) -> Result<(), FontError> {
        let path = self.resolve(url)?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| FontError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let sfnt = sfnt_data(url, bytes)?;

        let mut inner = self.inner();
        let ids = inner
            .db
            .load_font_source(fontdb::Source::Binary(Arc::new(sfnt)));
        if ids.is_empty() {
            return Err(FontError::Decode {
                url: url.to_string(),
            });
        }
        inner
            .families
            .entry(family.to_string())
            .or_default()
            .extend(ids.iter().copied());
        Ok(())
    }
}
