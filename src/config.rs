//! Configuration management for bountyscout
//!
//! One persisted preference (`scan_todos`) stored as JSON in
//! ~/.config/bountyscout/config.json, reached through an injected store so
//! tests can run against memory. The Gemini API key lives in the
//! environment or the system keychain, never in the config file.

use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const KEYRING_SERVICE: &str = "bountyscout";
const KEYRING_USERNAME: &str = "gemini_api_key";

fn default_scan_todos() -> bool {
    true
}

/// Persisted user settings. Absent file or absent field means the TODO
/// scan defaults to on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_scan_todos")]
    pub scan_todos: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { scan_todos: true }
    }
}

/// Where settings live. The app gets one of these at startup; production
/// uses [`FileStore`], tests substitute a fake.
pub trait SettingsStore {
    /// Raw stored content, or None when nothing has been saved yet.
    fn read(&self) -> Option<String>;
    fn write(&self, content: &str) -> Result<(), String>;
    /// Move corrupt content out of the way so defaults can take over.
    fn quarantine(&self) {}
}

impl Settings {
    /// Load settings through the store, falling back to defaults when the
    /// content is missing or corrupt. Corrupt content is preserved for
    /// inspection rather than silently overwritten.
    pub fn load(store: &dyn SettingsStore) -> Self {
        match store.read() {
            Some(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(err) => {
                    store.quarantine();
                    eprintln!(
                        "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                        err
                    );
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Persist settings through the store.
    pub fn save(&self, store: &dyn SettingsStore) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        store.write(&content)
    }
}

/// File-backed settings store under the platform config directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default platform location, or None when the platform
    /// has no config directory.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|p| Self::new(p.join("bountyscout").join("config.json")))
    }

    /// Config file location for display.
    pub fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl SettingsStore for FileStore {
    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn write(&self, content: &str) -> Result<(), String> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        fs::create_dir_all(dir).map_err(|e| format!("Failed to create config directory: {}", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(dir, fs::Permissions::from_mode(0o700)) {
                eprintln!("  Warning: Failed to set config directory permissions: {}", e);
            }
        }

        write_atomic(&self.path, content)
    }

    fn quarantine(&self) {
        let corrupt_path = self.path.with_extension("json.corrupt");
        if fs::rename(&self.path, &corrupt_path).is_err() {
            if let Some(content) = self.read() {
                let _ = fs::write(&corrupt_path, content);
            }
        }
    }
}

fn write_atomic(path: &std::path::Path, content: &str) -> Result<(), String> {
    let tmp_path = path.with_extension("tmp");
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| e.to_string())?;

    file.write_all(content.as_bytes())
        .map_err(|e| e.to_string())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.to_string());
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────
// API key handling
// ────────────────────────────────────────────────────────────────────────

fn keyring_disabled() -> bool {
    if cfg!(test) {
        return true;
    }
    matches!(
        std::env::var("BOUNTYSCOUT_DISABLE_KEYRING")
            .unwrap_or_default()
            .to_lowercase()
            .as_str(),
        "1" | "true" | "yes"
    )
}

fn keyring_entry() -> Result<Entry, keyring::Error> {
    Entry::new(KEYRING_SERVICE, KEYRING_USERNAME)
}

fn read_keyring_key() -> Result<Option<String>, keyring::Error> {
    if keyring_disabled() {
        return Ok(None);
    }
    let entry = keyring_entry()?;
    match entry.get_password() {
        Ok(key) => Ok(Some(key)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err),
    }
}

fn write_keyring_key(key: &str) -> Result<(), keyring::Error> {
    let entry = keyring_entry()?;
    entry.set_password(key)
}

/// Get the Gemini API key from the environment or the system keychain.
pub fn api_key() -> Option<String> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            return Some(key);
        }
    }

    match read_keyring_key() {
        Ok(Some(key)) => Some(key),
        Ok(None) => None,
        Err(err) => {
            eprintln!(
                "  Warning: Failed to read API key from system keychain: {}",
                err
            );
            eprintln!("  Tip: Set the GEMINI_API_KEY environment variable as a workaround.");
            None
        }
    }
}

/// Check whether an API key is configured at all.
pub fn has_api_key() -> bool {
    api_key().is_some()
}

/// Store the API key in the system keychain and verify the write.
pub fn set_api_key(key: &str) -> Result<(), String> {
    if let Err(write_err) = write_keyring_key(key) {
        return Err(format!(
            "Failed to store API key in system keychain: {}. \
             You can set the GEMINI_API_KEY environment variable instead.",
            write_err
        ));
    }

    match read_keyring_key() {
        Ok(Some(stored)) if stored == key => Ok(()),
        Ok(_) => Err(
            "API key verification failed: key was not persisted to keychain. \
             You can set the GEMINI_API_KEY environment variable instead."
                .to_string(),
        ),
        Err(read_err) => Err(format!(
            "API key verification failed: couldn't read back from keychain ({}). \
             You can set the GEMINI_API_KEY environment variable instead.",
            read_err
        )),
    }
}

/// Interactive prompt to set up the API key.
pub fn setup_api_key_interactive() -> Result<(), String> {
    use std::io::{self, Write};

    println!();
    println!("  ┌─────────────────────────────────────────────────────────┐");
    println!("  │  GEMINI SETUP                                           │");
    println!("  └─────────────────────────────────────────────────────────┘");
    println!();
    println!("  bountyscout uses the Gemini API to analyze repositories.");
    println!();
    println!("  1. Get an API key at: https://aistudio.google.com/apikey");
    println!("  2. Paste it below (saved in your system keychain when available)");
    println!();
    print!("  API Key: ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut key = String::new();
    io::stdin().read_line(&mut key).map_err(|e| e.to_string())?;
    let key = key.trim().to_string();

    if key.is_empty() {
        return Err("No API key provided".to_string());
    }

    set_api_key(&key)?;

    println!();
    println!("  + API key saved.");
    println!();

    Ok(())
}

#[cfg(test)]
pub mod testing {
    use super::SettingsStore;
    use std::cell::RefCell;

    /// In-memory store recording every write, for tests.
    pub struct MemoryStore {
        pub content: RefCell<Option<String>>,
        pub writes: RefCell<usize>,
    }

    impl MemoryStore {
        pub fn empty() -> Self {
            Self {
                content: RefCell::new(None),
                writes: RefCell::new(0),
            }
        }

        pub fn with_content(content: &str) -> Self {
            Self {
                content: RefCell::new(Some(content.to_string())),
                writes: RefCell::new(0),
            }
        }
    }

    impl SettingsStore for MemoryStore {
        fn read(&self) -> Option<String> {
            self.content.borrow().clone()
        }

        fn write(&self, content: &str) -> Result<(), String> {
            *self.content.borrow_mut() = Some(content.to_string());
            *self.writes.borrow_mut() += 1;
            Ok(())
        }
    }
}
