//! Asset loading with embedded fallbacks
//!
//! The default `config.yaml` and the poster fonts (DejaVu Sans) are compiled
//! into the binary. Fonts in `FONTS_DIR` override embedded ones of the same
//! file name; system fonts are loaded after both.
//!
//! - If `CONFIG_FILE` is NOT set: use the embedded config only
//! - If `CONFIG_FILE` IS set but missing: seed it with the embedded default, then use it
//! - If `CONFIG_FILE` IS set and exists: use the file

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded font assets
#[derive(RustEmbed)]
#[folder = "fonts/"]
#[include = "*.ttf"]
struct EmbeddedFonts;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub fonts_seeded: Vec<String>,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.fonts_seeded.is_empty() && !self.config_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External fonts directory (from FONTS_DIR env var)
    fonts_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(fonts_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            config_file,
        }
    }

    /// Read FONTS_DIR and CONFIG_FILE from the environment
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("FONTS_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    pub fn fonts_dir(&self) -> Option<&PathBuf> {
        self.fonts_dir.as_ref()
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    /// Get all font data (for loading into fontdb)
    ///
    /// Returns a merged list: external fonts override embedded fonts with the same name.
    pub fn get_fonts(&self) -> Vec<(String, Cow<'static, [u8]>)> {
        let mut fonts = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if let Some(ref dir) = self.fonts_dir {
            match fs::read_dir(dir) {
                Ok(entries) => {
                    let mut external: Vec<_> = entries
                        .flatten()
                        .map(|entry| entry.path())
                        .filter(|path| {
                            matches!(
                                path.extension().and_then(|ext| ext.to_str()),
                                Some("ttf" | "otf" | "ttc")
                            )
                        })
                        .collect();
                    external.sort();

                    for path in external {
                        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string())
                        else {
                            continue;
                        };
                        if let Ok(data) = fs::read(&path) {
                            tracing::trace!(font = %name, "Loading font from filesystem");
                            seen.insert(name.clone());
                            fonts.push((name, Cow::Owned(data)));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), %e, "Cannot read fonts directory");
                }
            }
        }

        for file in EmbeddedFonts::iter() {
            let name = file.to_string();
            if seen.contains(&name) {
                continue;
            }
            if let Some(data) = EmbeddedFonts::get(&name) {
                tracing::trace!(font = %name, "Loading font from embedded assets");
                fonts.push((name, data.data));
            }
        }

        fonts
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Check if a directory exists and is empty (ignoring .gitkeep)
    fn is_empty_dir(path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        path.read_dir()
            .map(|mut entries| {
                entries.all(|e| {
                    e.map(|entry| entry.file_name() == ".gitkeep")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Seed a missing or empty fonts directory and a missing config file
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref dir) = self.fonts_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                fs::create_dir_all(dir)?;
                for file in EmbeddedFonts::iter() {
                    if let Some(data) = EmbeddedFonts::get(&file) {
                        fs::write(dir.join(file.as_ref()), &*data.data)?;
                        report.fonts_seeded.push(file.to_string());
                    }
                }
                if !report.fonts_seeded.is_empty() {
                    tracing::info!(
                        dir = %dir.display(),
                        count = report.fonts_seeded.len(),
                        "Seeded fonts directory with embedded assets"
                    );
                }
            }
        }

        if let Some(ref path) = self.config_file {
            if !path.exists() {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
                    fs::write(path, &*data.data)?;
                    report.config_seeded = true;
                    tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                }
            }
        }

        Ok(report)
    }

    /// Write the embedded config to disk (init command)
    ///
    /// Uses the configured path, or `./config.yaml` if unset.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();
        let path = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("./config.yaml"));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
            fs::write(&path, &*data.data)?;
            report.written.push(path.display().to_string());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_available() {
        let loader = AssetLoader::new(None, None);
        let content = loader.read_config_string().unwrap();
        assert!(content.contains("ribbon_label"));
    }

    #[test]
    fn test_external_config_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "branding:\n  ribbon_label: Custom\n").unwrap();

        let loader = AssetLoader::new(None, Some(path));
        assert!(loader.read_config_string().unwrap().contains("Custom"));
    }

    #[test]
    fn test_seed_creates_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = dir.path().join("fonts");
        let config = dir.path().join("conf/config.yaml");

        let loader = AssetLoader::new(Some(fonts.clone()), Some(config.clone()));
        let report = loader.seed_if_configured().unwrap();

        assert!(report.config_seeded);
        assert!(fonts.join("DejaVuSans.ttf").is_file());
        assert!(fonts.join("DejaVuSans-Bold.ttf").is_file());
        assert!(config.is_file());

        let again = loader.seed_if_configured().unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_init_skips_existing_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "# mine\n").unwrap();

        let loader = AssetLoader::new(None, Some(path.clone()));
        let report = loader.init(false).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        let report = loader.init(true).unwrap();
        assert_eq!(report.written.len(), 1);
        assert!(fs::read_to_string(&path).unwrap().contains("palette"));
    }

    #[test]
    fn test_embedded_fonts_available_without_fonts_dir() {
        let fonts = AssetLoader::new(None, None).get_fonts();
        let names: Vec<_> = fonts.iter().map(|(name, _)| name.as_str()).collect();

        assert!(names.contains(&"DejaVuSans.ttf"));
        assert!(names.contains(&"DejaVuSans-Bold.ttf"));
        assert!(fonts.iter().all(|(_, data)| data.len() > 1000));
    }

    #[test]
    fn test_external_fonts_override_embedded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("DejaVuSans.ttf"), b"replacement").unwrap();
        fs::write(dir.path().join("Extra.otf"), b"extra").unwrap();
        fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);
        let fonts = loader.get_fonts();
        let names: Vec<_> = fonts.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(
            names.iter().filter(|n| **n == "DejaVuSans.ttf").count(),
            1
        );
        assert!(names.contains(&"Extra.otf"));
        assert!(!names.contains(&"notes.txt"));
        let overridden = fonts.iter().find(|(name, _)| name == "DejaVuSans.ttf").unwrap();
        assert_eq!(&*overridden.1, b"replacement");
    }
}
