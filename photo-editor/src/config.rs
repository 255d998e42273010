use anyhow::{Context, Result, bail};
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use uuid::Uuid;

const CARGO_TOML: &str = include_str!("../Cargo.toml");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub cache_dir: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(skip)]
    pub app_name: String,

    #[serde(default)]
    pub editor: Editor,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Editor {
    /// File name used for every downloaded image.
    #[derivative(Default(value = "crate::source::DEFAULT_DOWNLOAD_NAME.to_string()"))]
    pub download_name: String,

    /// Appended when `save` gets a path without an extension.
    #[derivative(Default(value = "\"jpg\".to_string()"))]
    pub default_extension: String,

    #[derivative(Default(value = "image_filter::save::DEFAULT_JPEG_QUALITY"))]
    pub jpeg_quality: u8,

    /// Download into a fresh `cache/<uuid>` directory per session instead of
    /// sharing `cache/`.
    pub unique_work_dir: bool,
}

impl Config {
    /// Initializes the configuration
    ///
    /// Reads the package name, creates the platform directories and loads
    /// the configuration file, writing a default one on first run.
    pub fn init(&mut self) -> Result<()> {
        let metadata =
            toml::from_str::<toml::Table>(CARGO_TOML).context("parse Cargo.toml failed")?;

        self.app_name = metadata
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .context("package name missing in Cargo.toml")?
            .to_string();

        let app_dirs = AppDirs::new(Some(&self.app_name), true)
            .context("no config directory on this platform")?;

        self.config_path = app_dirs
            .config_dir
            .join(format!("{}.toml", self.app_name));
        self.cache_dir = app_dirs.data_dir.join("cache");

        self.create_dirs()?;
        self.load().context("load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    /// Loads the configuration at `config_path`, keeping downloads under
    /// `cache_dir`. Both directories are created when missing.
    pub fn load_from(config_path: impl AsRef<Path>, cache_dir: impl AsRef<Path>) -> Result<Config> {
        let mut config = Config {
            config_path: config_path.as_ref().to_path_buf(),
            cache_dir: cache_dir.as_ref().to_path_buf(),
            app_name: env!("CARGO_PKG_NAME").to_string(),
            ..Default::default()
        };

        config.create_dirs()?;
        config.load().context("load config file failed")?;
        Ok(config)
    }

    fn create_dirs(&self) -> Result<()> {
        if let Some(dir) = self.config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::create_dir_all(&self.cache_dir)?;

        Ok(())
    }

    /// Loads configuration from file or creates default if not exists.
    /// A file that fails to parse is kept as `<name>.bak`.
    fn load(&mut self) -> Result<()> {
        let parsed = match fs::read_to_string(&self.config_path) {
            Ok(text) => toml::from_str::<Config>(&text).ok(),
            Err(_) => None,
        };

        match parsed {
            Some(mut c) => {
                c.config_path = self.config_path.clone();
                c.cache_dir = self.cache_dir.clone();
                c.is_first_run = self.is_first_run;
                c.app_name = self.app_name.clone();
                c.editor.normalize();
                *self = c;

                Ok(())
            }
            None => {
                self.is_first_run = true;

                if self.config_path.exists() {
                    let mut bak_file = self.config_path.as_os_str().to_owned();
                    bak_file.push(".bak");
                    _ = fs::copy(&self.config_path, bak_file);
                }

                self.save()
            }
        }
    }

    /// Saves the current configuration to file
    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }

    /// Directory a new session downloads into.
    pub fn session_work_dir(&self) -> PathBuf {
        if self.editor.unique_work_dir {
            self.cache_dir.join(Uuid::new_v4().to_string())
        } else {
            self.cache_dir.clone()
        }
    }
}

impl Editor {
    fn normalize(&mut self) {
        self.default_extension = self.default_extension.trim_start_matches('.').to_string();
        if self.default_extension.is_empty() {
            self.default_extension = Editor::default().default_extension;
        }

        if self.download_name.trim().is_empty() {
            self.download_name = Editor::default().download_name;
        }

        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
    }
}

/// Initializes the global configuration
///
/// This should be called once at application startup.
pub fn init() -> Result<()> {
    lock().init()
}

/// Returns a clone of the current configuration
pub fn all() -> Config {
    lock().clone()
}

/// Saves a new configuration and updates the global instance
pub fn save(conf: Config) -> Result<()> {
    let mut config = lock();
    *config = conf;
    config.save()
}

fn lock() -> std::sync::MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(|e| e.into_inner())
}
