use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static DATA_DIR_NAME: &str = "threadline";
static THREADLINE_DB_NAME: &str = "threadline_db.sqlite";
static CONFIG_FILE_NAME: &str = "config.json";

// Directory layout:
// data_dir_path
// |- threadline
//    |- threadline_db.sqlite
//    |- config.json

fn default_auto_approve() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ThreadlineConfig {
    pub(crate) database_path: PathBuf,

    /// New comments start Approved when set; Pending otherwise, leaving them
    /// for the moderation queue.
    ///
    /// `serde(default)` keeps backward compatibility with old config.json files.
    #[serde(default = "default_auto_approve")]
    pub auto_approve_comments: bool,
}

impl ThreadlineConfig {
    fn new(data_dir: PathBuf) -> Self {
        ThreadlineConfig {
            database_path: data_dir.join(THREADLINE_DB_NAME),
            auto_approve_comments: true,
        }
    }

    /// Config rooted at an explicit directory, for embedders that manage
    /// their own storage location.
    pub fn at(data_dir: PathBuf) -> Self {
        Self::new(data_dir)
    }
}

/// Gets the existing config or initializes a new one if it doesn't exist
pub async fn get_or_init() -> Result<ThreadlineConfig, Box<dyn std::error::Error>> {
    let data_dir = dirs::data_dir().expect("failed to find a data directory on this platform");

    let threadline_dir = data_dir.join(DATA_DIR_NAME);
    let config_path = threadline_dir.join(CONFIG_FILE_NAME);

    fs::create_dir_all(&threadline_dir).await?;

    if config_path.exists() {
        let mut file = fs::File::open(&config_path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        let config: ThreadlineConfig = serde_json::from_str(&contents)?;
        Ok(config)
    } else {
        let config = ThreadlineConfig::new(threadline_dir.clone());

        let json = serde_json::to_string_pretty(&config)?;
        let mut file = fs::File::create(&config_path).await?;
        file.write_all(json.as_bytes()).await?;

        Ok(config)
    }
}
