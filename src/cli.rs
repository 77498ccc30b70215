use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

#[derive(Debug, Parser)]
#[command(name = "minihttpd")]
#[command(about = "Minimal HTTP/1.1 server with echo and file routes", long_about = None)]
pub struct Cli {
    /// Directory served by the /files/ routes
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    pub listen: Option<String>,

    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolves the final configuration. Flags win over everything else.
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?.with_env(),
            None => Config::load(),
        };

        if let Some(directory) = self.directory {
            cfg.directory = directory;
        }
        if let Some(listen) = self.listen {
            cfg.listen_addr = listen;
        }
        Ok(cfg)
    }
}
