//! Configuração do requeue carregada a partir de `requeue.toml`.
//!
//! A struct [`RequeueConfig`] descreve onde ficam os jobs falhos e quais
//! conexões de fila existem. Valores não presentes no arquivo usam defaults
//! sensíveis. A variável de ambiente `REQUEUE_FAILED_PATH` tem precedência
//! sobre o caminho do arquivo de jobs falhos.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::RequeueError;
use crate::failed::{FailedJobStore, FileFailedJobStore, NullFailedJobStore};
use crate::queue::{HttpConnection, QueueManager, SpoolConnection};

/// Arquivo de configuração procurado no diretório atual.
pub const DEFAULT_CONFIG_PATH: &str = "requeue.toml";

/// Variável de ambiente que sobrescreve o caminho do store de jobs falhos.
pub const FAILED_PATH_ENV: &str = "REQUEUE_FAILED_PATH";

/// Configuração de nível superior carregada de `requeue.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequeueConfig {
    /// Backend onde os jobs falhos são registrados.
    #[serde(default)]
    pub failed: FailedStoreConfig,

    /// Conexões de fila, indexadas pelo nome gravado em cada job falho.
    #[serde(default = "default_connections")]
    pub connections: HashMap<String, ConnectionConfig>,
}

/// Driver do store de jobs falhos.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "driver", rename_all = "lowercase")]
pub enum FailedStoreConfig {
    /// Array JSON em um único arquivo.
    File {
        #[serde(default = "default_failed_path")]
        path: PathBuf,
    },
    /// Nenhum job falho é registrado.
    Null,
}

impl Default for FailedStoreConfig {
    fn default() -> Self {
        FailedStoreConfig::File {
            path: default_failed_path(),
        }
    }
}

/// Driver de uma conexão de fila.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "driver", rename_all = "lowercase")]
pub enum ConnectionConfig {
    /// Um arquivo por job dentro de `path/<fila>/`.
    Spool {
        #[serde(default = "default_spool_path")]
        path: PathBuf,
        #[serde(default = "default_queue")]
        queue: String,
    },
    /// Endpoint HTTP que recebe `POST {url}/queues/<fila>/jobs`.
    Http {
        url: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_queue")]
        queue: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

// Caminho padrão do store de jobs falhos.
fn default_failed_path() -> PathBuf {
    PathBuf::from("storage/failed_jobs.json")
}

// Diretório padrão da conexão spool.
fn default_spool_path() -> PathBuf {
    PathBuf::from("storage/queue")
}

// Fila padrão: "default".
fn default_queue() -> String {
    "default".to_string()
}

// Timeout padrão das requisições HTTP: 30s.
fn default_timeout_secs() -> u64 {
    30
}

// Uma única conexão spool chamada "default".
fn default_connections() -> HashMap<String, ConnectionConfig> {
    HashMap::from([(
        "default".to_string(),
        ConnectionConfig::Spool {
            path: default_spool_path(),
            queue: default_queue(),
        },
    )])
}

impl Default for RequeueConfig {
    fn default() -> Self {
        Self {
            failed: FailedStoreConfig::default(),
            connections: default_connections(),
        }
    }
}

impl RequeueConfig {
    /// Carrega a configuração do arquivo indicado.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: &Path) -> Result<Self, RequeueError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RequeueConfig>(&contents)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Aplica sobrescritas vindas do ambiente. `lookup` resolve o nome de
    /// uma variável para o seu valor.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(FAILED_PATH_ENV).filter(|p| !p.is_empty()) {
            self.failed = FailedStoreConfig::File {
                path: PathBuf::from(path),
            };
        }
    }

    /// Constrói o store de jobs falhos configurado.
    pub fn build_store(&self) -> Arc<dyn FailedJobStore> {
        match &self.failed {
            FailedStoreConfig::File { path } => Arc::new(FileFailedJobStore::new(path)),
            FailedStoreConfig::Null => Arc::new(NullFailedJobStore),
        }
    }

    /// Constrói o gerenciador de filas com todas as conexões configuradas.
    pub fn build_queue(&self) -> Result<QueueManager, RequeueError> {
        if self.connections.is_empty() {
            return Err(RequeueError::Config(
                "no queue connections configured".to_string(),
            ));
        }

        let mut manager = QueueManager::new();
        for (name, connection) in &self.connections {
            manager = match connection {
                ConnectionConfig::Spool { path, queue } => {
                    manager.with_connection(name, SpoolConnection::new(path, queue))
                }
                ConnectionConfig::Http {
                    url,
                    token,
                    queue,
                    timeout_secs,
                } => manager.with_connection(
                    name,
                    HttpConnection::new(
                        url,
                        token.clone(),
                        queue,
                        Duration::from_secs(*timeout_secs),
                    )?,
                ),
            };
        }
        Ok(manager)
    }
}
