//! Interface de linha de comando do requeue baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (retry, list)
//! e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::failed::SortOrder;
use crate::resolver::SelectionCriteria;

/// Devolve jobs falhos para suas filas de origem.
#[derive(Debug, Parser)]
#[command(name = "requeue", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Ordem aceita pela CLI, mapeada para [`SortOrder`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// IDs crescentes (mais antigos primeiro).
    Asc,
    /// IDs decrescentes (mais recentes primeiro).
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => SortOrder::Ascending,
            OrderArg::Desc => SortOrder::Descending,
        }
    }
}

/// Seleção de jobs falhos compartilhada pelos subcomandos.
#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// IDs dos jobs falhos, ou "all" para todos.
    pub ids: Vec<String>,

    /// Número máximo de jobs (0 = sem limite). Só vale com "all".
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Quantidade de jobs a pular. Só vale com "all".
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Apenas jobs desta fila. Só vale com "all".
    #[arg(long)]
    pub queue: Option<String>,

    /// Apenas jobs desta conexão. Só vale com "all".
    #[arg(long)]
    pub connection: Option<String>,

    /// Ordem de processamento dos IDs.
    #[arg(long, value_enum, default_value_t = OrderArg::Asc)]
    pub order: OrderArg,

    /// Emite um objeto JSON por linha em vez de texto colorido.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl SelectionArgs {
    pub fn criteria(&self) -> SelectionCriteria {
        let mut criteria = SelectionCriteria::ids(self.ids.iter().map(String::as_str))
            .with_limit(self.limit)
            .with_offset(self.offset)
            .with_order(self.order.into());
        if let Some(queue) = &self.queue {
            criteria = criteria.with_queue(queue);
        }
        if let Some(connection) = &self.connection {
            criteria = criteria.with_connection(connection);
        }
        criteria
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Devolve jobs falhos para a fila e remove seus registros de falha.
    Retry(SelectionArgs),

    /// Mostra os jobs falhos que seriam reprocessados, sem alterar nada.
    List(SelectionArgs),
}
