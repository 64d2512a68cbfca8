//! Interface de terminal do requeue: spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`RetryProgress`] acompanha visualmente o
//! reprocessamento de um lote de jobs falhos.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::failed::FailureRecord;
use crate::orchestrator::{RetryOutcome, RetryStatus};

/// Indicador visual de progresso para um lote de retentativas.
///
/// Exibe um spinner enquanto os jobs são processados e uma linha colorida
/// por resultado: verde para sucesso, vermelho para erro.
pub struct RetryProgress {
    // Spinner do indicatif.
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl RetryProgress {
    /// Inicia o spinner.
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Retrying failed jobs...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Imprime o resultado de um job acima do spinner.
    pub fn report(&self, outcome: &RetryOutcome) {
        let mark = if outcome.is_success() {
            self.green.apply_to("✓")
        } else {
            self.red.apply_to("✗")
        };
        self.pb.println(format!("  {mark} {}", outcome_line(outcome)));
    }

    /// Finaliza o spinner e exibe o resumo do lote.
    pub fn finish(&self, succeeded: usize, failed: usize) {
        self.pb.finish_and_clear();
        if succeeded == 0 && failed == 0 {
            println!("  {}", self.yellow.apply_to("No failed jobs to retry."));
            return;
        }
        let style = if failed == 0 { &self.green } else { &self.yellow };
        println!(
            "{}",
            style.apply_to(format!("{succeeded} retried, {failed} failed"))
        );
    }
}

/// Texto descrevendo um resultado, sem estilo.
pub fn outcome_line(outcome: &RetryOutcome) -> String {
    let id = &outcome.id;
    match &outcome.status {
        RetryStatus::Succeeded => {
            format!("The failed job [{id}] has been pushed back onto the queue!")
        }
        RetryStatus::NotFound => format!("Unable to find failed job with ID [{id}]."),
        RetryStatus::PayloadDecodeError(msg) => {
            format!("Failed job [{id}] has an unreadable payload: {msg}")
        }
        RetryStatus::EnqueueError(msg) => {
            format!("Failed job [{id}] could not be pushed onto the queue: {msg}")
        }
        RetryStatus::LookupError(msg) => format!("Unable to look up failed job [{id}]: {msg}"),
    }
}

/// Imprime os registros de falha selecionados, um por linha.
pub fn print_records(records: &[FailureRecord]) {
    let dim = Style::new().dim();
    if records.is_empty() {
        println!("  {}", dim.apply_to("No failed jobs match."));
        return;
    }
    for r in records {
        println!(
            "  {:>6}  {}/{}  {}  {}",
            r.id.as_str(),
            r.connection,
            r.queue,
            dim.apply_to(r.failed_at.format("%Y-%m-%d %H:%M:%S")),
            first_line(&r.exception)
        );
    }
}

/// Imprime um valor como uma linha JSON em stdout.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
