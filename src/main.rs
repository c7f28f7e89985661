/*!
 * lockbench - Driver Entry Point
 *
 * Enumerates the (lock, threads) Cartesian product, repeats each cell, and
 * emits one CSV row per cell with the mean total and derived ops/second.
 */

use clap::Parser;
use lockbench::cli::{parse_thread_set, Cli};
use lockbench::report::{mean_ops, CellRecord, CSV_HEADER};
use lockbench::sync::LockKind;
use lockbench::task::TaskKind;
use lockbench::{run, ConfigError};
use log::{error, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Duration;

// Driver exit codes. Everything below 2 is argument syntax; the rest map
// one-to-one onto configuration failures.
const EXIT_USAGE: u8 = 1;
const EXIT_UNKNOWN_LOCK: u8 = 2;
const EXIT_UNKNOWN_TASK: u8 = 3;
const EXIT_EMPTY_THREAD_SET: u8 = 4;
const EXIT_CSV: u8 = 5;

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders its own message; --help and --version land here too.
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    match drive(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

fn drive(cli: Cli) -> Result<(), ExitCode> {
    let kinds: Vec<LockKind> = if cli.locks.is_empty() {
        LockKind::ALL.to_vec()
    } else {
        cli.locks
            .iter()
            .map(|name| name.parse())
            .collect::<Result<_, _>>()
            .map_err(|err: ConfigError| {
                error!("{err}");
                ExitCode::from(EXIT_UNKNOWN_LOCK)
            })?
    };

    let task_kind: TaskKind = cli.task.parse().map_err(|err: ConfigError| {
        error!("{err}");
        ExitCode::from(EXIT_UNKNOWN_TASK)
    })?;

    let threads = parse_thread_set(&cli.threads).map_err(|err| {
        error!("{err}");
        match err {
            ConfigError::EmptyThreadSet => ExitCode::from(EXIT_EMPTY_THREAD_SET),
            _ => ExitCode::from(EXIT_USAGE),
        }
    })?;

    if !(cli.duration.is_finite() && cli.duration > 0.0) {
        error!("{}", ConfigError::NonPositiveDuration);
        return Err(ExitCode::from(EXIT_USAGE));
    }
    let duration = Duration::from_secs_f64(cli.duration);

    if cli.repeats == 0 {
        error!("repeats must be positive");
        return Err(ExitCode::from(EXIT_USAGE));
    }

    let mut out: BufWriter<Box<dyn Write>> = match &cli.output {
        Some(path) => {
            let file = File::create(path).map_err(|err| {
                error!("failed to open CSV file {}: {err}", path.display());
                ExitCode::from(EXIT_CSV)
            })?;
            BufWriter::new(Box::new(file))
        }
        None => BufWriter::new(Box::new(io::stdout())),
    };

    let (parallel_iters, locked_iters) = match task_kind {
        TaskKind::CpuBurn => (cli.parallel_iters, cli.locked_iters),
        TaskKind::DoNothing => (0, 0),
    };

    emit(&mut out, CSV_HEADER)?;

    for kind in &kinds {
        for &n_threads in &threads {
            let lock = kind.instantiate();
            let task = task_kind.instantiate(parallel_iters, locked_iters);

            let mut totals = Vec::with_capacity(cli.repeats);
            for repeat in 0..cli.repeats {
                match run(&*lock, &*task, n_threads, duration) {
                    Ok(total) => totals.push(total),
                    Err(err) => {
                        // Abort this cell, keep sweeping the rest.
                        error!(
                            "cell lock={kind} threads={n_threads} repeat={repeat}: {err}"
                        );
                        totals.clear();
                        break;
                    }
                }
            }
            if totals.is_empty() {
                continue;
            }

            let record = CellRecord {
                task: task_kind.as_str(),
                lock: kind.as_str(),
                threads: n_threads,
                duration_secs: cli.duration,
                repeats: cli.repeats,
                cpu_parallel_iters: parallel_iters,
                cpu_locked_iters: locked_iters,
                avg_ops: mean_ops(&totals),
            };
            info!(
                "lock={} threads={} avg_ops={:.2} ops/s={:.2}",
                record.lock,
                record.threads,
                record.avg_ops,
                record.ops_per_sec()
            );
            emit(&mut out, &record.to_csv_row())?;
        }
    }

    out.flush().map_err(|err| {
        error!("failed to flush CSV output: {err}");
        ExitCode::from(EXIT_CSV)
    })
}

fn emit(out: &mut BufWriter<Box<dyn Write>>, line: &str) -> Result<(), ExitCode> {
    writeln!(out, "{line}").map_err(|err| {
        error!("failed to write CSV row: {err}");
        ExitCode::from(EXIT_CSV)
    })
}
