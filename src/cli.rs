/*!
 * Driver Configuration
 *
 * clap surface for the `lockbench` binary plus the thread-set expression
 * parser. The measurement core never sees any of this; it consumes parsed
 * kinds and counts.
 */

use crate::core::errors::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Throughput microbenchmarks for mutual-exclusion primitives.
#[derive(Parser, Debug)]
#[clap(name = "lockbench", version)]
#[clap(about = "Compare lock throughput under contention", long_about = None)]
pub struct Cli {
    /// Lock kinds to sweep, comma separated (default: all)
    #[clap(short, long, value_delimiter = ',')]
    pub locks: Vec<String>,

    /// Thread counts, e.g. `1-4:1,8-16:8` or `1,2,8`
    #[clap(short = 'B', long = "threads", default_value = "1,2,4,8")]
    pub threads: String,

    /// Workload: do_nothing or cpu_burn
    #[clap(short = 'r', long, default_value = "do_nothing")]
    pub task: String,

    /// Unsynchronized-phase iterations (cpu_burn only)
    #[clap(long, default_value_t = 2048)]
    pub parallel_iters: u32,

    /// Critical-section iterations (cpu_burn only)
    #[clap(long, default_value_t = 32)]
    pub locked_iters: u32,

    /// Measurement window per repeat, in seconds
    #[clap(short, long, default_value_t = 1.0)]
    pub duration: f64,

    /// Runs averaged per (lock, threads) cell
    #[clap(long, default_value_t = 3)]
    pub repeats: usize,

    /// CSV output path (stdout when omitted)
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

fn invalid(spec: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidThreadSpec {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

/// Expand a thread-set expression into concrete counts.
///
/// Items are comma separated; each is `N`, `A-B`, or `A-B:STEP`. Duplicates
/// are dropped, keeping first-appearance order.
///
/// `1-4:1,8-16:8` expands to `[1, 2, 3, 4, 8, 16]`.
pub fn parse_thread_set(spec: &str) -> Result<Vec<usize>, ConfigError> {
    if spec.trim().is_empty() {
        return Err(ConfigError::EmptyThreadSet);
    }

    let mut counts: Vec<usize> = Vec::new();

    for item in spec.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(invalid(spec, "empty item"));
        }

        let (range, step) = match item.split_once(':') {
            Some((range, step)) => {
                let step: usize = step
                    .parse()
                    .map_err(|_| invalid(spec, format!("bad step in `{item}`")))?;
                if step == 0 {
                    return Err(invalid(spec, format!("zero step in `{item}`")));
                }
                (range, step)
            }
            None => (item, 1),
        };

        let (lo, hi) = match range.split_once('-') {
            Some((lo, hi)) => {
                let lo: usize = lo
                    .parse()
                    .map_err(|_| invalid(spec, format!("bad bound in `{item}`")))?;
                let hi: usize = hi
                    .parse()
                    .map_err(|_| invalid(spec, format!("bad bound in `{item}`")))?;
                (lo, hi)
            }
            None => {
                let n: usize = range
                    .parse()
                    .map_err(|_| invalid(spec, format!("bad count in `{item}`")))?;
                (n, n)
            }
        };

        if lo == 0 {
            return Err(invalid(spec, format!("zero thread count in `{item}`")));
        }
        if lo > hi {
            return Err(invalid(spec, format!("descending range in `{item}`")));
        }

        let mut value = lo;
        while value <= hi {
            if !counts.contains(&value) {
                counts.push(value);
            }
            match value.checked_add(step) {
                Some(next) => value = next,
                None => break,
            }
        }
    }

    if counts.is_empty() {
        return Err(ConfigError::EmptyThreadSet);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ranges_with_steps() {
        assert_eq!(
            parse_thread_set("1-4:1,8-16:8").unwrap(),
            vec![1, 2, 3, 4, 8, 16]
        );
    }

    #[test]
    fn plain_list() {
        assert_eq!(parse_thread_set("1,2,8").unwrap(), vec![1, 2, 8]);
    }

    #[test]
    fn single_count() {
        assert_eq!(parse_thread_set("32").unwrap(), vec![32]);
    }

    #[test]
    fn range_without_step_defaults_to_one() {
        assert_eq!(parse_thread_set("2-5").unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn step_overshooting_the_bound_stops_inside_it() {
        assert_eq!(parse_thread_set("1-10:4").unwrap(), vec![1, 5, 9]);
    }

    #[test]
    fn duplicates_are_dropped_in_first_appearance_order() {
        assert_eq!(parse_thread_set("4,1-4:1").unwrap(), vec![4, 1, 2, 3]);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(matches!(
            parse_thread_set("0"),
            Err(ConfigError::InvalidThreadSpec { .. })
        ));
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            parse_thread_set("1-8:0"),
            Err(ConfigError::InvalidThreadSpec { .. })
        ));
    }

    #[test]
    fn descending_range_is_rejected() {
        assert!(matches!(
            parse_thread_set("8-2"),
            Err(ConfigError::InvalidThreadSpec { .. })
        ));
    }

    #[test]
    fn empty_spec_is_an_empty_thread_set() {
        assert_eq!(parse_thread_set(""), Err(ConfigError::EmptyThreadSet));
        assert_eq!(parse_thread_set("  "), Err(ConfigError::EmptyThreadSet));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_thread_set("two").is_err());
        assert!(parse_thread_set("1,,2").is_err());
        assert!(parse_thread_set("1-").is_err());
    }
}
