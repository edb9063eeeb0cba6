use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use sciname::input::{InputOptions, read_names_from_path};
use sciname::{ParsedName, ScientificNameParser, formatters, logger};

use super::Args;

const SAMPLE_NAME: &str = "Homo sapiens L.";

pub fn run_with_args(args: &Args) -> Result<()> {
    logger::init_cli_logger(args.verbose);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .ok();
    }

    let names = collect_names(args)?;
    tracing::info!(names = names.len(), "parsing");

    let pb = if args.progress {
        let pb = indicatif::ProgressBar::new(names.len() as u64);
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner} {pos}/{len} names {wide_bar} {eta}")?
                .tick_chars("⠁⠃⠇⠋⠙⠸⢰⣠⣄⡆"),
        );
        Some(pb)
    } else {
        None
    };

    let started = Instant::now();
    let parser = ScientificNameParser::new();
    let results: Vec<ParsedName> = names
        .par_iter()
        .map(|name| {
            let parsed = parser.from_string(name);
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            parsed
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    tracing::info!(
        names = results.len(),
        parsed = results.iter().filter(|n| n.parsed).count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_results(&mut out, &results, args).context("failed to write output")?;
    out.flush().context("failed to write output")?;
    Ok(())
}

fn collect_names(args: &Args) -> Result<Vec<String>> {
    let mut names = args.names.clone();
    if let Some(path) = &args.input {
        let opts = InputOptions {
            no_mmap: args.no_mmap,
            mmap_threshold: args
                .mmap_large
                .unwrap_or(InputOptions::default().mmap_threshold),
        };
        let from_file = read_names_from_path(path, &opts)
            .with_context(|| format!("reading names from {}", path.display()))?;
        tracing::info!(path = %path.display(), names = from_file.len(), "read input");
        names.extend(from_file);
    } else if names.is_empty() {
        names.push(SAMPLE_NAME.to_string());
    }
    Ok(names)
}

fn write_results<W: Write>(out: &mut W, results: &[ParsedName], args: &Args) -> Result<()> {
    if args.csv {
        out.write_all(formatters::csv::format(results)?.as_bytes())?;
        return Ok(());
    }
    if args.table {
        writeln!(out, "{}", formatters::table::format(results))?;
        return Ok(());
    }
    for r in results {
        writeln!(out, "{}", r.render_json(!args.pretty)?)?;
    }
    Ok(())
}
