use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use ascribe::{Algorithm, Blame, Blamer, SliceDiffer};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum DiffAlgorithm {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl From<DiffAlgorithm> for Algorithm {
    fn from(a: DiffAlgorithm) -> Self {
        match a {
            DiffAlgorithm::Myers => Algorithm::Myers,
            DiffAlgorithm::Patience => Algorithm::Patience,
            DiffAlgorithm::Lcs => Algorithm::Lcs,
        }
    }
}

/// Blame the first file, treating the following files as its older revisions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Diff algorithm to use between revisions
    #[arg(short, long, value_enum, default_value_t)]
    algorithm: DiffAlgorithm,

    /// Read every file even after all lines are blamed
    #[arg(long)]
    full_history: bool,

    /// Print a header for each hunk followed by its lines
    #[arg(long)]
    porcelain: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Snapshots of the blamed file, newest first. A missing file ends the
    /// history.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Reads one snapshot, or `None` if the file does not exist.
fn read_snapshot(path: &Path) -> anyhow::Result<Option<Vec<String>>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents.lines().map(str::to_string).collect())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Unable to read {}", path.display())),
    }
}

fn blame_files(cli: &Cli) -> anyhow::Result<Blame<String, String>> {
    let blamer = Blamer::new(SliceDiffer::new(cli.algorithm.into()));

    let (newest, older) = cli.files.split_first().context("No files given")?;

    let contents = read_snapshot(newest)?
        .with_context(|| format!("{} does not exist", newest.display()))?;

    let mut session = blamer
        .blame(None, Some(newest.display().to_string()), Some(contents.as_slice()))
        .with_context(|| format!("Unable to blame {}", newest.display()))?;

    for path in older {
        if !cli.full_history && session.is_fully_resolved() {
            debug!("every line blamed, skipping remaining files");
            break;
        }

        let Some(contents) = read_snapshot(path)? else {
            info!(path = %path.display(), "file missing, treating as start of history");
            break;
        };

        session = blamer
            .blame(Some(session), Some(path.display().to_string()), Some(contents.as_slice()))
            .with_context(|| format!("Unable to compare with {}", path.display()))?;

        debug!(path = %path.display(), resolved = ?session.last_resolved(), "processed revision");
    }

    let blame = blamer.blame(Some(session), None, None)?.finish()?;

    Ok(blame)
}

fn print_blame(blame: &Blame<String, String>, out: &mut impl Write) -> io::Result<()> {
    let width = blame.revisions().map(String::len).max().unwrap_or(0);
    let digits = blame.len().to_string().len();

    for bl in blame {
        let marker = if bl.boundary { "^" } else { "" };

        writeln!(
            out,
            "{marker}{:<width$} {:>digits$} {:>digits$}) {}",
            bl.revision,
            bl.orig_line_no + 1,
            bl.line_no + 1,
            bl.line,
            width = width - marker.len().min(width),
        )?;
    }

    Ok(())
}

fn print_porcelain(blame: &Blame<String, String>, out: &mut impl Write) -> io::Result<()> {
    for (range, revision) in blame.hunks() {
        let first = &blame.origins()[range.start];

        writeln!(
            out,
            "{} {} {} {}",
            revision,
            first.line_no + 1,
            range.start + 1,
            range.len()
        )?;
        if first.boundary {
            writeln!(out, "boundary")?;
        }

        for line in &blame.contents()[range] {
            writeln!(out, "\t{line}")?;
        }
    }

    Ok(())
}

fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let blame = blame_files(cli)?;

    if cli.porcelain {
        print_porcelain(&blame, out)?;
    } else {
        print_blame(&blame, out)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    run(&cli, &mut io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("able to write snapshot");
        path
    }

    fn cli(files: Vec<PathBuf>, porcelain: bool) -> Cli {
        Cli {
            algorithm: DiffAlgorithm::Myers,
            full_history: false,
            porcelain,
            verbose: false,
            files,
        }
    }

    fn output(cli: &Cli) -> String {
        let mut out = vec![];
        run(cli, &mut out).expect("able to blame");
        String::from_utf8(out).expect("valid UTF-8")
    }

    #[test]
    fn plain_output() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "r2", "a\nb\nc\n"),
            write(dir.path(), "r1", "a\nx\nc\n"),
            write(dir.path(), "r0", "a\nx\nc\n"),
        ];

        let r0 = files[2].display().to_string();
        let r2 = files[0].display().to_string();

        assert_eq!(
            output(&cli(files, false)),
            format!("^{r0} 1 1) a\n{r2} 2 2) b\n^{r0} 3 3) c\n")
        );
    }

    #[test]
    fn porcelain_output() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "r1", "a\nb\nc\n"),
            write(dir.path(), "r0", "a\nb\n"),
        ];

        let r0 = files[1].display().to_string();
        let r1 = files[0].display().to_string();

        assert_eq!(
            output(&cli(files, true)),
            format!("{r0} 1 1 2\nboundary\n\ta\n\tb\n{r1} 3 3 1\n\tc\n")
        );
    }

    #[test]
    fn missing_file_ends_history() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "r1", "a\nb\n"),
            dir.path().join("does-not-exist"),
            write(dir.path(), "r0", "x\ny\n"),
        ];

        let r1 = files[0].display().to_string();

        assert_eq!(output(&cli(files, false)), format!("^{r1} 1 1) a\n^{r1} 2 2) b\n"));
    }

    #[test]
    fn missing_newest_file() {
        let dir = tempfile::tempdir().unwrap();

        let cli = cli(vec![dir.path().join("nope")], false);

        let err = run(&cli, &mut Vec::<u8>::new()).unwrap_err();

        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn args_parse() {
        let args = ["ascribe", "-a", "patience", "--porcelain", "new.txt", "old.txt"];
        let cli = Cli::try_parse_from(args).expect("valid arguments");

        assert!(matches!(cli.algorithm, DiffAlgorithm::Patience));
        assert!(cli.porcelain);
        assert_eq!(cli.files, vec![PathBuf::from("new.txt"), PathBuf::from("old.txt")]);
    }
}
