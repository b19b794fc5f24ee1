use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input` for buffered reading. `stdin` reads standard input, a `.gz`
/// suffix is decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = mice::reader("tests/gfa/chain.gfa").unwrap();
/// let lines = reader.lines().collect::<Vec<_>>();
/// assert_eq!(lines.len(), 7);
///
/// assert!(mice::reader("tests/gfa/missing.gfa").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Input formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Gfa,
    Gff,
}

impl std::str::FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gfa" => Ok(Format::Gfa),
            "gff" | "gff3" => Ok(Format::Gff),
            other => Err(anyhow::anyhow!("Unsupported input format: {}", other)),
        }
    }
}

/// Picks the format from `force` or from the file extension, looking through
/// a trailing `.gz`.
///
/// ```
/// use mice::libs::io::{detect_format, Format};
/// assert_eq!(detect_format("a/b.gfa", None).unwrap(), Format::Gfa);
/// assert_eq!(detect_format("b.GFF.gz", None).unwrap(), Format::Gff);
/// assert_eq!(detect_format("stdin", Some("gfa")).unwrap(), Format::Gfa);
/// assert!(detect_format("b.txt", None).is_err());
/// assert!(detect_format("noext", None).is_err());
/// ```
pub fn detect_format(input: &str, force: Option<&str>) -> anyhow::Result<Format> {
    if let Some(f) = force {
        return f.parse();
    }

    let path = std::path::Path::new(input);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let ext = match ext.as_deref() {
        Some("gz") => path
            .file_stem()
            .and_then(|s| std::path::Path::new(s).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase()),
        _ => ext,
    };

    match ext {
        Some(e) => e.parse(),
        None => anyhow::bail!(
            "Cannot infer the format of {} (no extension). Pass --format.",
            input
        ),
    }
}
