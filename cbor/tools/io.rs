use anyhow::Context;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// A file path, or `-` for stdin
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Stdin => {
                let mut data = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut data)
                    .context("Failed to read stdin")?;
                Ok(data)
            }
            Self::File(path) => {
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Self::Stdin,
            path => Self::File(PathBuf::from(path)),
        })
    }
}

/// Opens `path` for writing, or stdout when absent
pub fn writer(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    })
}
