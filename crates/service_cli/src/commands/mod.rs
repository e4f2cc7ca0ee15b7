//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod project;
pub mod value;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::Result;

/// Run `write` against `output`, or stdout when no path is given.
fn emit<F>(output: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            write(&mut file)?;
            file.flush()?;
            info!("Output written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write(&mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
