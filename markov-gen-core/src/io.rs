use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{GenError, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|e| GenError::io(e, path))?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Reads a training corpus into a single string.
///
/// Every line is trimmed, then lines are joined with one space, so the
/// result never contains a newline.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> Result<String> {
	let lines = read_file(&filename)?;
	debug!("read {} corpus lines from {}", lines.len(), filename.as_ref().display());
	Ok(join_lines(&lines))
}

fn join_lines(lines: &[String]) -> String {
	lines.iter().map(|line| line.trim()).collect::<Vec<_>>().join(" ")
}
