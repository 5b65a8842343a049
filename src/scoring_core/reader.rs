//! Asynchronous line reader for game event files

use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Records used when no input file is configured
pub const SAMPLE_EVENTS: [&str; 6] = [
    "user9_BattleshipGreyPossum,BattleshipGreyPossum,14,1447719060000,2015-11-16 16:11:03.955",
    "user2_AsparagusPig,AsparagusPig,10,1445230923951,2015-11-02 09:09:28.224",
    "user2_AzureBilby,AsparagusPig,8,1447719060000,2015-11-16 16:11:03.955",
    "user0_AzureBilby,AzureBilby,8,1447719060000,2015-11-16 16:11:03.955",
    "user9_AzureBilby,AzureBilby,5,1447719060000,2015-11-16 16:11:03.959",
    "user2_AsparagusPig,AsparagusPig,10,1445230923951,2015-11-02 09:09:28.224",
];

pub fn sample_lines() -> Vec<String> {
    SAMPLE_EVENTS.iter().map(|s| s.to_string()).collect()
}

/// Reads a file line by line.
///
/// Blank lines are returned as-is so the parser rejects and counts them
/// like any other malformed record.
pub struct LineReader {
    path: PathBuf,
    file: Option<BufReader<File>>,
    lines_read: u64,
}

impl LineReader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            lines_read: 0,
        }
    }

    pub async fn open(&mut self) -> std::io::Result<()> {
        let file = File::open(&self.path).await?;
        self.file = Some(BufReader::new(file));
        log::info!("📖 Reading events from: {}", self.path.display());
        Ok(())
    }

    /// Next line without its terminator, `None` at end of file
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let reader = self.file.as_mut().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "File not opened")
        })?;

        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.lines_read += 1;
        Ok(Some(line))
    }

    pub async fn read_all(&mut self) -> std::io::Result<Vec<String>> {
        if self.file.is_none() {
            self.open().await?;
        }

        let mut lines = Vec::new();
        while let Some(line) = self.read_line().await? {
            lines.push(line);
        }
        log::debug!("Read {} lines from {}", lines.len(), self.path.display());
        Ok(lines)
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}
