use log::{Level, log};

/// Line buffer for everything the user should see about one conversion. Every line is also forwarded
/// to the `log` facade as it is pushed (informational lines at `debug`, so they don't show up twice),
/// the caller flushes the buffer as one unit once the hierarchy is done.
#[derive(Debug, Default, Clone)]
pub struct ConversionLog {
    lines: Vec<(Level, String)>,
}

impl ConversionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: Level, line: impl Into<String>) {
        let line = line.into();
        let mirrored = if level <= Level::Warn { level } else { Level::Debug };
        log!(target: "axisfix::conversion", mirrored, "{}", line);
        self.lines.push((level, line));
    }

    #[inline]
    pub fn info(&mut self, line: impl Into<String>) {
        self.push(Level::Info, line);
    }

    #[inline]
    pub fn warn(&mut self, line: impl Into<String>) {
        self.push(Level::Warn, line);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|(_, line)| line.as_str())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, line)| line.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn append(&mut self, other: ConversionLog) {
        self.lines.extend(other.lines);
    }

    /// Takes all buffered lines as one block of text, warnings are prefixed.
    pub fn flush(&mut self) -> String {
        let text = self
            .lines
            .iter()
            .map(|(level, line)| match level {
                Level::Warn | Level::Error => format!("[{}] {}", level, line),
                _ => line.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.lines.clear();
        text
    }
}

/// Result of a deduplication pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DedupReport {
    pub unique_meshes: usize,
    /// References that have been rewritten to point to an already known buffer.
    pub instanced: usize,
}
