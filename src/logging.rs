// tracing -> Godot output console

use std::io;

use godot::prelude::godot_print;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::logging::{DEBUG_FILTER, DEFAULT_FILTER};

/// Buffers one formatted event and prints it when dropped
#[derive(Default)]
pub struct GodotLine(Vec<u8>);

impl io::Write for GodotLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for GodotLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.0);
        let line = line.trim_end();
        if !line.is_empty() {
            godot_print!("{}", line);
        }
    }
}

pub struct GodotWriter;

impl<'a> MakeWriter<'a> for GodotWriter {
    type Writer = GodotLine;

    fn make_writer(&'a self) -> Self::Writer {
        GodotLine::default()
    }
}

/// Install the global subscriber. RUST_LOG wins over the built-in default.
pub fn init() {
    let default = if cfg!(feature = "debug_logs") { DEBUG_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Already installed on a hot reload
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(GodotWriter)
        .with_ansi(false)
        .without_time()
        .try_init();
}
