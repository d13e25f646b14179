/*!
Events command - drive the push decoder over chunked input
*/

use super::io::{Input, writer};
use super::settings::Settings;
use clap::Parser;
use hardy_cbor_stream::{Decoder, Event, Sign, Status, StreamBuffer};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, trace};

#[derive(Parser, Debug)]
#[command(about = "Print one line per decoded CBOR head", long_about = None)]
pub struct Command {
    /// Bytes handed to the decoder per run, to exercise resumption
    #[arg(long, default_value_t = 4096, value_name = "BYTES")]
    chunk_size: usize,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self, settings: &Settings) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        let mut out = writer(self.output.as_ref())?;

        let mut decoder = Decoder::with_limits(StreamBuffer::new(), settings.limits);
        let mut nesting = Nesting::default();

        for chunk in data.chunks(self.chunk_size.max(1)) {
            decoder.source_mut().feed(chunk);

            let mut events: Vec<Event> = Vec::new();
            let status = decoder.run(&mut events);
            trace!(
                "Fed {} bytes, {} events, {} bytes buffered",
                chunk.len(),
                events.len(),
                decoder.source().len()
            );

            for event in &events {
                writeln!(out, "{:indent$}{}", "", describe(event), indent = nesting.depth() * 2)?;
                nesting.push(event);
            }

            if status == Status::Failed {
                out.flush()?;
                anyhow::bail!(
                    "Decoding failed after {} bytes",
                    decoder.source().consumed()
                );
            }
        }
        out.flush()?;

        if !decoder.is_idle() {
            anyhow::bail!("Input ends part way through an item");
        }
        if nesting.depth() > 0 {
            debug!("Open containers at end of input: {:?}", nesting.open);
            anyhow::bail!("Input ends inside {} open container(s)", nesting.depth());
        }
        Ok(())
    }
}

/// Tracks how many items each open container (or tag) still expects.
#[derive(Default)]
struct Nesting {
    open: Vec<u64>,
}

impl Nesting {
    fn depth(&self) -> usize {
        self.open.len()
    }

    fn push(&mut self, event: &Event) {
        if let Some(remaining) = self.open.last_mut() {
            *remaining -= 1;
        }
        match event.children() {
            0 => {}
            children => self.open.push(children),
        }
        while self.open.last() == Some(&0) {
            self.open.pop();
        }
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::Integer(v) => v.to_string(),
        Event::ExtraInteger(m, Sign::Positive) => m.to_string(),
        Event::ExtraInteger(m, Sign::Negative) => (-1 - *m as i128).to_string(),
        Event::Bytes(b) => format!("h'{}'", hex::encode(b)),
        Event::String(s) => format!("{s:?}"),
        Event::Array(n) => format!("array({n})"),
        Event::Map(n) => format!("map({n})"),
        Event::Tag(t) | Event::ExtraTag(t) => format!("tag({t})"),
        Event::Bool(b) => b.to_string(),
        Event::Null => "null".to_string(),
        Event::Undefined => "undefined".to_string(),
        Event::Special(v) => format!("simple({v})"),
        Event::Half(v) => format!("{v:?}_1"),
        Event::Float(v) => format!("{v:?}_2"),
        Event::Double(v) => format!("{v:?}_3"),
        Event::Error(e) => format!("error: {e}"),
    }
}
