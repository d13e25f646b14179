/*!
Walk command - list top-level item boundaries with the cursor reader

A tagged item is listed once, at the offset of its first tag.
*/

use super::io::Input;
use super::settings::Settings;
use clap::Parser;
use hardy_cbor_stream::{Reader, SliceSource};

#[derive(Parser, Debug)]
#[command(about = "Print offset, length and type of each top-level item", long_about = None)]
pub struct Command {
    /// Input CBOR file or sequence (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self, settings: &Settings) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        for line in walk(&data, settings)? {
            println!("{line}");
        }
        Ok(())
    }
}

fn walk(data: &[u8], settings: &Settings) -> anyhow::Result<Vec<String>> {
    let mut reader = Reader::with_limits(SliceSource::new(data), settings.limits);
    let mut lines = Vec::new();
    while reader.has_more() {
        let offset = reader.source().position();
        let head = reader
            .peek_type()
            .map_err(|e| anyhow::anyhow!("Invalid item at offset {offset}: {e}"))?;
        reader
            .skip_tagged()
            .map_err(|e| anyhow::anyhow!("Failed to skip {} at offset {offset}: {e}", head.major))?;
        lines.push(format!(
            "{offset:>8} {:>8} {}",
            reader.source().position() - offset,
            head.major
        ));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_a_sequence() {
        let data = [0x01, 0x82, 0x02, 0x03, 0x63, b'a', b'b', b'c'];
        let lines = walk(&data, &Settings::default()).unwrap();
        assert_eq!(
            lines,
            vec![
                "       0        1 unsignedInteger",
                "       1        3 array",
                "       4        4 utf8String",
            ]
        );
    }

    #[test]
    fn tags_stay_with_their_item() {
        let data = [0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0, 0x00];
        let lines = walk(&data, &Settings::default()).unwrap();
        assert_eq!(
            lines,
            vec!["       0        6 tag", "       6        1 unsignedInteger"]
        );
    }

    #[test]
    fn reports_truncation() {
        let data = [0x01, 0x82, 0x02];
        let err = walk(&data, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("offset 1"));
    }
}
