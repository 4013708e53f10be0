use bytes::{BufMut, BytesMut};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Decodes one JSON document per line.
///
/// Blank lines, lines that fail to deserialize and overlong lines are logged
/// and skipped rather than surfaced as stream errors, since a `FramedRead`
/// stops yielding after its decoder fails once.
#[derive(Debug, Clone)]
pub struct JsonLinesDecoder<T> {
    lines: LinesCodec,
    item: PhantomData<fn() -> T>,
}

impl<T> Default for JsonLinesDecoder<T> {
    fn default() -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
            item: PhantomData,
        }
    }
}

impl<T> JsonLinesDecoder<T>
where
    T: DeserializeOwned,
{
    fn parse(line: Result<Option<String>, LinesCodecError>) -> anyhow::Result<Step<T>> {
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(Step::Pending),
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                log::warn!("Skipping line longer than {MAX_LINE_LENGTH} bytes");
                return Ok(Step::Skip);
            }
            Err(LinesCodecError::Io(e)) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(Step::Skip);
        }
        match serde_json::from_str(line) {
            Ok(item) => Ok(Step::Item(item)),
            Err(e) => {
                log::warn!("Skipping malformed line {line:?}: {e}");
                Ok(Step::Skip)
            }
        }
    }
}

enum Step<T> {
    Item(T),
    Skip,
    Pending,
}

impl<T> Decoder for JsonLinesDecoder<T>
where
    T: DeserializeOwned,
{
    type Item = T;

    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match Self::parse(self.lines.decode(src))? {
                Step::Item(item) => return Ok(Some(item)),
                Step::Skip => continue,
                Step::Pending => return Ok(None),
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match Self::parse(self.lines.decode_eof(src))? {
                Step::Item(item) => return Ok(Some(item)),
                Step::Skip => continue,
                Step::Pending => return Ok(None),
            }
        }
    }
}

/// Encodes any serializable item as a single JSON line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct JsonLinesEncoder;

impl<T> Encoder<T> for JsonLinesEncoder
where
    T: Serialize,
{
    type Error = anyhow::Error;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = serde_json::to_vec(&item)?;
        dst.reserve(line.len() + 1);
        dst.put_slice(&line);
        dst.put_u8(b'\n');
        Ok(())
    }
}
