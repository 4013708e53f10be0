use crate::json_lines::JsonLinesDecoder;

pub type MessageDecoder = JsonLinesDecoder<super::Message>;
