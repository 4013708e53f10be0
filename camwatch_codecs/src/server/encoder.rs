use crate::json_lines::JsonLinesEncoder;

pub type MessageEncoder = JsonLinesEncoder;
