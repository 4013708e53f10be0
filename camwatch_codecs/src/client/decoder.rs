use crate::json_lines::JsonLinesDecoder;

pub type MessageDecoder = JsonLinesDecoder<super::Message>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        client::{LocationError, Message},
        position::{Coords, LatLng, LocationEvent},
    };
    use bytes::BytesMut;
    use tokio_util::codec::Decoder;

    #[test]
    fn decodes_flat_location() {
        let line = br#"{"type":"location","latlng":{"lat":53.5501,"lng":-1.4801},"speed":15.0}"#;
        let mut input = BytesMut::from(&line[..]);

        let mut decoder = MessageDecoder::default();
        assert!(matches!(decoder.decode(&mut input), Ok(None)));

        input.extend_from_slice(b"\n");
        let message = decoder.decode(&mut input).unwrap().unwrap();
        let expected = Message::Location(LocationEvent::flat(LatLng::new(53.5501, -1.4801), Some(15.0)));
        assert_eq!(expected, message);
    }

    #[test]
    fn decodes_nested_location() {
        let mut input = BytesMut::from(
            &br#"{"type":"location","coords":{"latitude":53.5,"longitude":-1.4,"speed":null}}
"#[..],
        );
        let message = MessageDecoder::default().decode(&mut input).unwrap().unwrap();
        let expected = Message::Location(LocationEvent {
            latlng: None,
            speed: None,
            coords: Some(Coords {
                latitude: 53.5,
                longitude: -1.4,
                speed: None,
            }),
        });
        assert_eq!(expected, message);
    }

    #[test]
    fn skips_garbage_and_blank_lines() {
        let mut input = BytesMut::from(
            &b"\nnot json\n{\"type\":\"teleport\"}\n{\"type\":\"toggle_follow\"}\n"[..],
        );
        let mut decoder = MessageDecoder::default();
        assert_eq!(Message::ToggleFollow, decoder.decode(&mut input).unwrap().unwrap());
        assert!(decoder.decode(&mut input).unwrap().is_none());
    }

    #[test]
    fn skips_overlong_line() {
        let padding = "x".repeat(crate::json_lines::MAX_LINE_LENGTH);
        let overlong = format!(r#"{{"type":"location_error","code":2,"message":"{padding}"}}"#);

        let mut input = BytesMut::from(format!("{overlong}\n{{\"type\":\"toggle_follow\"}}\n").as_bytes());
        let mut decoder = MessageDecoder::default();
        assert_eq!(Message::ToggleFollow, decoder.decode(&mut input).unwrap().unwrap());
        assert!(decoder.decode(&mut input).unwrap().is_none());

        let (head, tail) = overlong.split_at(overlong.len() - 10);
        let mut input = BytesMut::from(head.as_bytes());
        let mut decoder = MessageDecoder::default();
        assert!(decoder.decode(&mut input).unwrap().is_none());
        input.extend_from_slice(format!("{tail}\n{{\"type\":\"toggle_follow\"}}\n").as_bytes());
        assert_eq!(Message::ToggleFollow, decoder.decode(&mut input).unwrap().unwrap());
    }

    #[test]
    fn decodes_last_line_at_eof() {
        let mut input = BytesMut::from(&br#"{"type":"location_error","code":1}"#[..]);
        let mut decoder = MessageDecoder::default();
        assert!(decoder.decode(&mut input).unwrap().is_none());
        let message = decoder.decode_eof(&mut input).unwrap().unwrap();
        assert_eq!(
            Message::LocationError(LocationError {
                code: LocationError::PERMISSION_DENIED,
                message: String::new(),
            }),
            message
        );
        assert_eq!(message_reason(message), "permission denied");
    }

    fn message_reason(message: Message) -> String {
        match message {
            Message::LocationError(e) => e.reason(),
            other => panic!("unexpected {other:?}"),
        }
    }
}
