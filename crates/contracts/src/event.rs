//! Event - a single telemetry occurrence reported by the app
//!
//! Only the fields the SDK fills in are modelled; every other field id a
//! newer schema may carry is skipped on decode.

use codec::{required, CompactReader, CompactWriter, InputTransport, OutputTransport, Result};
use codec::{skip, ThriftStruct};
use serde::Serialize;

use crate::wire::{read_field_into, read_struct, write_field, write_opt_field, write_struct};
use crate::{EventType, Source};

/// How far down a front the user scrolled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrollDepth {
    pub max_extent: i32,
    pub number_of_containers: Option<i32>,
    pub number_of_containers_viewed: Option<i32>,
}

impl ThriftStruct for ScrollDepth {
    const NAME: &'static str = "ScrollDepth";

    fn write<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        write_struct(w, Self::NAME, |w| {
            write_field(w, "maxExtent", 1, &self.max_extent)?;
            write_opt_field(w, "numberOfContainers", 2, &self.number_of_containers)?;
            write_opt_field(
                w,
                "numberOfContainersViewed",
                3,
                &self.number_of_containers_viewed,
            )
        })
    }

    fn read<T: InputTransport>(r: &mut CompactReader<T>) -> Result<Self> {
        let mut max_extent = None;
        let mut number_of_containers = None;
        let mut number_of_containers_viewed = None;
        read_struct(r, |r, field| match field.field_id {
            1 => read_field_into(r, field, "maxExtent", &mut max_extent),
            2 => read_field_into(r, field, "numberOfContainers", &mut number_of_containers),
            3 => read_field_into(
                r,
                field,
                "numberOfContainersViewed",
                &mut number_of_containers_viewed,
            ),
            _ => skip(r, field.ttype),
        })?;
        Ok(Self {
            max_extent: required(max_extent, Self::NAME, "maxExtent")?,
            number_of_containers,
            number_of_containers_viewed,
        })
    }
}

/// One telemetry event
///
/// `event_id` is the identity of the event and also its key in the record
/// store. `age_ms_long` is stamped by the dispatcher at flush time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Event {
    pub event_type: EventType,
    pub event_id: String,
    pub view_id: Option<String>,
    pub age_ms_long: Option<i64>,
    pub age_ms: i32,
    pub path: Option<String>,
    pub previous_path: Option<String>,
    pub referring_source: Option<Source>,
    pub push_notification_id: Option<String>,
    pub attention_ms: Option<i64>,
    pub scroll_depth: Option<ScrollDepth>,
    pub rendered_components: Option<Vec<String>>,
}

impl Event {
    /// A `View` event with the given id and nothing else set
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    pub fn with_referring_source(mut self, source: Source) -> Self {
        self.referring_source = Some(source);
        self
    }
}

impl ThriftStruct for Event {
    const NAME: &'static str = "Event";

    fn write<T: OutputTransport>(&self, w: &mut CompactWriter<T>) -> Result<()> {
        write_struct(w, Self::NAME, |w| {
            write_field(w, "eventType", 3, &self.event_type)?;
            write_field(w, "eventId", 1, &self.event_id)?;
            write_opt_field(w, "viewId", 9, &self.view_id)?;
            write_opt_field(w, "ageMsLong", 22, &self.age_ms_long)?;
            write_field(w, "ageMs", 2, &self.age_ms)?;
            write_opt_field(w, "path", 4, &self.path)?;
            write_opt_field(w, "previousPath", 5, &self.previous_path)?;
            write_opt_field(w, "referringSource", 6, &self.referring_source)?;
            write_opt_field(w, "pushNotificationId", 7, &self.push_notification_id)?;
            write_opt_field(w, "attentionMs", 12, &self.attention_ms)?;
            write_opt_field(w, "scrollDepth", 13, &self.scroll_depth)?;
            write_opt_field(w, "renderedComponents", 19, &self.rendered_components)
        })
    }

    fn read<T: InputTransport>(r: &mut CompactReader<T>) -> Result<Self> {
        let mut event_type = None;
        let mut event_id = None;
        let mut age_ms = None;
        let mut event = Event::default();
        read_struct(r, |r, field| match field.field_id {
            3 => read_field_into(r, field, "eventType", &mut event_type),
            1 => read_field_into(r, field, "eventId", &mut event_id),
            9 => read_field_into(r, field, "viewId", &mut event.view_id),
            22 => read_field_into(r, field, "ageMsLong", &mut event.age_ms_long),
            2 => read_field_into(r, field, "ageMs", &mut age_ms),
            4 => read_field_into(r, field, "path", &mut event.path),
            5 => read_field_into(r, field, "previousPath", &mut event.previous_path),
            6 => read_field_into(r, field, "referringSource", &mut event.referring_source),
            7 => read_field_into(
                r,
                field,
                "pushNotificationId",
                &mut event.push_notification_id,
            ),
            12 => read_field_into(r, field, "attentionMs", &mut event.attention_ms),
            13 => read_field_into(r, field, "scrollDepth", &mut event.scroll_depth),
            19 => read_field_into(
                r,
                field,
                "renderedComponents",
                &mut event.rendered_components,
            ),
            _ => skip(r, field.ttype),
        })?;
        event.event_id = required(event_id, Self::NAME, "eventId")?;
        event.event_type = event_type.unwrap_or_default();
        event.age_ms = age_ms.unwrap_or_default();
        Ok(event)
    }
}

wire_struct!(ScrollDepth, Event);

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use codec::{decode_struct, encode_struct, BufferTransport, CodecError, TType};

    fn full_event() -> Event {
        Event {
            event_type: EventType::Interaction,
            event_id: "e-1".into(),
            view_id: Some("v-1".into()),
            age_ms_long: Some(1_234_567_890_123),
            age_ms: 42,
            path: Some("/uk".into()),
            previous_path: Some("/world".into()),
            referring_source: Some(Source::PushBreakingNews),
            push_notification_id: Some("push-7".into()),
            attention_ms: Some(-5),
            scroll_depth: Some(ScrollDepth {
                max_extent: 80,
                number_of_containers: Some(12),
                number_of_containers_viewed: None,
            }),
            rendered_components: Some((0..20).map(|i| format!("c{i}")).collect()),
        }
    }

    #[test]
    fn test_roundtrip_full_event() {
        let event = full_event();
        let bytes = encode_struct(&event).unwrap();
        assert_eq!(decode_struct::<Event>(bytes).unwrap(), event);
    }

    #[test]
    fn test_roundtrip_minimal_event() {
        let event = Event::new("only-id");
        let decoded: Event = decode_struct(encode_struct(&event).unwrap()).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.event_type, EventType::View);
        assert_eq!(decoded.age_ms, 0);
    }

    #[test]
    fn test_minimal_event_bytes() {
        // eventType(3)=VIEW, eventId(1) absolute, ageMs(2) delta 1, stop
        let bytes = encode_struct(&Event::new("a")).unwrap();
        assert_eq!(&bytes[..], &[0x35, 0x00, 0x08, 0x02, 0x01, b'a', 0x15, 0x00, 0x00]);
    }

    #[test]
    fn test_empty_rendered_components() {
        let mut event = Event::new("e");
        event.rendered_components = Some(vec![]);
        let decoded: Event = decode_struct(encode_struct(&event).unwrap()).unwrap();
        assert_eq!(decoded.rendered_components, Some(vec![]));
    }

    #[test]
    fn test_missing_event_id() {
        let bytes = Bytes::from_static(&[0x35, 0x00, 0x00]);
        let err = decode_struct::<Event>(bytes).unwrap_err();
        assert!(matches!(err, CodecError::MissingField { field: "eventId", .. }));
    }

    #[test]
    fn test_missing_scroll_extent() {
        let mut w = CompactWriter::new(BufferTransport::new());
        write_struct(&mut w, "ScrollDepth", |w| {
            write_opt_field(w, "numberOfContainers", 2, &Some(3))
        })
        .unwrap();
        let err = decode_struct::<ScrollDepth>(w.into_transport().into_bytes()).unwrap_err();
        assert!(matches!(err, CodecError::MissingField { field: "maxExtent", .. }));
    }

    #[test]
    fn test_unknown_source_value() {
        let mut w = CompactWriter::new(BufferTransport::new());
        write_struct(&mut w, "Event", |w| {
            write_field(w, "eventId", 1, &"e".to_string())?;
            write_field(w, "referringSource", 6, &99)
        })
        .unwrap();
        let err = decode_struct::<Event>(w.into_transport().into_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownEnum {
                enum_name: "Source",
                value: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_skips_unmodelled_fields() {
        // adLoad(8) as a nested struct, media(14) holding a map, plus a
        // mistyped path(4) written as i32
        let mut w = CompactWriter::new(BufferTransport::new());
        write_struct(&mut w, "Event", |w| {
            write_field(w, "eventId", 1, &"e".to_string())?;
            write_field(w, "path", 4, &7)?;
            w.write_field_begin("adLoad", 8, TType::Struct)?;
            write_struct(w, "RenderedAd", |w| {
                write_field(w, "adUnit", 1, &"slot".to_string())?;
                w.write_field_begin("isRefresh", 2, TType::Bool)?;
                w.write_bool(true)
            })?;
            w.write_field_begin("media", 14, TType::Map)?;
            w.write_map_begin(TType::String, TType::I64, 1)?;
            w.write_string("k")?;
            w.write_i64(9)?;
            write_field(w, "attentionMs", 12, &77i64)
        })
        .unwrap();
        let event: Event = decode_struct(w.into_transport().into_bytes()).unwrap();
        assert_eq!(event.event_id, "e");
        assert_eq!(event.path, None);
        assert_eq!(event.attention_ms, Some(77));
    }
}
