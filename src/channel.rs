//! Bidirectional host/surface message protocol
//!
//! Every message crossing the boundary is a JSON object carrying a constant
//! `channel` tag. The transport is a shared bus also used by unrelated
//! traffic in the host environment, so inbound validation is strict and
//! silent: anything that is not ours is dropped, never raised.
//!
//! Validation order on receipt:
//! 1. reject non-string bus payloads
//! 2. reject payloads that do not parse as a JSON object
//! 3. reject a missing or mismatched `channel` tag (the actual isolation
//!    guarantee; 1 and 2 are cheap short-circuits)
//! 4. dispatch by `type`; unknown types are ignored

use crate::height::HeightNegotiator;
use crate::scroll::ScrollCoordinator;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Constant discriminator marking a message as belonging to this protocol
pub const CHANNEL_TAG: &str = "mailsurface.embedded-body";

/// Protocol messages, tagged by their `type` field on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChannelMessage {
    /// Wheel movement inside the surface, forwarded to the host scrollable
    #[serde(rename = "scrollFromSurface")]
    ScrollFromSurface {
        #[serde(rename = "deltaY")]
        delta_y: f64,
    },

    /// Absolute offset pushed from the host into the surface
    #[serde(rename = "scrollFromHost")]
    ScrollFromHost {
        #[serde(rename = "scrollOffset")]
        scroll_offset: f64,
    },

    /// Measured content height reported by the surface
    #[serde(rename = "heightReport")]
    HeightReport { height: f64 },
}

/// Serialize a message with the channel tag attached, ready for the bus
pub fn encode(message: &ChannelMessage) -> String {
    let mut value = serde_json::to_value(message).unwrap_or(Value::Null);
    if let Value::Object(ref mut map) = value {
        map.insert("channel".to_string(), Value::String(CHANNEL_TAG.to_string()));
    }
    value.to_string()
}

/// Inbound port of the protocol, dispatching validated traffic to the
/// scroll coordinator and height negotiator of one render surface.
pub struct MessageChannel {
    scroll: ScrollCoordinator,
    height: HeightNegotiator,
}

impl MessageChannel {
    pub fn new(scroll: ScrollCoordinator, height: HeightNegotiator) -> Self {
        Self { scroll, height }
    }

    pub fn scroll(&self) -> &ScrollCoordinator {
        &self.scroll
    }

    pub fn height(&self) -> &HeightNegotiator {
        &self.height
    }

    /// Entry point for raw bus events whose payload may be any JSON value.
    /// Only string payloads can carry protocol traffic (rule 1).
    pub fn on_bus_message(&self, payload: &Value) {
        if let Value::String(raw) = payload {
            self.on_raw_message(raw);
        }
    }

    /// Entry point for string payloads (rules 2-4)
    pub fn on_raw_message(&self, raw: &str) {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => return,
        };
        if !value.is_object() {
            return;
        }

        match value.get("channel").and_then(Value::as_str) {
            Some(tag) if tag == CHANNEL_TAG => {}
            _ => return,
        }

        let message: ChannelMessage = match serde_json::from_value(value) {
            Ok(m) => m,
            Err(_) => {
                debug!("ignoring unknown or malformed protocol message: {}", raw);
                return;
            }
        };

        match message {
            ChannelMessage::ScrollFromSurface { delta_y } => self.scroll.on_scroll_delta(delta_y),
            ChannelMessage::HeightReport { height } => self.height.on_height_report(height),
            // Outbound-only; a surface echoing it back is not our traffic
            ChannelMessage::ScrollFromHost { .. } => {}
        }
    }

    /// Encode a host-to-surface scroll offset message
    pub fn encode_scroll_from_host(offset: f64) -> String {
        encode(&ChannelMessage::ScrollFromHost {
            scroll_offset: offset,
        })
    }

    /// Detach both consumers; nothing fires after disposal
    pub fn dispose(&self) {
        self.scroll.dispose();
        self.height.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::height::DEFAULT_SURFACE_HEIGHT;
    use crate::platform::{ManualFrameScheduler, RecordingScrollSurface};
    use std::sync::Arc;

    fn channel_with(
        surface: Arc<RecordingScrollSurface>,
        scheduler: Arc<ManualFrameScheduler>,
    ) -> MessageChannel {
        MessageChannel::new(
            ScrollCoordinator::new(surface, scheduler),
            HeightNegotiator::default(),
        )
    }

    #[test]
    fn valid_height_report_reaches_the_negotiator() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface, scheduler);

        channel.on_raw_message(&format!(
            r#"{{"channel":"{}","type":"heightReport","height":612.5}}"#,
            CHANNEL_TAG
        ));
        assert_eq!(channel.height().current_height(), 612.5);
    }

    #[test]
    fn valid_scroll_delta_reaches_the_coordinator() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface.clone(), scheduler.clone());

        channel.on_raw_message(&format!(
            r#"{{"channel":"{}","type":"scrollFromSurface","deltaY":40}}"#,
            CHANNEL_TAG
        ));
        scheduler.run_frame();
        assert_eq!(surface.jumps(), vec![40.0]);
    }

    #[test]
    fn foreign_channel_tag_changes_no_state_even_with_valid_type() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface.clone(), scheduler.clone());

        channel.on_raw_message(
            r#"{"channel":"someone.elses.bus","type":"heightReport","height":900}"#,
        );
        channel.on_raw_message(r#"{"type":"scrollFromSurface","deltaY":40}"#);

        assert_eq!(channel.height().current_height(), DEFAULT_SURFACE_HEIGHT);
        assert_eq!(scheduler.pending_count(), 0);
        scheduler.run_frame();
        assert!(surface.jumps().is_empty());
    }

    #[test]
    fn non_string_bus_payloads_are_ignored() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface, scheduler);

        channel.on_bus_message(&serde_json::json!(42));
        channel.on_bus_message(&serde_json::json!({
            "channel": CHANNEL_TAG, "type": "heightReport", "height": 900
        }));
        assert_eq!(channel.height().current_height(), DEFAULT_SURFACE_HEIGHT);
    }

    #[test]
    fn malformed_json_and_non_objects_are_ignored() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface, scheduler);

        channel.on_raw_message("not json at all");
        channel.on_raw_message("[1,2,3]");
        channel.on_raw_message("\"just a string\"");
        assert_eq!(channel.height().current_height(), DEFAULT_SURFACE_HEIGHT);
    }

    #[test]
    fn unknown_type_on_our_channel_is_ignored() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface, scheduler);

        channel.on_raw_message(&format!(
            r#"{{"channel":"{}","type":"somethingNew","payload":1}}"#,
            CHANNEL_TAG
        ));
        assert_eq!(channel.height().current_height(), DEFAULT_SURFACE_HEIGHT);
    }

    #[test]
    fn non_numeric_payload_is_rejected() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface, scheduler);

        channel.on_raw_message(&format!(
            r#"{{"channel":"{}","type":"heightReport","height":"tall"}}"#,
            CHANNEL_TAG
        ));
        assert_eq!(channel.height().current_height(), DEFAULT_SURFACE_HEIGHT);
    }

    #[test]
    fn scroll_from_host_round_trips_through_encode() {
        let encoded = MessageChannel::encode_scroll_from_host(133.0);
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["channel"], CHANNEL_TAG);
        assert_eq!(value["type"], "scrollFromHost");
        assert_eq!(value["scrollOffset"], 133.0);
    }

    #[test]
    fn inbound_scroll_from_host_is_not_dispatched() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface, scheduler.clone());

        channel.on_raw_message(&MessageChannel::encode_scroll_from_host(50.0));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn dispose_detaches_both_consumers() {
        let surface = Arc::new(RecordingScrollSurface::new(1000.0));
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let channel = channel_with(surface.clone(), scheduler.clone());

        channel.dispose();
        channel.on_raw_message(&format!(
            r#"{{"channel":"{}","type":"scrollFromSurface","deltaY":40}}"#,
            CHANNEL_TAG
        ));
        channel.on_raw_message(&format!(
            r#"{{"channel":"{}","type":"heightReport","height":900}}"#,
            CHANNEL_TAG
        ));

        scheduler.run_frame();
        assert!(surface.jumps().is_empty());
        assert_eq!(channel.height().current_height(), DEFAULT_SURFACE_HEIGHT);
    }
}
