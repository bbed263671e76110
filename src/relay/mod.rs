//! One-way relay from the capture side to the export side
//!
//! Capture hooks run next to untrusted traffic and only get a
//! [`RelaySender`]. The export side owns the [`RelayReceiver`], which
//! authenticates every message before it touches the [`CapturedPayload`].

mod channel;
mod slot;

pub use channel::{
    RelayChannel, RelayMessage, RelayReceiver, RelaySender, WindowId, WORKOUT_MESSAGE_TAG,
};
pub use slot::CapturedPayload;
